//! DESK perpetuals exchange actions.
//!
//! The exchange SDK is reached only through [`DeskSession`]; this crate owns
//! credential validation, the action table and result formatting.

pub mod config;
pub mod provider;
pub mod schemas;
pub mod session;

pub use config::{DeskConfig, DeskCredentials, DeskEnvironment, SUPPORTED_CHAIN_IDS};
pub use provider::{DeskActionProvider, PROVIDER_NAME};
pub use session::{
    CancelAllOrdersRequest, CancelOrderRequest, DeskSession, OrderSide, OrderType,
    PlaceOrderRequest, TimeInForce,
};

use anyhow::Result;
use onchain_actions_core::ActionResult;

/// Create a DESK provider from `config`, building its session with `connect`.
pub fn desk_action_provider<S, F>(config: &DeskConfig, connect: F) -> ActionResult<DeskActionProvider<S>>
where
    S: DeskSession + 'static,
    F: FnOnce(&DeskCredentials) -> Result<S>,
{
    DeskActionProvider::new(config, connect)
}
