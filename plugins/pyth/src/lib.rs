//! Pyth price oracle actions backed by the Hermes HTTP API.

pub mod hermes;
pub mod provider;

pub use provider::{PythActionProvider, PythConfig, DEFAULT_HERMES_URL, PROVIDER_NAME};

use onchain_actions_core::ActionResult;

pub fn pyth_action_provider() -> ActionResult<PythActionProvider> {
    PythActionProvider::new(&PythConfig::from_env())
}
