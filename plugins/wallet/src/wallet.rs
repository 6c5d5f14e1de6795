use std::fmt::Debug;

use anyhow::Result;
use async_trait::async_trait;

use onchain_actions_core::Network;

/// A signing wallet bound to one network.
///
/// Implementations range from local keys to remote signers; the wallet
/// action provider only needs these calls.
#[async_trait]
pub trait WalletProvider: Send + Sync + Debug {
    fn address(&self) -> String;

    fn network(&self) -> Network;

    /// Short name of the implementation, e.g. `"local"`.
    fn name(&self) -> &str;

    /// Native balance in base units (wei, lamports).
    async fn balance(&self) -> Result<String>;

    /// Send `value` whole units of the native asset to `to`; returns the
    /// transaction hash.
    async fn native_transfer(&self, to: &str, value: &str) -> Result<String>;
}
