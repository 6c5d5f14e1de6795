//! Environment-based configuration shared by providers.

use anyhow::{anyhow, Result};

use crate::network::Network;

/// Load a `.env` file from the working directory or its parents, if present.
pub fn load_dotenv() {
    if let Ok(path) = dotenv::dotenv() {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
}

/// Value of `name`, treating unset and blank the same.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn require_env(name: &str) -> Result<String> {
    env_var(name).ok_or_else(|| anyhow!("You must set the {name} environment variable"))
}

/// Active network from `NETWORK_ID` (e.g. `base-sepolia`), falling back to an
/// EVM `CHAIN_ID`.
pub fn network_from_env() -> Result<Network> {
    if let Some(id) = env_var("NETWORK_ID") {
        return Network::by_id(&id).ok_or_else(|| {
            anyhow!(
                "Unsupported NETWORK_ID: {id}. Expected one of: {}",
                Network::known_ids().collect::<Vec<_>>().join(", ")
            )
        });
    }
    env_var("CHAIN_ID")
        .map(Network::evm_chain)
        .ok_or_else(|| anyhow!("You must set the NETWORK_ID or CHAIN_ID environment variable"))
}
