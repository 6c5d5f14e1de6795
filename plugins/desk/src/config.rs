use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use url::Url;

use onchain_actions_core::config::{env_var, load_dotenv};

/// Base mainnet.
pub const MAINNET_CHAIN_ID: &str = "8453";
/// Arbitrum Sepolia.
pub const TESTNET_CHAIN_ID: &str = "421614";
pub const SUPPORTED_CHAIN_IDS: [&str; 2] = [MAINNET_CHAIN_ID, TESTNET_CHAIN_ID];

const MAINNET_RPC_URL: &str = "https://mainnet.base.org";
const TESTNET_RPC_URL: &str = "https://sepolia-rollup.arbitrum.io/rpc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskEnvironment {
    Mainnet,
    Testnet,
}

/// Raw provider inputs, as read from the environment or a CLI.
#[derive(Clone, Default)]
pub struct DeskConfig {
    pub private_key: String,
    pub sub_account_id: String,
    pub chain_id: String,
    pub rpc_url: Option<String>,
}

impl DeskConfig {
    /// Read `PRIVATE_KEY`, `SUB_ACCOUNT_ID`, `CHAIN_ID` and `RPC_URL`.
    ///
    /// Missing values are left empty and reported by [`DeskConfig::validate`].
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            private_key: env_var("PRIVATE_KEY").unwrap_or_default(),
            sub_account_id: env_var("SUB_ACCOUNT_ID").unwrap_or_default(),
            chain_id: env_var("CHAIN_ID").unwrap_or_default(),
            rpc_url: env_var("RPC_URL"),
        }
    }

    /// Check every input and resolve defaults.
    pub fn validate(&self) -> Result<DeskCredentials> {
        if self.private_key.trim().is_empty() {
            bail!("You must set the PRIVATE_KEY environment variable");
        }
        let chain_id = self.chain_id.trim();
        if chain_id.is_empty() {
            bail!("You must set the CHAIN_ID environment variable");
        }
        if !SUPPORTED_CHAIN_IDS.contains(&chain_id) {
            bail!(
                "Unsupported chain ID: {chain_id}. Only {:?} are supported",
                SUPPORTED_CHAIN_IDS
            );
        }
        if self.sub_account_id.trim().is_empty() {
            bail!("You must set the SUB_ACCOUNT_ID environment variable");
        }

        let private_key = normalize_private_key(&self.private_key)?;
        let sub_account_id = self
            .sub_account_id
            .trim()
            .parse::<u32>()
            .with_context(|| format!("invalid SUB_ACCOUNT_ID: {}", self.sub_account_id))?;

        let environment = if chain_id == MAINNET_CHAIN_ID {
            DeskEnvironment::Mainnet
        } else {
            DeskEnvironment::Testnet
        };

        let rpc_url = match &self.rpc_url {
            Some(url) if !url.trim().is_empty() => {
                Url::parse(url.trim()).with_context(|| format!("invalid RPC_URL: {url}"))?
            }
            _ => {
                let default = match environment {
                    DeskEnvironment::Mainnet => MAINNET_RPC_URL,
                    DeskEnvironment::Testnet => TESTNET_RPC_URL,
                };
                Url::parse(default)?
            }
        };

        Ok(DeskCredentials {
            private_key,
            sub_account_id,
            chain_id: chain_id.to_string(),
            rpc_url,
            environment,
        })
    }
}

impl fmt::Debug for DeskConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskConfig")
            .field("private_key", &"<redacted>")
            .field("sub_account_id", &self.sub_account_id)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url)
            .finish()
    }
}

/// Validated inputs handed to the session connector.
#[derive(Clone)]
pub struct DeskCredentials {
    /// `0x`-prefixed, lowercase, 32 bytes.
    pub private_key: String,
    pub sub_account_id: u32,
    pub chain_id: String,
    pub rpc_url: Url,
    pub environment: DeskEnvironment,
}

impl fmt::Debug for DeskCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeskCredentials")
            .field("private_key", &"<redacted>")
            .field("sub_account_id", &self.sub_account_id)
            .field("chain_id", &self.chain_id)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("environment", &self.environment)
            .finish()
    }
}

fn normalize_private_key(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| anyhow!("PRIVATE_KEY is not valid hex: {e}"))?;
    if bytes.len() != 32 {
        bail!("PRIVATE_KEY must be 32 bytes, got {}", bytes.len());
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x1234567890123456789012345678901234567890123456789012345678901234";

    fn config() -> DeskConfig {
        DeskConfig {
            private_key: KEY.to_string(),
            sub_account_id: "1".to_string(),
            chain_id: MAINNET_CHAIN_ID.to_string(),
            rpc_url: None,
        }
    }

    #[test]
    fn resolves_mainnet_defaults() {
        let creds = config().validate().unwrap();
        assert_eq!(creds.environment, DeskEnvironment::Mainnet);
        assert_eq!(creds.rpc_url.as_str(), "https://mainnet.base.org/");
        assert_eq!(creds.sub_account_id, 1);
        assert_eq!(creds.private_key, KEY);
    }

    #[test]
    fn testnet_with_rpc_override() {
        let creds = DeskConfig {
            chain_id: TESTNET_CHAIN_ID.to_string(),
            rpc_url: Some("https://mainnet.infura.io/v3/123".to_string()),
            ..config()
        }
        .validate()
        .unwrap();
        assert_eq!(creds.environment, DeskEnvironment::Testnet);
        assert_eq!(creds.rpc_url.host_str(), Some("mainnet.infura.io"));
    }

    #[test]
    fn blank_rpc_url_falls_back_to_default() {
        for blank in ["", "   "] {
            let creds = DeskConfig {
                chain_id: TESTNET_CHAIN_ID.to_string(),
                rpc_url: Some(blank.to_string()),
                ..config()
            }
            .validate()
            .unwrap();
            assert_eq!(creds.rpc_url.as_str(), "https://sepolia-rollup.arbitrum.io/rpc");
        }
    }

    #[test]
    fn errors_name_the_missing_input() {
        let cases = [
            (DeskConfig { private_key: String::new(), ..config() }, "PRIVATE_KEY"),
            (DeskConfig { chain_id: " ".into(), ..config() }, "CHAIN_ID"),
            (DeskConfig { chain_id: "1".into(), ..config() }, "Unsupported chain ID: 1"),
            (DeskConfig { sub_account_id: String::new(), ..config() }, "SUB_ACCOUNT_ID"),
            (DeskConfig { private_key: "0xnothex".into(), ..config() }, "PRIVATE_KEY"),
            (DeskConfig { private_key: "0xabcd".into(), ..config() }, "32 bytes"),
            (DeskConfig { sub_account_id: "one".into(), ..config() }, "SUB_ACCOUNT_ID"),
            (DeskConfig { rpc_url: Some("not a url".into()), ..config() }, "RPC_URL"),
        ];
        for (cfg, needle) in cases {
            let err = cfg.validate().unwrap_err().to_string();
            assert!(err.contains(needle), "`{err}` should mention `{needle}`");
        }
    }

    #[test]
    fn debug_redacts_key() {
        let shown = format!("{:?} {:?}", config(), config().validate().unwrap());
        assert!(!shown.contains("1234567890"));
    }
}
