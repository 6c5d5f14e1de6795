use std::fmt;

use serde::{Deserialize, Serialize};

/// Protocol family a network belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolFamily {
    Evm,
    Svm,
}

/// Execution network an agent is bound to.
///
/// Used purely as a filter key when building a registry. Providers inspect
/// it in `supports_network` and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    pub protocol_family: ProtocolFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

// (network id, family, chain id)
const KNOWN_NETWORKS: &[(&str, ProtocolFamily, Option<&str>)] = &[
    ("base-mainnet", ProtocolFamily::Evm, Some("8453")),
    ("base-sepolia", ProtocolFamily::Evm, Some("84532")),
    ("ethereum-mainnet", ProtocolFamily::Evm, Some("1")),
    ("ethereum-sepolia", ProtocolFamily::Evm, Some("11155111")),
    ("arbitrum-mainnet", ProtocolFamily::Evm, Some("42161")),
    ("arbitrum-sepolia", ProtocolFamily::Evm, Some("421614")),
    ("optimism-mainnet", ProtocolFamily::Evm, Some("10")),
    ("optimism-sepolia", ProtocolFamily::Evm, Some("11155420")),
    ("polygon-mainnet", ProtocolFamily::Evm, Some("137")),
    ("polygon-mumbai", ProtocolFamily::Evm, Some("80001")),
    ("solana-mainnet", ProtocolFamily::Svm, None),
    ("solana-devnet", ProtocolFamily::Svm, None),
    ("solana-testnet", ProtocolFamily::Svm, None),
];

impl Network {
    /// Look up one of the well-known networks by id, e.g. `"base-mainnet"`.
    pub fn by_id(network_id: &str) -> Option<Self> {
        KNOWN_NETWORKS
            .iter()
            .find(|(id, _, _)| *id == network_id)
            .map(|(id, family, chain_id)| Self {
                protocol_family: *family,
                network_id: Some((*id).to_string()),
                chain_id: chain_id.map(str::to_string),
            })
    }

    /// Resolve an EVM chain id to a network, naming it when it is well known.
    pub fn evm_chain(chain_id: impl Into<String>) -> Self {
        let chain_id = chain_id.into();
        let network_id = KNOWN_NETWORKS
            .iter()
            .find(|(_, family, id)| *family == ProtocolFamily::Evm && *id == Some(chain_id.as_str()))
            .map(|(id, _, _)| (*id).to_string());

        Self {
            protocol_family: ProtocolFamily::Evm,
            network_id,
            chain_id: Some(chain_id),
        }
    }

    /// Ids of every well-known network, in declaration order.
    pub fn known_ids() -> impl Iterator<Item = &'static str> {
        KNOWN_NETWORKS.iter().map(|(id, _, _)| *id)
    }

    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }

    pub fn is_evm(&self) -> bool {
        self.protocol_family == ProtocolFamily::Evm
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.network_id, &self.chain_id) {
            (Some(id), _) => f.write_str(id),
            (None, Some(chain_id)) => write!(f, "{:?}:{chain_id}", self.protocol_family),
            (None, None) => write!(f, "{:?}", self.protocol_family),
        }
    }
}
