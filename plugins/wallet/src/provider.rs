use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::json;

use onchain_actions_core::{
    to_result_string, Action, ActionArgs, ActionDescriptor, ActionError, ActionProvider, ActionSet,
    BoxFuture, FieldSpec, FieldType, Network, Schema,
};

use crate::wallet::WalletProvider;

pub const PROVIDER_NAME: &str = "wallet";

/// Basic wallet actions for whatever [`WalletProvider`] the agent runs with.
pub struct WalletActionProvider {
    wallet: Arc<dyn WalletProvider>,
    actions: ActionSet<Self>,
}

impl WalletActionProvider {
    pub fn new(wallet: Arc<dyn WalletProvider>) -> Self {
        Self {
            wallet,
            actions: ActionSet::new()
                .with(ActionDescriptor::new(
                    "get_wallet_details",
                    "Get details about the connected wallet: address, network, \
                     provider and native balance.",
                    Self::get_wallet_details,
                ))
                .with(
                    ActionDescriptor::new(
                        "native_transfer",
                        "Transfer native tokens (ETH, SOL) from the connected wallet. \
                         `value` is in whole units, e.g. \"0.01\".",
                        Self::native_transfer,
                    )
                    .with_schema(
                        Schema::new()
                            .field(
                                FieldSpec::required("to", FieldType::String)
                                    .describe("the destination address"),
                            )
                            .field(
                                FieldSpec::required("value", FieldType::String)
                                    .describe("the amount to transfer in whole units"),
                            ),
                    ),
                ),
        }
    }

    pub fn wallet(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    pub fn get_wallet_details(&self, _args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let balance = self.wallet.balance().await?;
            to_result_string(&json!({
                "address": self.wallet.address(),
                "network": self.wallet.network(),
                "provider": self.wallet.name(),
                "native_balance": balance,
            }))
        })
    }

    pub fn native_transfer(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            #[derive(Deserialize)]
            struct Input {
                to: String,
                value: String,
            }

            let input: Input = args.parse()?;
            if input.to.trim().is_empty() {
                return Err(anyhow::Error::new(ActionError::validation(
                    "native_transfer",
                    "to",
                    "must not be empty",
                )));
            }
            let amount = BigDecimal::from_str(input.value.trim()).map_err(|_| {
                ActionError::validation("native_transfer", "value", "must be a decimal amount")
            })?;
            if amount <= BigDecimal::from(0) {
                return Err(ActionError::validation(
                    "native_transfer",
                    "value",
                    "must be greater than zero",
                )
                .into());
            }

            let hash = self.wallet.native_transfer(&input.to, input.value.trim()).await?;
            tracing::info!(to = %input.to, value = %amount, %hash, "native transfer sent");
            to_result_string(&json!({
                "to": input.to,
                "value": input.value.trim(),
                "transaction_hash": hash,
            }))
        })
    }
}

impl ActionProvider for WalletActionProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supports_network(&self, network: &Network) -> bool {
        self.wallet.network().protocol_family == network.protocol_family
    }

    fn actions(self: Arc<Self>) -> Vec<Arc<dyn Action>> {
        self.actions.bind(&self)
    }
}
