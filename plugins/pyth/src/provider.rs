use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use onchain_actions_core::config::{env_var, load_dotenv};
use onchain_actions_core::{
    to_result_string, Action, ActionArgs, ActionDescriptor, ActionError, ActionProvider,
    ActionResult, ActionSet, BoxFuture, FieldSpec, FieldType, Network, Schema,
};

use crate::hermes;

pub const PROVIDER_NAME: &str = "pyth";
pub const DEFAULT_HERMES_URL: &str = "https://hermes.pyth.network";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default)]
pub struct PythConfig {
    /// Hermes endpoint; [`DEFAULT_HERMES_URL`] when unset.
    pub base_url: Option<String>,
}

impl PythConfig {
    /// Read `PYTH_HERMES_URL`.
    pub fn from_env() -> Self {
        load_dotenv();
        Self {
            base_url: env_var("PYTH_HERMES_URL"),
        }
    }
}

/// Price feed lookups against Pyth Hermes. Works on every network.
pub struct PythActionProvider {
    base_url: Url,
    client: reqwest::Client,
    actions: ActionSet<Self>,
}

impl PythActionProvider {
    pub fn new(config: &PythConfig) -> ActionResult<Self> {
        let raw = config.base_url.as_deref().unwrap_or(DEFAULT_HERMES_URL);
        let base_url = Url::parse(raw)
            .with_context(|| format!("invalid PYTH_HERMES_URL: {raw}"))
            .map_err(|e| ActionError::configuration(PROVIDER_NAME, e))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ActionError::configuration(PROVIDER_NAME, e))?;

        Ok(Self {
            base_url,
            client,
            actions: Self::action_set(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn action_set() -> ActionSet<Self> {
        ActionSet::new()
            .with(
                ActionDescriptor::new(
                    "fetch_price_feed_id",
                    "Fetch the Pyth price feed ID for a given token symbol (e.g. BTC, ETH).",
                    Self::fetch_price_feed_id,
                )
                .with_schema(Schema::new().field(
                    FieldSpec::required("token_symbol", FieldType::String)
                        .describe("The token symbol to fetch the price feed ID for"),
                )),
            )
            .with(
                ActionDescriptor::new(
                    "fetch_price",
                    "Fetch the latest price for a Pyth price feed ID. \
                     Use fetch_price_feed_id first to resolve a symbol.",
                    Self::fetch_price,
                )
                .with_schema(Schema::new().field(
                    FieldSpec::required("price_feed_id", FieldType::String)
                        .describe("The price feed ID to fetch the price for"),
                )),
            )
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "querying Pyth Hermes");
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("Pyth Hermes API error: {}", response.status());
        }
        Ok(response.json().await?)
    }

    pub fn fetch_price_feed_id(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            #[derive(Deserialize)]
            struct Input {
                token_symbol: String,
            }

            let input: Input = args.parse()?;
            let body = self
                .get_json(&hermes::price_feeds_url(&self.base_url, &input.token_symbol))
                .await?;
            let feed_id = hermes::parse_feed_id(&input.token_symbol, &body)?;
            to_result_string(&json!({
                "token_symbol": input.token_symbol,
                "price_feed_id": feed_id,
            }))
        })
    }

    pub fn fetch_price(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            #[derive(Deserialize)]
            struct Input {
                price_feed_id: String,
            }

            let input: Input = args.parse()?;
            let body = self
                .get_json(&hermes::latest_price_url(&self.base_url, &input.price_feed_id))
                .await?;
            let price = hermes::parse_price(&input.price_feed_id, &body)?;
            to_result_string(&json!({
                "price_feed_id": input.price_feed_id,
                "price": price.to_string(),
            }))
        })
    }
}

impl ActionProvider for PythActionProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supports_network(&self, _network: &Network) -> bool {
        true
    }

    fn actions(self: Arc<Self>) -> Vec<Arc<dyn Action>> {
        self.actions.bind(&self)
    }
}
