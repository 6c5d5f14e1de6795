use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;

use onchain_actions_core::{
    to_result_string, Action, ActionArgs, ActionDescriptor, ActionError, ActionProvider,
    ActionResult, ActionSet, BoxFuture, Network,
};

use crate::config::{DeskConfig, DeskCredentials, SUPPORTED_CHAIN_IDS};
use crate::schemas;
use crate::session::{CancelAllOrdersRequest, CancelOrderRequest, DeskSession, PlaceOrderRequest};

pub const PROVIDER_NAME: &str = "desk";

/// Action provider for the DESK perpetuals exchange.
pub struct DeskActionProvider<S> {
    credentials: DeskCredentials,
    session: S,
    actions: ActionSet<Self>,
}

impl<S: DeskSession + 'static> DeskActionProvider<S> {
    /// Validate `config`, then build the exchange session with `connect`.
    ///
    /// Both invalid inputs and a failing connector surface as
    /// [`ActionError::Configuration`] for the `desk` provider.
    pub fn new<F>(config: &DeskConfig, connect: F) -> ActionResult<Self>
    where
        F: FnOnce(&DeskCredentials) -> Result<S>,
    {
        let credentials = config
            .validate()
            .map_err(|e| ActionError::configuration(PROVIDER_NAME, e))?;
        let session = connect(&credentials).map_err(|e| ActionError::configuration(PROVIDER_NAME, e))?;

        tracing::info!(
            environment = ?credentials.environment,
            chain_id = %credentials.chain_id,
            sub_account_id = credentials.sub_account_id,
            "DESK client initialized"
        );

        Ok(Self {
            credentials,
            session,
            actions: Self::action_set(),
        })
    }

    pub fn credentials(&self) -> &DeskCredentials {
        &self.credentials
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    fn action_set() -> ActionSet<Self> {
        ActionSet::new()
            .with(ActionDescriptor::new(
                "get_subaccount_summary",
                "This tool will return the details of DESK account including:\n\
                 - Collaterals\n\
                 - Positions\n\
                 - Opened Orders",
                Self::get_subaccount_summary,
            ))
            .with(ActionDescriptor::new(
                "get_market_info",
                "Get the market info.",
                Self::get_market_info,
            ))
            .with(ActionDescriptor::new(
                "get_collaterals_info",
                "Get the collaterals info.",
                Self::get_collaterals_info,
            ))
            .with(
                ActionDescriptor::new(
                    "get_current_funding_rate",
                    "Get the current funding rate for a market symbol.",
                    Self::get_current_funding_rate,
                )
                .with_schema(schemas::current_funding_rate()),
            )
            .with(
                ActionDescriptor::new(
                    "get_historical_funding_rates",
                    "Get the historical funding rates of a market symbol between \
                     start_time and end_time (seconds).",
                    Self::get_historical_funding_rates,
                )
                .with_schema(schemas::historical_funding_rates()),
            )
            .with(
                ActionDescriptor::new(
                    "get_last_trades",
                    "Get the most recent trades for a market symbol.",
                    Self::get_last_trades,
                )
                .with_schema(schemas::last_trades()),
            )
            .with(ActionDescriptor::new(
                "get_mark_price",
                "Get the current mark price.",
                Self::get_mark_price,
            ))
            .with(
                ActionDescriptor::new(
                    "place_order",
                    "Place an order on DESK. Use price \"0\" for market orders; \
                     set reduce_only to close a position.",
                    Self::place_order,
                )
                .with_schema(schemas::place_order()),
            )
            .with(
                ActionDescriptor::new(
                    "cancel_order",
                    "Cancel an order on DESK by order digest or client order id.",
                    Self::cancel_order,
                )
                .with_schema(schemas::cancel_order()),
            )
            .with(
                ActionDescriptor::new(
                    "cancel_all_orders",
                    "Cancel all orders on DESK, optionally only for one symbol.",
                    Self::cancel_all_orders,
                )
                .with_schema(schemas::cancel_all_orders()),
            )
            .with(
                ActionDescriptor::new(
                    "deposit_collateral",
                    "Deposit collateral on DESK. Returns the transaction hash.",
                    Self::deposit_collateral,
                )
                .with_schema(schemas::collateral()),
            )
            .with(
                ActionDescriptor::new(
                    "withdraw_collateral",
                    "Withdraw collateral from DESK. Returns the transaction hash.",
                    Self::withdraw_collateral,
                )
                .with_schema(schemas::collateral()),
            )
    }

    pub fn get_subaccount_summary(&self, _args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let res = self
                .session
                .get_subaccount_summary(self.credentials.sub_account_id)
                .await?;
            to_result_string(&res)
        })
    }

    pub fn get_market_info(&self, _args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move { to_result_string(&self.session.get_market_info().await?) })
    }

    pub fn get_collaterals_info(&self, _args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move { to_result_string(&self.session.get_collaterals_info().await?) })
    }

    pub fn get_current_funding_rate(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let input: SymbolInput = args.parse()?;
            to_result_string(&self.session.get_current_funding_rate(&input.symbol).await?)
        })
    }

    pub fn get_historical_funding_rates(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            #[derive(Deserialize)]
            struct Input {
                symbol: String,
                start_time: i64,
                end_time: i64,
            }

            let input: Input = args.parse()?;
            if input.end_time < input.start_time {
                return Err(anyhow::Error::new(ActionError::validation(
                    "get_historical_funding_rates",
                    "end_time",
                    "must not be earlier than start_time",
                )));
            }
            let res = self
                .session
                .get_historical_funding_rates(&input.symbol, input.start_time, input.end_time)
                .await?;
            to_result_string(&res)
        })
    }

    pub fn get_last_trades(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let input: SymbolInput = args.parse()?;
            to_result_string(&self.session.get_last_trades(&input.symbol).await?)
        })
    }

    pub fn get_mark_price(&self, _args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move { to_result_string(&self.session.get_mark_price().await?) })
    }

    pub fn place_order(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let order: PlaceOrderRequest = args.parse()?;
            tracing::debug!(symbol = %order.symbol, side = ?order.side, order_type = ?order.order_type, "placing DESK order");
            to_result_string(&self.session.place_order(&order).await?)
        })
    }

    pub fn cancel_order(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let request: CancelOrderRequest = args.parse()?;
            to_result_string(&self.session.cancel_order(&request).await?)
        })
    }

    pub fn cancel_all_orders(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let request: CancelAllOrdersRequest = args.parse()?;
            to_result_string(&self.session.cancel_all_orders(&request).await?)
        })
    }

    pub fn deposit_collateral(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let input = CollateralInput::parse("deposit_collateral", &args)?;
            to_result_string(&self.session.deposit_collateral(&input.asset, input.amount).await?)
        })
    }

    pub fn withdraw_collateral(&self, args: ActionArgs) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let input = CollateralInput::parse("withdraw_collateral", &args)?;
            to_result_string(&self.session.withdraw_collateral(&input.asset, input.amount).await?)
        })
    }
}

impl<S: DeskSession + 'static> ActionProvider for DeskActionProvider<S> {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn supports_network(&self, network: &Network) -> bool {
        network
            .chain_id()
            .is_some_and(|id| SUPPORTED_CHAIN_IDS.contains(&id))
    }

    fn actions(self: Arc<Self>) -> Vec<Arc<dyn Action>> {
        self.actions.bind(&self)
    }
}

#[derive(Deserialize)]
struct SymbolInput {
    symbol: String,
}

#[derive(Deserialize)]
struct CollateralInput {
    asset: String,
    amount: f64,
}

impl CollateralInput {
    fn parse(action: &str, args: &ActionArgs) -> Result<Self> {
        let input: Self = args.parse()?;
        if input.amount <= 0.0 {
            return Err(ActionError::validation(action, "amount", "must be greater than zero").into());
        }
        Ok(input)
    }
}
