use async_trait::async_trait;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
    StopMarket,
    TakeProfitMarket,
    StopLimit,
    TakeProfitLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "GTC")]
    Gtc,
    #[serde(rename = "IOC")]
    Ioc,
    #[serde(rename = "FOK")]
    Fok,
    PostOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub amount: String,
    /// `"0"` for market orders.
    pub price: String,
    pub side: OrderSide,
    pub symbol: String,
    pub order_type: OrderType,
    pub reduce_only: bool,
    pub trigger_price: Option<String>,
    pub time_in_force: Option<TimeInForce>,
    pub wait_for_reply: bool,
    pub client_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub symbol: String,
    pub order_digest: Option<String>,
    pub is_conditional_order: bool,
    pub wait_for_reply: bool,
    pub client_order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelAllOrdersRequest {
    pub symbol: Option<String>,
    pub is_conditional_order: bool,
    pub wait_for_reply: bool,
}

/// Calls the DESK provider makes into the exchange SDK.
///
/// A session is created by the connector passed to
/// [`DeskActionProvider::new`](crate::DeskActionProvider::new) and owned by
/// the provider from then on. Implementations must tolerate concurrent calls
/// (or serialize them internally) and own their request timeouts.
#[async_trait]
pub trait DeskSession: Send + Sync {
    async fn get_subaccount_summary(&self, sub_account_id: u32) -> Result<Value>;

    async fn get_market_info(&self) -> Result<Value>;

    async fn get_collaterals_info(&self) -> Result<Value>;

    async fn get_current_funding_rate(&self, symbol: &str) -> Result<Value>;

    async fn get_historical_funding_rates(
        &self,
        symbol: &str,
        start_time: i64,
        end_time: i64,
    ) -> Result<Value>;

    async fn get_last_trades(&self, symbol: &str) -> Result<Value>;

    async fn get_mark_price(&self) -> Result<Value>;

    async fn place_order(&self, order: &PlaceOrderRequest) -> Result<Value>;

    async fn cancel_order(&self, request: &CancelOrderRequest) -> Result<Value>;

    async fn cancel_all_orders(&self, request: &CancelAllOrdersRequest) -> Result<Value>;

    /// `amount` is human readable, not base units.
    async fn deposit_collateral(&self, asset: &str, amount: f64) -> Result<Value>;

    async fn withdraw_collateral(&self, asset: &str, amount: f64) -> Result<Value>;
}
