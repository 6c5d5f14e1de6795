//! Argument schemas for the DESK actions.

use onchain_actions_core::{FieldSpec, FieldType, Schema};

const ORDER_SIDES: [&str; 2] = ["Long", "Short"];
const ORDER_TYPES: [&str; 6] = [
    "Limit",
    "Market",
    "StopMarket",
    "TakeProfitMarket",
    "StopLimit",
    "TakeProfitLimit",
];
const TIME_IN_FORCE: [&str; 4] = ["GTC", "IOC", "FOK", "PostOnly"];

/// Exchange limit on client order ids.
pub const CLIENT_ORDER_ID_MAX_LEN: usize = 36;

fn symbol(description: &str) -> FieldSpec {
    FieldSpec::required("symbol", FieldType::String).describe(description)
}

fn wait_for_reply() -> FieldSpec {
    FieldSpec::optional("wait_for_reply", FieldType::Boolean)
        .with_default(true)
        .describe("should api wait for reply")
}

fn is_conditional_order() -> FieldSpec {
    FieldSpec::optional("is_conditional_order", FieldType::Boolean)
        .with_default(true)
        .describe("whether the order is a conditional order")
}

pub fn current_funding_rate() -> Schema {
    Schema::new().field(symbol("market symbol to get funding rates for"))
}

pub fn historical_funding_rates() -> Schema {
    Schema::new()
        .field(symbol("market symbol to get premium index for"))
        .field(FieldSpec::required("start_time", FieldType::Integer).describe("start time in seconds"))
        .field(FieldSpec::required("end_time", FieldType::Integer).describe("end time in seconds"))
}

pub fn last_trades() -> Schema {
    Schema::new().field(symbol("market symbol to get trades for"))
}

pub fn place_order() -> Schema {
    Schema::new()
        .field(FieldSpec::required("amount", FieldType::String).describe("order amount"))
        .field(
            FieldSpec::required("price", FieldType::String)
                .describe("order price (0 if market order)"),
        )
        .field(FieldSpec::required("side", FieldType::enumeration(ORDER_SIDES)).describe("order side"))
        .field(symbol("market symbol"))
        .field(
            FieldSpec::optional("order_type", FieldType::enumeration(ORDER_TYPES))
                .with_default("Market")
                .describe("order type"),
        )
        .field(
            FieldSpec::optional("reduce_only", FieldType::Boolean)
                .with_default(false)
                .describe("whether the order is a reduce only order (true if close position)"),
        )
        .field(FieldSpec::optional("trigger_price", FieldType::String).describe("trigger price"))
        .field(
            FieldSpec::optional("time_in_force", FieldType::enumeration(TIME_IN_FORCE))
                .describe("time in force"),
        )
        .field(wait_for_reply())
        .field(
            FieldSpec::optional("client_order_id", FieldType::String)
                .with_max_length(CLIENT_ORDER_ID_MAX_LEN)
                .describe("client order id (max alphanumeric 36 characters)"),
        )
}

pub fn cancel_order() -> Schema {
    Schema::new()
        .field(symbol("market symbol"))
        .field(FieldSpec::optional("order_digest", FieldType::String).describe("order digest"))
        .field(is_conditional_order())
        .field(wait_for_reply())
        .field(
            FieldSpec::optional("client_order_id", FieldType::String)
                .with_max_length(CLIENT_ORDER_ID_MAX_LEN)
                .describe("client order id to cancel"),
        )
}

pub fn cancel_all_orders() -> Schema {
    Schema::new()
        .field(
            FieldSpec::optional("symbol", FieldType::String)
                .describe("symbol to cancel all orders for"),
        )
        .field(is_conditional_order())
        .field(wait_for_reply())
}

/// Shared by deposit and withdraw.
pub fn collateral() -> Schema {
    Schema::new()
        .field(FieldSpec::required("asset", FieldType::String).describe("asset name"))
        .field(
            FieldSpec::required("amount", FieldType::Number)
                .describe("amount (human readable)"),
        )
}
