//! Request building and response parsing for the Pyth Hermes API.

use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Decimal places kept in a reported price.
pub const PRICE_DECIMALS: i64 = 2;

/// `GET /v2/price_feeds` for crypto feeds matching `symbol`.
pub fn price_feeds_url(base: &Url, symbol: &str) -> String {
    format!(
        "{}/v2/price_feeds?query={}&asset_type=crypto",
        base.as_str().trim_end_matches('/'),
        urlencoding::encode(symbol)
    )
}

/// `GET /v2/updates/price/latest` for a single feed.
pub fn latest_price_url(base: &Url, feed_id: &str) -> String {
    format!(
        "{}/v2/updates/price/latest?ids[]={}",
        base.as_str().trim_end_matches('/'),
        urlencoding::encode(feed_id)
    )
}

/// Id of the first feed in a `/v2/price_feeds` response.
pub fn parse_feed_id(symbol: &str, body: &Value) -> Result<String> {
    body.as_array()
        .and_then(|feeds| feeds.first())
        .and_then(|feed| feed.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("No price feed found for {symbol}"))
}

#[derive(Deserialize)]
struct PriceUpdate {
    parsed: Vec<ParsedFeed>,
}

#[derive(Deserialize)]
struct ParsedFeed {
    price: RawPrice,
}

#[derive(Deserialize)]
struct RawPrice {
    price: Value,
    expo: i64,
}

/// Price from a `/v2/updates/price/latest` response, scaled by its exponent
/// and truncated to [`PRICE_DECIMALS`] places.
pub fn parse_price(feed_id: &str, body: &Value) -> Result<BigDecimal> {
    let update = PriceUpdate::deserialize(body)
        .with_context(|| format!("unexpected price update for feed {feed_id}"))?;
    let Some(feed) = update.parsed.first() else {
        bail!("No price data found for {feed_id}");
    };

    // Hermes sends the mantissa as a string, older payloads as a number.
    let mantissa = match &feed.price.price {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => bail!("invalid price mantissa for {feed_id}: {other}"),
    };
    let scaled = BigDecimal::from_str(&format!("{mantissa}e{}", feed.price.expo))
        .with_context(|| format!("invalid price mantissa for {feed_id}: {mantissa}"))?;
    Ok(scaled.with_scale(PRICE_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BTC_FEED: &str = "e62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43";

    fn hermes() -> Url {
        Url::parse("https://hermes.pyth.network").unwrap()
    }

    #[test]
    fn urls_encode_their_inputs() {
        assert_eq!(
            price_feeds_url(&hermes(), "BTC/USD"),
            "https://hermes.pyth.network/v2/price_feeds?query=BTC%2FUSD&asset_type=crypto"
        );
        assert_eq!(
            latest_price_url(&hermes(), BTC_FEED),
            format!("https://hermes.pyth.network/v2/updates/price/latest?ids[]={BTC_FEED}")
        );
    }

    #[test]
    fn first_feed_id_wins() {
        let body = json!([
            { "id": BTC_FEED, "attributes": { "base": "BTC", "quote_currency": "USD" } },
            { "id": "ffff", "attributes": { "base": "BTC", "quote_currency": "EUR" } }
        ]);
        assert_eq!(parse_feed_id("BTC", &body).unwrap(), BTC_FEED);
    }

    #[test]
    fn no_feeds_names_the_symbol() {
        let err = parse_feed_id("NOPE", &json!([])).unwrap_err();
        assert_eq!(err.to_string(), "No price feed found for NOPE");
    }

    #[test]
    fn price_is_scaled_and_truncated() {
        let body = json!({
            "binary": { "encoding": "hex", "data": [] },
            "parsed": [{
                "id": BTC_FEED,
                "price": { "price": "6140993501999", "conf": "3358962600", "expo": -8, "publish_time": 1713971946 }
            }]
        });
        assert_eq!(parse_price(BTC_FEED, &body).unwrap().to_string(), "61409.93");
    }

    #[test]
    fn numeric_mantissa_and_positive_exponent() {
        let body = json!({ "parsed": [{ "price": { "price": 12, "expo": 2 } }] });
        assert_eq!(parse_price("feed", &body).unwrap().to_string(), "1200.00");
    }

    #[test]
    fn empty_update_is_an_error() {
        let err = parse_price("feed", &json!({ "parsed": [] })).unwrap_err();
        assert!(err.to_string().contains("feed"));

        assert!(parse_price("feed", &json!({ "unexpected": true })).is_err());
    }
}
