//! Stock quote sources
//!
//! The stock price checker asks a [`QuoteSource`] for the current price of
//! each symbol. Production uses [`HttpQuoteSource`]; tests and offline runs
//! use [`FixedQuoteSource`].

use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

lazy_static! {
    static ref SYMBOL: Regex = Regex::new(r"^[A-Za-z0-9.\-]{1,12}$").expect("valid symbol pattern");
}

/// Quote lookup error types
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Unexpected quote payload: {0}")]
    Malformed(String),
}

/// Something that can price a stock symbol
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn price(&self, symbol: &str) -> Result<f64, QuoteError>;
}

/// Whether a symbol is safe to place in a quote URL
pub fn is_valid_symbol(symbol: &str) -> bool {
    SYMBOL.is_match(symbol)
}

/// Quote source backed by an HTTP API
///
/// The URL template must contain `{symbol}`. The response may be a bare JSON
/// number or an object carrying `latestPrice`.
pub struct HttpQuoteSource {
    client: reqwest::Client,
    url_template: String,
    api_key: Option<String>,
}

impl HttpQuoteSource {
    pub fn new(url_template: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_template: url_template.into(),
            api_key,
        }
    }

    fn url_for(&self, symbol: &str) -> String {
        self.url_template.replace("{symbol}", symbol)
    }
}

/// Pull a price out of a quote payload
pub fn price_from_payload(symbol: &str, payload: &Value) -> Result<f64, QuoteError> {
    match payload {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| QuoteError::Malformed(n.to_string())),
        Value::Object(map) => match map.get("latestPrice") {
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| QuoteError::Malformed(n.to_string())),
            Some(Value::Null) | None => Err(QuoteError::UnknownSymbol(symbol.to_string())),
            Some(other) => Err(QuoteError::Malformed(other.to_string())),
        },
        // Upstream answers "Unknown symbol" / "Invalid symbol" as a JSON string
        Value::String(_) => Err(QuoteError::UnknownSymbol(symbol.to_string())),
        other => Err(QuoteError::Malformed(other.to_string())),
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn price(&self, symbol: &str) -> Result<f64, QuoteError> {
        if !is_valid_symbol(symbol) {
            return Err(QuoteError::UnknownSymbol(symbol.to_string()));
        }

        let mut request = self.client.get(self.url_for(symbol));
        if let Some(ref key) = self.api_key {
            request = request.query(&[("token", key)]);
        }

        let payload: Value = request.send().await?.error_for_status()?.json().await?;
        tracing::debug!("Quote payload for {}: {}", symbol, payload);
        price_from_payload(symbol, &payload)
    }
}

/// Quote source with fixed prices
#[derive(Debug, Clone, Default)]
pub struct FixedQuoteSource {
    prices: HashMap<String, f64>,
    fallback: Option<f64>,
}

impl FixedQuoteSource {
    /// Every symbol is priced at `price`
    pub fn uniform(price: f64) -> Self {
        Self {
            prices: HashMap::new(),
            fallback: Some(price),
        }
    }

    /// Set the price of one symbol
    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }
}

#[async_trait]
impl QuoteSource for FixedQuoteSource {
    async fn price(&self, symbol: &str) -> Result<f64, QuoteError> {
        self.prices
            .get(symbol)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| QuoteError::UnknownSymbol(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_from_bare_number() {
        assert_eq!(price_from_payload("GOOG", &json!(1234.5)).unwrap(), 1234.5);
    }

    #[test]
    fn test_price_from_quote_object() {
        let payload = json!({"symbol": "MSFT", "latestPrice": 310.25});
        assert_eq!(price_from_payload("MSFT", &payload).unwrap(), 310.25);
    }

    #[test]
    fn test_price_from_unknown_symbol_payload() {
        assert!(matches!(
            price_from_payload("ZZZZ", &json!("Unknown symbol")),
            Err(QuoteError::UnknownSymbol(_))
        ));
        assert!(matches!(
            price_from_payload("ZZZZ", &json!({"latestPrice": null})),
            Err(QuoteError::UnknownSymbol(_))
        ));
        assert!(matches!(
            price_from_payload("ZZZZ", &json!([1, 2])),
            Err(QuoteError::Malformed(_))
        ));
    }

    #[test]
    fn test_symbol_validation() {
        assert!(is_valid_symbol("goog"));
        assert!(is_valid_symbol("BRK.B"));
        assert!(!is_valid_symbol("../admin"));
        assert!(!is_valid_symbol(""));
    }

    #[test]
    fn test_url_for() {
        let source = HttpQuoteSource::new("https://example.test/v1/stock/{symbol}/quote", None);
        assert_eq!(source.url_for("aapl"), "https://example.test/v1/stock/aapl/quote");
    }

    #[tokio::test]
    async fn test_fixed_quote_source() {
        let source = FixedQuoteSource::default().with_price("GOOG", 99.5);
        assert_eq!(source.price("GOOG").await.unwrap(), 99.5);
        assert!(source.price("MSFT").await.is_err());

        let source = FixedQuoteSource::uniform(10.0);
        assert_eq!(source.price("ANY").await.unwrap(), 10.0);
    }
}
