//! Stock price checker service
//!
//! Prices come from a [`QuoteSource`]; likes are counted once per client
//! address per symbol.

use serde::Serialize;

use crate::db::Database;
use crate::models::Stock;
use crate::quotes::QuoteSource;

use super::sha256_hex;

/// Reply text when the request names no stock or more than two
pub const STOCK_COUNT_ERROR: &str = "provide one or two stock symbols";

/// One stock with its absolute like count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockReport {
    pub stock: String,
    pub price: String,
    pub likes: i64,
}

/// One of two compared stocks, with likes relative to the other
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeStockReport {
    pub stock: String,
    pub price: String,
    pub rel_likes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StockData {
    Single(StockReport),
    Pair(Vec<RelativeStockReport>),
}

/// Body of a successful `/api/stock-prices` response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPriceResponse {
    #[serde(rename = "stockData")]
    pub stock_data: StockData,
}

/// Result of a price check
#[derive(Debug, PartialEq)]
pub enum StockOutcome {
    Data(StockPriceResponse),
    WrongSymbolCount,
    PriceUnavailable(String),
}

/// Look up one or two stocks, optionally liking them on behalf of `client_ip`
pub async fn check_stock_prices(
    db: &Database,
    quotes: &dyn QuoteSource,
    symbols: &[String],
    like: bool,
    client_ip: &str,
) -> Result<StockOutcome, String> {
    if symbols.is_empty() || symbols.len() > 2 {
        return Ok(StockOutcome::WrongSymbolCount);
    }

    let mut prices = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        match quotes.price(symbol).await {
            Ok(price) => prices.push((symbol.clone(), price)),
            Err(e) => {
                tracing::warn!("Price lookup for '{}' failed: {}", symbol, e);
                return Ok(StockOutcome::PriceUnavailable(symbol.clone()));
            }
        }
    }

    let ip_hash = if like { Some(sha256_hex(client_ip)) } else { None };
    let stocks = record_prices(db, &prices, ip_hash.as_deref())?;

    let stock_data = match stocks.as_slice() {
        [only] => StockData::Single(StockReport {
            stock: only.symbol.clone(),
            price: only.price.to_string(),
            likes: only.likes,
        }),
        [first, second] => StockData::Pair(vec![
            RelativeStockReport {
                stock: first.symbol.clone(),
                price: first.price.to_string(),
                rel_likes: first.likes - second.likes,
            },
            RelativeStockReport {
                stock: second.symbol.clone(),
                price: second.price.to_string(),
                rel_likes: second.likes - first.likes,
            },
        ]),
        _ => return Ok(StockOutcome::WrongSymbolCount),
    };

    Ok(StockOutcome::Data(StockPriceResponse { stock_data }))
}

/// Store fresh prices and likes, returning the stocks in request order
fn record_prices(
    db: &Database,
    prices: &[(String, f64)],
    ip_hash: Option<&str>,
) -> Result<Vec<Stock>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut stocks = Vec::with_capacity(prices.len());
    for (symbol, price) in prices {
        Stock::upsert_price(&conn, symbol, *price)
            .map_err(|e| format!("Failed to store price for {}: {}", symbol, e))?;

        if let Some(hash) = ip_hash {
            let counted = Stock::add_like(&conn, symbol, hash)
                .map_err(|e| format!("Failed to record like for {}: {}", symbol, e))?;
            if counted {
                tracing::info!("Recorded like for {}", symbol);
            }
        }

        let stock = Stock::get(&conn, symbol)
            .map_err(|e| format!("Failed to load {}: {}", symbol, e))?
            .ok_or_else(|| format!("Stock {} missing after update", symbol))?;
        stocks.push(stock);
    }

    Ok(stocks)
}
