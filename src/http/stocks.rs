//! Stock price checker route

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::services::stocks::{self, StockOutcome, STOCK_COUNT_ERROR};

use super::{ApiError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stock-prices", get(stock_prices))
}

/// `stock` may repeat, so the query is read as raw pairs
async fn stock_prices(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let symbols: Vec<String> = pairs
        .iter()
        .filter(|(key, value)| key == "stock" && !value.trim().is_empty())
        .map(|(_, value)| value.clone())
        .collect();
    let like = pairs
        .iter()
        .any(|(key, value)| key == "like" && value == "true");

    let outcome = stocks::check_stock_prices(
        &state.db,
        state.quotes.as_ref(),
        &symbols,
        like,
        &peer.ip().to_string(),
    )
    .await?;

    match outcome {
        StockOutcome::Data(body) => Ok(Json(body).into_response()),
        StockOutcome::WrongSymbolCount => Ok(STOCK_COUNT_ERROR.into_response()),
        StockOutcome::PriceUnavailable(symbol) => Err(ApiError::Quote(symbol)),
    }
}
