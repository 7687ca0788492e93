//! Metric/imperial converter route

use axum::extract::Query;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::services::convert::convert_input;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub input: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/convert", get(convert))
}

async fn convert(Query(query): Query<ConvertQuery>) -> Response {
    let input = query.input.unwrap_or_default();
    match convert_input(&input) {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.to_string().into_response(),
    }
}
