//! HTTP server
//!
//! One axum router hosts every project; each handler module contributes its
//! routes and they share [`AppState`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::db::Database;
use crate::quotes::QuoteSource;

use super::{boards, convert, issues, library, stocks};

/// State shared by every route
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub quotes: Arc<dyn QuoteSource>,
}

impl AppState {
    pub fn new(db: Database, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { db, quotes }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(convert::routes())
        .merge(issues::routes())
        .merge(library::routes())
        .merge(stocks::routes())
        .merge(boards::routes())
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

/// Serve the application on an already bound listener
///
/// Peer addresses are exposed to handlers through `ConnectInfo`.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = build_router(state);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    tracing::debug!("No route for {}", uri);
    (StatusCode::NOT_FOUND, "Not Found")
}

// ============================================================================
// Test helpers
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::quotes::FixedQuoteSource;

    /// Start a server on an ephemeral port with a fresh in-memory database
    /// Returns the base URL
    pub async fn spawn_app(quotes: FixedQuoteSource) -> String {
        let db = Database::in_memory().unwrap();
        let state = AppState::new(db, Arc::new(quotes));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, state));

        format!("http://{}", addr)
    }

    /// Client that reports redirects instead of following them
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{client, spawn_app};
    use crate::quotes::FixedQuoteSource;

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let base = spawn_app(FixedQuoteSource::default()).await;

        let response = client().get(format!("{}/nowhere", base)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(response.text().await.unwrap(), "Not Found");
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let base = spawn_app(FixedQuoteSource::default()).await;

        let response = client()
            .get(format!("{}/api/books", base))
            .header("Origin", "http://example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
