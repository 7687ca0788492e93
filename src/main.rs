//! ISQA server
//!
//! Serves the converter and the four REST APIs over HTTP.

use std::sync::Arc;

use isqa::config::Config;
use isqa::db::{migrations, Database};
use isqa::http::{serve, AppState};
use isqa::quotes::HttpQuoteSource;
use isqa::build_info;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("isqa=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env()?;
    tracing::info!("Database path: {}", config.database_path.display());

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        if migrations::needs_migration(conn)? {
            migrations::run_migrations(conn)?;
        }
        let version = migrations::get_schema_version(conn)?;
        tracing::info!("Database schema version: {}", version);
        Ok(())
    })?;

    let quotes = HttpQuoteSource::new(config.quote_url.clone(), config.quote_api_key.clone());
    let state = AppState::new(database, Arc::new(quotes));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    serve(listener, state).await?;

    Ok(())
}
