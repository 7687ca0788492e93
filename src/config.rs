//! Runtime configuration
//!
//! Everything is read from the environment once at start-up.

use std::path::PathBuf;

use thiserror::Error;

/// Default quote URL template; `{symbol}` is replaced per request
pub const DEFAULT_QUOTE_URL: &str =
    "https://stock-price-checker-proxy.freecodecamp.rocks/v1/stock/{symbol}/quote";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub quote_url: String,
    pub quote_api_key: Option<String>,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_path: lookup("ISQA_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            host: lookup("ISQA_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            quote_url: lookup("ISQA_QUOTE_URL").unwrap_or_else(|| DEFAULT_QUOTE_URL.to_string()),
            quote_api_key: lookup("ISQA_QUOTE_API_KEY").filter(|key| !key.is_empty()),
        })
    }

    /// Address to bind the HTTP listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `data/isqa.db` next to the project root
///
/// When running from `target/debug` or `target/release` the project root is
/// two levels above the executable.
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|target| target.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("isqa.db");
    path
}
