//! Database module
//!
//! Handles the SQLite pool and schema migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Current UTC time as an RFC 3339 string with millisecond precision
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
