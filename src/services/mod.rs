//! Service layer
//!
//! Validated operations for each project. Functions take the shared
//! [`Database`](crate::db::Database), return an outcome describing what
//! happened, and reserve `Err(String)` for storage failures.

pub mod boards;
pub mod convert;
pub mod issues;
pub mod library;
pub mod stocks;

use sha2::{Digest, Sha256};

/// Reply text when a submission lacks a required form field
pub const MISSING_REQUIRED_FIELDS: &str = "missing required fields";

/// SHA-256 of the input as lower-case hex
///
/// Used for client addresses and delete passwords, which are never stored in
/// the clear.
pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Parse a client supplied row id
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Treat missing and whitespace-only form values alike
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
