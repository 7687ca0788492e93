//! HTTP layer
//!
//! Route handlers translate requests into service calls and service outcomes
//! into plain-text or JSON replies.

mod boards;
mod convert;
pub mod error;
mod issues;
mod library;
pub mod server;
mod stocks;

pub use error::ApiError;
pub use server::{build_router, serve, AppState};
