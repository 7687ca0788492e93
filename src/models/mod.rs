//! Data models
//!
//! Rust structs representing database entities.

mod book;
mod issue;
mod reply;
mod stock;
mod thread;

pub use book::{Book, BookDetail, BookSummary};
pub use issue::{Issue, IssueCreate, IssueFilter, IssueUpdate};
pub use reply::{Reply, DELETED_TEXT};
pub use stock::Stock;
pub use thread::Thread;
