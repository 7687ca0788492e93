//! Information Security and Quality Assurance projects
//!
//! A metric/imperial converter, an issue tracker, a personal library, a
//! stock price checker and an anonymous message board, served over HTTP and
//! backed by SQLite.

pub mod build_info;
pub mod config;
pub mod converter;
pub mod db;
pub mod http;
pub mod models;
pub mod quotes;
pub mod services;
