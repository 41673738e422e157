//! lawdesk - Legal case lookup over a SQL warehouse.
//!
//! Authenticates with OAuth client credentials, runs a filter-driven read-only
//! statement on the warehouse, and exposes the lookup as an agent tool.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod output;
pub mod query;
pub mod tools;
pub mod warehouse;
