//! Case query construction and execution.
//!
//! This module builds the filter-driven statement, checks that it is a single
//! read-only query, and runs it through the warehouse API.

pub mod executor;
pub mod filters;
mod guard;

pub use executor::{PollPolicy, QueryExecutor, QueryOutcome};
pub use filters::{build_statement, escape_literal, FilterSet, CASES_TABLE};
pub use guard::ensure_read_only;
