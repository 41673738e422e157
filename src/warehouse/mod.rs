//! Warehouse API abstraction for lawdesk.
//!
//! Provides a trait-based interface over the OAuth token endpoint and the SQL
//! statement execution endpoints, so the executor can run against the real
//! HTTP API or a scripted mock.

mod http;
mod mock;
mod types;

pub use http::{
    parse_cancel_response, parse_status_response, parse_submit_response, parse_token_response,
    HttpWarehouseApi, DEFAULT_TIMEOUT_SECS,
};
pub use mock::{MockCalls, MockWarehouseApi};
pub use types::{Row, StatementId, StatementRequest, StatementState, StatementStatus};

use crate::auth::AccessToken;
use crate::config::Credentials;
use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the calls this crate makes against a warehouse workspace.
///
/// Every call is a single round trip; implementations must not retry.
#[async_trait]
pub trait WarehouseApi: Send + Sync {
    /// Exchanges client credentials for a bearer token.
    async fn request_token(&self, credentials: &Credentials) -> Result<AccessToken>;

    /// Submits a statement for asynchronous execution.
    async fn submit_statement(
        &self,
        token: &AccessToken,
        request: &StatementRequest,
    ) -> Result<StatementId>;

    /// Fetches the current status of a submitted statement.
    async fn get_statement(
        &self,
        token: &AccessToken,
        statement_id: &StatementId,
    ) -> Result<StatementStatus>;

    /// Requests that an executing statement be canceled.
    async fn cancel_statement(&self, token: &AccessToken, statement_id: &StatementId)
        -> Result<()>;
}
