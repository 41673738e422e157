//! Statement submission and polling.
//!
//! Submits the filter-driven statement and polls it until the warehouse
//! reports a terminal state or the polling bound is hit.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::auth::AccessToken;
use crate::error::{LawdeskError, Result};
use crate::warehouse::{
    Row, StatementId, StatementRequest, StatementState, StatementStatus, WarehouseApi,
};

use super::filters::{build_statement, FilterSet};
use super::guard::ensure_read_only;

/// Bounds on how long a statement is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between status polls.
    pub interval: Duration,
    /// Maximum number of status polls.
    pub max_attempts: u32,
    /// Overall time allowed for the statement to finish.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 150,
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollPolicy {
    /// Sets the interval between polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the maximum number of polls.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the overall timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// How a statement finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum QueryOutcome {
    /// The statement succeeded; `rows` is empty when no data came back.
    Succeeded { rows: Vec<Row> },
    /// The warehouse reported FAILED, CANCELED or CLOSED.
    Failed {
        state: StatementState,
        diagnostic: String,
    },
}

impl QueryOutcome {
    /// Returns true if the statement succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Returns the rows of a successful statement.
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Self::Succeeded { rows } => Some(rows),
            Self::Failed { .. } => None,
        }
    }

    /// Consumes the outcome, returning rows or `None` on failure.
    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            Self::Succeeded { rows } => Some(rows),
            Self::Failed { .. } => None,
        }
    }
}

/// Runs filter-driven statements against a warehouse.
pub struct QueryExecutor<'a> {
    api: &'a dyn WarehouseApi,
    policy: PollPolicy,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor with the default polling policy.
    pub fn new(api: &'a dyn WarehouseApi) -> Self {
        Self {
            api,
            policy: PollPolicy::default(),
        }
    }

    /// Sets the polling policy.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds, submits and waits for the statement matching `filters`.
    ///
    /// A warehouse-side failure is returned as [`QueryOutcome::Failed`];
    /// transport and protocol problems are errors.
    pub async fn execute(
        &self,
        token: &AccessToken,
        warehouse_id: &str,
        filters: &FilterSet,
    ) -> Result<QueryOutcome> {
        let statement = build_statement(filters);
        ensure_read_only(&statement)?;
        info!("Executing query: {}", statement);

        let request = StatementRequest::new(statement, warehouse_id);
        let statement_id = self.api.submit_statement(token, &request).await?;
        info!(%statement_id, "Statement submitted");

        self.wait_for_completion(token, &statement_id).await
    }

    /// Polls the statement until it reaches a terminal state.
    pub async fn wait_for_completion(
        &self,
        token: &AccessToken,
        statement_id: &StatementId,
    ) -> Result<QueryOutcome> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let status = self.api.get_statement(token, statement_id).await?;
            debug!(%statement_id, attempt = attempts, state = %status.state, "Polled statement");

            if status.state.is_terminal() {
                return Ok(Self::finish(statement_id, status));
            }

            let elapsed = started.elapsed();
            if attempts >= self.policy.max_attempts || elapsed >= self.policy.timeout {
                return Err(self.give_up(token, statement_id, attempts, elapsed).await);
            }

            tokio::time::sleep(self.policy.interval).await;
        }
    }

    /// Builds the outcome for a statement in a terminal state.
    fn finish(statement_id: &StatementId, status: StatementStatus) -> QueryOutcome {
        if status.state == StatementState::Succeeded {
            let rows = status.data_array.unwrap_or_default();
            info!(%statement_id, rows = rows.len(), "Query succeeded");
            return QueryOutcome::Succeeded { rows };
        }

        warn!(
            %statement_id,
            state = %status.state,
            payload = %status.payload,
            "Query did not succeed"
        );
        let diagnostic = status.diagnostic();
        QueryOutcome::Failed {
            state: status.state,
            diagnostic,
        }
    }

    /// Cancels the statement on a best-effort basis and builds the timeout error.
    async fn give_up(
        &self,
        token: &AccessToken,
        statement_id: &StatementId,
        attempts: u32,
        elapsed: Duration,
    ) -> LawdeskError {
        warn!(%statement_id, attempts, ?elapsed, "Statement did not finish in time, canceling");
        if let Err(e) = self.api.cancel_statement(token, statement_id).await {
            warn!(%statement_id, "Failed to cancel statement: {}", e);
        }

        LawdeskError::TimeoutExceeded {
            statement_id: statement_id.to_string(),
            attempts,
            elapsed,
        }
    }
}
