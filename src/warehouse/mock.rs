//! Mock warehouse API for testing.
//!
//! Replays a scripted sequence of statement states and records every call.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::auth::AccessToken;
use crate::config::Credentials;
use crate::error::{LawdeskError, Result};

use super::{Row, StatementId, StatementRequest, StatementStatus, WarehouseApi};

/// A scripted response to one status poll.
#[derive(Debug, Clone)]
enum MockPoll {
    Payload(Value),
    Error(String),
}

/// Calls observed by a [`MockWarehouseApi`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockCalls {
    pub token_requests: u32,
    pub submissions: Vec<StatementRequest>,
    pub polls: u32,
    pub cancellations: Vec<StatementId>,
}

/// Mock warehouse that replays scripted poll responses.
///
/// Once the script is exhausted every further poll reports `RUNNING`.
#[derive(Debug)]
pub struct MockWarehouseApi {
    token: std::result::Result<String, String>,
    statement_id: String,
    submit_error: Option<String>,
    polls: Mutex<VecDeque<MockPoll>>,
    calls: Mutex<MockCalls>,
}

impl Default for MockWarehouseApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWarehouseApi {
    /// Creates a mock that issues `mock-token` and statement `mock-statement`.
    pub fn new() -> Self {
        Self {
            token: Ok("mock-token".to_string()),
            statement_id: "mock-statement".to_string(),
            submit_error: None,
            polls: Mutex::new(VecDeque::new()),
            calls: Mutex::new(MockCalls::default()),
        }
    }

    /// Sets the token returned by the token endpoint.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Ok(token.into());
        self
    }

    /// Makes the token endpoint fail with an authentication error.
    pub fn with_token_failure(mut self, message: impl Into<String>) -> Self {
        self.token = Err(message.into());
        self
    }

    /// Sets the statement id returned on submission.
    pub fn with_statement_id(mut self, id: impl Into<String>) -> Self {
        self.statement_id = id.into();
        self
    }

    /// Makes statement submission fail.
    pub fn with_submit_failure(mut self, message: impl Into<String>) -> Self {
        self.submit_error = Some(message.into());
        self
    }

    /// Queues non-terminal or terminal states with no result payload.
    pub fn with_states<I, S>(self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for state in states {
            self.push(MockPoll::Payload(json!({
                "statement_id": self.statement_id,
                "status": { "state": state.as_ref() }
            })));
        }
        self
    }

    /// Queues a `SUCCEEDED` poll carrying the given rows.
    pub fn with_success(self, rows: Vec<Row>) -> Self {
        self.push(MockPoll::Payload(json!({
            "statement_id": self.statement_id,
            "status": { "state": "SUCCEEDED" },
            "result": { "data_array": rows }
        })));
        self
    }

    /// Queues a terminal failure poll with an error message.
    pub fn with_failure(self, state: &str, message: impl Into<String>) -> Self {
        self.push(MockPoll::Payload(json!({
            "statement_id": self.statement_id,
            "status": {
                "state": state,
                "error": { "message": message.into() }
            }
        })));
        self
    }

    /// Queues a raw status payload.
    pub fn with_payload(self, payload: Value) -> Self {
        self.push(MockPoll::Payload(payload));
        self
    }

    /// Queues a failing status poll.
    pub fn with_poll_error(self, message: impl Into<String>) -> Self {
        self.push(MockPoll::Error(message.into()));
        self
    }

    /// Returns a snapshot of the calls made so far.
    pub fn calls(&self) -> MockCalls {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, poll: MockPoll) {
        if let Ok(mut polls) = self.polls.lock() {
            polls.push_back(poll);
        }
    }

    fn record(&self, f: impl FnOnce(&mut MockCalls)) {
        if let Ok(mut calls) = self.calls.lock() {
            f(&mut calls);
        }
    }
}

#[async_trait]
impl WarehouseApi for MockWarehouseApi {
    async fn request_token(&self, _credentials: &Credentials) -> Result<AccessToken> {
        self.record(|c| c.token_requests += 1);
        match &self.token {
            Ok(token) => Ok(AccessToken::new(token.clone())),
            Err(message) => Err(LawdeskError::authentication(message.clone())),
        }
    }

    async fn submit_statement(
        &self,
        _token: &AccessToken,
        request: &StatementRequest,
    ) -> Result<StatementId> {
        self.record(|c| c.submissions.push(request.clone()));
        match &self.submit_error {
            Some(message) => Err(LawdeskError::submission(message.clone())),
            None => Ok(StatementId::new(self.statement_id.clone())),
        }
    }

    async fn get_statement(
        &self,
        _token: &AccessToken,
        statement_id: &StatementId,
    ) -> Result<StatementStatus> {
        self.record(|c| c.polls += 1);
        let next = self.polls.lock().ok().and_then(|mut polls| polls.pop_front());

        match next {
            Some(MockPoll::Payload(payload)) => StatementStatus::from_payload(payload),
            Some(MockPoll::Error(message)) => Err(LawdeskError::poll(message)),
            None => StatementStatus::from_payload(json!({
                "statement_id": statement_id.as_str(),
                "status": { "state": "RUNNING" }
            })),
        }
    }

    async fn cancel_statement(
        &self,
        _token: &AccessToken,
        statement_id: &StatementId,
    ) -> Result<()> {
        self.record(|c| c.cancellations.push(statement_id.clone()));
        Ok(())
    }
}
