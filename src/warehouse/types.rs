//! Statement execution types for the warehouse API.
//!
//! Defines the request, handle, state and status structures exchanged with
//! the SQL statement execution endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{LawdeskError, Result};

/// A single result row. Column values are kept as raw JSON.
pub type Row = Vec<Value>;

/// Handle returned by the warehouse when a statement is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementId(String);

impl StatementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of a statement submission request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRequest {
    pub statement: String,
    pub warehouse_id: String,
}

impl StatementRequest {
    pub fn new(statement: impl Into<String>, warehouse_id: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            warehouse_id: warehouse_id.into(),
        }
    }
}

/// Execution state reported by the warehouse.
///
/// `SUBMITTED -> {PENDING/RUNNING}* -> SUCCEEDED | FAILED | CANCELED | CLOSED`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatementState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Closed,
    /// A state this client does not know; treated as non-terminal.
    Other(String),
}

impl StatementState {
    /// Returns the state as reported on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Closed => "CLOSED",
            Self::Other(s) => s,
        }
    }

    /// Returns true if no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Canceled | Self::Closed
        )
    }
}

impl From<String> for StatementState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "RUNNING" => Self::Running,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "CANCELED" => Self::Canceled,
            "CLOSED" => Self::Closed,
            _ => Self::Other(s),
        }
    }
}

impl From<StatementState> for String {
    fn from(state: StatementState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for StatementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a statement's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementStatus {
    pub state: StatementState,
    /// `result.data_array`, when the warehouse included it.
    pub data_array: Option<Vec<Row>>,
    /// `status.error.message`, when the warehouse included it.
    pub error_message: Option<String>,
    /// The full response body, kept for failure diagnostics.
    pub payload: Value,
}

impl StatementStatus {
    /// Interprets a status response body.
    pub fn from_payload(payload: Value) -> Result<Self> {
        let wire: StatusResponse = serde_json::from_value(payload.clone()).map_err(|e| {
            LawdeskError::malformed(format!("Unexpected statement status response: {e}"))
        })?;

        Ok(Self {
            state: wire.status.state,
            data_array: wire.result.and_then(|r| r.data_array),
            error_message: wire.status.error.and_then(|e| e.message),
            payload,
        })
    }

    /// Returns the failure diagnostic: the warehouse's error message if any,
    /// otherwise the full payload.
    pub fn diagnostic(&self) -> String {
        match &self.error_message {
            Some(message) => message.clone(),
            None => self.payload.to_string(),
        }
    }
}

// Warehouse API wire types

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub statement_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: StatusBody,
    #[serde(default)]
    result: Option<ResultBody>,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    state: StatementState,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    #[serde(default)]
    data_array: Option<Vec<Row>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_round_trips_wire_names() {
        for name in ["PENDING", "RUNNING", "SUCCEEDED", "FAILED", "CANCELED", "CLOSED"] {
            let state = StatementState::from(name.to_string());
            assert!(!matches!(state, StatementState::Other(_)));
            assert_eq!(state.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_state_is_not_terminal() {
        let state: StatementState = serde_json::from_value(json!("QUEUED")).unwrap();
        assert_eq!(state, StatementState::Other("QUEUED".to_string()));
        assert!(!state.is_terminal());
        assert_eq!(state.to_string(), "QUEUED");
    }

    #[test]
    fn test_terminal_states() {
        for state in [
            StatementState::Succeeded,
            StatementState::Failed,
            StatementState::Canceled,
            StatementState::Closed,
        ] {
            assert!(state.is_terminal());
        }
        assert!(!StatementState::Pending.is_terminal());
        assert!(!StatementState::Running.is_terminal());
    }

    #[test]
    fn test_status_with_rows() {
        let status = StatementStatus::from_payload(json!({
            "statement_id": "S1",
            "status": { "state": "SUCCEEDED" },
            "result": { "data_array": [["a", "b"], ["c", null]] }
        }))
        .unwrap();

        assert_eq!(status.state, StatementState::Succeeded);
        assert_eq!(
            status.data_array,
            Some(vec![vec![json!("a"), json!("b")], vec![json!("c"), Value::Null]])
        );
    }

    #[test]
    fn test_status_without_result() {
        let status = StatementStatus::from_payload(json!({
            "status": { "state": "SUCCEEDED" }
        }))
        .unwrap();
        assert_eq!(status.data_array, None);
    }

    #[test]
    fn test_status_missing_state_is_malformed() {
        let err = StatementStatus::from_payload(json!({ "status": {} })).unwrap_err();
        assert!(matches!(err, LawdeskError::MalformedResponse(_)));

        let err = StatementStatus::from_payload(json!({ "result": {} })).unwrap_err();
        assert!(matches!(err, LawdeskError::MalformedResponse(_)));
    }

    #[test]
    fn test_diagnostic_prefers_error_message() {
        let status = StatementStatus::from_payload(json!({
            "status": {
                "state": "FAILED",
                "error": { "error_code": "BAD_REQUEST", "message": "Table not found" }
            }
        }))
        .unwrap();
        assert_eq!(status.diagnostic(), "Table not found");

        let status = StatementStatus::from_payload(json!({
            "status": { "state": "CLOSED" }
        }))
        .unwrap();
        assert!(status.diagnostic().contains("CLOSED"));
    }

    #[test]
    fn test_statement_request_serializes_expected_body() {
        let request = StatementRequest::new("SELECT 1", "wh-1");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "statement": "SELECT 1", "warehouse_id": "wh-1" })
        );
    }
}
