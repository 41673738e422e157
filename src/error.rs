//! Error types for lawdesk.
//!
//! Defines the main error enum used throughout the crate. A warehouse-side
//! query failure is not an error: it is reported as
//! [`QueryOutcome::Failure`](crate::query::QueryOutcome::Failure).

use std::time::Duration;
use thiserror::Error;

/// Main error type for lawdesk operations.
#[derive(Error, Debug)]
pub enum LawdeskError {
    /// OAuth token request failed (bad credentials, network, non-2xx).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A response lacked an expected field or was not valid JSON.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Statement submission failed.
    #[error("Submission error: {0}")]
    Submission(String),

    /// A statement status poll failed.
    #[error("Poll error: {0}")]
    Poll(String),

    /// The statement did not reach a terminal state within the polling bound.
    #[error(
        "Statement {statement_id} did not finish after {attempts} polls ({elapsed:?})"
    )]
    TimeoutExceeded {
        statement_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// The built statement is not a single read-only query.
    #[error("Unsafe statement: {0}")]
    UnsafeStatement(String),

    /// A tool call named an unknown tool or carried invalid arguments.
    #[error("Invalid tool call: {0}")]
    InvalidToolCall(String),

    /// Configuration errors (missing environment variables, invalid file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LawdeskError {
    /// Creates an authentication error with the given message.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates a malformed-response error with the given message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Creates a submission error with the given message.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Creates a poll error with the given message.
    pub fn poll(msg: impl Into<String>) -> Self {
        Self::Poll(msg.into())
    }

    /// Creates an unsafe-statement error with the given message.
    pub fn unsafe_statement(msg: impl Into<String>) -> Self {
        Self::UnsafeStatement(msg.into())
    }

    /// Creates an invalid-tool-call error with the given message.
    pub fn invalid_tool_call(msg: impl Into<String>) -> Self {
        Self::InvalidToolCall(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "Authentication Error",
            Self::MalformedResponse(_) => "Malformed Response",
            Self::Submission(_) => "Submission Error",
            Self::Poll(_) => "Poll Error",
            Self::TimeoutExceeded { .. } => "Timeout",
            Self::UnsafeStatement(_) => "Unsafe Statement",
            Self::InvalidToolCall(_) => "Invalid Tool Call",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using LawdeskError.
pub type Result<T> = std::result::Result<T, LawdeskError>;
