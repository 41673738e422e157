//! HTTP implementation of the warehouse API.
//!
//! Response interpretation lives in the `parse_*` functions, which take the
//! status code and body text so they can be tested without a network.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::auth::AccessToken;
use crate::config::Credentials;
use crate::error::{LawdeskError, Result};

use super::types::{SubmitResponse, TokenResponse};
use super::{StatementId, StatementRequest, StatementStatus, WarehouseApi};

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OAuth scope requested for the token.
const TOKEN_SCOPE: &str = "all-apis";

/// Maximum number of body characters carried into error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Warehouse API client over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpWarehouseApi {
    workspace_url: String,
    client: Client,
}

impl HttpWarehouseApi {
    /// Creates a client for the given workspace with a per-request timeout.
    pub fn new(workspace_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LawdeskError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            workspace_url: workspace_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn statements_url(&self) -> String {
        format!("{}/api/2.0/sql/statements", self.workspace_url)
    }

    fn statement_url(&self, statement_id: &StatementId) -> String {
        format!("{}/{}", self.statements_url(), statement_id)
    }

    /// Sends a request and returns the status and body text.
    ///
    /// Transport failures are mapped through `wrap` into the caller's error kind.
    async fn send(
        request: RequestBuilder,
        wrap: fn(String) -> LawdeskError,
    ) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| wrap(describe_request_error(&e)))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| wrap(format!("Failed to read response: {}", e)))?;
        Ok((status, body))
    }
}

#[async_trait]
impl WarehouseApi for HttpWarehouseApi {
    async fn request_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let url = format!("{}/oidc/v1/token", self.workspace_url);
        debug!("Requesting OAuth token from {}", url);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", TOKEN_SCOPE),
        ];
        let request = self.client.post(&url).form(&form);

        let (status, body) = Self::send(request, LawdeskError::Authentication).await?;
        parse_token_response(status, &body)
    }

    async fn submit_statement(
        &self,
        token: &AccessToken,
        request: &StatementRequest,
    ) -> Result<StatementId> {
        let request = self
            .client
            .post(self.statements_url())
            .bearer_auth(token.secret())
            .json(request);

        let (status, body) = Self::send(request, LawdeskError::Submission).await?;
        parse_submit_response(status, &body)
    }

    async fn get_statement(
        &self,
        token: &AccessToken,
        statement_id: &StatementId,
    ) -> Result<StatementStatus> {
        let request = self
            .client
            .get(self.statement_url(statement_id))
            .bearer_auth(token.secret());

        let (status, body) = Self::send(request, LawdeskError::Poll).await?;
        parse_status_response(status, &body)
    }

    async fn cancel_statement(
        &self,
        token: &AccessToken,
        statement_id: &StatementId,
    ) -> Result<()> {
        let request = self
            .client
            .post(format!("{}/cancel", self.statement_url(statement_id)))
            .bearer_auth(token.secret());

        let (status, body) = Self::send(request, LawdeskError::Poll).await?;
        parse_cancel_response(status, &body)
    }
}

/// Interprets a token endpoint response.
pub fn parse_token_response(status: StatusCode, body: &str) -> Result<AccessToken> {
    if !status.is_success() {
        return Err(LawdeskError::authentication(format!(
            "Token endpoint returned {}: {}",
            status,
            truncate_body(body)
        )));
    }

    let response: TokenResponse = serde_json::from_str(body)
        .map_err(|e| LawdeskError::malformed(format!("Unexpected token response: {}", e)))?;
    Ok(AccessToken::new(response.access_token))
}

/// Interprets a statement submission response.
pub fn parse_submit_response(status: StatusCode, body: &str) -> Result<StatementId> {
    if !status.is_success() {
        return Err(LawdeskError::submission(format!(
            "Statement submission returned {}: {}",
            status,
            truncate_body(body)
        )));
    }

    let response: SubmitResponse = serde_json::from_str(body)
        .map_err(|e| LawdeskError::malformed(format!("Unexpected submission response: {}", e)))?;
    Ok(StatementId::new(response.statement_id))
}

/// Interprets a statement status response.
pub fn parse_status_response(status: StatusCode, body: &str) -> Result<StatementStatus> {
    if !status.is_success() {
        return Err(LawdeskError::poll(format!(
            "Statement status returned {}: {}",
            status,
            truncate_body(body)
        )));
    }

    let payload = serde_json::from_str(body)
        .map_err(|e| LawdeskError::malformed(format!("Unexpected status response: {}", e)))?;
    StatementStatus::from_payload(payload)
}

/// Interprets a statement cancel response.
pub fn parse_cancel_response(status: StatusCode, body: &str) -> Result<()> {
    if !status.is_success() {
        return Err(LawdeskError::poll(format!(
            "Statement cancel returned {}: {}",
            status,
            truncate_body(body)
        )));
    }
    Ok(())
}

fn describe_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        "Failed to connect to the workspace. Check the workspace URL and your network.".to_string()
    } else {
        format!("Request failed: {}", error)
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push_str("...");
    truncated
}
