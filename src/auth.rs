//! OAuth client-credentials authentication.
//!
//! Tokens are short-lived and never cached: every lookup obtains a fresh one.

use std::fmt;
use tracing::info;

use crate::config::Credentials;
use crate::error::Result;
use crate::warehouse::WarehouseApi;

/// Opaque bearer token. `Debug` and `Display` never reveal it.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Obtains bearer tokens through the OAuth client-credentials grant.
pub struct TokenProvider<'a> {
    api: &'a dyn WarehouseApi,
}

impl<'a> TokenProvider<'a> {
    pub fn new(api: &'a dyn WarehouseApi) -> Self {
        Self { api }
    }

    /// Exchanges the credentials for a new token. No retries.
    pub async fn obtain_token(&self, credentials: &Credentials) -> Result<AccessToken> {
        let token = self.api.request_token(credentials).await?;
        info!(client_id = %credentials.client_id, "OAuth token obtained");
        Ok(token)
    }
}
