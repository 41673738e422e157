//! Case lookup service.
//!
//! Composes token acquisition and query execution into the single entry point
//! used by both the CLI and the agent tool:
//! `CaseLookup::lookup()` → `TokenProvider::obtain_token()` → `QueryExecutor::execute()`.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::auth::TokenProvider;
use crate::config::{Config, WarehouseConfig};
use crate::error::Result;
use crate::query::{FilterSet, PollPolicy, QueryExecutor, QueryOutcome};
use crate::warehouse::{HttpWarehouseApi, WarehouseApi};

/// Looks up case records in the configured warehouse.
pub struct CaseLookup {
    api: Arc<dyn WarehouseApi>,
    config: WarehouseConfig,
    policy: PollPolicy,
}

impl CaseLookup {
    /// Creates a lookup service over the given API.
    pub fn new(api: Arc<dyn WarehouseApi>, config: WarehouseConfig) -> Self {
        Self {
            api,
            config,
            policy: PollPolicy::default(),
        }
    }

    /// Creates a lookup service talking HTTP to the configured workspace.
    pub fn connect(config: WarehouseConfig, settings: &Config) -> Result<Self> {
        let api = HttpWarehouseApi::new(
            config.credentials.workspace_url.clone(),
            settings.http_timeout(),
        )?;
        Ok(Self::new(Arc::new(api), config).with_policy(settings.poll_policy()))
    }

    /// Sets the polling policy.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the warehouse configuration.
    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Runs the filtered query with a freshly obtained token.
    pub async fn lookup(&self, filters: &FilterSet) -> Result<QueryOutcome> {
        let start = Instant::now();
        debug!(warehouse = %self.config.display_string(), ?filters, "Starting case lookup");

        let token = TokenProvider::new(self.api.as_ref())
            .obtain_token(&self.config.credentials)
            .await?;

        let outcome = QueryExecutor::new(self.api.as_ref())
            .with_policy(self.policy)
            .execute(&token, &self.config.warehouse_id, filters)
            .await?;

        info!(
            success = outcome.is_success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Case lookup finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::error::LawdeskError;
    use crate::warehouse::MockWarehouseApi;
    use serde_json::json;
    use std::time::Duration;

    fn config() -> WarehouseConfig {
        WarehouseConfig::new(
            Credentials::new("https://example.com", "client", "secret"),
            "wh-1",
        )
        .unwrap()
    }

    fn lookup_with(api: Arc<MockWarehouseApi>) -> CaseLookup {
        CaseLookup::new(api, config())
            .with_policy(PollPolicy::default().with_interval(Duration::ZERO))
    }

    #[tokio::test]
    async fn test_lookup_returns_rows() {
        let api = Arc::new(
            MockWarehouseApi::new()
                .with_states(["PENDING", "RUNNING"])
                .with_success(vec![vec![json!("a"), json!("b")]]),
        );
        let lookup = lookup_with(api.clone());

        let outcome = lookup
            .lookup(&FilterSet::new().with_status("Julgado"))
            .await
            .unwrap();

        assert_eq!(outcome.into_rows(), Some(vec![vec![json!("a"), json!("b")]]));
        let calls = api.calls();
        assert_eq!(calls.token_requests, 1);
        assert_eq!(calls.polls, 3);
        assert_eq!(calls.submissions[0].warehouse_id, "wh-1");
    }

    #[tokio::test]
    async fn test_token_failure_never_reaches_executor() {
        let api = Arc::new(MockWarehouseApi::new().with_token_failure("401 Unauthorized"));
        let lookup = lookup_with(api.clone());

        let err = lookup.lookup(&FilterSet::new()).await.unwrap_err();

        assert!(matches!(err, LawdeskError::Authentication(_)));
        let calls = api.calls();
        assert!(calls.submissions.is_empty());
        assert_eq!(calls.polls, 0);
    }

    #[tokio::test]
    async fn test_each_lookup_obtains_a_fresh_token() {
        let api = Arc::new(
            MockWarehouseApi::new()
                .with_success(vec![])
                .with_success(vec![]),
        );
        let lookup = lookup_with(api.clone());

        lookup.lookup(&FilterSet::new()).await.unwrap();
        lookup.lookup(&FilterSet::new()).await.unwrap();

        assert_eq!(api.calls().token_requests, 2);
    }

    #[test]
    fn test_connect_builds_http_client() {
        let lookup = CaseLookup::connect(config(), &Config::default()).unwrap();
        assert_eq!(lookup.config().warehouse_id, "wh-1");
        assert_eq!(lookup.policy, PollPolicy::default());
    }
}
