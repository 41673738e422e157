//! End-to-end lookup tests.
//!
//! Covers the token → submit → poll lifecycle through `CaseLookup`.

use lawdesk::error::LawdeskError;
use lawdesk::query::{FilterSet, PollPolicy, QueryOutcome};
use lawdesk::warehouse::{MockWarehouseApi, StatementId, StatementState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use super::mock_lookup;

#[tokio::test]
async fn test_pending_running_succeeded_returns_rows_after_three_polls() {
    let api = Arc::new(
        MockWarehouseApi::new()
            .with_token("T")
            .with_statement_id("S1")
            .with_states(["PENDING", "RUNNING"])
            .with_success(vec![vec![json!("a"), json!("b")]]),
    );
    let lookup = mock_lookup(api.clone());

    let outcome = lookup.lookup(&FilterSet::new()).await.unwrap();

    assert_eq!(outcome.into_rows(), Some(vec![vec![json!("a"), json!("b")]]));
    assert_eq!(api.calls().polls, 3);
}

#[tokio::test]
async fn test_failed_statement_is_outcome_with_diagnostic() {
    let api = Arc::new(
        MockWarehouseApi::new()
            .with_states(["PENDING", "RUNNING"])
            .with_failure("FAILED", "[TABLE_OR_VIEW_NOT_FOUND] processos_juridicos"),
    );
    let lookup = mock_lookup(api);

    let outcome = lookup.lookup(&FilterSet::new()).await.unwrap();

    match outcome {
        QueryOutcome::Failed { state, diagnostic } => {
            assert_eq!(state, StatementState::Failed);
            assert!(diagnostic.contains("TABLE_OR_VIEW_NOT_FOUND"));
        }
        other => panic!("expected failure outcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_and_empty_success_are_distinguishable() {
    let empty = Arc::new(MockWarehouseApi::new().with_success(vec![]));
    let failed = Arc::new(MockWarehouseApi::new().with_states(["CLOSED"]));

    let empty_outcome = mock_lookup(empty).lookup(&FilterSet::new()).await.unwrap();
    let failed_outcome = mock_lookup(failed).lookup(&FilterSet::new()).await.unwrap();

    assert_eq!(empty_outcome.rows(), Some(&[][..]));
    assert_eq!(failed_outcome.rows(), None);
}

#[tokio::test]
async fn test_unauthorized_token_stops_before_submission() {
    let api = Arc::new(
        MockWarehouseApi::new().with_token_failure("Token endpoint returned 401 Unauthorized"),
    );
    let lookup = mock_lookup(api.clone());

    let err = lookup
        .lookup(&FilterSet::new().with_status("Julgado"))
        .await
        .unwrap_err();

    assert!(matches!(err, LawdeskError::Authentication(_)));
    assert_eq!(err.category(), "Authentication Error");
    let calls = api.calls();
    assert!(calls.submissions.is_empty());
    assert_eq!(calls.polls, 0);
}

#[tokio::test]
async fn test_poll_bound_times_out_and_cancels() {
    let api = Arc::new(MockWarehouseApi::new().with_statement_id("S-forever"));
    let lookup = mock_lookup(api.clone()).with_policy(
        PollPolicy::default()
            .with_interval(Duration::ZERO)
            .with_max_attempts(5),
    );

    let err = lookup.lookup(&FilterSet::new()).await.unwrap_err();

    assert!(matches!(
        err,
        LawdeskError::TimeoutExceeded { attempts: 5, .. }
    ));
    let calls = api.calls();
    assert_eq!(calls.polls, 5);
    assert_eq!(calls.cancellations, vec![StatementId::new("S-forever")]);
}

#[tokio::test]
async fn test_malformed_status_payload_is_error() {
    let api = Arc::new(MockWarehouseApi::new().with_payload(json!({ "statement_id": "S1" })));
    let lookup = mock_lookup(api);

    let err = lookup.lookup(&FilterSet::new()).await.unwrap_err();

    assert!(matches!(err, LawdeskError::MalformedResponse(_)));
}
