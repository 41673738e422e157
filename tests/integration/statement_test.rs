//! Statement construction tests through the public API.
//!
//! Checks what actually reaches the warehouse for a range of filter values.

use lawdesk::query::{build_statement, ensure_read_only, FilterSet, CASES_TABLE};
use lawdesk::warehouse::MockWarehouseApi;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use super::mock_lookup;

/// Values a user (or an agent) might plausibly pass through.
const AWKWARD_VALUES: [&str; 6] = [
    "O'Brien",
    "'",
    "''",
    "x' OR '1'='1",
    "a'; DROP TABLE processos_juridicos; --",
    "Ação d'Água",
];

#[test]
fn test_every_filter_doubles_quotes() {
    for value in AWKWARD_VALUES {
        let escaped = value.replace('\'', "''");
        let filters = FilterSet::new()
            .with_status(value)
            .with_court(value)
            .with_case_type(value)
            .with_party(value);

        let sql = build_statement(&filters);

        assert_eq!(
            sql,
            format!(
                "SELECT * FROM {CASES_TABLE} WHERE status = '{escaped}' AND vara = '{escaped}' \
                 AND tipo_acao = '{escaped}' AND parte LIKE '%{escaped}%'"
            )
        );
        ensure_read_only(&sql).unwrap();
    }
}

#[test]
fn test_condition_count_matches_present_filters() {
    let cases = [
        (FilterSet::new(), 0),
        (FilterSet::new().with_party("Silva"), 1),
        (FilterSet::new().with_status("Julgado").with_party("Silva"), 2),
        (
            FilterSet::new()
                .with_status("Julgado")
                .with_court("1ª Vara")
                .with_case_type("Despejo"),
            3,
        ),
    ];

    for (filters, expected) in cases {
        let sql = build_statement(&filters);
        let conditions = match sql.split_once(" WHERE ") {
            Some((_, clause)) => clause.split(" AND ").count(),
            None => 0,
        };
        assert_eq!(conditions, expected, "{sql}");
    }
}

#[tokio::test]
async fn test_submitted_statement_matches_built_statement() {
    let api = Arc::new(MockWarehouseApi::new().with_success(vec![]));
    let lookup = mock_lookup(api.clone());
    let filters = FilterSet::new()
        .with_court("2ª Vara Cível")
        .with_party("O'Brien");

    lookup.lookup(&filters).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.submissions.len(), 1);
    assert_eq!(calls.submissions[0].statement, build_statement(&filters));
    assert_eq!(calls.submissions[0].warehouse_id, "wh-test");
    assert!(calls.submissions[0]
        .statement
        .ends_with("vara = '2ª Vara Cível' AND parte LIKE '%O''Brien%'"));
}
