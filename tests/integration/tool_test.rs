//! Agent tool integration tests.

use lawdesk::error::LawdeskError;
use lawdesk::tools::{
    get_tool_definitions, CaseLookupInput, CaseLookupOutput, CaseLookupTool, ToolCall,
    CASE_LOOKUP_TOOL,
};
use lawdesk::warehouse::MockWarehouseApi;
use serde_json::json;
use std::sync::Arc;

use super::mock_lookup;

#[test]
fn test_definition_advertises_single_optional_status() {
    let definitions = get_tool_definitions();
    let parameters = &definitions[0].parameters;

    assert_eq!(definitions[0].name, CASE_LOOKUP_TOOL);
    assert_eq!(parameters["properties"].as_object().unwrap().len(), 1);
    assert_eq!(parameters["required"], json!([]));
}

#[tokio::test]
async fn test_call_without_status_queries_whole_table() {
    let api = Arc::new(
        MockWarehouseApi::new()
            .with_states(["RUNNING"])
            .with_success(vec![vec![json!("0001"), json!("Julgado")]]),
    );
    let lookup = mock_lookup(api.clone());

    let output = CaseLookupTool::new(&lookup)
        .call(CaseLookupInput::default())
        .await
        .unwrap();

    assert_eq!(
        output,
        CaseLookupOutput::Succeeded {
            row_count: 1,
            rows: vec![vec![json!("0001"), json!("Julgado")]],
        }
    );
    assert_eq!(
        api.calls().submissions[0].statement,
        "SELECT * FROM workspace.default.processos_juridicos"
    );
}

#[tokio::test]
async fn test_dispatch_round_trip() {
    let api = Arc::new(MockWarehouseApi::new().with_failure("CANCELED", "canceled by admin"));
    let lookup = mock_lookup(api);
    let call = ToolCall {
        id: "call_42".to_string(),
        name: CASE_LOOKUP_TOOL.to_string(),
        arguments: r#"{"status": "Em recurso"}"#.to_string(),
    };

    let result = CaseLookupTool::new(&lookup).dispatch(&call).await.unwrap();

    assert_eq!(result.tool_call_id, "call_42");
    let output: CaseLookupOutput = serde_json::from_str(&result.content).unwrap();
    assert_eq!(
        output,
        CaseLookupOutput::Failed {
            state: "CANCELED".to_string(),
            diagnostic: "canceled by admin".to_string(),
        }
    );
}

#[tokio::test]
async fn test_dispatch_rejects_bad_arguments_without_network() {
    let api = Arc::new(MockWarehouseApi::new());
    let lookup = mock_lookup(api.clone());
    let call = ToolCall {
        id: "call_1".to_string(),
        name: CASE_LOOKUP_TOOL.to_string(),
        arguments: r#"{"status": 7}"#.to_string(),
    };

    let err = CaseLookupTool::new(&lookup).dispatch(&call).await.unwrap_err();

    assert!(matches!(err, LawdeskError::InvalidToolCall(_)));
    assert_eq!(api.calls().token_requests, 0);
}
