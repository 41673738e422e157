//! Agent tool definitions for function calling.
//!
//! Exposes the case lookup as a single tool taking an optional `status`
//! filter. A warehouse-side failure is reported in the tool output rather
//! than as an error, so the agent can tell "no rows" from "query failed".

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LawdeskError, Result};
use crate::lookup::CaseLookup;
use crate::query::{FilterSet, QueryOutcome};
use crate::warehouse::Row;

/// Name of the case lookup tool.
pub const CASE_LOOKUP_TOOL: &str = "get_info_processos_juridicos";

/// Case statuses the tool description advertises.
pub const KNOWN_STATUSES: [&str; 5] = [
    "Em andamento",
    "Julgado",
    "Em recurso",
    "Arquivado",
    "Suspenso",
];

/// Tool definition for agent function calling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool call requested by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this tool call (used to match results).
    pub id: String,
    /// Name of the tool to call.
    pub name: String,
    /// JSON arguments for the tool.
    pub arguments: String,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this result is for.
    pub tool_call_id: String,
    /// The result content (JSON).
    pub content: String,
}

/// Input parameters for the case lookup tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseLookupInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Output of the case lookup tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum CaseLookupOutput {
    Succeeded { row_count: usize, rows: Vec<Row> },
    Failed { state: String, diagnostic: String },
}

impl From<QueryOutcome> for CaseLookupOutput {
    fn from(outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Succeeded { rows } => Self::Succeeded {
                row_count: rows.len(),
                rows,
            },
            QueryOutcome::Failed { state, diagnostic } => Self::Failed {
                state: state.to_string(),
                diagnostic,
            },
        }
    }
}

/// Returns the tool definitions available to the agent.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: CASE_LOOKUP_TOOL.to_string(),
        description: "Returns information about legal cases (processos jurídicos), \
                      optionally filtered by case status. Each row is one case record."
            .to_string(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "status": {
                    "type": "string",
                    "description": format!(
                        "Filter by case status (optional). Known values: {}",
                        KNOWN_STATUSES.join(", ")
                    )
                }
            },
            "required": []
        }),
    }]
}

/// The case lookup tool, bound to a lookup service.
pub struct CaseLookupTool<'a> {
    lookup: &'a CaseLookup,
}

impl<'a> CaseLookupTool<'a> {
    pub fn new(lookup: &'a CaseLookup) -> Self {
        Self { lookup }
    }

    /// Runs the lookup for the given input.
    pub async fn call(&self, input: CaseLookupInput) -> Result<CaseLookupOutput> {
        let filters = FilterSet {
            status: input.status,
            ..FilterSet::default()
        };
        let outcome = self.lookup.lookup(&filters).await?;
        Ok(outcome.into())
    }

    /// Executes a tool call requested by the agent.
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolResult> {
        if call.name != CASE_LOOKUP_TOOL {
            return Err(LawdeskError::invalid_tool_call(format!(
                "Unknown tool: {}",
                call.name
            )));
        }

        let input = parse_arguments(&call.arguments)?;
        info!(tool = %call.name, call_id = %call.id, "Executing tool call");

        let output = self.call(input).await?;
        let content = serde_json::to_string(&output).map_err(|e| {
            LawdeskError::invalid_tool_call(format!("Failed to serialize tool output: {}", e))
        })?;

        Ok(ToolResult {
            tool_call_id: call.id.clone(),
            content,
        })
    }
}

/// Parses tool arguments. Empty arguments mean "no filter".
fn parse_arguments(arguments: &str) -> Result<CaseLookupInput> {
    if arguments.trim().is_empty() {
        return Ok(CaseLookupInput::default());
    }
    serde_json::from_str(arguments)
        .map_err(|e| LawdeskError::invalid_tool_call(format!("Invalid arguments: {}", e)))
}
