//! Rendering of query outcomes for the command line.

use serde_json::Value;

use crate::query::QueryOutcome;

/// Renders a single cell value for text output.
pub fn cell_to_display_string(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders an outcome as tab-separated rows, one per line.
///
/// A failed statement renders its state and diagnostic instead.
pub fn format_outcome_text(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Succeeded { rows } => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(cell_to_display_string)
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n"),
        QueryOutcome::Failed { state, diagnostic } => {
            format!("Query finished with state {state}: {diagnostic}")
        }
    }
}
