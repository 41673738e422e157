//! Filter-driven statement construction.
//!
//! The statement is built by string interpolation. Every value is escaped by
//! doubling single quotes before it is placed inside a literal.

use serde::{Deserialize, Serialize};

/// Fully-qualified table holding the case records.
pub const CASES_TABLE: &str = "workspace.default.processos_juridicos";

/// Optional predicates over the case table.
///
/// An absent or empty value is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Exact match on `status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Exact match on `vara` (the court).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<String>,
    /// Exact match on `tipo_acao` (the case type).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    /// Substring match on `parte` (a party to the case).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
}

/// How a filter value is compared against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equals,
    Contains,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_court(mut self, court: impl Into<String>) -> Self {
        self.court = Some(court.into());
        self
    }

    pub fn with_case_type(mut self, case_type: impl Into<String>) -> Self {
        self.case_type = Some(case_type.into());
        self
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    /// Returns true if no filter will be applied.
    pub fn is_empty(&self) -> bool {
        self.conditions().is_empty()
    }

    /// Returns one SQL condition per applied filter, in declaration order.
    pub fn conditions(&self) -> Vec<String> {
        let filters = [
            ("status", Comparison::Equals, &self.status),
            ("vara", Comparison::Equals, &self.court),
            ("tipo_acao", Comparison::Equals, &self.case_type),
            ("parte", Comparison::Contains, &self.party),
        ];

        filters
            .into_iter()
            .filter_map(|(column, comparison, value)| {
                let value = value.as_deref().filter(|v| !v.is_empty())?;
                let escaped = escape_literal(value);
                Some(match comparison {
                    Comparison::Equals => format!("{column} = '{escaped}'"),
                    Comparison::Contains => format!("{column} LIKE '%{escaped}%'"),
                })
            })
            .collect()
    }
}

/// Escapes a value for use inside a single-quoted SQL literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Builds the statement for the given filters.
pub fn build_statement(filters: &FilterSet) -> String {
    let base = format!("SELECT * FROM {CASES_TABLE}");
    let conditions = filters.conditions();

    if conditions.is_empty() {
        base
    } else {
        format!("{base} WHERE {}", conditions.join(" AND "))
    }
}
