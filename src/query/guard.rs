//! Read-only guard for built statements.
//!
//! Parses the statement with sqlparser's generic dialect and accepts it only
//! if it is exactly one query. Literal escaping is not re-checked here: the
//! generic dialect has no backslash escapes, so a value ending in `\'` still
//! parses as a single quoted literal.

use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::error::{LawdeskError, Result};

/// Returns an error unless `sql` is a single read-only query.
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)
        .map_err(|e| LawdeskError::unsafe_statement(format!("SQL parse error: {}", e)))?;

    match statements.as_slice() {
        [Statement::Query(_)] => Ok(()),
        [] => Err(LawdeskError::unsafe_statement("Empty SQL statement")),
        [_] => Err(LawdeskError::unsafe_statement(
            "Only read-only queries may be submitted",
        )),
        _ => Err(LawdeskError::unsafe_statement(format!(
            "Expected one statement, found {}",
            statements.len()
        ))),
    }
}
