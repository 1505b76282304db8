use std::collections::BTreeSet;

use crate::error::{DdlError, DdlResult};
use crate::types::{Dialect, Statement, StatementKind};

/// Lower-case, deduplicate and sort enumeration literals.
///
/// Sorting keeps the rendered output identical across runs; the schema
/// order of literals is not preserved.
pub fn normalize_literals(simple_type: &str, literals: &[String], dialect: Dialect) -> DdlResult<Vec<String>> {
    let normalized: BTreeSet<String> = literals.iter().map(|l| l.to_lowercase()).collect();
    if normalized.is_empty() {
        return Err(DdlError::EmptyEnumeration {
            simple_type: simple_type.to_string(),
            dialect,
        });
    }
    Ok(normalized.into_iter().collect())
}

/// `'a','b'` with embedded quotes doubled
fn literal_list(literals: &[String]) -> String {
    literals
        .iter()
        .map(|l| format!("'{}'", l.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Standalone enum type for dialects that have one
pub fn create_type_statement(simple_type: &str, literals: &[String], dialect: Dialect) -> DdlResult<Statement> {
    let normalized = normalize_literals(simple_type, literals, dialect)?;
    Ok(Statement {
        kind: StatementKind::CreateType,
        object: simple_type.to_string(),
        sql: format!("CREATE TYPE {} AS ENUM({});", simple_type, literal_list(&normalized)),
    })
}

/// Column type for a field whose type is an enumerated simple type
pub fn column_type(simple_type: &str, literals: &[String], dialect: Dialect) -> DdlResult<String> {
    let normalized = normalize_literals(simple_type, literals, dialect)?;
    Ok(match dialect {
        // enumeration is not enforced
        Dialect::Sqlite3 => "TEXT".to_string(),
        Dialect::MySql => format!("ENUM({})", literal_list(&normalized)),
        Dialect::Postgres => simple_type.to_string(),
    })
}
