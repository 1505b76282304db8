use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DdlError;

/// Prefix the schema parser leaves on built-in XML Schema types
pub const PRIMITIVE_PREFIX: &str = "xs:";

/// Field name the schema parser uses for "no column"
pub const PLACEHOLDER_FIELD: &str = "None";

/// Target SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "sqlite3")]
    Sqlite3,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "postgres")]
    Postgres,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Sqlite3, Dialect::MySql, Dialect::Postgres];

    /// Canonical key, as used in the type map
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Sqlite3 => "sqlite3",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
        }
    }

    /// Whether enumerated simple types become standalone `CREATE TYPE` statements
    pub fn has_enum_types(&self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite3" | "sqlite" => Ok(Dialect::Sqlite3),
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            _ => Err(DdlError::UnknownDialect { dialect: s.to_string() }),
        }
    }
}

/// What a field's type attribute points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    /// Built-in type, stored without the `xs:` prefix
    Primitive(String),
    /// A simple or complex type declared in the schema
    Named(String),
}

impl TypeRef {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PRIMITIVE_PREFIX) {
            Some(key) => TypeRef::Primitive(key.to_string()),
            None => TypeRef::Named(raw.to_string()),
        }
    }
}

impl From<String> for TypeRef {
    fn from(raw: String) -> Self {
        TypeRef::parse(&raw)
    }
}

impl From<TypeRef> for String {
    fn from(type_ref: TypeRef) -> Self {
        type_ref.to_string()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(key) => write!(f, "{}{}", PRIMITIVE_PREFIX, key),
            TypeRef::Named(name) => f.write_str(name),
        }
    }
}

/// A declared field of a complex type or element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, type_ref: &str) -> Self {
        Self {
            name: name.into(),
            type_ref: TypeRef::parse(type_ref),
        }
    }

    /// True for the sentinel field that produces no column
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_FIELD
    }
}

/// Which implicit-column policy an entity gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    ComplexType,
    Element,
}

/// A rendered column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub sql_type: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.sql_type)
    }
}

/// Table about to be created; built per entity and dropped once rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn add_column(&mut self, name: impl Into<String>, sql_type: impl Into<String>) {
        self.columns.push(ColumnSpec::new(name, sql_type));
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

impl fmt::Display for TableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE {} (", self.name)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", column)?;
        }
        f.write_str(");")
    }
}

/// Type of DDL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    /// CREATE TYPE ... AS ENUM (postgres only)
    CreateType,
    /// CREATE TABLE
    CreateTable,
}

/// A single generated DDL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Type or table this statement creates
    pub object: String,
    pub sql: String,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_parsing() {
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite3);
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);

        let err = "oracle".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, DdlError::UnknownDialect { ref dialect } if dialect == "oracle"));
    }

    #[test]
    fn test_type_ref_parsing() {
        assert_eq!(TypeRef::parse("xs:string"), TypeRef::Primitive("string".to_string()));
        assert_eq!(TypeRef::parse("Office"), TypeRef::Named("Office".to_string()));
        assert_eq!(TypeRef::parse("xs:dateTime").to_string(), "xs:dateTime");
    }

    #[test]
    fn test_field_decl_deserialization() {
        let field: FieldDecl = serde_json::from_str(r#"{"name": "office", "type": "Office"}"#).unwrap();
        assert_eq!(field.type_ref, TypeRef::Named("Office".to_string()));
        assert!(!field.is_placeholder());

        let placeholder = FieldDecl::new("None", "xs:string");
        assert!(placeholder.is_placeholder());
    }

    #[test]
    fn test_table_spec_display() {
        let mut table = TableSpec::new("ballot");
        table.add_column("id", "INTEGER PRIMARY KEY");
        table.add_column("name", "TEXT");

        assert_eq!(table.to_string(), "CREATE TABLE ballot (id INTEGER PRIMARY KEY, name TEXT);");
        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert!(table.has_column("name"));
    }
}
