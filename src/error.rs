use thiserror::Error;

use crate::types::Dialect;

/// Main error type for schema generation
#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Unknown dialect `{dialect}` (expected one of: sqlite3, mysql, postgres)")]
    UnknownDialect { dialect: String },

    #[error("No {dialect} type mapping for key `{key}`")]
    UnknownTypeKey { dialect: Dialect, key: String },

    #[error("Simple type `{simple_type}` has no enumeration literals ({dialect})")]
    EmptyEnumeration { simple_type: String, dialect: Dialect },

    #[error("Duplicate entity name `{name}`")]
    DuplicateEntityName { name: String },

    #[error("Field `{field}` of `{entity}` references unknown type `{type_ref}`")]
    UnknownTypeReference {
        entity: String,
        field: String,
        type_ref: String,
    },

    #[error("Entity `{entity}` is not declared in the schema model")]
    UnknownEntity { entity: String },

    #[error("{dialect} sink rejected statement for `{object}`: {source}")]
    SinkFailure {
        dialect: Dialect,
        object: String,
        #[source]
        source: SinkError,
    },

    #[error("While generating `{entity}`: {source}")]
    Entity {
        entity: String,
        #[source]
        source: Box<DdlError>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DdlError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Attach the entity being rendered to an error.
    pub fn in_entity(self, entity: impl Into<String>) -> Self {
        match self {
            // already carries its own context
            Self::Entity { .. } | Self::UnknownTypeReference { .. } => self,
            other => Self::Entity {
                entity: entity.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any entity context peeled off.
    pub fn root(&self) -> &DdlError {
        match self {
            Self::Entity { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors raised by a DDL sink while executing a statement
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Statement rejected: {0}")]
    Rejected(String),
}

pub type DdlResult<T> = Result<T, DdlError>;
