use rusqlite::Connection;
use tracing::{debug, info};

use crate::ddl_sink::DdlSink;
use crate::error::{DdlError, DdlResult, SinkError};
use crate::types::Statement;

/// SQLite database file (or `:memory:`) in autocommit mode
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: &str) -> DdlResult<Self> {
        info!(path = %path, "Opening SQLite database");
        let conn = Connection::open(path).map_err(|e| {
            DdlError::config(format!("failed to open SQLite database at '{}': {}", path, e))
        })?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DdlSink for SqliteSink {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError> {
        debug!(object = %statement.object, "Executing statement on SQLite");
        self.conn.execute_batch(&statement.sql)?;
        Ok(())
    }
}
