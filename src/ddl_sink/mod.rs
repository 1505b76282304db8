// Statement execution backends
pub mod mysql;
pub mod postgres;
pub mod runner;
pub mod sqlite;
pub mod writer;


pub use mysql::MySqlSink;
pub use postgres::PostgresSink;
pub use runner::{apply_schema, RunSummary};
pub use sqlite::SqliteSink;
pub use writer::{MemorySink, WriterSink};

use crate::config::ConnectionConfig;
use crate::error::{DdlResult, SinkError};
use crate::types::{Dialect, Statement};

/// Executes generated statements one at a time.
///
/// Every successful `apply` is durable on its own. There is no transaction
/// spanning a run, so a failure leaves the statements before it in place.
#[allow(async_fn_in_trait)]
pub trait DdlSink {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError>;

    /// Release the underlying connection or flush output
    async fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Live database connection for the configured dialect
pub enum DatabaseSink {
    Sqlite(SqliteSink),
    MySql(MySqlSink),
    Postgres(PostgresSink),
}

impl DatabaseSink {
    pub async fn connect(config: &ConnectionConfig) -> DdlResult<Self> {
        let sink = match config.dialect {
            Dialect::Sqlite3 => DatabaseSink::Sqlite(SqliteSink::open(&config.host)?),
            Dialect::MySql => DatabaseSink::MySql(MySqlSink::connect(config).await?),
            Dialect::Postgres => DatabaseSink::Postgres(PostgresSink::connect(config).await?),
        };
        Ok(sink)
    }
}

impl DdlSink for DatabaseSink {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError> {
        match self {
            DatabaseSink::Sqlite(sink) => sink.apply(statement).await,
            DatabaseSink::MySql(sink) => sink.apply(statement).await,
            DatabaseSink::Postgres(sink) => sink.apply(statement).await,
        }
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        match self {
            DatabaseSink::Sqlite(sink) => sink.finish().await,
            DatabaseSink::MySql(sink) => sink.finish().await,
            DatabaseSink::Postgres(sink) => sink.finish().await,
        }
    }
}
