use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, OptsBuilder};
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::ddl_sink::DdlSink;
use crate::error::{DdlError, DdlResult, SinkError};
use crate::types::Statement;

/// MySQL connection; DDL statements commit implicitly
pub struct MySqlSink {
    conn: Option<Conn>,
}

impl MySqlSink {
    pub async fn connect(config: &ConnectionConfig) -> DdlResult<Self> {
        info!(host = %config.host, database = %config.database, "Connecting to MySQL");

        let mut builder = OptsBuilder::from_opts(Opts::default())
            .ip_or_hostname(config.host.as_str())
            .db_name(Some(config.database.as_str()))
            .user(Some(config.user.as_str()))
            .pass(Some(config.password.as_str()));
        if let Some(port) = config.port {
            builder = builder.tcp_port(port);
        }

        let conn = Conn::new(builder)
            .await
            .map_err(|e| DdlError::config(format!("failed to connect to MySQL at '{}': {}", config.host, e)))?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&mut self) -> Result<&mut Conn, SinkError> {
        self.conn
            .as_mut()
            .ok_or_else(|| SinkError::Rejected("MySQL connection already closed".to_string()))
    }
}

impl DdlSink for MySqlSink {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError> {
        debug!(object = %statement.object, "Executing statement on MySQL");
        self.conn()?.query_drop(statement.sql.as_str()).await?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), SinkError> {
        if let Some(conn) = self.conn.take() {
            conn.disconnect().await?;
        }
        Ok(())
    }
}
