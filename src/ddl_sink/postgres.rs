use tokio_postgres::{Client, Config, NoTls};
use tracing::{debug, error, info};

use crate::config::ConnectionConfig;
use crate::ddl_sink::DdlSink;
use crate::error::{DdlError, DdlResult, SinkError};
use crate::types::Statement;

/// PostgreSQL client outside any transaction, so each statement commits on its own
pub struct PostgresSink {
    client: Client,
}

impl PostgresSink {
    pub async fn connect(config: &ConnectionConfig) -> DdlResult<Self> {
        info!(host = %config.host, database = %config.database, "Connecting to PostgreSQL");

        let mut pg_config = Config::new();
        pg_config
            .host(&config.host)
            .dbname(&config.database)
            .user(&config.user)
            .password(&config.password);
        if let Some(port) = config.port {
            pg_config.port(port);
        }

        let (client, connection) = pg_config
            .connect(NoTls)
            .await
            .map_err(|e| DdlError::config(format!("failed to connect to PostgreSQL at '{}': {}", config.host, e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    /// Connect with a `postgresql://` URL
    pub async fn connect_url(url: &str) -> DdlResult<Self> {
        let (client, connection) = tokio_postgres::connect(url, NoTls)
            .await
            .map_err(|e| DdlError::config(format!("failed to connect to PostgreSQL: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl DdlSink for PostgresSink {
    async fn apply(&mut self, statement: &Statement) -> Result<(), SinkError> {
        debug!(object = %statement.object, "Executing statement on PostgreSQL");
        self.client.batch_execute(&statement.sql).await?;
        Ok(())
    }
}
