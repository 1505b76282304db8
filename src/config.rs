use serde::{Deserialize, Serialize};

use crate::types::Dialect;

/// Where the generated schema is created.
///
/// For sqlite3, `host` is the database file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub dialect: Dialect,
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Sqlite3,
            host: "localhost".to_string(),
            port: None,
            database: "vip".to_string(),
            user: "username".to_string(),
            password: "password".to_string(),
        }
    }
}

impl ConnectionConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Connection target with the password left out, for logs
    pub fn describe(&self) -> String {
        match self.dialect {
            Dialect::Sqlite3 => format!("sqlite3:{}", self.host),
            _ => format!(
                "{}://{}@{}{}/{}",
                self.dialect,
                self.user,
                self.host,
                self.port.map(|p| format!(":{}", p)).unwrap_or_default(),
                self.database
            ),
        }
    }
}
