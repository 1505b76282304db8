use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DdlError, DdlResult};
use crate::types::Dialect;

/// Type map compiled into the binary
const BUILTIN_TYPE_MAP: &str = include_str!("../../resources/type_map.json");

/// Newest type map format this build understands
pub const TYPE_MAP_VERSION: u32 = 1;

/// Keys the table generator itself asks for
pub mod keys {
    pub const ID: &str = "id";
    pub const INTEGER: &str = "integer";
    pub const INT: &str = "int";
    pub const BOOLEAN: &str = "boolean";
    pub const TIMESTAMP: &str = "timestamp";
}

/// Per-dialect mapping from primitive type keys to SQL type tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapRegistry {
    pub version: u32,
    dialects: BTreeMap<String, BTreeMap<String, String>>,
}

impl TypeMapRegistry {
    /// The registry shipped with the crate
    pub fn builtin() -> DdlResult<Self> {
        Self::from_json(BUILTIN_TYPE_MAP)
    }

    pub fn from_json(json: &str) -> DdlResult<Self> {
        let registry: TypeMapRegistry = serde_json::from_str(json)?;
        if registry.version > TYPE_MAP_VERSION {
            return Err(DdlError::config(format!(
                "type map version {} is newer than supported version {}",
                registry.version, TYPE_MAP_VERSION
            )));
        }
        debug!(
            version = registry.version,
            dialects = registry.dialects.len(),
            "Loaded type map"
        );
        Ok(registry)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DdlResult<Self> {
        let path = path.as_ref();
        info!("Loading type map from {:?}", path);
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn supports(&self, dialect: Dialect) -> bool {
        self.dialects.contains_key(dialect.as_str())
    }

    /// Fails with `UnknownDialect` when the registry has no entry for `dialect`
    pub fn ensure_dialect(&self, dialect: Dialect) -> DdlResult<()> {
        if self.supports(dialect) {
            Ok(())
        } else {
            Err(DdlError::UnknownDialect {
                dialect: dialect.to_string(),
            })
        }
    }

    pub fn lookup(&self, dialect: Dialect, key: &str) -> DdlResult<&str> {
        let types = self
            .dialects
            .get(dialect.as_str())
            .ok_or_else(|| DdlError::UnknownDialect {
                dialect: dialect.to_string(),
            })?;

        types
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DdlError::UnknownTypeKey {
                dialect,
                key: key.to_string(),
            })
    }

    /// Recognized keys for one dialect, sorted
    pub fn keys(&self, dialect: Dialect) -> Vec<&str> {
        self.dialects
            .get(dialect.as_str())
            .map(|types| types.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
