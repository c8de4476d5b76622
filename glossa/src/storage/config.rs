//! Configuration structures for storage backends

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend the engine stores its data in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngine {
    /// Process-local maps; nothing survives a restart
    Memory,
    /// SurrealDB with its in-memory key-value engine
    SurrealMemory,
    /// SurrealDB on RocksDB under the data directory
    #[default]
    #[serde(rename = "rocksdb", alias = "rocks_db")]
    RocksDb,
}

impl fmt::Display for StorageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngine::Memory => write!(f, "memory"),
            StorageEngine::SurrealMemory => write!(f, "surreal_memory"),
            StorageEngine::RocksDb => write!(f, "rocksdb"),
        }
    }
}

/// SurrealDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrealDBConfig {
    /// Namespace
    pub namespace: String,

    /// Database name
    pub database: String,
}

impl Default for SurrealDBConfig {
    fn default() -> Self {
        Self {
            namespace: "glossa".to_string(),
            database: "main".to_string(),
        }
    }
}
