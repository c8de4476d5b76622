//! Configuration for shared storage

use crate::storage::config::SurrealDBConfig;

/// Namespace and database the store selects on connect
#[derive(Debug, Clone)]
pub struct SharedStorageConfig {
    pub namespace: String,
    pub database: String,
}

impl Default for SharedStorageConfig {
    fn default() -> Self {
        Self {
            namespace: "glossa".to_string(),
            database: "main".to_string(),
        }
    }
}

impl From<&SurrealDBConfig> for SharedStorageConfig {
    fn from(config: &SurrealDBConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            database: config.database.clone(),
        }
    }
}
