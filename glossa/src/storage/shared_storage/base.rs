//! Base shared storage implementation

use async_trait::async_trait;
use surrealdb::{Connection, Surreal};

use super::config::SharedStorageConfig;
use super::schema::TABLES;
use crate::storage::errors::StorageError;
use crate::storage::traits::BaseStore;

/// SurrealDB-backed lexicon store
#[derive(Debug)]
pub struct SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    pub(crate) client: Surreal<C>,
    pub(crate) config: SharedStorageConfig,
}

impl<C> SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    /// Select namespace/database and initialize the schema
    pub async fn new(
        client: Surreal<C>,
        config: SharedStorageConfig,
    ) -> Result<Self, StorageError> {
        client
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StorageError::Connection(format!("Failed to set namespace/database: {}", e))
            })?;

        let storage = Self { client, config };
        super::schema::initialize_schema(&storage.client).await?;

        Ok(storage)
    }

    /// Get the underlying client for advanced operations
    pub fn client(&self) -> &Surreal<C> {
        &self.client
    }
}

/// Render a `LIMIT` clause; SurrealDB does not accept a bound parameter here
pub(crate) fn limit_clause(limit: Option<usize>) -> String {
    limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default()
}

#[async_trait]
impl<C> BaseStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn health_check(&self) -> Result<bool, StorageError> {
        let _result = self
            .client
            .query("INFO FOR DB")
            .await
            .map_err(|e| StorageError::Connection(format!("Health check failed: {}", e)))?;

        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        for table in TABLES {
            self.client
                .query(format!("DELETE FROM {}", table))
                .await
                .map_err(|e| StorageError::Query(format!("Failed to clear {}: {}", table, e)))?;
        }

        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        Ok(serde_json::json!({
            "type": "shared_storage",
            "namespace": self.config.namespace,
            "database": self.config.database,
            "tables": TABLES,
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        // SurrealDB connections are closed when dropped
        Ok(())
    }
}
