//! SurrealDB-backed lexicon store
//!
//! Implements every storage trait on top of an embedded SurrealDB instance,
//! either in memory (`kv-mem`) or on disk (`kv-rocksdb`).

use surrealdb::Surreal;

use crate::storage::config::SurrealDBConfig;
use crate::storage::errors::StorageError;

pub mod base;
pub mod case;
pub mod config;
pub mod entry;
pub mod group;
pub mod schema;
pub mod translation;

pub use base::*;
pub use config::*;

/// Type alias for embedded shared storage
pub type EmbeddedSharedStorage = SharedStorage<surrealdb::engine::local::Db>;

/// Create an in-memory SurrealDB store
pub async fn create_memory_shared_storage(
    config: &SurrealDBConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    tracing::info!("Creating SharedStorage in-memory store");
    let client = Surreal::new::<surrealdb::engine::local::Mem>(())
        .await
        .map_err(|e| StorageError::Connection(format!("Failed to create memory client: {}", e)))?;

    SharedStorage::new(client, SharedStorageConfig::from(config)).await
}

/// Create an embedded RocksDB-backed store at `path`
pub async fn create_embedded_shared_storage(
    path: &str,
    config: &SurrealDBConfig,
) -> Result<EmbeddedSharedStorage, StorageError> {
    use surrealdb::engine::local::RocksDb;

    tracing::info!("Creating SharedStorage RocksDB store at {}", path);
    let client = Surreal::new::<RocksDb>(path).await.map_err(|e| {
        StorageError::Connection(format!("Failed to create embedded database: {}", e))
    })?;

    SharedStorage::new(client, SharedStorageConfig::from(config)).await
}
