//! Storage abstractions and implementations
//!
//! The merge engine reads entries and writes translations, concept groups
//! and case records through the traits in [`traits`]. Two backends implement
//! them:
//!
//! - **MemoryStore**: lock-guarded maps for tests and ephemeral use
//! - **SharedStorage**: embedded SurrealDB, in memory or on RocksDB

pub mod config;
pub mod errors;
pub mod filters;
pub mod memory;
#[cfg(feature = "surrealdb-embedded")]
pub mod shared_storage;
pub mod traits;

pub use config::StorageEngine;
pub use errors::StorageError;
pub use memory::MemoryStore;

use crate::config::GlossaConfig;
use traits::LexiconStore;

/// Create the storage backend selected by `config.storage.engine`
///
/// # Arguments
/// * `config` - The Glossa configuration
///
/// # Returns
/// A boxed store implementing every collaborator trait
pub async fn create_storage_service(
    config: &GlossaConfig,
) -> Result<Box<dyn LexiconStore>, StorageError> {
    match config.storage.engine {
        StorageEngine::Memory => {
            tracing::info!("Creating in-process memory store");
            Ok(Box::new(MemoryStore::new()))
        }
        #[cfg(feature = "surrealdb-embedded")]
        StorageEngine::SurrealMemory => {
            let store =
                shared_storage::create_memory_shared_storage(&config.storage.surrealdb).await?;
            Ok(Box::new(store))
        }
        #[cfg(feature = "surrealdb-embedded")]
        StorageEngine::RocksDb => {
            let path = config.storage.database_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let path = path.to_string_lossy().to_string();
            let store =
                shared_storage::create_embedded_shared_storage(&path, &config.storage.surrealdb)
                    .await?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "surrealdb-embedded"))]
        engine => Err(StorageError::Configuration(format!(
            "Storage engine '{}' requires the 'surrealdb-embedded' feature",
            engine
        ))),
    }
}
