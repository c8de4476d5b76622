//! # Glossa
//!
//! Duplicate detection and merge decisions for a collaborative multilingual
//! dictionary. When a contributor proposes a translation, Glossa decides whether
//! it names the same concept as an existing entry in the target language (merge
//! into one concept group) or a distinct one (keep separate). It acts on its own
//! when confident, defers to a human otherwise, and learns from every human
//! decision.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glossa::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let engine = glossa::init(ConfigBuilder::testing().build()?).await?;
//!
//!     let outcome = engine
//!         .propose_translation("alice", "entry-fr-solaire", "es", "solar", None)
//!         .await?;
//!     println!("{}: {}", outcome.action, outcome.message);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **lexicon**: keyword extraction from entry meanings
//! - **similarity**: category + keyword Jaccard scoring
//! - **prediction**: case-based prediction from past human decisions
//! - **calibration**: percentile-based threshold recalibration
//! - **patterns**: per-feature accuracy statistics for diagnostics
//! - **engine**: the merge orchestrator tying everything together
//! - **storage**: collaborator traits plus in-memory and SurrealDB backends

pub mod calibration;
pub mod config;
pub mod engine;
pub mod lexicon;
pub mod logging;
pub mod models;
pub mod patterns;
pub mod prediction;
pub mod similarity;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::{init, init_with_defaults, init_with_store};

    pub use crate::config::{ConfigBuilder, GlossaConfig, LogLevel, StorageEngine};

    pub use crate::engine::{
        CandidateSuggestion, LearningInsights, MergeEngine, ProposalAction, ProposalOutcome,
        ValidationAction, ValidationOutcome, VoteOutcome,
    };

    pub use crate::models::{
        CaseContext, CaseRecord, Decision, DictionaryEntry, Meaning, ThresholdConfig,
        Translation, ValidationType,
    };

    pub use crate::similarity::{Recommendation, SimilarityResult, SimilarityScorer};

    pub use crate::storage::StorageError;

    pub use crate::{GlossaError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for Glossa operations
#[derive(Debug, thiserror::Error)]
pub enum GlossaError {
    /// A referenced record does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// Vote rejected (duplicate vote or a value other than +1/-1)
    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    /// Malformed request input
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Persistence failure from the storage layer
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// Other unclassified errors
    #[error("{0}")]
    Other(String),
}

impl GlossaError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        GlossaError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Only transient infrastructure failures qualify; domain errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            GlossaError::Storage(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<config::ConfigError> for GlossaError {
    fn from(err: config::ConfigError) -> Self {
        GlossaError::Configuration(err.to_string())
    }
}

/// Result type for Glossa operations
pub type Result<T> = std::result::Result<T, GlossaError>;

/// Initialize Glossa with default configuration
///
/// Loads configuration from the default file locations and `GLOSSA_`
/// environment variables, then opens the configured storage.
pub async fn init_with_defaults() -> Result<engine::MergeEngine> {
    let config = config::ConfigLoader::new()
        .load_default_files()
        .load_env()
        .extract()?;
    init(config).await
}

/// Initialize Glossa with the provided configuration
///
/// # Arguments
/// * `config` - The configuration for initializing Glossa
///
/// # Returns
/// A `MergeEngine` backed by the configured storage
pub async fn init(config: config::GlossaConfig) -> Result<engine::MergeEngine> {
    // Ignore errors if tracing is already initialized
    let _ = logging::init(&config.logging);

    let storage = storage::create_storage_service(&config).await?;
    init_with_store(config, std::sync::Arc::from(storage))
}

/// Initialize Glossa on top of an already constructed store
pub fn init_with_store(
    config: config::GlossaConfig,
    store: std::sync::Arc<dyn storage::traits::LexiconStore>,
) -> Result<engine::MergeEngine> {
    engine::MergeEngine::new(store, config)
}
