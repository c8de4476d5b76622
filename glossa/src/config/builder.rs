//! Configuration builder.
//!
//! This module provides a builder pattern API for creating configurations.

use super::{Result, models::*, validation};
use std::path::{Path, PathBuf};

/// Builder for creating GlossaConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: GlossaConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: GlossaConfig::default(),
        }
    }

    /// Set the base data directory.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.storage.data_dir = path.as_ref().to_path_buf();
        self
    }

    /// Select the storage backend
    pub fn with_storage_engine(mut self, engine: StorageEngine) -> Self {
        self.config.storage.engine = engine;
        self
    }

    /// Use persistent RocksDB storage under the data directory
    pub fn with_default_storage(mut self) -> Self {
        self.config.storage.engine = StorageEngine::RocksDb;
        self.config.storage.path = PathBuf::from("lexicon");
        self.config.storage.surrealdb = SurrealDBConfig::default();
        self
    }

    /// Use the in-process map store (good for testing)
    pub fn with_memory_storage(mut self) -> Self {
        self.config.storage.engine = StorageEngine::Memory;
        self
    }

    /// Use SurrealDB with its in-memory engine
    pub fn with_surreal_memory_storage(mut self) -> Self {
        self.config.storage.engine = StorageEngine::SurrealMemory;
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use default logging configuration (JSON console output at Info level)
    pub fn with_default_logging(mut self) -> Self {
        self.config.logging.level = LogLevel::Info;
        self.config.logging.format = LogFormat::Json;
        self.config.logging.file = None;
        self
    }

    /// Replace the lexicon profile used for keyword extraction
    pub fn with_lexicon_profile(mut self, profile: LexiconProfile) -> Self {
        self.config.lexicon = profile;
        self
    }

    /// Replace the scoring weights
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Replace the predictor settings
    pub fn with_prediction(mut self, prediction: PredictionConfig) -> Self {
        self.config.prediction = prediction;
        self
    }

    /// Set how case memory keys entry pairs
    pub fn with_pair_identity(mut self, identity: PairIdentity) -> Self {
        self.config.case_memory.pair_identity = identity;
        self
    }

    /// Band proposals with the active calibrated thresholds
    pub fn with_calibrated_thresholds(mut self, enabled: bool) -> Self {
        self.config.decision.use_calibrated_thresholds = enabled;
        self
    }

    /// Apply scheduled recalibration results automatically
    pub fn with_auto_apply(mut self, enabled: bool) -> Self {
        self.config.calibration.auto_apply = enabled;
        self
    }

    /// Create a configuration for development with an in-memory database.
    ///
    /// - SurrealDB in-memory storage, nothing persisted
    /// - Debug-level logging
    pub fn development() -> Self {
        Self::new()
            .with_surreal_memory_storage()
            .with_log_level(LogLevel::Debug)
    }

    /// Create a configuration for testing.
    ///
    /// - In-process map storage
    /// - Test-specific data directory
    /// - Warn-level logging
    pub fn testing() -> Self {
        Self::new()
            .with_memory_storage()
            .with_data_dir(PathBuf::from("./test_data"))
            .with_log_level(LogLevel::Warn)
    }

    /// Create a production-ready configuration with persistent storage.
    pub fn production() -> Self {
        Self::new().with_default_storage().with_default_logging()
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<GlossaConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
