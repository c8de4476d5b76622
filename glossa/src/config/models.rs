//! Configuration model definitions.
//!
//! This module contains the configuration structures for all Glossa components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub use crate::lexicon::LexiconProfile;
pub use crate::models::PairIdentity;
pub use crate::storage::config::{StorageEngine, SurrealDBConfig};

/// Main configuration structure for Glossa.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlossaConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Stop words and suffix patterns for keyword extraction
    pub lexicon: LexiconProfile,

    /// Similarity scoring weights
    pub scoring: ScoringConfig,

    /// Case-based prediction settings
    pub prediction: PredictionConfig,

    /// Threshold recalibration settings
    pub calibration: CalibrationConfig,

    /// Pattern mining settings
    pub patterns: PatternConfig,

    /// Candidate search settings
    pub orchestration: OrchestrationConfig,

    /// Decision policy
    pub decision: DecisionConfig,

    /// Case memory keying
    pub case_memory: CaseMemoryConfig,
}

/// Configuration for storage components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for storage
    pub data_dir: PathBuf,

    /// Backend to use
    pub engine: StorageEngine,

    /// Path to the RocksDB files (relative to data_dir)
    pub path: PathBuf,

    /// SurrealDB-specific configuration
    pub surrealdb: SurrealDBConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = directories::ProjectDirs::from("org", "glossa", "glossa")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./data"));

        Self {
            data_dir,
            engine: StorageEngine::RocksDb,
            path: PathBuf::from("lexicon"),
            surrealdb: SurrealDBConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Full path of the on-disk database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.path)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,

    /// Log format
    pub format: LogFormat,

    /// File to log to (if any)
    pub file: Option<PathBuf>,

    /// Whether to log to stdout
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Default,
            file: None,
            stdout: true,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default format
    Default,

    /// JSON format
    Json,

    /// Compact format
    Compact,

    /// Pretty format
    Pretty,
}

/// Weights of the similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the category match component
    pub category_weight: f64,

    /// Weight of the keyword component
    pub semantic_weight: f64,

    /// Added to the keyword component per shared long keyword
    pub long_keyword_bonus: f64,

    /// A shared keyword earns the bonus when it is longer than this
    pub long_keyword_chars: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            category_weight: 0.5,
            semantic_weight: 0.5,
            long_keyword_bonus: 0.1,
            long_keyword_chars: 6,
        }
    }
}

/// Case-based predictor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictionConfig {
    /// Cases within this distance of the current score are comparable
    pub score_window: f64,

    /// Maximum number of cases consulted
    pub max_cases: usize,

    /// Share of one decision needed to predict it
    pub majority_ratio: f64,

    /// Confidence reported for a merge when there is no history
    pub fallback_merge_confidence: f64,

    /// Confidence reported for an uncertain call when there is no history
    pub fallback_uncertain_confidence: f64,

    /// Confidence reported for a separation when there is no history
    pub fallback_separate_confidence: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            score_window: 0.1,
            max_cases: 50,
            majority_ratio: 0.7,
            fallback_merge_confidence: 0.9,
            fallback_uncertain_confidence: 0.6,
            fallback_separate_confidence: 0.8,
        }
    }
}

/// Threshold recalibration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Fewer recorded cases than this yields the static defaults
    pub min_cases: usize,

    /// Percentile of merge scores (taken from the top) used for auto-merge
    pub merge_percentile: f64,

    /// Percentile of separate scores (taken from the bottom) used for auto-separate
    pub separate_percentile: f64,

    /// Apply the result of scheduled recalibration automatically
    pub auto_apply: bool,

    /// Interval of the scheduled recalibration task, in seconds
    pub interval_secs: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_cases: 10,
            merge_percentile: 0.1,
            separate_percentile: 0.9,
            auto_apply: false,
            interval_secs: 3600,
        }
    }
}

/// Pattern mining settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatternConfig {
    /// Buckets with fewer cases are not reported
    pub min_count: usize,

    /// Number of patterns included in learning insights
    pub top_patterns: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_count: 5,
            top_patterns: 5,
        }
    }
}

/// Candidate search settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Maximum number of candidate entries scored per proposal
    pub max_candidates: usize,

    /// A best score at or below this means there is no candidate
    pub min_candidate_score: f64,

    /// Default sample size for learning insights
    pub insight_sample_size: usize,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_candidates: 20,
            min_candidate_score: 0.3,
            insight_sample_size: 100,
        }
    }
}

/// Decision policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DecisionConfig {
    /// Band proposals with the active calibrated thresholds instead of the
    /// static defaults
    pub use_calibrated_thresholds: bool,
}

/// Case memory settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CaseMemoryConfig {
    /// Whether (A, B) and (B, A) are the same case
    pub pair_identity: PairIdentity,
}
