//! Configuration system for Glossa.
//!
//! Configuration is layered: built-in defaults, then the first configuration
//! file found, then `GLOSSA_` environment variables. Every section can be
//! omitted.

mod builder;
mod loader;
mod models;
pub mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "glossa.toml",
    "glossa.yaml",
    "glossa.yml",
    "glossa.json",
    ".glossa/config.toml",
    ".glossa/config.yaml",
    ".glossa/config.yml",
    ".glossa/config.json",
];

/// Environment variable prefix for Glossa configuration.
///
/// Nested keys are separated by a double underscore, e.g.
/// `GLOSSA_STORAGE__ENGINE=memory`.
pub const ENV_PREFIX: &str = "GLOSSA_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during environment loading
    #[error("Failed to load environment variables: {0}")]
    EnvLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),

    /// General error
    #[error("{0}")]
    Other(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
