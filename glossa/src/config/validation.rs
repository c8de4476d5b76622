//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

fn check_unit(name: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{} must be within [0, 1], got {}", name, value)));
    }
    Ok(())
}

/// Validate the entire configuration.
pub fn validate_config(config: &GlossaConfig) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    config.lexicon.validate().map_err(invalid)?;
    validate_scoring_config(&config.scoring)?;
    validate_prediction_config(&config.prediction)?;
    validate_calibration_config(&config.calibration)?;

    if config.patterns.min_count == 0 {
        return Err(invalid("patterns.min_count must be greater than 0"));
    }
    if config.orchestration.max_candidates == 0 {
        return Err(invalid("orchestration.max_candidates must be greater than 0"));
    }
    check_unit(
        "orchestration.min_candidate_score",
        config.orchestration.min_candidate_score,
    )?;

    Ok(())
}

/// Validate storage configuration.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.data_dir.as_os_str().is_empty() {
        return Err(invalid("Data directory cannot be empty"));
    }

    if config.engine != StorageEngine::Memory {
        if config.surrealdb.namespace.is_empty() {
            return Err(invalid("SurrealDB namespace cannot be empty"));
        }
        if config.surrealdb.database.is_empty() {
            return Err(invalid("SurrealDB database cannot be empty"));
        }
    }

    if config.engine == StorageEngine::RocksDb && config.path.as_os_str().is_empty() {
        return Err(invalid("Storage path cannot be empty"));
    }

    Ok(())
}

/// Validate scoring weights.
fn validate_scoring_config(config: &ScoringConfig) -> Result<(), ConfigError> {
    check_unit("scoring.category_weight", config.category_weight)?;
    check_unit("scoring.semantic_weight", config.semantic_weight)?;
    check_unit("scoring.long_keyword_bonus", config.long_keyword_bonus)?;

    if config.category_weight + config.semantic_weight <= 0.0 {
        return Err(invalid("At least one scoring weight must be positive"));
    }
    if config.long_keyword_chars == 0 {
        return Err(invalid("scoring.long_keyword_chars must be greater than 0"));
    }

    Ok(())
}

/// Validate predictor settings.
fn validate_prediction_config(config: &PredictionConfig) -> Result<(), ConfigError> {
    check_unit("prediction.score_window", config.score_window)?;
    check_unit("prediction.majority_ratio", config.majority_ratio)?;
    check_unit(
        "prediction.fallback_merge_confidence",
        config.fallback_merge_confidence,
    )?;
    check_unit(
        "prediction.fallback_uncertain_confidence",
        config.fallback_uncertain_confidence,
    )?;
    check_unit(
        "prediction.fallback_separate_confidence",
        config.fallback_separate_confidence,
    )?;

    if config.max_cases == 0 {
        return Err(invalid("prediction.max_cases must be greater than 0"));
    }
    if config.majority_ratio < 0.5 {
        return Err(invalid("prediction.majority_ratio must be at least 0.5"));
    }

    Ok(())
}

/// Validate calibration settings.
fn validate_calibration_config(config: &CalibrationConfig) -> Result<(), ConfigError> {
    check_unit("calibration.merge_percentile", config.merge_percentile)?;
    check_unit("calibration.separate_percentile", config.separate_percentile)?;

    if config.min_cases == 0 {
        return Err(invalid("calibration.min_cases must be greater than 0"));
    }
    if config.interval_secs == 0 {
        return Err(invalid("calibration.interval_secs must be greater than 0"));
    }

    Ok(())
}
