use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CalibrationConfig;
use crate::models::{CaseRecord, Decision, ThresholdConfig, ThresholdSource};
use crate::storage::errors::StorageError;
use crate::storage::filters::CaseFilter;
use crate::storage::traits::CaseStore;

/// Recomputed thresholds and the evidence behind them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub thresholds: ThresholdConfig,
    pub source: ThresholdSource,
    pub case_count: usize,
    pub merge_count: usize,
    pub separate_count: usize,
}

/// Percentile-based threshold calibration
#[derive(Debug, Clone)]
pub struct ThresholdCalibrator {
    config: CalibrationConfig,
}

impl ThresholdCalibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Recalibrate from every recorded case.
    ///
    /// The result is not applied; callers decide whether to hand it to a
    /// [`super::ThresholdStore`].
    pub async fn recalibrate<S>(&self, store: &S) -> Result<CalibrationResult, StorageError>
    where
        S: CaseStore + ?Sized,
    {
        let cases = store.query_cases(CaseFilter::default(), None).await?;
        let result = self.calibrate(&cases);
        info!(
            cases = result.case_count,
            auto_merge = result.thresholds.auto_merge_threshold,
            ask_user = result.thresholds.ask_user_threshold,
            auto_separate = result.thresholds.auto_separate_threshold,
            "Thresholds recalibrated"
        );
        Ok(result)
    }

    /// Compute thresholds from a set of cases
    pub fn calibrate(&self, cases: &[CaseRecord]) -> CalibrationResult {
        let defaults = ThresholdConfig::STATIC_DEFAULTS;

        let mut merge_scores: Vec<f64> = scores_for(cases, Decision::Merge);
        let mut separate_scores: Vec<f64> = scores_for(cases, Decision::Separate);
        let merge_count = merge_scores.len();
        let separate_count = separate_scores.len();

        if cases.len() < self.config.min_cases {
            debug!(
                cases = cases.len(),
                required = self.config.min_cases,
                "Not enough cases to calibrate; using static defaults"
            );
            return CalibrationResult {
                thresholds: defaults,
                source: ThresholdSource::StaticDefaults,
                case_count: cases.len(),
                merge_count,
                separate_count,
            };
        }

        // Scores near the low end of the merges
        merge_scores.sort_by(|a, b| b.total_cmp(a));
        let auto_merge = percentile(&merge_scores, self.config.merge_percentile)
            .map(|s| clamp_to(s, ThresholdConfig::AUTO_MERGE_RANGE))
            .unwrap_or(defaults.auto_merge_threshold);

        // Scores near the high end of the separations
        separate_scores.sort_by(|a, b| a.total_cmp(b));
        let auto_separate = percentile(&separate_scores, self.config.separate_percentile)
            .map(|s| clamp_to(s, ThresholdConfig::AUTO_SEPARATE_RANGE))
            .unwrap_or(defaults.auto_separate_threshold);

        let ask_user = clamp_to(
            (auto_merge + auto_separate) / 2.0,
            ThresholdConfig::ASK_USER_RANGE,
        );

        CalibrationResult {
            thresholds: ThresholdConfig {
                auto_merge_threshold: auto_merge,
                ask_user_threshold: ask_user,
                auto_separate_threshold: auto_separate,
            },
            source: ThresholdSource::Calibrated {
                case_count: cases.len(),
            },
            case_count: cases.len(),
            merge_count,
            separate_count,
        }
    }
}

fn scores_for(cases: &[CaseRecord], decision: Decision) -> Vec<f64> {
    cases
        .iter()
        .filter(|c| c.human_decision == decision)
        .map(|c| c.similarity_score)
        .collect()
}

/// Element at index `floor(fraction * n)` of an already sorted slice
fn percentile(sorted: &[f64], fraction: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let index = ((fraction * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    sorted.get(index).copied()
}

fn clamp_to(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.clamp(lo, hi)
}
