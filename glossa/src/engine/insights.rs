//! Calibration and learning diagnostics over case memory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use super::MergeEngine;
use crate::calibration::CalibrationResult;
use crate::models::{ThresholdConfig, ThresholdSnapshot, ThresholdSource};
use crate::patterns::{FeaturePattern, PatternMiner, PatternStat};
use crate::storage::filters::CaseFilter;
use crate::storage::traits::CaseStore;
use crate::{GlossaError, Result};

/// How well the static thresholds agree with recent human decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningInsights {
    /// Number of cases actually analysed
    pub sample_size: usize,

    /// Share of sampled cases the static thresholds got right
    pub overall_accuracy: f64,

    pub accuracy_by_feature: BTreeMap<FeaturePattern, PatternStat>,

    /// Thresholds calibrated from the sample
    pub recommended_thresholds: ThresholdConfig,

    pub recommended_source: ThresholdSource,

    /// Best-performing buckets with enough cases
    pub top_patterns: Vec<PatternStat>,
}

impl MergeEngine {
    /// Analyse the most recent `sample_size` cases (the configured default
    /// when `None`)
    #[tracing::instrument(skip(self))]
    pub async fn get_learning_insights(
        &self,
        sample_size: Option<usize>,
    ) -> Result<LearningInsights> {
        let limit = sample_size.unwrap_or(self.config.orchestration.insight_sample_size);
        let cases = self
            .store
            .query_cases(CaseFilter::default(), Some(limit))
            .await?;

        let correct = cases.iter().filter(|c| c.was_correct_prediction).count();
        let overall_accuracy = if cases.is_empty() {
            0.0
        } else {
            correct as f64 / cases.len() as f64
        };

        let calibration = self.calibrator.calibrate(&cases);
        let mut top_patterns = self.miner.mine(&cases);
        top_patterns.truncate(self.config.patterns.top_patterns);

        Ok(LearningInsights {
            sample_size: cases.len(),
            overall_accuracy,
            accuracy_by_feature: PatternMiner::accuracy_by_feature(&cases),
            recommended_thresholds: calibration.thresholds,
            recommended_source: calibration.source,
            top_patterns,
        })
    }

    /// Recompute thresholds from every recorded case without applying them
    pub async fn recalibrate_thresholds(&self) -> Result<CalibrationResult> {
        Ok(self.calibrator.recalibrate(self.store.as_ref()).await?)
    }

    /// Make `thresholds` the active snapshot
    pub fn apply_thresholds(&self, thresholds: ThresholdConfig) -> Result<Arc<ThresholdSnapshot>> {
        self.publish_thresholds(thresholds, ThresholdSource::Manual)
    }

    /// Make a calibration result the active snapshot
    pub fn apply_calibration(&self, result: &CalibrationResult) -> Result<Arc<ThresholdSnapshot>> {
        self.publish_thresholds(result.thresholds, result.source.clone())
    }

    fn publish_thresholds(
        &self,
        thresholds: ThresholdConfig,
        source: ThresholdSource,
    ) -> Result<Arc<ThresholdSnapshot>> {
        if !thresholds.is_valid() {
            return Err(GlossaError::Validation(format!(
                "Thresholds out of range or misordered: merge {}, ask {}, separate {}",
                thresholds.auto_merge_threshold,
                thresholds.ask_user_threshold,
                thresholds.auto_separate_threshold
            )));
        }

        let snapshot = self.threshold_store().apply(thresholds, source);
        info!(
            version = snapshot.version,
            auto_merge = thresholds.auto_merge_threshold,
            ask_user = thresholds.ask_user_threshold,
            auto_separate = thresholds.auto_separate_threshold,
            "Thresholds applied"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::models::{CaseContext, CaseRecord, Decision, PairIdentity, ValidationType};
    use crate::storage::MemoryStore;

    async fn engine_with_cases(cases: Vec<(f64, Decision)>) -> MergeEngine {
        let config = ConfigBuilder::testing().build().unwrap();
        let store = Arc::new(MemoryStore::new());
        for (i, (score, decision)) in cases.into_iter().enumerate() {
            let case = CaseRecord::new(
                format!("s{}", i),
                format!("t{}", i),
                score,
                decision,
                "reviewer",
                CaseContext {
                    category_match: true,
                    ..Default::default()
                },
                ValidationType::Manual,
                PairIdentity::Ordered,
            );
            store.upsert_case(case).await.unwrap();
        }
        MergeEngine::new(store, config).unwrap()
    }

    #[tokio::test]
    async fn test_insights_on_empty_memory() {
        let engine = engine_with_cases(Vec::new()).await;
        let insights = engine.get_learning_insights(None).await.unwrap();

        assert_eq!(insights.sample_size, 0);
        assert_eq!(insights.overall_accuracy, 0.0);
        assert!(insights.accuracy_by_feature.is_empty());
        assert!(insights.top_patterns.is_empty());
        assert_eq!(insights.recommended_thresholds, ThresholdConfig::STATIC_DEFAULTS);
        assert_eq!(insights.recommended_source, ThresholdSource::StaticDefaults);
    }

    #[tokio::test]
    async fn test_insights_accuracy() {
        let mut cases = vec![(0.95, Decision::Merge); 8];
        cases.push((0.2, Decision::Separate));
        cases.push((0.25, Decision::Merge));
        let engine = engine_with_cases(cases).await;

        let insights = engine.get_learning_insights(Some(100)).await.unwrap();
        assert_eq!(insights.sample_size, 10);
        assert!((insights.overall_accuracy - 0.9).abs() < 1e-12);

        let same = &insights.accuracy_by_feature[&FeaturePattern::SameCategory];
        assert_eq!(same.count, 10);
        assert_eq!(insights.top_patterns[0].pattern, FeaturePattern::HighSimilarity);
        assert!(matches!(
            insights.recommended_source,
            ThresholdSource::Calibrated { case_count: 10 }
        ));
    }

    #[tokio::test]
    async fn test_apply_rejects_invalid_thresholds() {
        let engine = engine_with_cases(Vec::new()).await;
        let bad = ThresholdConfig {
            auto_merge_threshold: 0.99,
            ..ThresholdConfig::STATIC_DEFAULTS
        };
        assert!(engine.apply_thresholds(bad).is_err());
        assert_eq!(engine.current_thresholds().version, 0);
    }

    #[tokio::test]
    async fn test_recalibrate_then_apply() {
        let mut cases = vec![(0.92, Decision::Merge); 8];
        cases.push((0.3, Decision::Separate));
        cases.push((0.2, Decision::Separate));
        let engine = engine_with_cases(cases).await;

        let result = engine.recalibrate_thresholds().await.unwrap();
        assert_eq!(result.case_count, 10);
        assert_eq!(result.thresholds.auto_merge_threshold, 0.92);

        let snapshot = engine.apply_calibration(&result).unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(engine.current_thresholds().thresholds, result.thresholds);
    }
}
