//! Case-based prediction.
//!
//! Looks up past human decisions on pairs that scored about the same as the
//! current one and turns their majority into a predicted action with a
//! confidence and an auditable rationale. Read-only over case memory.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::PredictionConfig;
use crate::models::{CaseRecord, Decision, DictionaryEntry};
use crate::similarity::SimilarityResult;
use crate::storage::errors::StorageError;
use crate::storage::filters::CaseFilter;
use crate::storage::traits::CaseStore;

/// Where a prediction's confidence came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// Majority of comparable past cases
    History,
    /// No comparable cases; static recommendation with a fixed confidence
    Fallback,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionSource::History => write!(f, "history"),
            PredictionSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Predicted action for an entry pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub action: Decision,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    /// Number of past cases consulted
    pub case_count: usize,
    pub source: PredictionSource,
}

/// Predicts decisions from comparable historical cases
#[derive(Debug, Clone)]
pub struct CaseBasedPredictor {
    config: PredictionConfig,
}

impl CaseBasedPredictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    /// Retrieve comparable cases, most recent first.
    ///
    /// Cases sharing the current category-match value come first; the
    /// remaining slots are filled with the others.
    pub async fn comparable_cases<S>(
        &self,
        store: &S,
        similarity: &SimilarityResult,
    ) -> Result<Vec<CaseRecord>, StorageError>
    where
        S: CaseStore + ?Sized,
    {
        let window = CaseFilter::score_window(similarity.score, self.config.score_window);

        let mut cases = store
            .query_cases(
                window.clone().with_category_match(similarity.category_match),
                Some(self.config.max_cases),
            )
            .await?;

        if cases.len() < self.config.max_cases {
            let remaining = self.config.max_cases - cases.len();
            let others = store
                .query_cases(
                    window.with_category_match(!similarity.category_match),
                    Some(remaining),
                )
                .await?;
            cases.extend(others);
        }

        Ok(cases)
    }

    /// Predict the action for `source` vs `target` given their similarity
    #[tracing::instrument(skip_all, fields(score = similarity.score))]
    pub async fn predict<S>(
        &self,
        store: &S,
        source: &DictionaryEntry,
        target: &DictionaryEntry,
        similarity: &SimilarityResult,
    ) -> Result<Prediction, StorageError>
    where
        S: CaseStore + ?Sized,
    {
        let cases = self.comparable_cases(store, similarity).await?;
        let prediction = self.predict_from_cases(source, target, similarity, &cases);
        debug!(
            action = %prediction.action,
            confidence = prediction.confidence,
            cases = prediction.case_count,
            source = %prediction.source,
            "Prediction computed"
        );
        Ok(prediction)
    }

    /// Aggregate already retrieved cases into a prediction
    pub fn predict_from_cases(
        &self,
        source: &DictionaryEntry,
        target: &DictionaryEntry,
        similarity: &SimilarityResult,
        cases: &[CaseRecord],
    ) -> Prediction {
        let mut reasoning = vec![format!(
            "'{}' ({}) vs '{}' ({}): score {:.2}",
            source.word, source.language, target.word, target.language, similarity.score
        )];

        if cases.is_empty() {
            let action = similarity.recommendation;
            let confidence = match action {
                Decision::Merge => self.config.fallback_merge_confidence,
                Decision::Uncertain => self.config.fallback_uncertain_confidence,
                Decision::Separate => self.config.fallback_separate_confidence,
            };
            reasoning.push(format!(
                "No prior cases within ±{:.2} of this score; using the static recommendation ({})",
                self.config.score_window, action
            ));
            return Prediction {
                action,
                confidence,
                reasoning,
                case_count: 0,
                source: PredictionSource::Fallback,
            };
        }

        let total = cases.len();
        let merges = count_decisions(cases.iter(), Decision::Merge);
        let separations = count_decisions(cases.iter(), Decision::Separate);
        let merge_ratio = merges as f64 / total as f64;
        let separate_ratio = separations as f64 / total as f64;

        reasoning.push(format!(
            "{} comparable cases: {} merged, {} separated, {} left uncertain",
            total,
            merges,
            separations,
            total - merges - separations
        ));

        let same_category: Vec<&CaseRecord> = cases
            .iter()
            .filter(|c| c.context.category_match == similarity.category_match)
            .collect();
        if !same_category.is_empty() {
            let merged = count_decisions(same_category.iter().copied(), Decision::Merge);
            reasoning.push(format!(
                "{:.0}% merged among {} cases where categories {}",
                100.0 * merged as f64 / same_category.len() as f64,
                same_category.len(),
                if similarity.category_match {
                    "matched"
                } else {
                    "differed"
                }
            ));
        }

        if !similarity.shared_keywords.is_empty() {
            let shared: Vec<&str> = similarity
                .shared_keywords
                .iter()
                .map(String::as_str)
                .collect();
            reasoning.push(format!(
                "{} shared keywords: {}",
                shared.len(),
                shared.join(", ")
            ));
        }

        let (action, confidence) = if merge_ratio > self.config.majority_ratio {
            (Decision::Merge, merge_ratio)
        } else if separate_ratio > self.config.majority_ratio {
            (Decision::Separate, separate_ratio)
        } else {
            (Decision::Uncertain, merge_ratio.max(separate_ratio))
        };

        Prediction {
            action,
            confidence,
            reasoning,
            case_count: total,
            source: PredictionSource::History,
        }
    }
}

fn count_decisions<'a>(cases: impl Iterator<Item = &'a CaseRecord>, decision: Decision) -> usize {
    cases.filter(|c| c.human_decision == decision).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseContext, KeywordSet, PairIdentity, ValidationType};
    use crate::storage::MemoryStore;

    fn similarity(score: f64, category_match: bool) -> SimilarityResult {
        SimilarityResult {
            score,
            category_match,
            shared_keywords: KeywordSet::new(),
            semantic_score: score,
            category_score: if category_match { 1.0 } else { 0.0 },
            recommendation: crate::models::ThresholdConfig::STATIC_DEFAULTS.recommend(score),
        }
    }

    fn case(i: usize, score: f64, decision: Decision, category_match: bool) -> CaseRecord {
        CaseRecord::new(
            format!("s{}", i),
            format!("t{}", i),
            score,
            decision,
            "reviewer",
            CaseContext {
                category_match,
                ..Default::default()
            },
            ValidationType::Manual,
            PairIdentity::Ordered,
        )
    }

    fn entries() -> (DictionaryEntry, DictionaryEntry) {
        (
            DictionaryEntry::new("solaire", "fr"),
            DictionaryEntry::new("solar", "es"),
        )
    }

    #[tokio::test]
    async fn test_fallback_without_history() {
        let store = MemoryStore::new();
        let predictor = CaseBasedPredictor::new(PredictionConfig::default());
        let (a, b) = entries();

        let prediction = predictor
            .predict(&store, &a, &b, &similarity(0.5, true))
            .await
            .unwrap();
        assert_eq!(prediction.action, Decision::Separate);
        assert_eq!(prediction.confidence, 0.8);
        assert_eq!(prediction.source, PredictionSource::Fallback);
        assert!(prediction.reasoning.iter().any(|r| r.contains("No prior cases")));

        let merge = predictor
            .predict(&store, &a, &b, &similarity(0.95, true))
            .await
            .unwrap();
        assert_eq!(merge.action, Decision::Merge);
        assert_eq!(merge.confidence, 0.9);

        let uncertain = predictor
            .predict(&store, &a, &b, &similarity(0.7, true))
            .await
            .unwrap();
        assert_eq!(uncertain.action, Decision::Uncertain);
        assert_eq!(uncertain.confidence, 0.6);
    }

    #[tokio::test]
    async fn test_majority_of_history() {
        let store = MemoryStore::new();
        for i in 0..8 {
            store
                .upsert_case(case(i, 0.72, Decision::Merge, true))
                .await
                .unwrap();
        }
        for i in 8..10 {
            store
                .upsert_case(case(i, 0.68, Decision::Separate, true))
                .await
                .unwrap();
        }
        // Outside the window
        store
            .upsert_case(case(99, 0.2, Decision::Separate, true))
            .await
            .unwrap();

        let predictor = CaseBasedPredictor::new(PredictionConfig::default());
        let (a, b) = entries();
        let prediction = predictor
            .predict(&store, &a, &b, &similarity(0.7, true))
            .await
            .unwrap();

        assert_eq!(prediction.source, PredictionSource::History);
        assert_eq!(prediction.case_count, 10);
        assert_eq!(prediction.action, Decision::Merge);
        assert!((prediction.confidence - 0.8).abs() < 1e-12);
        assert!(prediction.reasoning.iter().any(|r| r.contains("8 merged")));
    }

    #[test]
    fn test_no_majority_is_uncertain() {
        let predictor = CaseBasedPredictor::new(PredictionConfig::default());
        let (a, b) = entries();
        let cases: Vec<CaseRecord> = (0..10)
            .map(|i| {
                let decision = if i < 6 { Decision::Merge } else { Decision::Separate };
                case(i, 0.7, decision, true)
            })
            .collect();

        let prediction = predictor.predict_from_cases(&a, &b, &similarity(0.7, true), &cases);
        assert_eq!(prediction.action, Decision::Uncertain);
        assert!((prediction.confidence - 0.6).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_prefers_matching_category() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store
                .upsert_case(case(i, 0.5, Decision::Merge, true))
                .await
                .unwrap();
        }
        for i in 3..6 {
            store
                .upsert_case(case(i, 0.5, Decision::Separate, false))
                .await
                .unwrap();
        }

        let predictor = CaseBasedPredictor::new(PredictionConfig {
            max_cases: 4,
            ..Default::default()
        });
        let cases = predictor
            .comparable_cases(&store, &similarity(0.5, true))
            .await
            .unwrap();

        assert_eq!(cases.len(), 4);
        assert!(cases[..3].iter().all(|c| c.context.category_match));
        assert!(!cases[3].context.category_match);
    }
}
