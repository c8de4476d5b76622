use serde::{Deserialize, Serialize};

use super::{Recommendation, jaccard};
use crate::config::ScoringConfig;
use crate::lexicon::KeywordExtractor;
use crate::models::{DictionaryEntry, KeywordSet, ThresholdConfig};

/// Outcome of comparing two entries. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Combined score in [0, 1]
    pub score: f64,

    /// Both entries carry the same non-null category
    pub category_match: bool,

    pub shared_keywords: KeywordSet,

    /// Keyword component: Jaccard plus the long-keyword bonus, clamped to [0, 1]
    pub semantic_score: f64,

    /// 1.0 on a category match, else 0.0
    pub category_score: f64,

    /// Static-band recommendation for `score`
    pub recommendation: Recommendation,
}

/// Scores entry pairs on category identity and keyword overlap
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    config: ScoringConfig,
    extractor: KeywordExtractor,
}

impl SimilarityScorer {
    pub fn new(config: ScoringConfig, extractor: KeywordExtractor) -> Self {
        Self { config, extractor }
    }

    pub fn extractor(&self) -> &KeywordExtractor {
        &self.extractor
    }

    /// Compare two entries, extracting their keywords first
    pub fn score(&self, a: &DictionaryEntry, b: &DictionaryEntry) -> SimilarityResult {
        let a_keywords = self.extractor.extract(a);
        let b_keywords = self.extractor.extract(b);
        self.score_keywords(&a_keywords, &b_keywords, a.shares_category_with(b))
    }

    /// Compare pre-extracted keyword sets
    pub fn score_keywords(
        &self,
        a: &KeywordSet,
        b: &KeywordSet,
        category_match: bool,
    ) -> SimilarityResult {
        let category_score = if category_match { 1.0 } else { 0.0 };

        let shared_keywords: KeywordSet = a.intersection(b).cloned().collect();
        let long_shared = shared_keywords
            .iter()
            .filter(|k| k.chars().count() > self.config.long_keyword_chars)
            .count();
        let semantic_score = (jaccard(a, b) + self.config.long_keyword_bonus * long_shared as f64)
            .clamp(0.0, 1.0);

        let score = (self.config.category_weight * category_score
            + self.config.semantic_weight * semantic_score)
            .clamp(0.0, 1.0);

        SimilarityResult {
            score,
            category_match,
            shared_keywords,
            semantic_score,
            category_score,
            recommendation: ThresholdConfig::STATIC_DEFAULTS.recommend(score),
        }
    }

    /// Map a score through arbitrary thresholds
    pub fn recommend_with(score: f64, thresholds: &ThresholdConfig) -> Recommendation {
        thresholds.recommend(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconProfile;
    use crate::models::Decision;

    fn scorer() -> SimilarityScorer {
        let extractor = KeywordExtractor::new(&LexiconProfile::default()).unwrap();
        SimilarityScorer::new(ScoringConfig::default(), extractor)
    }

    fn entry(word: &str, lang: &str, category: Option<&str>, keywords: &[&str]) -> DictionaryEntry {
        let entry = DictionaryEntry::new(word, lang).with_keywords(keywords.iter().copied());
        match category {
            Some(c) => entry.with_category(c),
            None => entry,
        }
    }

    #[test]
    fn test_same_category_no_shared_keywords() {
        let solaire = entry(
            "solaire",
            "fr",
            Some("physics"),
            &["solaire", "soleil", "énergie"],
        );
        let solar = entry("solar", "es", Some("physics"), &["solar", "sol", "energía"]);

        let result = scorer().score(&solaire, &solar);
        assert_eq!(result.semantic_score, 0.0);
        assert_eq!(result.category_score, 1.0);
        assert_eq!(result.score, 0.5);
        assert!(result.category_match);
        assert_eq!(result.recommendation, Decision::Separate);
    }

    #[test]
    fn test_high_overlap_with_and_without_bonus() {
        // 4 of 5 shared, none longer than 6 chars
        let a = entry("a", "en", Some("physics"), &["solar", "power", "panel", "light", "heat"]);
        let b = entry("b", "en", Some("physics"), &["solar", "power", "panel", "light"]);
        let result = scorer().score(&a, &b);
        assert!((result.score - 0.9).abs() < 1e-12);
        assert_eq!(result.recommendation, Decision::Uncertain);

        // One shared keyword is long enough for the bonus
        let long = ["solar", "power", "panels", "sunlight", "heat"];
        let a = entry("a", "en", Some("physics"), &long);
        let b = entry("b", "en", Some("physics"), &["solar", "power", "panels", "sunlight"]);
        let result = scorer().score(&a, &b);
        assert!((result.semantic_score - 0.9).abs() < 1e-12);
        assert!((result.score - 0.95).abs() < 1e-12);
        assert_eq!(result.recommendation, Decision::Merge);
    }

    #[test]
    fn test_null_category_never_matches() {
        let a = entry("a", "en", None, &["photosynthesis"]);
        let b = entry("b", "fr", None, &["photosynthesis"]);
        let result = scorer().score(&a, &b);
        assert!(!result.category_match);
        assert_eq!(result.category_score, 0.0);
    }

    #[test]
    fn test_category_mismatch_caps_score() {
        let long_words = [
            "photosynthesis",
            "chlorophyll",
            "wavelength",
            "absorption",
            "biochemistry",
        ];
        let a = entry("a", "en", Some("biology"), &long_words);
        let b = entry("b", "fr", Some("physics"), &long_words);

        let result = scorer().score(&a, &b);
        assert_eq!(result.semantic_score, 1.0);
        assert_eq!(result.score, 0.5);
        assert_ne!(result.recommendation, Decision::Merge);
    }

    #[test]
    fn test_score_always_in_unit_interval() {
        let pool = ["sol", "soleil", "énergie", "photovoltaïque", "lumière", "chaleur"];
        let scorer = scorer();

        for mask_a in 0u32..64 {
            for mask_b in 0u32..64 {
                let pick = |mask: u32| -> KeywordSet {
                    pool.iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, w)| w.to_string())
                        .collect()
                };
                for category_match in [true, false] {
                    let result =
                        scorer.score_keywords(&pick(mask_a), &pick(mask_b), category_match);
                    assert!((0.0..=1.0).contains(&result.score));
                    assert!((0.0..=1.0).contains(&result.semantic_score));
                    if !category_match {
                        assert_ne!(result.recommendation, Decision::Merge);
                    }
                }
            }
        }
    }

    #[test]
    fn test_recommend_with_custom_thresholds() {
        let strict = ThresholdConfig {
            auto_merge_threshold: 0.95,
            ask_user_threshold: 0.7,
            auto_separate_threshold: 0.3,
        };
        assert_eq!(SimilarityScorer::recommend_with(0.93, &strict), Decision::Uncertain);
        assert_eq!(SimilarityScorer::recommend_with(0.96, &strict), Decision::Merge);
        assert_eq!(SimilarityScorer::recommend_with(0.65, &strict), Decision::Separate);
        assert_eq!(
            SimilarityScorer::recommend_with(0.93, &ThresholdConfig::STATIC_DEFAULTS),
            Decision::Merge
        );
    }
}
