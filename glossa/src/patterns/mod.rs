//! Per-feature accuracy statistics over case memory.
//!
//! Every case falls into exactly one bucket on each of three axes (category,
//! shared-keyword overlap, similarity). A bucket's accuracy is the share of
//! its cases where the static thresholds agreed with the human decision.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::CaseRecord;

/// Feature bucket a case can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePattern {
    SameCategory,
    DifferentCategory,
    /// Three or more shared keywords
    HighKeywordOverlap,
    /// One or two shared keywords
    LowKeywordOverlap,
    NoKeywordOverlap,
    /// Score above 0.8
    HighSimilarity,
    /// Score in (0.5, 0.8]
    MediumSimilarity,
    /// Score at or below 0.5
    LowSimilarity,
}

impl FeaturePattern {
    pub const ALL: [FeaturePattern; 8] = [
        FeaturePattern::SameCategory,
        FeaturePattern::DifferentCategory,
        FeaturePattern::HighKeywordOverlap,
        FeaturePattern::LowKeywordOverlap,
        FeaturePattern::NoKeywordOverlap,
        FeaturePattern::HighSimilarity,
        FeaturePattern::MediumSimilarity,
        FeaturePattern::LowSimilarity,
    ];

    /// Stable snake_case name
    pub fn name(&self) -> &'static str {
        match self {
            FeaturePattern::SameCategory => "same_category",
            FeaturePattern::DifferentCategory => "different_category",
            FeaturePattern::HighKeywordOverlap => "high_keyword_overlap",
            FeaturePattern::LowKeywordOverlap => "low_keyword_overlap",
            FeaturePattern::NoKeywordOverlap => "no_keyword_overlap",
            FeaturePattern::HighSimilarity => "high_similarity",
            FeaturePattern::MediumSimilarity => "medium_similarity",
            FeaturePattern::LowSimilarity => "low_similarity",
        }
    }

    /// The three buckets (one per axis) a case belongs to
    pub fn buckets_for(case: &CaseRecord) -> [FeaturePattern; 3] {
        let category = if case.context.category_match {
            FeaturePattern::SameCategory
        } else {
            FeaturePattern::DifferentCategory
        };

        let overlap = match case.shared_keyword_count() {
            0 => FeaturePattern::NoKeywordOverlap,
            1 | 2 => FeaturePattern::LowKeywordOverlap,
            _ => FeaturePattern::HighKeywordOverlap,
        };

        let similarity = if case.similarity_score > 0.8 {
            FeaturePattern::HighSimilarity
        } else if case.similarity_score > 0.5 {
            FeaturePattern::MediumSimilarity
        } else {
            FeaturePattern::LowSimilarity
        };

        [category, overlap, similarity]
    }
}

impl fmt::Display for FeaturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accuracy of the static thresholds within one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStat {
    pub pattern: FeaturePattern,
    pub accuracy: f64,
    pub count: usize,
}

/// Aggregates case memory into bucket statistics
#[derive(Debug, Clone)]
pub struct PatternMiner {
    min_count: usize,
}

impl PatternMiner {
    pub fn new(min_count: usize) -> Self {
        Self { min_count }
    }

    /// Statistics for every non-empty bucket, regardless of size
    pub fn accuracy_by_feature(cases: &[CaseRecord]) -> BTreeMap<FeaturePattern, PatternStat> {
        let mut tallies: BTreeMap<FeaturePattern, (usize, usize)> = BTreeMap::new();
        for case in cases {
            for pattern in FeaturePattern::buckets_for(case) {
                let (count, correct) = tallies.entry(pattern).or_default();
                *count += 1;
                if case.was_correct_prediction {
                    *correct += 1;
                }
            }
        }

        tallies
            .into_iter()
            .map(|(pattern, (count, correct))| {
                let stat = PatternStat {
                    pattern,
                    accuracy: correct as f64 / count as f64,
                    count,
                };
                (pattern, stat)
            })
            .collect()
    }

    /// Buckets with at least `min_count` cases, most accurate first.
    ///
    /// Ties are broken by count (larger first), then name.
    pub fn mine(&self, cases: &[CaseRecord]) -> Vec<PatternStat> {
        let mut stats: Vec<PatternStat> = Self::accuracy_by_feature(cases)
            .into_values()
            .filter(|stat| stat.count >= self.min_count)
            .collect();

        stats.sort_by(|a, b| {
            b.accuracy
                .total_cmp(&a.accuracy)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.pattern.name().cmp(b.pattern.name()))
        });
        stats
    }
}
