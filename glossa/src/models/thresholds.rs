//! Decision thresholds and their versioned snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::case::Decision;

/// Score cut-points for automatic decisions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    /// Scores above this merge automatically (range 0.8 - 0.95)
    pub auto_merge_threshold: f64,

    /// Scores above this (and not above auto-merge) go to a human (range 0.5 - 0.8)
    pub ask_user_threshold: f64,

    /// Scores at or below this are confidently distinct (range 0.1 - 0.5)
    pub auto_separate_threshold: f64,
}

impl ThresholdConfig {
    /// Static defaults used until a calibrated snapshot is applied
    pub const STATIC_DEFAULTS: ThresholdConfig = ThresholdConfig {
        auto_merge_threshold: 0.9,
        ask_user_threshold: 0.6,
        auto_separate_threshold: 0.4,
    };

    pub const AUTO_MERGE_RANGE: (f64, f64) = (0.8, 0.95);
    pub const ASK_USER_RANGE: (f64, f64) = (0.5, 0.8);
    pub const AUTO_SEPARATE_RANGE: (f64, f64) = (0.1, 0.5);

    /// Map a score onto a decision band.
    ///
    /// `> auto_merge` merges, `> ask_user` is uncertain, everything else separates.
    pub fn recommend(&self, score: f64) -> Decision {
        if score > self.auto_merge_threshold {
            Decision::Merge
        } else if score > self.ask_user_threshold {
            Decision::Uncertain
        } else {
            Decision::Separate
        }
    }

    /// Whether every threshold lies in its allowed range and the bands are ordered
    pub fn is_valid(&self) -> bool {
        let within = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        within(self.auto_merge_threshold, Self::AUTO_MERGE_RANGE)
            && within(self.ask_user_threshold, Self::ASK_USER_RANGE)
            && within(self.auto_separate_threshold, Self::AUTO_SEPARATE_RANGE)
            && self.auto_separate_threshold <= self.ask_user_threshold
            && self.ask_user_threshold <= self.auto_merge_threshold
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::STATIC_DEFAULTS
    }
}

/// Where a snapshot's thresholds came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdSource {
    StaticDefaults,
    Calibrated { case_count: usize },
    Manual,
}

/// Immutable, versioned threshold state handed to in-flight decisions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdSnapshot {
    pub version: u64,
    pub thresholds: ThresholdConfig,
    pub source: ThresholdSource,
    pub computed_at: DateTime<Utc>,
}

impl ThresholdSnapshot {
    /// The version-0 snapshot holding the static defaults
    pub fn initial() -> Self {
        Self {
            version: 0,
            thresholds: ThresholdConfig::STATIC_DEFAULTS,
            source: ThresholdSource::StaticDefaults,
            computed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_bands() {
        let t = ThresholdConfig::default();
        assert_eq!(t.recommend(0.95), Decision::Merge);
        assert_eq!(t.recommend(0.9), Decision::Uncertain);
        assert_eq!(t.recommend(0.61), Decision::Uncertain);
        assert_eq!(t.recommend(0.6), Decision::Separate);
        assert_eq!(t.recommend(0.0), Decision::Separate);
        assert!(t.is_valid());
    }

    #[test]
    fn test_validity_edges() {
        let t = ThresholdConfig {
            auto_merge_threshold: 0.8,
            ask_user_threshold: 0.8,
            auto_separate_threshold: 0.5,
        };
        assert!(t.is_valid());

        let out_of_range = ThresholdConfig {
            auto_merge_threshold: 0.99,
            ..ThresholdConfig::default()
        };
        assert!(!out_of_range.is_valid());
    }
}
