//! Case memory records: one human-adjudicated decision per entry pair

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::entry::KeywordSet;
use super::thresholds::ThresholdConfig;
use super::translation::ValidationType;

/// Outcome for a pair of entries: same concept, distinct concept, or undecided.
///
/// Used both for scorer recommendations and for recorded human decisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Merge,
    Separate,
    Uncertain,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Merge => write!(f, "merge"),
            Decision::Separate => write!(f, "separate"),
            Decision::Uncertain => write!(f, "uncertain"),
        }
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(Decision::Merge),
            "separate" => Ok(Decision::Separate),
            "uncertain" => Ok(Decision::Uncertain),
            _ => Err(format!("Invalid decision: {}", s)),
        }
    }
}

/// How a (source, target) pair is keyed in case memory
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PairIdentity {
    /// (A, B) and (B, A) are different cases
    #[default]
    Ordered,
    /// Ids are sorted before keying, so (A, B) and (B, A) share one case
    Canonical,
}

/// Storage key for a pair under the given identity mode
pub fn pair_key(source_id: &str, target_id: &str, identity: PairIdentity) -> String {
    match identity {
        PairIdentity::Ordered => format!("{}::{}", source_id, target_id),
        PairIdentity::Canonical => {
            if source_id <= target_id {
                format!("{}::{}", source_id, target_id)
            } else {
                format!("{}::{}", target_id, source_id)
            }
        }
    }
}

/// Feature context captured at decision time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseContext {
    pub category_match: bool,
    pub source_keywords: KeywordSet,
    pub target_keywords: KeywordSet,
    pub shared_keywords: KeywordSet,
}

/// A recorded decision between two entries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseRecord {
    /// Pair key (see [`pair_key`])
    pub id: String,

    pub source_entry_id: String,
    pub target_entry_id: String,

    /// Similarity score at decision time
    pub similarity_score: f64,

    pub human_decision: Decision,

    /// User who made or triggered the decision
    pub validated_by: String,

    pub context: CaseContext,

    pub validation_type: ValidationType,

    /// Whether the static default thresholds would have made the same call
    pub was_correct_prediction: bool,

    pub reason: Option<String>,

    pub decided_at: DateTime<Utc>,
}

impl CaseRecord {
    /// Build a record for a pair, deriving `was_correct_prediction` from the
    /// static default thresholds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_entry_id: impl Into<String>,
        target_entry_id: impl Into<String>,
        similarity_score: f64,
        human_decision: Decision,
        validated_by: impl Into<String>,
        context: CaseContext,
        validation_type: ValidationType,
        identity: PairIdentity,
    ) -> Self {
        let source_entry_id = source_entry_id.into();
        let target_entry_id = target_entry_id.into();
        let static_call = ThresholdConfig::STATIC_DEFAULTS.recommend(similarity_score);

        Self {
            id: pair_key(&source_entry_id, &target_entry_id, identity),
            source_entry_id,
            target_entry_id,
            similarity_score,
            human_decision,
            validated_by: validated_by.into(),
            context,
            validation_type,
            was_correct_prediction: static_call == human_decision,
            reason: None,
            decided_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn shared_keyword_count(&self) -> usize {
        self.context.shared_keywords.len()
    }
}
