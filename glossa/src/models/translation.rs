//! Translation, vote and concept group models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entry::KeywordSet;

/// How a translation's classification was reached
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ValidationType {
    /// Decided by the engine without human input
    Auto,
    /// Decided or confirmed by a human
    #[default]
    Manual,
    /// Reclassified from learned case history
    Learned,
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationType::Auto => write!(f, "auto"),
            ValidationType::Manual => write!(f, "manual"),
            ValidationType::Learned => write!(f, "learned"),
        }
    }
}

/// Directed translation edge from a source entry to a target-language word
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Translation {
    pub id: String,
    pub source_entry_id: String,
    pub target_language: String,

    /// Proposed target-language word
    pub text: String,

    /// Existing target entry this translation was merged with
    pub target_entry_id: Option<String>,

    /// Concept group shared with other translations of the same meaning
    pub translation_group_id: Option<String>,

    pub confidence: f64,

    /// Net vote tally
    pub vote_count: i64,

    pub validation_type: ValidationType,

    pub submitted_by: String,

    /// Free-form context supplied with the proposal
    pub context: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Translation {
    /// Create an unlinked translation
    pub fn new(
        source_entry_id: impl Into<String>,
        target_language: impl Into<String>,
        text: impl Into<String>,
        submitted_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_entry_id: source_entry_id.into(),
            target_language: target_language.into(),
            text: text.into(),
            target_entry_id: None,
            translation_group_id: None,
            confidence: 0.0,
            vote_count: 0,
            validation_type: ValidationType::Manual,
            submitted_by: submitted_by.into(),
            context: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.target_entry_id.is_some()
    }
}

/// A single +1/-1 vote on a translation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub translation_id: String,
    pub user_id: String,
    pub value: i8,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(translation_id: impl Into<String>, user_id: impl Into<String>, value: i8) -> Self {
        Self {
            translation_id: translation_id.into(),
            user_id: user_id.into(),
            value,
            created_at: Utc::now(),
        }
    }
}

/// Cluster of translations judged to share one meaning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConceptGroup {
    pub id: String,

    /// Union of the member entries' keywords
    pub keywords: KeywordSet,

    pub member_count: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConceptGroup {
    pub fn new(keywords: KeywordSet) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            keywords,
            member_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
