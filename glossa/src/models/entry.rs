//! Dictionary entry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Normalized keyword set of an entry.
///
/// Ordered so reasoning strings, JSON output and storage round-trips are stable.
pub type KeywordSet = BTreeSet<String>;

/// One sense of a dictionary entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Meaning {
    /// Definition text
    pub definition: String,

    /// Usage examples
    #[serde(default)]
    pub examples: Vec<String>,

    /// Synonyms in the entry's own language
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Meaning {
    /// Create a meaning with only a definition
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            examples: Vec::new(),
            synonyms: Vec::new(),
        }
    }

    /// Add a usage example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    /// Add a synonym
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.push(synonym.into());
        self
    }
}

/// Publication status of an entry
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Draft => write!(f, "draft"),
            EntryStatus::Published => write!(f, "published"),
            EntryStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(EntryStatus::Draft),
            "published" => Ok(EntryStatus::Published),
            "archived" => Ok(EntryStatus::Archived),
            _ => Err(format!("Invalid entry status: {}", s)),
        }
    }
}

/// A dictionary entry in one language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DictionaryEntry {
    /// Unique identifier
    pub id: String,

    /// Headword
    pub word: String,

    /// Language code (e.g. "fr", "es")
    pub language: String,

    /// Subject category; `None` never matches another entry's category
    pub category_id: Option<String>,

    /// Senses of the word
    #[serde(default)]
    pub meanings: Vec<Meaning>,

    /// Cached keyword set, returned as-is by the extractor when present
    pub keywords: Option<KeywordSet>,

    /// Etymology note
    pub etymology: Option<String>,

    #[serde(default)]
    pub status: EntryStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DictionaryEntry {
    /// Create a published entry with a generated id
    pub fn new(word: impl Into<String>, language: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            word: word.into(),
            language: language.into(),
            category_id: None,
            meanings: Vec::new(),
            keywords: None,
            etymology: None,
            status: EntryStatus::Published,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_meaning(mut self, meaning: Meaning) -> Self {
        self.meanings.push(meaning);
        self
    }

    pub fn with_etymology(mut self, etymology: impl Into<String>) -> Self {
        self.etymology = Some(etymology.into());
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    /// Set a cached keyword set
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Whether both entries carry the same non-null category
    pub fn shares_category_with(&self, other: &DictionaryEntry) -> bool {
        matches!(
            (&self.category_id, &other.category_id),
            (Some(a), Some(b)) if a == b
        )
    }
}
