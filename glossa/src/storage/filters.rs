//! Filter types for storage queries

use serde::{Deserialize, Serialize};

use crate::models::{Decision, EntryStatus};

/// Filter for dictionary entry queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryFilter {
    /// Filter by entry IDs
    pub ids: Option<Vec<String>>,

    /// Case-insensitive substring of the headword
    pub text: Option<String>,

    /// Category id. When both `text` and `category_id` are set, an entry
    /// matches if either one does.
    pub category_id: Option<String>,

    /// Filter by language
    pub language: Option<String>,

    /// Filter by status
    pub status: Option<EntryStatus>,

    /// Entries to leave out of the result
    pub exclude_ids: Option<Vec<String>>,
}

impl EntryFilter {
    /// Whether an entry satisfies this filter
    pub fn matches(&self, entry: &crate::models::DictionaryEntry) -> bool {
        if let Some(ids) = &self.ids
            && !ids.contains(&entry.id)
        {
            return false;
        }
        if let Some(excluded) = &self.exclude_ids
            && excluded.contains(&entry.id)
        {
            return false;
        }
        if let Some(language) = &self.language
            && &entry.language != language
        {
            return false;
        }
        if let Some(status) = self.status
            && entry.status != status
        {
            return false;
        }

        let text_hit = self
            .text
            .as_ref()
            .map(|t| entry.word.to_lowercase().contains(&t.to_lowercase()));
        let category_hit = self
            .category_id
            .as_ref()
            .map(|c| entry.category_id.as_ref() == Some(c));

        match (text_hit, category_hit) {
            (None, None) => true,
            (Some(t), None) => t,
            (None, Some(c)) => c,
            (Some(t), Some(c)) => t || c,
        }
    }
}

/// Filter for translation queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TranslationFilter {
    pub source_entry_id: Option<String>,
    pub target_entry_id: Option<String>,
    pub translation_group_id: Option<String>,
    pub target_language: Option<String>,
}

impl TranslationFilter {
    pub fn matches(&self, translation: &crate::models::Translation) -> bool {
        let eq = |want: &Option<String>, have: Option<&String>| match want {
            Some(w) => have == Some(w),
            None => true,
        };
        eq(&self.source_entry_id, Some(&translation.source_entry_id))
            && eq(&self.target_entry_id, translation.target_entry_id.as_ref())
            && eq(
                &self.translation_group_id,
                translation.translation_group_id.as_ref(),
            )
            && eq(&self.target_language, Some(&translation.target_language))
    }
}

/// Filter for case memory queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CaseFilter {
    /// Inclusive lower bound on the recorded similarity score
    pub min_score: Option<f64>,

    /// Inclusive upper bound on the recorded similarity score
    pub max_score: Option<f64>,

    /// Filter by the category-match feature
    pub category_match: Option<bool>,

    /// Filter by human decision
    pub decision: Option<Decision>,

    /// Filter by validating user
    pub validated_by: Option<String>,
}

impl CaseFilter {
    /// Cases whose score lies within `radius` of `score`
    pub fn score_window(score: f64, radius: f64) -> Self {
        Self {
            min_score: Some(score - radius),
            max_score: Some(score + radius),
            ..Default::default()
        }
    }

    pub fn with_category_match(mut self, category_match: bool) -> Self {
        self.category_match = Some(category_match);
        self
    }

    pub fn matches(&self, case: &crate::models::CaseRecord) -> bool {
        self.min_score.is_none_or(|min| case.similarity_score >= min)
            && self.max_score.is_none_or(|max| case.similarity_score <= max)
            && self
                .category_match
                .is_none_or(|cm| case.context.category_match == cm)
            && self.decision.is_none_or(|d| case.human_decision == d)
            && self
                .validated_by
                .as_ref()
                .is_none_or(|u| &case.validated_by == u)
    }
}
