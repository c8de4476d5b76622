//! Explicit human validation of translations.
//!
//! Every validation that resolves to an entry pair upserts the pair's case
//! record, so re-validating a pair overwrites the earlier decision.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use super::{MergeEngine, PendingGroup};
use crate::models::{
    CaseContext, CaseRecord, Decision, DictionaryEntry, EntryStatus, KeywordSet, Translation,
    ValidationType,
};
use crate::storage::filters::{EntryFilter, TranslationFilter};
use crate::storage::traits::{CaseStore, ConceptGroupStore, EntryStore, TranslationStore};
use crate::{GlossaError, Result};

/// Human decision on a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationAction {
    AcceptMerge,
    AcceptSeparate,
}

impl ValidationAction {
    fn decision(self) -> Decision {
        match self {
            ValidationAction::AcceptMerge => Decision::Merge,
            ValidationAction::AcceptSeparate => Decision::Separate,
        }
    }
}

impl fmt::Display for ValidationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationAction::AcceptMerge => write!(f, "accept_merge"),
            ValidationAction::AcceptSeparate => write!(f, "accept_separate"),
        }
    }
}

impl FromStr for ValidationAction {
    type Err = GlossaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "accept_merge" | "merge" => Ok(ValidationAction::AcceptMerge),
            "accept_separate" | "separate" => Ok(ValidationAction::AcceptSeparate),
            other => Err(GlossaError::Validation(format!(
                "Unknown validation action '{}'",
                other
            ))),
        }
    }
}

/// Result of [`MergeEngine::validate_translation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub success: bool,
    /// Number of translations changed
    pub affected_count: usize,
}

impl MergeEngine {
    /// Record a human merge/separate decision for a translation.
    ///
    /// `adjusted_confidence` defaults to 1.0 for merges and leaves the
    /// confidence untouched for separations.
    #[tracing::instrument(skip(self, reason))]
    pub async fn validate_translation(
        &self,
        validator: &str,
        translation_id: &str,
        action: ValidationAction,
        reason: Option<&str>,
        adjusted_confidence: Option<f64>,
    ) -> Result<ValidationOutcome> {
        if let Some(confidence) = adjusted_confidence
            && !(0.0..=1.0).contains(&confidence)
        {
            return Err(GlossaError::Validation(format!(
                "Adjusted confidence {} is outside [0, 1]",
                confidence
            )));
        }

        let translation = self.get_translation(translation_id).await?;
        let source = self.get_entry(&translation.source_entry_id).await?;
        let target = self.resolve_target(&source, &translation).await?;

        let affected_count = match action {
            ValidationAction::AcceptMerge => {
                let target = target.ok_or_else(|| {
                    GlossaError::not_found(
                        "entry",
                        format!("{} ({})", translation.text, translation.target_language),
                    )
                })?;
                let affected = self
                    .accept_merge(translation, &source, &target, adjusted_confidence)
                    .await?;
                self.record_validation(validator, &source, &target, action, reason)
                    .await?;
                affected
            }
            ValidationAction::AcceptSeparate => {
                let mut translation = translation;
                translation.target_entry_id = None;
                translation.validation_type = ValidationType::Manual;
                if let Some(confidence) = adjusted_confidence {
                    translation.confidence = confidence;
                }
                let previous_group = translation.translation_group_id.take();
                translation.updated_at = chrono::Utc::now();
                self.store.update_translation(translation).await?;
                if let Some(group_id) = previous_group {
                    self.leave_concept_group(&group_id).await?;
                }

                if let Some(target) = &target {
                    self.record_validation(validator, &source, target, action, reason)
                        .await?;
                }
                1
            }
        };

        info!(
            translation_id,
            action = %action,
            affected = affected_count,
            "Translation validated"
        );

        Ok(ValidationOutcome {
            success: true,
            affected_count,
        })
    }

    /// The entry a translation points at: its link, or an exact word match
    /// in the target language
    async fn resolve_target(
        &self,
        source: &DictionaryEntry,
        translation: &Translation,
    ) -> Result<Option<DictionaryEntry>> {
        if let Some(target_id) = &translation.target_entry_id {
            return self.get_entry(target_id).await.map(Some);
        }

        let wanted = translation.text.to_lowercase();
        let matches = self
            .store
            .search_entries(
                EntryFilter {
                    text: Some(translation.text.clone()),
                    language: Some(translation.target_language.clone()),
                    status: Some(EntryStatus::Published),
                    exclude_ids: Some(vec![source.id.clone()]),
                    ..Default::default()
                },
                None,
            )
            .await?;

        Ok(matches
            .into_iter()
            .find(|e| e.word.to_lowercase() == wanted))
    }

    /// Link the translation to `target`'s concept group and hand the group
    /// to other ungrouped translations of the same target
    async fn accept_merge(
        &self,
        mut translation: Translation,
        source: &DictionaryEntry,
        target: &DictionaryEntry,
        adjusted_confidence: Option<f64>,
    ) -> Result<usize> {
        let mut pending = None;
        if let Some(group_id) = &translation.translation_group_id
            && translation.target_entry_id.as_deref() == Some(target.id.as_str())
        {
            pending = self
                .store
                .get_concept_group(group_id)
                .await?
                .map(PendingGroup::existing);
        }
        let pending = match pending {
            Some(pending) => pending,
            None => {
                let source_keywords = self.keywords_for(source).await;
                let target_keywords = self.keywords_for(target).await;
                let keywords: KeywordSet =
                    source_keywords.union(&target_keywords).cloned().collect();
                self.find_or_create_concept_group(target, &keywords).await?
            }
        };
        let group_id = pending.group.id.clone();
        let previous_group = translation.translation_group_id.clone();
        let rejoining = previous_group.as_deref() == Some(group_id.as_str());

        let now = chrono::Utc::now();
        translation.target_entry_id = Some(target.id.clone());
        translation.translation_group_id = Some(group_id.clone());
        translation.validation_type = ValidationType::Manual;
        translation.confidence = adjusted_confidence.unwrap_or(1.0);
        translation.updated_at = now;
        let translation = self.store.update_translation(translation).await?;

        let mut affected = 1;
        let siblings = self
            .store
            .list_translations(
                TranslationFilter {
                    target_entry_id: Some(target.id.clone()),
                    ..Default::default()
                },
                None,
            )
            .await?;
        for mut sibling in siblings {
            if sibling.id == translation.id || sibling.translation_group_id.is_some() {
                continue;
            }
            sibling.translation_group_id = Some(group_id.clone());
            sibling.updated_at = now;
            self.store.update_translation(sibling).await?;
            affected += 1;
        }

        // The translation itself only counts as a new member if it moved groups
        let joined = if rejoining { affected - 1 } else { affected };
        if joined > 0 {
            self.commit_concept_group(pending, joined as u32).await?;
        }
        if let Some(previous) = previous_group
            && !rejoining
        {
            self.leave_concept_group(&previous).await?;
        }

        Ok(affected)
    }

    /// Upsert the case record for a validated pair
    async fn record_validation(
        &self,
        validator: &str,
        source: &DictionaryEntry,
        target: &DictionaryEntry,
        action: ValidationAction,
        reason: Option<&str>,
    ) -> Result<CaseRecord> {
        let source_keywords = self.keywords_for(source).await;
        let target_keywords = self.keywords_for(target).await;
        let similarity = self.scorer.score_keywords(
            &source_keywords,
            &target_keywords,
            source.shares_category_with(target),
        );

        let mut case = CaseRecord::new(
            &source.id,
            &target.id,
            similarity.score,
            action.decision(),
            validator,
            CaseContext {
                category_match: similarity.category_match,
                source_keywords,
                target_keywords,
                shared_keywords: similarity.shared_keywords,
            },
            ValidationType::Manual,
            self.config.case_memory.pair_identity,
        );
        if let Some(reason) = reason {
            case = case.with_reason(reason);
        }

        Ok(self.store.upsert_case(case).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn engine() -> MergeEngine {
        let config = ConfigBuilder::testing().build().unwrap();
        MergeEngine::new(Arc::new(MemoryStore::new()), config).unwrap()
    }

    async fn seed(engine: &MergeEngine) -> String {
        engine
            .create_entry(
                DictionaryEntry::new("lune", "fr")
                    .with_id("fr-lune")
                    .with_category("astronomy")
                    .with_keywords(["satellite", "nocturne"]),
            )
            .await
            .unwrap();
        engine
            .propose_translation("alice", "fr-lune", "es", "luna", None)
            .await
            .unwrap()
            .translation_id
            .unwrap()
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!(
            "accept-merge".parse::<ValidationAction>().unwrap(),
            ValidationAction::AcceptMerge
        );
        assert_eq!(
            "separate".parse::<ValidationAction>().unwrap(),
            ValidationAction::AcceptSeparate
        );
        assert!("maybe".parse::<ValidationAction>().is_err());
    }

    #[tokio::test]
    async fn test_merge_without_target_is_not_found() {
        let engine = engine();
        let id = seed(&engine).await;

        let err = engine
            .validate_translation("bob", &id, ValidationAction::AcceptMerge, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GlossaError::NotFound { kind: "entry", .. }));
    }

    #[tokio::test]
    async fn test_merge_resolves_target_by_word() {
        let engine = engine();
        let id = seed(&engine).await;
        engine
            .create_entry(
                DictionaryEntry::new("Luna", "es")
                    .with_id("es-luna")
                    .with_category("astronomy")
                    .with_keywords(["satellite"]),
            )
            .await
            .unwrap();

        let outcome = engine
            .validate_translation(
                "bob",
                &id,
                ValidationAction::AcceptMerge,
                Some("same moon"),
                Some(0.95),
            )
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.affected_count, 1);

        let translation = engine.get_translation(&id).await.unwrap();
        assert_eq!(translation.target_entry_id.as_deref(), Some("es-luna"));
        assert!(translation.translation_group_id.is_some());
        assert_eq!(translation.validation_type, ValidationType::Manual);
        assert_eq!(translation.confidence, 0.95);

        let cases = engine.list_cases(None, None).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].human_decision, Decision::Merge);
        assert_eq!(cases[0].reason.as_deref(), Some("same moon"));
    }

    #[tokio::test]
    async fn test_revalidation_overwrites_case() {
        let engine = engine();
        let id = seed(&engine).await;
        engine
            .create_entry(DictionaryEntry::new("luna", "es").with_id("es-luna"))
            .await
            .unwrap();

        engine
            .validate_translation("bob", &id, ValidationAction::AcceptMerge, None, None)
            .await
            .unwrap();
        engine
            .validate_translation("carol", &id, ValidationAction::AcceptSeparate, None, None)
            .await
            .unwrap();

        let cases = engine.list_cases(None, None).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].human_decision, Decision::Separate);
        assert_eq!(cases[0].validated_by, "carol");

        let translation = engine.get_translation(&id).await.unwrap();
        assert!(!translation.is_linked());
        assert!(translation.translation_group_id.is_none());
    }

    #[tokio::test]
    async fn test_group_member_count_follows_links() {
        let engine = engine();
        let id = seed(&engine).await;
        engine
            .create_entry(DictionaryEntry::new("luna", "es").with_id("es-luna"))
            .await
            .unwrap();

        engine
            .validate_translation("bob", &id, ValidationAction::AcceptMerge, None, None)
            .await
            .unwrap();
        let group_id = engine
            .get_translation(&id)
            .await
            .unwrap()
            .translation_group_id
            .unwrap();
        let group = engine.store().get_concept_group(&group_id).await.unwrap().unwrap();
        assert_eq!(group.member_count, 1);

        // Merging again into the same group adds nobody
        engine
            .validate_translation("carol", &id, ValidationAction::AcceptMerge, None, None)
            .await
            .unwrap();
        let group = engine.store().get_concept_group(&group_id).await.unwrap().unwrap();
        assert_eq!(group.member_count, 1);

        engine
            .validate_translation("dave", &id, ValidationAction::AcceptSeparate, None, None)
            .await
            .unwrap();
        let group = engine.store().get_concept_group(&group_id).await.unwrap().unwrap();
        assert_eq!(group.member_count, 0);
    }

    #[tokio::test]
    async fn test_archived_entry_is_not_a_merge_target() {
        let engine = engine();
        let id = seed(&engine).await;
        engine
            .create_entry(
                DictionaryEntry::new("luna", "es")
                    .with_id("es-luna")
                    .with_status(EntryStatus::Archived),
            )
            .await
            .unwrap();

        let err = engine
            .validate_translation("bob", &id, ValidationAction::AcceptMerge, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, GlossaError::NotFound { kind: "entry", .. }));
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_confidence() {
        let engine = engine();
        let id = seed(&engine).await;
        let err = engine
            .validate_translation("bob", &id, ValidationAction::AcceptSeparate, None, Some(1.5))
            .await
            .unwrap_err();
        assert!(matches!(err, GlossaError::Validation(_)));
    }
}
