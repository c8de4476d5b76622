//! Merge engine for Glossa
//!
//! `MergeEngine` is the entry point collaborators talk to. It owns the
//! scoring pipeline (keyword extraction, similarity, case-based prediction),
//! the active threshold snapshot, and a handle to the lexicon store. The
//! operations are split by concern:
//!
//! - [`orchestrator`]: proposals and candidate suggestions
//! - [`validation`]: explicit human merge/separate decisions
//! - [`voting`]: one vote per user per translation
//! - [`insights`]: calibration and pattern diagnostics over case memory
//! - [`scheduler`]: periodic background recalibration

pub mod decision;
pub mod insights;
pub mod orchestrator;
pub mod scheduler;
pub mod validation;
pub mod voting;

pub use decision::{DecisionOutcome, decide};
pub use insights::LearningInsights;
pub use orchestrator::{CandidateSuggestion, ProposalAction, ProposalOutcome};
pub use scheduler::{RecalibrationHandle, spawn_recalibration};
pub use validation::{ValidationAction, ValidationOutcome};
pub use voting::VoteOutcome;

use std::sync::Arc;
use tracing::{debug, warn};

use crate::calibration::{ThresholdCalibrator, ThresholdStore};
use crate::config::GlossaConfig;
use crate::lexicon::KeywordExtractor;
use crate::models::{
    CaseRecord, ConceptGroup, DictionaryEntry, KeywordSet, ThresholdConfig, ThresholdSnapshot,
    Translation,
};
use crate::patterns::PatternMiner;
use crate::prediction::CaseBasedPredictor;
use crate::similarity::SimilarityScorer;
use crate::storage::filters::{CaseFilter, EntryFilter, TranslationFilter};
use crate::storage::traits::{
    CaseStore, ConceptGroupStore, EntryStore, LexiconStore, TranslationStore,
};
use crate::{GlossaError, Result};

/// The duplicate-detection and merge-decision engine
#[derive(Debug)]
pub struct MergeEngine {
    /// Entries, translations, votes, cases and concept groups
    store: Arc<dyn LexiconStore>,

    /// Keyword extraction + similarity scoring
    scorer: SimilarityScorer,

    /// Case-based prediction
    predictor: CaseBasedPredictor,

    /// Percentile-based threshold calibration
    calibrator: ThresholdCalibrator,

    /// Per-feature accuracy statistics
    miner: PatternMiner,

    /// Active threshold snapshot
    thresholds: ThresholdStore,

    config: GlossaConfig,
}

/// A concept group chosen for a merge but not yet written back
#[derive(Debug)]
pub(crate) struct PendingGroup {
    pub(crate) group: ConceptGroup,
    is_new: bool,
}

impl PendingGroup {
    fn existing(group: ConceptGroup) -> Self {
        Self {
            group,
            is_new: false,
        }
    }
}

impl MergeEngine {
    /// Create an engine over the given store
    pub fn new(store: Arc<dyn LexiconStore>, config: GlossaConfig) -> Result<Self> {
        let extractor = KeywordExtractor::new(&config.lexicon).map_err(|e| {
            GlossaError::Configuration(format!("Invalid lexicon suffix pattern: {}", e))
        })?;

        debug!(
            profile_version = extractor.profile_version(),
            "Merge engine initialized"
        );

        Ok(Self {
            store,
            scorer: SimilarityScorer::new(config.scoring.clone(), extractor),
            predictor: CaseBasedPredictor::new(config.prediction.clone()),
            calibrator: ThresholdCalibrator::new(config.calibration.clone()),
            miner: PatternMiner::new(config.patterns.min_count),
            thresholds: ThresholdStore::default(),
            config,
        })
    }

    /// The configuration this engine was built with
    pub fn config(&self) -> &GlossaConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn LexiconStore> {
        &self.store
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// The active threshold snapshot
    pub fn current_thresholds(&self) -> Arc<ThresholdSnapshot> {
        self.thresholds.current()
    }

    /// Thresholds used to band proposals and suggestions
    pub(crate) fn decision_thresholds(&self) -> ThresholdConfig {
        if self.config.decision.use_calibrated_thresholds {
            self.thresholds.current().thresholds
        } else {
            ThresholdConfig::STATIC_DEFAULTS
        }
    }

    pub(crate) fn threshold_store(&self) -> &ThresholdStore {
        &self.thresholds
    }

    // =============================================================================
    // Entry access
    // =============================================================================

    /// Add an entry to the lexicon
    pub async fn create_entry(&self, entry: DictionaryEntry) -> Result<DictionaryEntry> {
        if entry.word.trim().is_empty() {
            return Err(GlossaError::Validation("Entry word must not be empty".to_string()));
        }
        if entry.language.trim().is_empty() {
            return Err(GlossaError::Validation(
                "Entry language must not be empty".to_string(),
            ));
        }
        Ok(self.store.create_entry(entry).await?)
    }

    /// Get an entry, failing with `NotFound` if it does not exist
    pub async fn get_entry(&self, id: &str) -> Result<DictionaryEntry> {
        self.store
            .get_entry(id)
            .await?
            .ok_or_else(|| GlossaError::not_found("entry", id))
    }

    pub async fn list_entries(
        &self,
        filter: Option<EntryFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<DictionaryEntry>> {
        Ok(self.store.list_entries(filter, limit).await?)
    }

    /// Get a translation, failing with `NotFound` if it does not exist
    pub async fn get_translation(&self, id: &str) -> Result<Translation> {
        self.store
            .get_translation(id)
            .await?
            .ok_or_else(|| GlossaError::not_found("translation", id))
    }

    pub async fn list_translations(
        &self,
        filter: TranslationFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Translation>> {
        Ok(self.store.list_translations(filter, limit).await?)
    }

    /// List recorded cases, most recent first
    pub async fn list_cases(
        &self,
        filter: Option<CaseFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<CaseRecord>> {
        Ok(self
            .store
            .query_cases(filter.unwrap_or_default(), limit)
            .await?)
    }

    pub async fn count_cases(&self, filter: Option<CaseFilter>) -> Result<usize> {
        Ok(self.store.count_cases(filter).await?)
    }

    // =============================================================================
    // Shared helpers
    // =============================================================================

    /// Extract an entry's keywords, writing them back as its cache when
    /// configured to
    pub(crate) async fn keywords_for(&self, entry: &DictionaryEntry) -> KeywordSet {
        if let Some(cached) = &entry.keywords {
            return cached.clone();
        }

        let keywords = self.scorer.extractor().extract_fresh(entry);
        if self.config.lexicon.cache_keywords
            && let Err(e) = self
                .store
                .update_entry_keywords(&entry.id, keywords.clone())
                .await
        {
            warn!(entry_id = %entry.id, error = %e, "Failed to cache entry keywords");
        }
        keywords
    }

    /// Find the concept group a merge into `target` should join.
    ///
    /// Reuses the group of a translation already linked to `target`, then a
    /// group with exactly the same keyword set, and starts a new group
    /// otherwise. Nothing is written until [`Self::commit_concept_group`].
    pub(crate) async fn find_or_create_concept_group(
        &self,
        target: &DictionaryEntry,
        keywords: &KeywordSet,
    ) -> Result<PendingGroup> {
        let linked = self
            .store
            .list_translations(
                TranslationFilter {
                    target_entry_id: Some(target.id.clone()),
                    ..Default::default()
                },
                None,
            )
            .await?;

        let mut existing = None;
        for group_id in linked.iter().filter_map(|t| t.translation_group_id.as_deref()) {
            if let Some(group) = self.store.get_concept_group(group_id).await? {
                existing = Some(group);
                break;
            }
        }

        if existing.is_none() && !keywords.is_empty() {
            existing = self
                .store
                .list_concept_groups(None)
                .await?
                .into_iter()
                .find(|g| &g.keywords == keywords);
        }

        Ok(match existing {
            Some(mut group) => {
                group.keywords.extend(keywords.iter().cloned());
                PendingGroup::existing(group)
            }
            None => PendingGroup {
                group: ConceptGroup::new(keywords.clone()),
                is_new: true,
            },
        })
    }

    /// Persist a chosen group once `joined` translations point at it
    pub(crate) async fn commit_concept_group(
        &self,
        pending: PendingGroup,
        joined: u32,
    ) -> Result<ConceptGroup> {
        let PendingGroup { mut group, is_new } = pending;
        group.member_count += joined;
        group.updated_at = chrono::Utc::now();

        if is_new {
            debug!(group_id = %group.id, members = group.member_count, "Creating concept group");
            Ok(self.store.create_concept_group(group).await?)
        } else {
            debug!(group_id = %group.id, members = group.member_count, "Joining concept group");
            Ok(self.store.update_concept_group(group).await?)
        }
    }

    /// Drop one member from a group a translation was unlinked from
    pub(crate) async fn leave_concept_group(&self, group_id: &str) -> Result<()> {
        if let Some(mut group) = self.store.get_concept_group(group_id).await? {
            group.member_count = group.member_count.saturating_sub(1);
            group.updated_at = chrono::Utc::now();
            debug!(group_id, members = group.member_count, "Leaving concept group");
            self.store.update_concept_group(group).await?;
        }
        Ok(())
    }
}
