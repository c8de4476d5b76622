//! Proposal pipeline: candidate search, scoring, prediction, decision and
//! persistence.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use super::MergeEngine;
use super::decision::{DecisionOutcome, decide};
use crate::models::{
    CaseContext, CaseRecord, Decision, DictionaryEntry, EntryStatus, KeywordSet, Translation,
    ValidationType,
};
use crate::similarity::{Recommendation, SimilarityResult};
use crate::storage::filters::EntryFilter;
use crate::storage::traits::{CaseStore, EntryStore, TranslationStore};
use crate::{GlossaError, Result};

/// What happened to a proposed translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalAction {
    /// Linked to an existing entry's concept group
    Merged,
    /// Nothing persisted; a human has to decide
    NeedsReview,
    /// Stored as a distinct, unlinked translation
    Separated,
}

impl fmt::Display for ProposalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposalAction::Merged => write!(f, "merged"),
            ProposalAction::NeedsReview => write!(f, "needs_review"),
            ProposalAction::Separated => write!(f, "separated"),
        }
    }
}

/// Result of [`MergeEngine::propose_translation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalOutcome {
    pub action: ProposalAction,
    pub message: String,
    pub group_id: Option<String>,
    pub confidence: Option<f64>,
    /// Absent when the proposal needs review
    pub translation_id: Option<String>,
    /// Best-scoring target-language entry, if any
    pub candidate_id: Option<String>,
    pub score: Option<f64>,
    pub reasoning: Vec<String>,
}

/// A scored target-language entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSuggestion {
    pub candidate_id: String,
    pub word: String,
    pub score: f64,
    pub recommendation: Recommendation,
    pub shared_keywords: KeywordSet,
    pub same_category: bool,
}

/// A candidate entry with its keywords and similarity to the source
struct ScoredCandidate {
    entry: DictionaryEntry,
    keywords: KeywordSet,
    similarity: SimilarityResult,
}

impl MergeEngine {
    /// Propose `text` as the `target_language` translation of `source_id`.
    ///
    /// Merges automatically when the best candidate scores in the merge
    /// band, stores an unlinked translation when nothing is close enough,
    /// and otherwise returns [`ProposalAction::NeedsReview`] without
    /// persisting anything. Re-submitting a translation that already
    /// exists returns it unchanged.
    #[tracing::instrument(skip(self, text, context))]
    pub async fn propose_translation(
        &self,
        submitter: &str,
        source_id: &str,
        target_language: &str,
        text: &str,
        context: Option<&str>,
    ) -> Result<ProposalOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GlossaError::Validation(
                "Proposed translation text must not be empty".to_string(),
            ));
        }
        if target_language.trim().is_empty() {
            return Err(GlossaError::Validation(
                "Target language must not be empty".to_string(),
            ));
        }

        let source = self.get_entry(source_id).await?;

        if let Some(existing) = self
            .store
            .find_translation(&source.id, target_language, text)
            .await?
        {
            debug!(translation_id = %existing.id, "Translation already recorded");
            let action = if existing.is_linked() {
                ProposalAction::Merged
            } else {
                ProposalAction::Separated
            };
            return Ok(ProposalOutcome {
                action,
                message: format!("'{}' is already recorded for '{}'", text, source.word),
                group_id: existing.translation_group_id.clone(),
                confidence: Some(existing.confidence),
                translation_id: Some(existing.id),
                candidate_id: existing.target_entry_id,
                score: None,
                reasoning: Vec::new(),
            });
        }

        let source_keywords = self.keywords_for(&source).await;
        let candidates = self
            .find_candidates(&source, target_language, Some(text))
            .await?;
        let best = self
            .score_candidates(&source, &source_keywords, candidates)
            .await
            .into_iter()
            .next();

        let min_score = self.config.orchestration.min_candidate_score;
        let best = match best {
            Some(best) if best.similarity.score > min_score => best,
            other => {
                let reasoning = vec![match &other {
                    Some(c) => format!(
                        "Best candidate '{}' scored {:.2}, not above {:.2}",
                        c.entry.word, c.similarity.score, min_score
                    ),
                    None => format!("No {} entries match '{}'", target_language, text),
                }];
                let confidence = self.config.prediction.fallback_separate_confidence;
                let translation = self
                    .store_translation(
                        submitter,
                        &source,
                        target_language,
                        text,
                        context,
                        confidence,
                        None,
                    )
                    .await?;
                info!(translation_id = %translation.id, "No candidate; stored separately");
                return Ok(ProposalOutcome {
                    action: ProposalAction::Separated,
                    message: format!("'{}' added as a new concept", text),
                    group_id: None,
                    confidence: Some(confidence),
                    translation_id: Some(translation.id),
                    candidate_id: None,
                    score: other.map(|c| c.similarity.score),
                    reasoning,
                });
            }
        };

        let prediction = self
            .predictor
            .predict(self.store.as_ref(), &source, &best.entry, &best.similarity)
            .await?;
        let outcome = decide(&best.similarity, prediction, &self.decision_thresholds());

        debug!(
            candidate = %best.entry.id,
            score = best.similarity.score,
            action = %outcome.action,
            predicted = %outcome.predicted_action,
            "Decision made"
        );

        let action = outcome.action;
        match action {
            Decision::Merge => {
                self.apply_auto_merge(
                    submitter,
                    &source,
                    &source_keywords,
                    best,
                    outcome,
                    target_language,
                    text,
                    context,
                )
                .await
            }
            Decision::Uncertain => Ok(ProposalOutcome {
                action: ProposalAction::NeedsReview,
                message: format!(
                    "'{}' may duplicate '{}'; please confirm merge or separate",
                    text, best.entry.word
                ),
                group_id: None,
                confidence: Some(outcome.confidence),
                translation_id: None,
                candidate_id: Some(best.entry.id),
                score: Some(best.similarity.score),
                reasoning: outcome.reasoning,
            }),
            Decision::Separate => {
                let translation = self
                    .store_translation(
                        submitter,
                        &source,
                        target_language,
                        text,
                        context,
                        outcome.confidence,
                        None,
                    )
                    .await?;
                info!(translation_id = %translation.id, "Translation stored separately");
                Ok(ProposalOutcome {
                    action: ProposalAction::Separated,
                    message: format!(
                        "'{}' added as a distinct concept from '{}'",
                        text, best.entry.word
                    ),
                    group_id: None,
                    confidence: Some(outcome.confidence),
                    translation_id: Some(translation.id),
                    candidate_id: Some(best.entry.id),
                    score: Some(best.similarity.score),
                    reasoning: outcome.reasoning,
                })
            }
        }
    }

    /// Score target-language entries against `source_id`, best first.
    ///
    /// Candidates are entries whose word contains `search_term` or that
    /// share the source's category. Results below `min_similarity` are
    /// dropped.
    #[tracing::instrument(skip(self))]
    pub async fn suggest_candidates(
        &self,
        source_id: &str,
        target_language: &str,
        search_term: Option<&str>,
        min_similarity: Option<f64>,
    ) -> Result<Vec<CandidateSuggestion>> {
        let source = self.get_entry(source_id).await?;
        let source_keywords = self.keywords_for(&source).await;
        let search_term = search_term.map(str::trim).filter(|t| !t.is_empty());
        let candidates = self
            .find_candidates(&source, target_language, search_term)
            .await?;

        let thresholds = self.decision_thresholds();
        let min_similarity = min_similarity.unwrap_or(0.0);

        Ok(self
            .score_candidates(&source, &source_keywords, candidates)
            .await
            .into_iter()
            .filter(|c| c.similarity.score >= min_similarity)
            .map(|c| CandidateSuggestion {
                recommendation: thresholds.recommend(c.similarity.score),
                candidate_id: c.entry.id,
                word: c.entry.word,
                score: c.similarity.score,
                shared_keywords: c.similarity.shared_keywords,
                same_category: c.similarity.category_match,
            })
            .collect())
    }

    /// Published target-language entries matching the text or sharing the category
    async fn find_candidates(
        &self,
        source: &DictionaryEntry,
        target_language: &str,
        text: Option<&str>,
    ) -> Result<Vec<DictionaryEntry>> {
        if text.is_none() && source.category_id.is_none() {
            return Ok(Vec::new());
        }

        let filter = EntryFilter {
            text: text.map(str::to_string),
            category_id: source.category_id.clone(),
            language: Some(target_language.to_string()),
            status: Some(EntryStatus::Published),
            exclude_ids: Some(vec![source.id.clone()]),
            ..Default::default()
        };
        let candidates = self
            .store
            .search_entries(filter, Some(self.config.orchestration.max_candidates))
            .await?;
        debug!(count = candidates.len(), "Candidates found");
        Ok(candidates)
    }

    /// Score candidates sequentially, best first (stable for equal scores)
    async fn score_candidates(
        &self,
        source: &DictionaryEntry,
        source_keywords: &KeywordSet,
        candidates: Vec<DictionaryEntry>,
    ) -> Vec<ScoredCandidate> {
        let mut scored = Vec::with_capacity(candidates.len());
        for entry in candidates {
            let keywords = self.keywords_for(&entry).await;
            let similarity = self.scorer.score_keywords(
                source_keywords,
                &keywords,
                source.shares_category_with(&entry),
            );
            scored.push(ScoredCandidate {
                entry,
                keywords,
                similarity,
            });
        }
        scored.sort_by(|a, b| b.similarity.score.total_cmp(&a.similarity.score));
        scored
    }

    #[allow(clippy::too_many_arguments)]
    async fn apply_auto_merge(
        &self,
        submitter: &str,
        source: &DictionaryEntry,
        source_keywords: &KeywordSet,
        best: ScoredCandidate,
        outcome: DecisionOutcome,
        target_language: &str,
        text: &str,
        context: Option<&str>,
    ) -> Result<ProposalOutcome> {
        let group_keywords: KeywordSet =
            source_keywords.union(&best.keywords).cloned().collect();
        let pending = self
            .find_or_create_concept_group(&best.entry, &group_keywords)
            .await?;

        let translation = self
            .store_translation(
                submitter,
                source,
                target_language,
                text,
                context,
                outcome.confidence,
                Some((best.entry.id.as_str(), pending.group.id.as_str())),
            )
            .await?;
        let group = self.commit_concept_group(pending, 1).await?;

        let case = CaseRecord::new(
            &source.id,
            &best.entry.id,
            best.similarity.score,
            Decision::Merge,
            submitter,
            CaseContext {
                category_match: best.similarity.category_match,
                source_keywords: source_keywords.clone(),
                target_keywords: best.keywords,
                shared_keywords: best.similarity.shared_keywords,
            },
            ValidationType::Auto,
            self.config.case_memory.pair_identity,
        )
        .with_reason("auto-fusion");
        self.store.upsert_case(case).await?;

        info!(
            translation_id = %translation.id,
            group_id = %group.id,
            target = %best.entry.id,
            "Translation merged automatically"
        );

        Ok(ProposalOutcome {
            action: ProposalAction::Merged,
            message: format!("'{}' merged with '{}'", text, best.entry.word),
            group_id: Some(group.id),
            confidence: Some(outcome.confidence),
            translation_id: Some(translation.id),
            candidate_id: Some(best.entry.id),
            score: Some(best.similarity.score),
            reasoning: outcome.reasoning,
        })
    }

    /// Persist a new translation, linked when `link` names a target entry
    /// and concept group
    #[allow(clippy::too_many_arguments)]
    async fn store_translation(
        &self,
        submitter: &str,
        source: &DictionaryEntry,
        target_language: &str,
        text: &str,
        context: Option<&str>,
        confidence: f64,
        link: Option<(&str, &str)>,
    ) -> Result<Translation> {
        let mut translation = Translation::new(&source.id, target_language, text, submitter);
        translation.context = context.map(str::to_string);
        translation.confidence = confidence;

        if let Some((target_id, group_id)) = link {
            translation.target_entry_id = Some(target_id.to_string());
            translation.translation_group_id = Some(group_id.to_string());
            translation.validation_type = ValidationType::Auto;
        }

        Ok(self.store.create_translation(translation).await?)
    }
}
