//! One +1/-1 vote per user per translation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MergeEngine;
use crate::models::Vote;
use crate::storage::StorageError;
use crate::storage::traits::TranslationStore;
use crate::{GlossaError, Result};

/// Result of [`MergeEngine::vote`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub new_vote_count: i64,
}

impl MergeEngine {
    /// Cast a vote. A repeat vote by the same user is rejected, never
    /// overwritten.
    #[tracing::instrument(skip(self))]
    pub async fn vote(&self, user: &str, translation_id: &str, value: i8) -> Result<VoteOutcome> {
        if value != 1 && value != -1 {
            return Err(GlossaError::InvalidVote(format!(
                "vote value must be +1 or -1, got {}",
                value
            )));
        }

        let new_vote_count = self
            .store
            .record_vote(Vote::new(translation_id, user, value))
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists(_) => GlossaError::InvalidVote(format!(
                    "user '{}' has already voted on translation '{}'",
                    user, translation_id
                )),
                StorageError::NotFound(_) => GlossaError::not_found("translation", translation_id),
                other => GlossaError::Storage(other),
            })?;

        debug!(new_vote_count, "Vote recorded");
        Ok(VoteOutcome { new_vote_count })
    }
}
