//! Translation and vote storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::{Connection, RecordId};

use super::base::{SharedStorage, limit_clause};
use crate::models::{Translation, ValidationType, Vote};
use crate::storage::errors::StorageError;
use crate::storage::filters::TranslationFilter;
use crate::storage::traits::TranslationStore;

/// Internal representation of a translation record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealTranslation {
    key: String,
    source_entry_id: String,
    target_language: String,
    text: String,
    text_lower: String,
    #[serde(default)]
    target_entry_id: Option<String>,
    #[serde(default)]
    translation_group_id: Option<String>,
    confidence: f64,
    vote_count: i64,
    validation_type: ValidationType,
    submitted_by: String,
    #[serde(default)]
    context: Option<String>,
    created_at: DateTime<Utc>,
    created_ts: i64,
    updated_at: DateTime<Utc>,
}

impl From<Translation> for SurrealTranslation {
    fn from(t: Translation) -> Self {
        Self {
            key: t.id,
            source_entry_id: t.source_entry_id,
            target_language: t.target_language,
            text_lower: t.text.to_lowercase(),
            text: t.text,
            target_entry_id: t.target_entry_id,
            translation_group_id: t.translation_group_id,
            confidence: t.confidence,
            vote_count: t.vote_count,
            validation_type: t.validation_type,
            submitted_by: t.submitted_by,
            context: t.context,
            created_ts: t.created_at.timestamp_millis(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

impl From<SurrealTranslation> for Translation {
    fn from(row: SurrealTranslation) -> Self {
        Self {
            id: row.key,
            source_entry_id: row.source_entry_id,
            target_language: row.target_language,
            text: row.text,
            target_entry_id: row.target_entry_id,
            translation_group_id: row.translation_group_id,
            confidence: row.confidence,
            vote_count: row.vote_count,
            validation_type: row.validation_type,
            submitted_by: row.submitted_by,
            context: row.context,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealVote {
    translation_id: String,
    user_id: String,
    value: i8,
    created_at: DateTime<Utc>,
}

fn vote_key(translation_id: &str, user_id: &str) -> String {
    format!("{}::{}", translation_id, user_id)
}

#[async_trait]
impl<C> TranslationStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_translation(
        &self,
        translation: Translation,
    ) -> Result<Translation, StorageError> {
        let id = translation.id.clone();
        let created: Option<SurrealTranslation> = self
            .client
            .create(("translation", id.as_str()))
            .content(SurrealTranslation::from(translation))
            .await
            .map_err(|e| {
                if e.to_string().contains("already exists") {
                    StorageError::AlreadyExists(format!(
                        "Translation with ID {} already exists",
                        id
                    ))
                } else {
                    StorageError::Query(format!("Failed to create translation: {}", e))
                }
            })?;

        created
            .map(Translation::from)
            .ok_or_else(|| StorageError::Internal("No translation created".to_string()))
    }

    async fn get_translation(&self, id: &str) -> Result<Option<Translation>, StorageError> {
        let translation: Option<SurrealTranslation> = self
            .client
            .select(("translation", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get translation: {}", e)))?;

        Ok(translation.map(Translation::from))
    }

    async fn update_translation(
        &self,
        translation: Translation,
    ) -> Result<Translation, StorageError> {
        let id = translation.id.clone();
        if self.get_translation(&id).await?.is_none() {
            return Err(StorageError::NotFound(format!(
                "Translation with ID {} not found",
                id
            )));
        }

        let updated: Option<SurrealTranslation> = self
            .client
            .update(("translation", id.as_str()))
            .content(SurrealTranslation::from(translation))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update translation: {}", e)))?;

        updated
            .map(Translation::from)
            .ok_or_else(|| StorageError::NotFound(format!("Translation with ID {} not found", id)))
    }

    async fn find_translation(
        &self,
        source_id: &str,
        language: &str,
        text: &str,
    ) -> Result<Option<Translation>, StorageError> {
        let query = r#"
            SELECT * FROM translation
            WHERE source_entry_id = $source_id
                AND target_language = $language
                AND text_lower = $text
            ORDER BY created_ts ASC
            LIMIT 1
        "#;

        let mut result = self
            .client
            .query(query)
            .bind(("source_id", source_id.to_string()))
            .bind(("language", language.to_string()))
            .bind(("text", text.to_lowercase()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to find translation: {}", e)))?;

        let found: Option<SurrealTranslation> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract translation: {}", e)))?;

        Ok(found.map(Translation::from))
    }

    async fn list_translations(
        &self,
        filter: TranslationFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Translation>, StorageError> {
        let mut conditions = Vec::new();
        let mut binds: Vec<(&'static str, Value)> = Vec::new();

        let fields = [
            ("source_entry_id", &filter.source_entry_id),
            ("target_entry_id", &filter.target_entry_id),
            ("translation_group_id", &filter.translation_group_id),
            ("target_language", &filter.target_language),
        ];
        for (field, wanted) in fields {
            if let Some(value) = wanted {
                conditions.push(format!("{field} = ${field}"));
                binds.push((field, Value::from(value.clone())));
            }
        }

        let mut query = "SELECT * FROM translation".to_string();
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_ts ASC, key ASC");
        query.push_str(&limit_clause(limit));

        let mut request = self.client.query(query);
        for bind in binds {
            request = request.bind(bind);
        }

        let mut result = request
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list translations: {}", e)))?;

        let translations: Vec<SurrealTranslation> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract translations: {}", e)))?;

        Ok(translations.into_iter().map(Translation::from).collect())
    }

    async fn record_vote(&self, vote: Vote) -> Result<i64, StorageError> {
        if self.get_translation(&vote.translation_id).await?.is_none() {
            return Err(StorageError::NotFound(format!(
                "Translation with ID {} not found",
                vote.translation_id
            )));
        }

        let key = vote_key(&vote.translation_id, &vote.user_id);
        let duplicate = || {
            StorageError::AlreadyExists(format!(
                "User {} already voted on translation {}",
                vote.user_id, vote.translation_id
            ))
        };

        // The vote row and the tally move together or not at all. The record
        // key and the unique index both reject a second vote.
        let vote_query = r#"
            BEGIN TRANSACTION;
            CREATE $vote_id CONTENT $vote;
            UPDATE $record_id SET
                vote_count += $delta,
                updated_at = $updated_at;
            COMMIT TRANSACTION;
        "#;

        let mut response = self
            .client
            .query(vote_query)
            .bind(("vote_id", RecordId::from(("vote", key.as_str()))))
            .bind((
                "vote",
                SurrealVote {
                    translation_id: vote.translation_id.clone(),
                    user_id: vote.user_id.clone(),
                    value: vote.value,
                    created_at: vote.created_at,
                },
            ))
            .bind((
                "record_id",
                RecordId::from(("translation", vote.translation_id.as_str())),
            ))
            .bind(("delta", i64::from(vote.value)))
            .bind(("updated_at", Utc::now()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to record vote: {}", e)))?;

        let errors = response.take_errors();
        if !errors.is_empty() {
            let duplicate_vote = errors.values().any(|e| {
                let message = e.to_string();
                message.contains("already exists") || message.contains("already contains")
            });
            if duplicate_vote {
                return Err(duplicate());
            }
            let message = errors
                .values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StorageError::Query(format!("Failed to record vote: {}", message)));
        }

        let updated = self.get_translation(&vote.translation_id).await?;
        updated.map(|t| t.vote_count).ok_or_else(|| {
            StorageError::NotFound(format!(
                "Translation with ID {} not found",
                vote.translation_id
            ))
        })
    }
}
