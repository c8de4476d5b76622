//! Concept group storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::Connection;

use super::base::{SharedStorage, limit_clause};
use crate::models::{ConceptGroup, KeywordSet};
use crate::storage::errors::StorageError;
use crate::storage::traits::ConceptGroupStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealConceptGroup {
    key: String,
    #[serde(default)]
    keywords: KeywordSet,
    member_count: u32,
    created_at: DateTime<Utc>,
    created_ts: i64,
    updated_at: DateTime<Utc>,
}

impl From<ConceptGroup> for SurrealConceptGroup {
    fn from(group: ConceptGroup) -> Self {
        Self {
            key: group.id,
            keywords: group.keywords,
            member_count: group.member_count,
            created_ts: group.created_at.timestamp_millis(),
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

impl From<SurrealConceptGroup> for ConceptGroup {
    fn from(row: SurrealConceptGroup) -> Self {
        Self {
            id: row.key,
            keywords: row.keywords,
            member_count: row.member_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl<C> ConceptGroupStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_concept_group(
        &self,
        group: ConceptGroup,
    ) -> Result<ConceptGroup, StorageError> {
        let id = group.id.clone();
        let created: Option<SurrealConceptGroup> = self
            .client
            .create(("concept_group", id.as_str()))
            .content(SurrealConceptGroup::from(group))
            .await
            .map_err(|e| {
                if e.to_string().contains("already exists") {
                    StorageError::AlreadyExists(format!(
                        "Concept group with ID {} already exists",
                        id
                    ))
                } else {
                    StorageError::Query(format!("Failed to create concept group: {}", e))
                }
            })?;

        created
            .map(ConceptGroup::from)
            .ok_or_else(|| StorageError::Internal("No concept group created".to_string()))
    }

    async fn get_concept_group(&self, id: &str) -> Result<Option<ConceptGroup>, StorageError> {
        let group: Option<SurrealConceptGroup> = self
            .client
            .select(("concept_group", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get concept group: {}", e)))?;

        Ok(group.map(ConceptGroup::from))
    }

    async fn update_concept_group(
        &self,
        group: ConceptGroup,
    ) -> Result<ConceptGroup, StorageError> {
        let id = group.id.clone();
        if self.get_concept_group(&id).await?.is_none() {
            return Err(StorageError::NotFound(format!(
                "Concept group with ID {} not found",
                id
            )));
        }

        let updated: Option<SurrealConceptGroup> = self
            .client
            .update(("concept_group", id.as_str()))
            .content(SurrealConceptGroup::from(group))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update concept group: {}", e)))?;

        updated.map(ConceptGroup::from).ok_or_else(|| {
            StorageError::NotFound(format!("Concept group with ID {} not found", id))
        })
    }

    async fn list_concept_groups(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ConceptGroup>, StorageError> {
        let query = format!(
            "SELECT * FROM concept_group ORDER BY created_ts ASC, key ASC{}",
            limit_clause(limit)
        );

        let mut result = self
            .client
            .query(query)
            .await
            .map_err(|e| StorageError::Query(format!("Failed to list concept groups: {}", e)))?;

        let groups: Vec<SurrealConceptGroup> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract concept groups: {}", e)))?;

        Ok(groups.into_iter().map(ConceptGroup::from).collect())
    }
}
