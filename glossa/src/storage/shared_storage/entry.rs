//! Entry storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::{Connection, RecordId};

use super::base::{SharedStorage, limit_clause};
use crate::models::{DictionaryEntry, EntryStatus, KeywordSet, Meaning};
use crate::storage::errors::StorageError;
use crate::storage::filters::EntryFilter;
use crate::storage::traits::EntryStore;

/// Internal representation of an entry record for SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealEntry {
    key: String,
    word: String,
    word_lower: String,
    language: String,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    meanings: Vec<Meaning>,
    #[serde(default)]
    keywords: Option<KeywordSet>,
    #[serde(default)]
    etymology: Option<String>,
    status: EntryStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DictionaryEntry> for SurrealEntry {
    fn from(entry: DictionaryEntry) -> Self {
        Self {
            word_lower: entry.word.to_lowercase(),
            key: entry.id,
            word: entry.word,
            language: entry.language,
            category_id: entry.category_id,
            meanings: entry.meanings,
            keywords: entry.keywords,
            etymology: entry.etymology,
            status: entry.status,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

impl From<SurrealEntry> for DictionaryEntry {
    fn from(row: SurrealEntry) -> Self {
        Self {
            id: row.key,
            word: row.word,
            language: row.language,
            category_id: row.category_id,
            meanings: row.meanings,
            keywords: row.keywords,
            etymology: row.etymology,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Build the WHERE clause and bindings for an entry filter
fn entry_conditions(filter: &EntryFilter) -> (Vec<String>, Vec<(&'static str, Value)>) {
    let mut conditions = Vec::new();
    let mut binds: Vec<(&'static str, Value)> = Vec::new();

    if let Some(ids) = &filter.ids {
        conditions.push("key IN $ids".to_string());
        binds.push(("ids", Value::from(ids.clone())));
    }
    if let Some(excluded) = &filter.exclude_ids
        && !excluded.is_empty()
    {
        conditions.push("key NOTINSIDE $exclude_ids".to_string());
        binds.push(("exclude_ids", Value::from(excluded.clone())));
    }
    if let Some(language) = &filter.language {
        conditions.push("language = $language".to_string());
        binds.push(("language", Value::from(language.clone())));
    }
    if let Some(status) = filter.status {
        conditions.push("status = $status".to_string());
        binds.push(("status", Value::from(status.to_string())));
    }

    match (&filter.text, &filter.category_id) {
        (Some(text), Some(category)) => {
            conditions
                .push("(word_lower CONTAINS $text OR category_id = $category_id)".to_string());
            binds.push(("text", Value::from(text.to_lowercase())));
            binds.push(("category_id", Value::from(category.clone())));
        }
        (Some(text), None) => {
            conditions.push("word_lower CONTAINS $text".to_string());
            binds.push(("text", Value::from(text.to_lowercase())));
        }
        (None, Some(category)) => {
            conditions.push("category_id = $category_id".to_string());
            binds.push(("category_id", Value::from(category.clone())));
        }
        (None, None) => {}
    }

    (conditions, binds)
}

#[async_trait]
impl<C> EntryStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn create_entry(&self, entry: DictionaryEntry) -> Result<DictionaryEntry, StorageError> {
        let id = entry.id.clone();
        let created: Option<SurrealEntry> = self
            .client
            .create(("entry", id.as_str()))
            .content(SurrealEntry::from(entry))
            .await
            .map_err(|e| {
                if e.to_string().contains("already exists") {
                    StorageError::AlreadyExists(format!("Entry with ID {} already exists", id))
                } else {
                    StorageError::Query(format!("Failed to create entry: {}", e))
                }
            })?;

        created
            .map(DictionaryEntry::from)
            .ok_or_else(|| StorageError::Internal("No entry created".to_string()))
    }

    async fn get_entry(&self, id: &str) -> Result<Option<DictionaryEntry>, StorageError> {
        let entry: Option<SurrealEntry> = self
            .client
            .select(("entry", id))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get entry: {}", e)))?;

        Ok(entry.map(DictionaryEntry::from))
    }

    async fn search_entries(
        &self,
        filter: EntryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<DictionaryEntry>, StorageError> {
        let (conditions, binds) = entry_conditions(&filter);

        let mut query = "SELECT * FROM entry".to_string();
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY word_lower ASC, key ASC");
        query.push_str(&limit_clause(limit));

        let mut request = self.client.query(query);
        for bind in binds {
            request = request.bind(bind);
        }

        let mut result = request
            .await
            .map_err(|e| StorageError::Query(format!("Failed to search entries: {}", e)))?;

        let entries: Vec<SurrealEntry> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract entries: {}", e)))?;

        Ok(entries.into_iter().map(DictionaryEntry::from).collect())
    }

    async fn update_entry_keywords(
        &self,
        id: &str,
        keywords: KeywordSet,
    ) -> Result<DictionaryEntry, StorageError> {
        let update_query = r#"
            UPDATE $record_id MERGE {
                keywords: $keywords,
                updated_at: $updated_at
            }
        "#;

        let mut response = self
            .client
            .query(update_query)
            .bind(("record_id", RecordId::from(("entry", id))))
            .bind(("keywords", keywords))
            .bind(("updated_at", Utc::now()))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to update entry: {}", e)))?;

        let updated: Option<SurrealEntry> = response
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract updated entry: {}", e)))?;

        updated
            .map(DictionaryEntry::from)
            .ok_or_else(|| StorageError::NotFound(format!("Entry with ID {} not found", id)))
    }

    async fn count_entries(&self, filter: Option<EntryFilter>) -> Result<usize, StorageError> {
        let entries = self
            .search_entries(filter.unwrap_or_default(), None)
            .await?;
        Ok(entries.len())
    }
}
