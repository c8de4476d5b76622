//! Simple in-memory storage for testing and development
//!
//! All tables live behind a single `RwLock`, so multi-table writes (a vote
//! plus its translation tally) are applied together.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{CaseRecord, ConceptGroup, DictionaryEntry, KeywordSet, Translation, Vote};
use crate::storage::errors::StorageError;
use crate::storage::filters::{CaseFilter, EntryFilter, TranslationFilter};
use crate::storage::traits::{
    BaseStore, CaseStore, ConceptGroupStore, EntryStore, TranslationStore,
};

#[derive(Debug, Default)]
struct Tables {
    entries: HashMap<String, DictionaryEntry>,
    translations: HashMap<String, Translation>,
    votes: HashMap<(String, String), Vote>,
    cases: HashMap<String, CaseRecord>,
    groups: HashMap<String, ConceptGroup>,
}

/// In-process implementation of every storage trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn health_check(&self) -> Result<bool, StorageError> {
        Ok(true)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.tables.write().await = Tables::default();
        Ok(())
    }

    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError> {
        let tables = self.tables.read().await;
        Ok(serde_json::json!({
            "type": "memory_store",
            "entry_count": tables.entries.len(),
            "translation_count": tables.translations.len(),
            "case_count": tables.cases.len(),
            "concept_group_count": tables.groups.len(),
        }))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn create_entry(&self, entry: DictionaryEntry) -> Result<DictionaryEntry, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.entries.contains_key(&entry.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Entry with ID {} already exists",
                entry.id
            )));
        }
        tables.entries.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn get_entry(&self, id: &str) -> Result<Option<DictionaryEntry>, StorageError> {
        Ok(self.tables.read().await.entries.get(id).cloned())
    }

    async fn search_entries(
        &self,
        filter: EntryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<DictionaryEntry>, StorageError> {
        let tables = self.tables.read().await;
        let mut found: Vec<DictionaryEntry> = tables
            .entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.word.cmp(&b.word).then_with(|| a.id.cmp(&b.id)));
        Ok(apply_limit(found, limit))
    }

    async fn update_entry_keywords(
        &self,
        id: &str,
        keywords: KeywordSet,
    ) -> Result<DictionaryEntry, StorageError> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .entries
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("Entry with ID {} not found", id)))?;
        entry.keywords = Some(keywords);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn count_entries(&self, filter: Option<EntryFilter>) -> Result<usize, StorageError> {
        let filter = filter.unwrap_or_default();
        let tables = self.tables.read().await;
        Ok(tables.entries.values().filter(|e| filter.matches(e)).count())
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn create_translation(
        &self,
        translation: Translation,
    ) -> Result<Translation, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.translations.contains_key(&translation.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Translation with ID {} already exists",
                translation.id
            )));
        }
        tables
            .translations
            .insert(translation.id.clone(), translation.clone());
        Ok(translation)
    }

    async fn get_translation(&self, id: &str) -> Result<Option<Translation>, StorageError> {
        Ok(self.tables.read().await.translations.get(id).cloned())
    }

    async fn update_translation(
        &self,
        translation: Translation,
    ) -> Result<Translation, StorageError> {
        let mut tables = self.tables.write().await;
        match tables.translations.get_mut(&translation.id) {
            Some(existing) => {
                *existing = translation.clone();
                Ok(translation)
            }
            None => Err(StorageError::NotFound(format!(
                "Translation with ID {} not found",
                translation.id
            ))),
        }
    }

    async fn find_translation(
        &self,
        source_id: &str,
        language: &str,
        text: &str,
    ) -> Result<Option<Translation>, StorageError> {
        let wanted = text.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .translations
            .values()
            .find(|t| {
                t.source_entry_id == source_id
                    && t.target_language == language
                    && t.text.to_lowercase() == wanted
            })
            .cloned())
    }

    async fn list_translations(
        &self,
        filter: TranslationFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Translation>, StorageError> {
        let tables = self.tables.read().await;
        let mut found: Vec<Translation> = tables
            .translations
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(apply_limit(found, limit))
    }

    async fn record_vote(&self, vote: Vote) -> Result<i64, StorageError> {
        let mut tables = self.tables.write().await;
        let key = (vote.translation_id.clone(), vote.user_id.clone());
        if tables.votes.contains_key(&key) {
            return Err(StorageError::AlreadyExists(format!(
                "User {} already voted on translation {}",
                vote.user_id, vote.translation_id
            )));
        }

        let translation = tables
            .translations
            .get_mut(&vote.translation_id)
            .ok_or_else(|| {
                StorageError::NotFound(format!(
                    "Translation with ID {} not found",
                    vote.translation_id
                ))
            })?;
        translation.vote_count += i64::from(vote.value);
        translation.updated_at = Utc::now();
        let tally = translation.vote_count;

        tables.votes.insert(key, vote);
        Ok(tally)
    }
}

#[async_trait]
impl CaseStore for MemoryStore {
    async fn get_case(&self, key: &str) -> Result<Option<CaseRecord>, StorageError> {
        Ok(self.tables.read().await.cases.get(key).cloned())
    }

    async fn upsert_case(&self, record: CaseRecord) -> Result<CaseRecord, StorageError> {
        let mut tables = self.tables.write().await;
        tables.cases.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn query_cases(
        &self,
        filter: CaseFilter,
        limit: Option<usize>,
    ) -> Result<Vec<CaseRecord>, StorageError> {
        let tables = self.tables.read().await;
        let mut found: Vec<CaseRecord> = tables
            .cases
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.decided_at.cmp(&a.decided_at).then_with(|| a.id.cmp(&b.id)));
        Ok(apply_limit(found, limit))
    }

    async fn count_cases(&self, filter: Option<CaseFilter>) -> Result<usize, StorageError> {
        let filter = filter.unwrap_or_default();
        let tables = self.tables.read().await;
        Ok(tables.cases.values().filter(|c| filter.matches(c)).count())
    }
}

#[async_trait]
impl ConceptGroupStore for MemoryStore {
    async fn create_concept_group(
        &self,
        group: ConceptGroup,
    ) -> Result<ConceptGroup, StorageError> {
        let mut tables = self.tables.write().await;
        if tables.groups.contains_key(&group.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Concept group with ID {} already exists",
                group.id
            )));
        }
        tables.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    async fn get_concept_group(&self, id: &str) -> Result<Option<ConceptGroup>, StorageError> {
        Ok(self.tables.read().await.groups.get(id).cloned())
    }

    async fn update_concept_group(
        &self,
        group: ConceptGroup,
    ) -> Result<ConceptGroup, StorageError> {
        let mut tables = self.tables.write().await;
        match tables.groups.get_mut(&group.id) {
            Some(existing) => {
                *existing = group.clone();
                Ok(group)
            }
            None => Err(StorageError::NotFound(format!(
                "Concept group with ID {} not found",
                group.id
            ))),
        }
    }

    async fn list_concept_groups(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ConceptGroup>, StorageError> {
        let tables = self.tables.read().await;
        let mut groups: Vec<ConceptGroup> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(apply_limit(groups, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseContext, Decision, PairIdentity, ValidationType};

    #[tokio::test]
    async fn test_vote_uniqueness() {
        let store = MemoryStore::new();
        let translation = Translation::new("src", "es", "solar", "alice");
        let id = translation.id.clone();
        store.create_translation(translation).await.unwrap();

        assert_eq!(store.record_vote(Vote::new(&id, "bob", 1)).await.unwrap(), 1);
        assert_eq!(store.record_vote(Vote::new(&id, "carol", -1)).await.unwrap(), 0);

        let err = store.record_vote(Vote::new(&id, "bob", -1)).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
        let stored = store.get_translation(&id).await.unwrap().unwrap();
        assert_eq!(stored.vote_count, 0);
    }

    #[tokio::test]
    async fn test_case_upsert_overwrites() {
        let store = MemoryStore::new();
        let first = CaseRecord::new(
            "a",
            "b",
            0.7,
            Decision::Merge,
            "u1",
            CaseContext::default(),
            ValidationType::Manual,
            PairIdentity::Ordered,
        );
        let second = CaseRecord::new(
            "a",
            "b",
            0.7,
            Decision::Separate,
            "u2",
            CaseContext::default(),
            ValidationType::Manual,
            PairIdentity::Ordered,
        );
        store.upsert_case(first).await.unwrap();
        store.upsert_case(second).await.unwrap();

        assert_eq!(store.count_cases(None).await.unwrap(), 1);
        let stored = store
            .find_case_by_pair("a", "b", PairIdentity::Ordered)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.human_decision, Decision::Separate);
        assert_eq!(stored.validated_by, "u2");
    }
}
