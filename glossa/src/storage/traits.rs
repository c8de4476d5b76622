//! Trait definitions for the storage collaborators the engine depends on

use async_trait::async_trait;
use std::fmt::Debug;

use crate::models::{
    CaseRecord, ConceptGroup, DictionaryEntry, KeywordSet, PairIdentity, Translation, Vote,
    pair_key,
};
use crate::storage::errors::StorageError;
use crate::storage::filters::{CaseFilter, EntryFilter, TranslationFilter};

/// Base trait for all storage implementations
#[async_trait]
pub trait BaseStore: Send + Sync + 'static + Debug {
    /// Check if the store is healthy and available
    async fn health_check(&self) -> Result<bool, StorageError>;

    /// Clear all data in the store
    async fn clear(&self) -> Result<(), StorageError>;

    /// Get metadata about the store
    async fn get_metadata(&self) -> Result<serde_json::Value, StorageError>;

    /// Close connections and release resources
    async fn close(&self) -> Result<(), StorageError>;
}

/// Dictionary entries (owned by the content layer)
#[async_trait]
pub trait EntryStore: BaseStore {
    /// Create a new entry
    async fn create_entry(&self, entry: DictionaryEntry) -> Result<DictionaryEntry, StorageError>;

    /// Get an entry by its ID
    async fn get_entry(&self, id: &str) -> Result<Option<DictionaryEntry>, StorageError>;

    /// Search entries, ordered by headword
    async fn search_entries(
        &self,
        filter: EntryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<DictionaryEntry>, StorageError>;

    /// Write back a cached keyword set
    async fn update_entry_keywords(
        &self,
        id: &str,
        keywords: KeywordSet,
    ) -> Result<DictionaryEntry, StorageError>;

    /// Count entries with optional filtering
    async fn count_entries(&self, filter: Option<EntryFilter>) -> Result<usize, StorageError>;

    /// List entries, optionally filtered
    async fn list_entries(
        &self,
        filter: Option<EntryFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<DictionaryEntry>, StorageError> {
        self.search_entries(filter.unwrap_or_default(), limit).await
    }
}

/// Translations and their votes
#[async_trait]
pub trait TranslationStore: BaseStore {
    async fn create_translation(
        &self,
        translation: Translation,
    ) -> Result<Translation, StorageError>;

    async fn get_translation(&self, id: &str) -> Result<Option<Translation>, StorageError>;

    /// Replace a stored translation
    async fn update_translation(
        &self,
        translation: Translation,
    ) -> Result<Translation, StorageError>;

    /// Find an existing translation of `source_id` into `language` with the
    /// same text (case-insensitive)
    async fn find_translation(
        &self,
        source_id: &str,
        language: &str,
        text: &str,
    ) -> Result<Option<Translation>, StorageError>;

    async fn list_translations(
        &self,
        filter: TranslationFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Translation>, StorageError>;

    /// Record a vote and return the translation's new tally.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if the user already voted.
    async fn record_vote(&self, vote: Vote) -> Result<i64, StorageError>;
}

/// Case memory: the log of adjudicated pairs
#[async_trait]
pub trait CaseStore: BaseStore {
    /// Get a case by its pair key
    async fn get_case(&self, key: &str) -> Result<Option<CaseRecord>, StorageError>;

    /// Insert or overwrite the case keyed by `record.id`
    async fn upsert_case(&self, record: CaseRecord) -> Result<CaseRecord, StorageError>;

    /// Query cases, most recent first
    async fn query_cases(
        &self,
        filter: CaseFilter,
        limit: Option<usize>,
    ) -> Result<Vec<CaseRecord>, StorageError>;

    /// Count cases with optional filtering
    async fn count_cases(&self, filter: Option<CaseFilter>) -> Result<usize, StorageError>;

    /// Find the case recorded for a pair under the given identity mode
    async fn find_case_by_pair(
        &self,
        source_id: &str,
        target_id: &str,
        identity: PairIdentity,
    ) -> Result<Option<CaseRecord>, StorageError> {
        self.get_case(&pair_key(source_id, target_id, identity))
            .await
    }
}

/// Concept groups
#[async_trait]
pub trait ConceptGroupStore: BaseStore {
    async fn create_concept_group(
        &self,
        group: ConceptGroup,
    ) -> Result<ConceptGroup, StorageError>;

    async fn get_concept_group(&self, id: &str) -> Result<Option<ConceptGroup>, StorageError>;

    async fn update_concept_group(
        &self,
        group: ConceptGroup,
    ) -> Result<ConceptGroup, StorageError>;

    async fn list_concept_groups(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ConceptGroup>, StorageError>;
}

/// Combined trait for everything the merge engine needs
pub trait LexiconStore: EntryStore + TranslationStore + CaseStore + ConceptGroupStore {}

impl<T> LexiconStore for T where T: EntryStore + TranslationStore + CaseStore + ConceptGroupStore {}
