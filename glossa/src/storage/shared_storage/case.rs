//! Case memory storage implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surrealdb::Connection;

use super::base::{SharedStorage, limit_clause};
use crate::models::{CaseContext, CaseRecord, Decision, ValidationType};
use crate::storage::errors::StorageError;
use crate::storage::filters::CaseFilter;
use crate::storage::traits::CaseStore;

/// Internal representation of a case record for SurrealDB.
///
/// `category_match` is duplicated out of the context so it can be filtered
/// on directly; `decided_ts` gives a numeric sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SurrealCase {
    key: String,
    source_entry_id: String,
    target_entry_id: String,
    similarity_score: f64,
    human_decision: Decision,
    validated_by: String,
    category_match: bool,
    context: CaseContext,
    validation_type: ValidationType,
    was_correct_prediction: bool,
    #[serde(default)]
    reason: Option<String>,
    decided_at: DateTime<Utc>,
    decided_ts: i64,
}

impl From<CaseRecord> for SurrealCase {
    fn from(record: CaseRecord) -> Self {
        Self {
            key: record.id,
            source_entry_id: record.source_entry_id,
            target_entry_id: record.target_entry_id,
            similarity_score: record.similarity_score,
            human_decision: record.human_decision,
            validated_by: record.validated_by,
            category_match: record.context.category_match,
            context: record.context,
            validation_type: record.validation_type,
            was_correct_prediction: record.was_correct_prediction,
            reason: record.reason,
            decided_ts: record.decided_at.timestamp_millis(),
            decided_at: record.decided_at,
        }
    }
}

impl From<SurrealCase> for CaseRecord {
    fn from(row: SurrealCase) -> Self {
        Self {
            id: row.key,
            source_entry_id: row.source_entry_id,
            target_entry_id: row.target_entry_id,
            similarity_score: row.similarity_score,
            human_decision: row.human_decision,
            validated_by: row.validated_by,
            context: row.context,
            validation_type: row.validation_type,
            was_correct_prediction: row.was_correct_prediction,
            reason: row.reason,
            decided_at: row.decided_at,
        }
    }
}

#[async_trait]
impl<C> CaseStore for SharedStorage<C>
where
    C: Connection + Clone + Send + Sync + std::fmt::Debug + 'static,
{
    async fn get_case(&self, key: &str) -> Result<Option<CaseRecord>, StorageError> {
        let case: Option<SurrealCase> = self
            .client
            .select(("case_record", key))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to get case: {}", e)))?;

        Ok(case.map(CaseRecord::from))
    }

    async fn upsert_case(&self, record: CaseRecord) -> Result<CaseRecord, StorageError> {
        let key = record.id.clone();

        // Keyed by the pair, so a second decision replaces the first
        let stored: Option<SurrealCase> = self
            .client
            .upsert(("case_record", key.as_str()))
            .content(SurrealCase::from(record))
            .await
            .map_err(|e| StorageError::Query(format!("Failed to upsert case: {}", e)))?;

        stored
            .map(CaseRecord::from)
            .ok_or_else(|| StorageError::Internal(format!("Case {} was not stored", key)))
    }

    async fn query_cases(
        &self,
        filter: CaseFilter,
        limit: Option<usize>,
    ) -> Result<Vec<CaseRecord>, StorageError> {
        let (where_clause, binds) = case_conditions(&filter);

        let mut query = format!("SELECT * FROM case_record{}", where_clause);
        query.push_str(" ORDER BY decided_ts DESC, key ASC");
        query.push_str(&limit_clause(limit));

        let mut request = self.client.query(query);
        for bind in binds {
            request = request.bind(bind);
        }

        let mut result = request
            .await
            .map_err(|e| StorageError::Query(format!("Failed to query cases: {}", e)))?;

        let cases: Vec<SurrealCase> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract cases: {}", e)))?;

        Ok(cases.into_iter().map(CaseRecord::from).collect())
    }

    async fn count_cases(&self, filter: Option<CaseFilter>) -> Result<usize, StorageError> {
        let (where_clause, binds) = case_conditions(&filter.unwrap_or_default());
        let query = format!(
            "SELECT count() AS count FROM case_record{} GROUP ALL",
            where_clause
        );

        let mut request = self.client.query(query);
        for bind in binds {
            request = request.bind(bind);
        }

        let mut result = request
            .await
            .map_err(|e| StorageError::Query(format!("Failed to count cases: {}", e)))?;

        // An empty selection yields no row rather than a zero count
        let row: Option<CountRow> = result
            .take(0)
            .map_err(|e| StorageError::Query(format!("Failed to extract case count: {}", e)))?;

        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: usize,
}

/// Build the WHERE clause and its bindings for a case filter.
fn case_conditions(filter: &CaseFilter) -> (String, Vec<(&'static str, Value)>) {
    let mut conditions = Vec::new();
    let mut binds: Vec<(&'static str, Value)> = Vec::new();

    if let Some(min) = filter.min_score {
        conditions.push("similarity_score >= $min_score");
        binds.push(("min_score", Value::from(min)));
    }
    if let Some(max) = filter.max_score {
        conditions.push("similarity_score <= $max_score");
        binds.push(("max_score", Value::from(max)));
    }
    if let Some(category_match) = filter.category_match {
        conditions.push("category_match = $category_match");
        binds.push(("category_match", Value::from(category_match)));
    }
    if let Some(decision) = filter.decision {
        conditions.push("human_decision = $decision");
        binds.push(("decision", Value::from(decision.to_string())));
    }
    if let Some(user) = &filter.validated_by {
        conditions.push("validated_by = $validated_by");
        binds.push(("validated_by", Value::from(user.clone())));
    }

    if conditions.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), binds)
    }
}
