//! Schema initialization for the SurrealDB lexicon store

use crate::storage::errors::StorageError;
use surrealdb::{Connection, Surreal};

/// Tables owned by the store, in drop order
pub const TABLES: [&str; 5] = ["vote", "case_record", "translation", "concept_group", "entry"];

/// Initialize tables and indexes
pub async fn initialize_schema<C>(client: &Surreal<C>) -> Result<(), StorageError>
where
    C: Connection,
{
    let entry_table_query = r#"
        DEFINE TABLE IF NOT EXISTS entry SCHEMALESS
        COMMENT "Dictionary entries read by the merge engine";

        DEFINE INDEX IF NOT EXISTS entry_key_idx ON entry FIELDS key UNIQUE;
        DEFINE INDEX IF NOT EXISTS entry_language_idx ON entry FIELDS language;
        DEFINE INDEX IF NOT EXISTS entry_category_idx ON entry FIELDS category_id;
        DEFINE INDEX IF NOT EXISTS entry_word_idx ON entry FIELDS word_lower;
    "#;

    let translation_table_query = r#"
        DEFINE TABLE IF NOT EXISTS translation SCHEMALESS
        COMMENT "Proposed translations between entries";

        DEFINE INDEX IF NOT EXISTS translation_key_idx ON translation FIELDS key UNIQUE;
        DEFINE INDEX IF NOT EXISTS translation_source_idx ON translation FIELDS source_entry_id, target_language;
        DEFINE INDEX IF NOT EXISTS translation_target_idx ON translation FIELDS target_entry_id;
        DEFINE INDEX IF NOT EXISTS translation_group_idx ON translation FIELDS translation_group_id;
    "#;

    let vote_table_query = r#"
        DEFINE TABLE IF NOT EXISTS vote SCHEMALESS
        COMMENT "One vote per user per translation";

        DEFINE INDEX IF NOT EXISTS vote_unique_idx ON vote FIELDS translation_id, user_id UNIQUE;
    "#;

    let case_table_query = r#"
        DEFINE TABLE IF NOT EXISTS case_record SCHEMALESS
        COMMENT "Adjudicated entry pairs";

        DEFINE INDEX IF NOT EXISTS case_pair_idx ON case_record FIELDS source_entry_id, target_entry_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS case_score_idx ON case_record FIELDS similarity_score;
        DEFINE INDEX IF NOT EXISTS case_decided_idx ON case_record FIELDS decided_ts;
    "#;

    let group_table_query = r#"
        DEFINE TABLE IF NOT EXISTS concept_group SCHEMALESS
        COMMENT "Clusters of translations sharing one concept";

        DEFINE INDEX IF NOT EXISTS concept_group_key_idx ON concept_group FIELDS key UNIQUE;
    "#;

    execute_schema_query(client, entry_table_query, "entry table").await?;
    execute_schema_query(client, translation_table_query, "translation table").await?;
    execute_schema_query(client, vote_table_query, "vote table").await?;
    execute_schema_query(client, case_table_query, "case_record table").await?;
    execute_schema_query(client, group_table_query, "concept_group table").await?;

    tracing::info!("Lexicon schema initialized");
    Ok(())
}

/// Execute a schema query and handle errors
async fn execute_schema_query<C>(
    client: &Surreal<C>,
    query: &str,
    description: &str,
) -> Result<(), StorageError>
where
    C: Connection,
{
    client
        .query(query)
        .await
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?
        .check()
        .map_err(|e| StorageError::Query(format!("Failed to create {}: {}", description, e)))?;

    tracing::debug!("Created {} successfully", description);
    Ok(())
}
