//! Dictionary entry command handlers

use crate::args::*;
use crate::commands::EntryCommands;
use crate::context::GlossaCliContext;
use crate::output::*;
use colored::Colorize;
use glossa::GlossaError;
use glossa::models::{DictionaryEntry, EntryStatus, Meaning};
use glossa::storage::filters::EntryFilter;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;

/// One record of an import file
#[derive(Debug, Deserialize)]
struct ImportRecord {
    id: Option<String>,
    word: String,
    language: String,
    category: Option<String>,
    #[serde(default)]
    meanings: Vec<Meaning>,
    etymology: Option<String>,
    status: Option<EntryStatus>,
}

impl From<ImportRecord> for DictionaryEntry {
    fn from(record: ImportRecord) -> Self {
        let mut entry = DictionaryEntry::new(record.word, record.language);
        if let Some(id) = record.id {
            entry = entry.with_id(id);
        }
        if let Some(category) = record.category {
            entry = entry.with_category(category);
        }
        for meaning in record.meanings {
            entry = entry.with_meaning(meaning);
        }
        if let Some(etymology) = record.etymology {
            entry = entry.with_etymology(etymology);
        }
        if let Some(status) = record.status {
            entry = entry.with_status(status);
        }
        entry
    }
}

fn parse_status(status: &str) -> glossa::Result<EntryStatus> {
    status.parse().map_err(GlossaError::Validation)
}

/// Build an entry from `entry add` arguments.
///
/// Each `--definition` becomes a meaning; examples and synonyms attach to the first one.
pub fn entry_from_args(args: AddEntryArgs) -> glossa::Result<DictionaryEntry> {
    let status = parse_status(&args.status)?;
    let mut entry = DictionaryEntry::new(args.word, args.language).with_status(status);

    if let Some(id) = args.id {
        entry = entry.with_id(id);
    }
    if let Some(category) = args.category {
        entry = entry.with_category(category);
    }
    if let Some(etymology) = args.etymology {
        entry = entry.with_etymology(etymology);
    }

    let mut definitions = args.definitions.into_iter();
    if let Some(first) = definitions.next() {
        let mut meaning = Meaning::new(first);
        for example in args.examples {
            meaning = meaning.with_example(example);
        }
        for synonym in args.synonyms {
            meaning = meaning.with_synonym(synonym);
        }
        entry = entry.with_meaning(meaning);
    } else if !args.examples.is_empty() || !args.synonyms.is_empty() {
        return Err(GlossaError::Validation(
            "Examples and synonyms need at least one --definition".to_string(),
        ));
    }
    for definition in definitions {
        entry = entry.with_meaning(Meaning::new(definition));
    }

    Ok(entry)
}

/// Read an import file: a JSON array of entry records
pub fn read_import_file(path: &Path) -> glossa::Result<Vec<DictionaryEntry>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| GlossaError::Other(format!("Failed to read import file: {}", e)))?;
    let records: Vec<ImportRecord> = serde_json::from_str(&contents)
        .map_err(|e| GlossaError::Validation(format!("Invalid import file: {}", e)))?;
    Ok(records.into_iter().map(DictionaryEntry::from).collect())
}

pub async fn handle_entry_command(
    cmd: EntryCommands,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    match cmd {
        EntryCommands::Add(args) => {
            let entry = ctx.engine.create_entry(entry_from_args(args)?).await?;

            if output_format == OutputFormat::Json {
                print_json(&entry);
            } else {
                println!(
                    "{}",
                    format_success(&format!(
                        "Entry created with ID: {}",
                        entry.id.color(CliColors::accent()).bold()
                    ))
                );
            }
        }

        EntryCommands::Get(args) => {
            let entry = ctx.engine.get_entry(&args.id).await?;
            if output_format == OutputFormat::Json {
                print_json(&entry);
            } else {
                print_entry(&entry);
            }
        }

        EntryCommands::List(args) => {
            let filter = EntryFilter {
                language: args.language,
                category_id: args.category,
                text: args.search,
                ..Default::default()
            };
            let entries = ctx
                .engine
                .list_entries(Some(filter), Some(args.limit))
                .await?;

            if output_format == OutputFormat::Json {
                print_json(&entries);
            } else {
                print_entry_list(&entries);
            }
        }

        EntryCommands::Import(args) => {
            let entries = read_import_file(&args.file)?;
            let total = entries.len();
            let mut imported = Vec::with_capacity(total);
            let mut failures = Vec::new();

            for entry in entries {
                let word = entry.word.clone();
                match ctx.engine.create_entry(entry).await {
                    Ok(created) => imported.push(created.id),
                    Err(e) => {
                        tracing::warn!("Skipping entry '{}': {}", word, e);
                        failures.push(json!({ "word": word, "error": e.to_string() }));
                    }
                }
            }

            if output_format == OutputFormat::Json {
                print_json(&json!({
                    "total": total,
                    "imported": imported,
                    "failed": failures,
                }));
            } else {
                println!(
                    "{}",
                    format_success(&format!("Imported {}/{} entries", imported.len(), total))
                );
                if !failures.is_empty() {
                    println!(
                        "{}",
                        format_warning(&format!("{} entries failed to import", failures.len()))
                    );
                }
            }
        }
    }

    Ok(())
}
