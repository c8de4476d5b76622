//! Command argument structures
//!
//! This module contains the top-level CLI definition and all argument structs
//! organized by command category.

use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

use crate::commands::Commands;

#[derive(Parser)]
#[command(name = "glossa-cli")]
#[command(about = "Glossa translation merge engine CLI", long_about = None)]
#[command(version = glossa::VERSION)]
pub struct Cli {
    /// Custom data directory for storage
    #[arg(long, short, global = true)]
    pub data_dir: Option<String>,

    /// Output format - use json for tool integration
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub output: OutputFormat,

    /// User id recorded as submitter, validator or voter
    #[arg(long, short, default_value = "cli", global = true)]
    pub user: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

// Entry command arguments
#[derive(Args)]
pub struct AddEntryArgs {
    /// Headword
    pub word: String,

    /// Language code (e.g. fr, es)
    pub language: String,

    /// Explicit entry id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Subject category id
    #[arg(long, short)]
    pub category: Option<String>,

    /// Definition of a meaning; repeat for several meanings
    #[arg(long = "definition", short = 'D')]
    pub definitions: Vec<String>,

    /// Usage example, attached to the first meaning
    #[arg(long = "example", short = 'e')]
    pub examples: Vec<String>,

    /// Synonym, attached to the first meaning
    #[arg(long = "synonym", short = 's')]
    pub synonyms: Vec<String>,

    /// Etymology note
    #[arg(long)]
    pub etymology: Option<String>,

    /// Status (draft, published, archived)
    #[arg(long, default_value = "published")]
    pub status: String,
}

#[derive(Args)]
pub struct GetEntryArgs {
    /// Entry ID
    pub id: String,
}

#[derive(Args)]
pub struct ListEntriesArgs {
    /// Filter by language
    #[arg(long, short)]
    pub language: Option<String>,

    /// Filter by category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Substring of the headword
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct ImportEntriesArgs {
    /// JSON file holding an array of entries
    pub file: PathBuf,
}

// Translation command arguments
#[derive(Args)]
pub struct ProposeArgs {
    /// Source entry ID
    pub source_id: String,

    /// Target language code
    pub language: String,

    /// Proposed translation text
    pub text: String,

    /// Context note stored with the translation
    #[arg(long)]
    pub context: Option<String>,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Source entry ID
    pub source_id: String,

    /// Target language code
    pub language: String,

    /// Substring to match candidate headwords against
    #[arg(long)]
    pub search: Option<String>,

    /// Minimum similarity score (0.0 to 1.0)
    #[arg(long)]
    pub min_similarity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidationChoice {
    /// Same concept as the target entry
    Merge,
    /// Distinct concept
    Separate,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Translation ID
    pub translation_id: String,

    /// Decision
    #[arg(value_enum)]
    pub action: ValidationChoice,

    /// Reason recorded with the case
    #[arg(long, short)]
    pub reason: Option<String>,

    /// Confidence to store on the translation (0.0 to 1.0)
    #[arg(long)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn value(self) -> i8 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

#[derive(Args)]
pub struct VoteArgs {
    /// Translation ID
    pub translation_id: String,

    /// Vote direction
    #[arg(value_enum)]
    pub direction: VoteDirection,
}

// Learning command arguments
#[derive(Args)]
pub struct ListCasesArgs {
    /// Filter by human decision (merge, separate, uncertain)
    #[arg(long)]
    pub decision: Option<String>,

    /// Minimum recorded score
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Maximum recorded score
    #[arg(long)]
    pub max_score: Option<f64>,

    /// Filter by validating user
    #[arg(long)]
    pub validated_by: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args)]
pub struct InsightsArgs {
    /// Number of most recent cases to analyse
    #[arg(long)]
    pub sample_size: Option<usize>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
