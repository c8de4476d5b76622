//! Command enum definitions
//!
//! This module contains all CLI command enums that define the command structure.

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Display version information
    Version,

    /// Dictionary entry commands
    #[command(subcommand)]
    Entry(EntryCommands),

    /// Propose a translation and let the engine merge, separate or ask
    #[command(
        long_about = r#"
Propose a translation of an entry into another language. Glossa looks for
target-language entries that name the same concept and then:

  • merged       - the best candidate scored in the merge band; the
                   translation joins its concept group
  • separated    - nothing was close enough; stored as a new concept
  • needs_review - the best candidate is a possible duplicate; nothing
                   is stored and a human has to decide

EXAMPLES:
  glossa-cli propose fr-soleil es sol
  glossa-cli propose fr-soleil es "astro rey" --context poetic
"#
    )]
    Propose(ProposeArgs),

    /// Score candidate target-language entries for a source entry
    Suggest(SuggestArgs),

    /// Record a human merge/separate decision for a translation
    Validate(ValidateArgs),

    /// Vote a translation up or down (once per user)
    Vote(VoteArgs),

    /// Case memory commands
    #[command(subcommand)]
    Cases(CaseCommands),

    /// Show how well the thresholds agree with past decisions
    Insights(InsightsArgs),

    /// Recompute thresholds from case memory
    Recalibrate,

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add a dictionary entry
    Add(AddEntryArgs),

    /// Get an entry by ID
    #[command(alias = "show")]
    Get(GetEntryArgs),

    /// List entries with optional filters
    List(ListEntriesArgs),

    /// Import entries from a JSON file
    Import(ImportEntriesArgs),
}

#[derive(Subcommand)]
pub enum CaseCommands {
    /// List recorded cases, most recent first
    List(ListCasesArgs),
}
