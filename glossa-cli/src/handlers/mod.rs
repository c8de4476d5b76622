//! Command handlers for the Glossa CLI

pub mod entry;
pub mod learning;
pub mod translation;

pub use entry::handle_entry_command;
pub use learning::{
    handle_case_command, handle_completions_command, handle_insights_command,
    handle_recalibrate_command,
};
pub use translation::{
    handle_propose_command, handle_suggest_command, handle_validate_command, handle_vote_command,
};
