pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;

pub use args::{Cli, OutputFormat};
pub use context::GlossaCliContext;
pub use output::{
    CliColors, format_action, format_decision, format_error, format_info, format_success,
    format_warning, output_error, print_calibration, print_cases, print_entry, print_entry_list,
    print_insights, print_json, print_proposal, print_suggestions, print_validation,
};
