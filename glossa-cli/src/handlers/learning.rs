//! Case memory, insight and calibration handlers

use crate::args::*;
use crate::commands::CaseCommands;
use crate::context::GlossaCliContext;
use crate::output::*;
use clap::CommandFactory;
use glossa::GlossaError;
use glossa::models::Decision;
use glossa::storage::filters::CaseFilter;
use std::io;

/// Build a case filter from `cases list` arguments
pub fn case_filter_from_args(args: &ListCasesArgs) -> glossa::Result<CaseFilter> {
    let decision = args
        .decision
        .as_deref()
        .map(str::parse::<Decision>)
        .transpose()
        .map_err(GlossaError::Validation)?;

    Ok(CaseFilter {
        min_score: args.min_score,
        max_score: args.max_score,
        decision,
        validated_by: args.validated_by.clone(),
        ..Default::default()
    })
}

pub async fn handle_case_command(
    cmd: CaseCommands,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    match cmd {
        CaseCommands::List(args) => {
            let filter = case_filter_from_args(&args)?;
            let cases = ctx
                .engine
                .list_cases(Some(filter), Some(args.limit))
                .await?;

            if output_format == OutputFormat::Json {
                print_json(&cases);
            } else {
                print_cases(&cases);
            }
        }
    }
    Ok(())
}

pub async fn handle_insights_command(
    args: InsightsArgs,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    let insights = ctx.engine.get_learning_insights(args.sample_size).await?;

    if output_format == OutputFormat::Json {
        print_json(&insights);
    } else {
        print_insights(&insights);
    }
    Ok(())
}

/// Compute calibrated thresholds and report them.
///
/// Thresholds live in the engine's memory, so a one-shot CLI process only
/// reports the result.
pub async fn handle_recalibrate_command(
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    let result = ctx.engine.recalibrate_thresholds().await?;

    if output_format == OutputFormat::Json {
        print_json(&result);
    } else {
        print_calibration(&result);
    }
    Ok(())
}

pub fn handle_completions_command(args: CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "glossa-cli", &mut io::stdout());
}
