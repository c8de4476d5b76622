//! Translation workflow handlers: propose, suggest, validate, vote

use crate::args::*;
use crate::context::GlossaCliContext;
use crate::output::*;
use glossa::engine::ValidationAction;
use serde_json::json;

impl From<ValidationChoice> for ValidationAction {
    fn from(choice: ValidationChoice) -> Self {
        match choice {
            ValidationChoice::Merge => ValidationAction::AcceptMerge,
            ValidationChoice::Separate => ValidationAction::AcceptSeparate,
        }
    }
}

pub async fn handle_propose_command(
    args: ProposeArgs,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    let outcome = ctx
        .engine
        .propose_translation(
            &ctx.user,
            &args.source_id,
            &args.language,
            &args.text,
            args.context.as_deref(),
        )
        .await?;

    if output_format == OutputFormat::Json {
        print_json(&outcome);
    } else {
        print_proposal(&outcome);
    }
    Ok(())
}

pub async fn handle_suggest_command(
    args: SuggestArgs,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    let suggestions = ctx
        .engine
        .suggest_candidates(
            &args.source_id,
            &args.language,
            args.search.as_deref(),
            args.min_similarity,
        )
        .await?;

    if output_format == OutputFormat::Json {
        print_json(&suggestions);
    } else {
        print_suggestions(&suggestions);
    }
    Ok(())
}

pub async fn handle_validate_command(
    args: ValidateArgs,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    let outcome = ctx
        .engine
        .validate_translation(
            &ctx.user,
            &args.translation_id,
            args.action.into(),
            args.reason.as_deref(),
            args.confidence,
        )
        .await?;

    if output_format == OutputFormat::Json {
        print_json(&outcome);
    } else {
        print_validation(&outcome);
    }
    Ok(())
}

pub async fn handle_vote_command(
    args: VoteArgs,
    ctx: &GlossaCliContext,
    output_format: OutputFormat,
) -> glossa::Result<()> {
    let outcome = ctx
        .engine
        .vote(&ctx.user, &args.translation_id, args.direction.value())
        .await?;

    if output_format == OutputFormat::Json {
        print_json(&json!({
            "translation_id": args.translation_id,
            "new_vote_count": outcome.new_vote_count,
        }));
    } else {
        println!(
            "{}",
            format_success(&format!("Vote recorded (score: {})", outcome.new_vote_count))
        );
    }
    Ok(())
}
