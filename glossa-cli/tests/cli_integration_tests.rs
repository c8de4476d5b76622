//! Integration tests for the Glossa CLI
//!
//! These cover argument parsing, the conversions from arguments to library
//! types, and the handlers run against an in-memory engine.

use clap::{CommandFactory, Parser};
use glossa::GlossaError;
use glossa::config::ConfigBuilder;
use glossa::engine::ProposalAction;
use glossa::models::{Decision, DictionaryEntry, EntryStatus};
use glossa::storage::filters::EntryFilter;
use glossa_cli::commands::{CaseCommands, Commands, EntryCommands};
use glossa_cli::handlers::entry::{entry_from_args, read_import_file};
use glossa_cli::handlers::learning::case_filter_from_args;
use glossa_cli::handlers::*;
use glossa_cli::{Cli, GlossaCliContext, OutputFormat};
use std::fs;
use tempfile::TempDir;

async fn create_test_context() -> GlossaCliContext {
    let config = ConfigBuilder::testing()
        .build()
        .expect("Failed to build config");
    GlossaCliContext::from_config(config, "tester")
        .await
        .expect("Failed to initialize Glossa")
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("Failed to parse arguments")
}

fn keyword_entry(id: &str, word: &str, language: &str, keywords: &[&str]) -> DictionaryEntry {
    DictionaryEntry::new(word, language)
        .with_id(id)
        .with_category("astronomy")
        .with_keywords(keywords.iter().copied())
}

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_propose_with_global_flags() {
    let cli = parse(&[
        "glossa-cli",
        "propose",
        "fr-soleil",
        "es",
        "sol",
        "--context",
        "poetic",
        "-o",
        "json",
        "--user",
        "alice",
    ]);

    assert_eq!(cli.output, OutputFormat::Json);
    assert_eq!(cli.user, "alice");
    match cli.command {
        Commands::Propose(args) => {
            assert_eq!(args.source_id, "fr-soleil");
            assert_eq!(args.language, "es");
            assert_eq!(args.text, "sol");
            assert_eq!(args.context.as_deref(), Some("poetic"));
        }
        _ => panic!("Expected propose command"),
    }
}

#[test]
fn test_parse_defaults_and_rejects_unknown_values() {
    let cli = parse(&["glossa-cli", "cases", "list"]);
    assert_eq!(cli.output, OutputFormat::Table);
    assert_eq!(cli.user, "cli");
    match cli.command {
        Commands::Cases(CaseCommands::List(args)) => assert_eq!(args.limit, 20),
        _ => panic!("Expected cases list command"),
    }

    assert!(Cli::try_parse_from(["glossa-cli", "validate", "t-1", "maybe"]).is_err());
    assert!(Cli::try_parse_from(["glossa-cli", "vote", "t-1", "sideways"]).is_err());
    assert!(Cli::try_parse_from(["glossa-cli", "-o", "yaml", "version"]).is_err());
}

#[test]
fn test_entry_show_alias() {
    let cli = parse(&["glossa-cli", "entry", "show", "fr-soleil"]);
    match cli.command {
        Commands::Entry(EntryCommands::Get(args)) => assert_eq!(args.id, "fr-soleil"),
        _ => panic!("Expected entry get command"),
    }
}

#[test]
fn test_entry_from_args_builds_meanings() {
    let cli = parse(&[
        "glossa-cli",
        "entry",
        "add",
        "soleil",
        "fr",
        "--id",
        "fr-soleil",
        "-c",
        "astronomy",
        "-D",
        "étoile au centre du système solaire",
        "-D",
        "lumière du jour",
        "-e",
        "le soleil se lève",
        "-s",
        "astre",
        "--status",
        "draft",
    ]);
    let Commands::Entry(EntryCommands::Add(args)) = cli.command else {
        panic!("Expected entry add command");
    };

    let entry = entry_from_args(args).unwrap();
    assert_eq!(entry.id, "fr-soleil");
    assert_eq!(entry.category_id.as_deref(), Some("astronomy"));
    assert_eq!(entry.status, EntryStatus::Draft);
    assert_eq!(entry.meanings.len(), 2);
    assert_eq!(entry.meanings[0].examples, vec!["le soleil se lève"]);
    assert_eq!(entry.meanings[0].synonyms, vec!["astre"]);
    assert!(entry.meanings[1].examples.is_empty());
}

#[test]
fn test_entry_from_args_rejects_bad_input() {
    let cli = parse(&["glossa-cli", "entry", "add", "sol", "es", "-e", "hace sol"]);
    let Commands::Entry(EntryCommands::Add(args)) = cli.command else {
        panic!("Expected entry add command");
    };
    assert!(matches!(entry_from_args(args), Err(GlossaError::Validation(_))));

    let cli = parse(&["glossa-cli", "entry", "add", "sol", "es", "--status", "gone"]);
    let Commands::Entry(EntryCommands::Add(args)) = cli.command else {
        panic!("Expected entry add command");
    };
    assert!(matches!(entry_from_args(args), Err(GlossaError::Validation(_))));
}

#[test]
fn test_case_filter_from_args() {
    let cli = parse(&[
        "glossa-cli",
        "cases",
        "list",
        "--decision",
        "Merge",
        "--min-score",
        "0.5",
        "--validated-by",
        "alice",
    ]);
    let Commands::Cases(CaseCommands::List(args)) = cli.command else {
        panic!("Expected cases list command");
    };
    let filter = case_filter_from_args(&args).unwrap();
    assert_eq!(filter.decision, Some(Decision::Merge));
    assert_eq!(filter.min_score, Some(0.5));
    assert_eq!(filter.max_score, None);
    assert_eq!(filter.validated_by.as_deref(), Some("alice"));

    let cli = parse(&["glossa-cli", "cases", "list", "--decision", "perhaps"]);
    let Commands::Cases(CaseCommands::List(args)) = cli.command else {
        panic!("Expected cases list command");
    };
    assert!(matches!(case_filter_from_args(&args), Err(GlossaError::Validation(_))));
}

#[tokio::test]
async fn test_import_entries_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("entries.json");
    fs::write(
        &path,
        r#"[
            {
                "id": "fr-lune",
                "word": "lune",
                "language": "fr",
                "category": "astronomy",
                "meanings": [{ "definition": "satellite naturel de la Terre" }]
            },
            { "word": "luna", "language": "es", "status": "draft" },
            { "word": "  ", "language": "es" }
        ]"#,
    )
    .expect("Failed to write import file");

    let entries = read_import_file(&path).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].id, "fr-lune");
    assert_eq!(entries[0].meanings.len(), 1);
    assert_eq!(entries[1].status, EntryStatus::Draft);

    let ctx = create_test_context().await;
    let cmd = EntryCommands::Import(glossa_cli::args::ImportEntriesArgs { file: path });
    handle_entry_command(cmd, &ctx, OutputFormat::Json)
        .await
        .unwrap();

    // The blank headword is skipped
    let stored = ctx.engine.list_entries(None, None).await.unwrap();
    assert_eq!(stored.len(), 2);

    let spanish = ctx
        .engine
        .list_entries(
            Some(EntryFilter {
                language: Some("es".to_string()),
                ..Default::default()
            }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(spanish.len(), 1);
    assert_eq!(spanish[0].word, "luna");
}

#[tokio::test]
async fn test_import_rejects_malformed_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("entries.json");
    fs::write(&path, r#"{ "word": "lune" }"#).expect("Failed to write import file");

    assert!(matches!(read_import_file(&path), Err(GlossaError::Validation(_))));
    assert!(matches!(
        read_import_file(&temp_dir.path().join("missing.json")),
        Err(GlossaError::Other(_))
    ));
}

#[tokio::test]
async fn test_translation_workflow_through_handlers() {
    let ctx = create_test_context().await;
    let keywords = ["astronomical", "luminous", "celestial"];
    ctx.engine
        .create_entry(keyword_entry("fr-soleil", "soleil", "fr", &keywords))
        .await
        .unwrap();
    ctx.engine
        .create_entry(keyword_entry("es-sol", "sol", "es", &keywords))
        .await
        .unwrap();

    let suggest = parse(&["glossa-cli", "suggest", "fr-soleil", "es"]);
    let Commands::Suggest(args) = suggest.command else {
        panic!("Expected suggest command");
    };
    handle_suggest_command(args, &ctx, OutputFormat::Table)
        .await
        .unwrap();

    let outcome = ctx
        .engine
        .propose_translation(&ctx.user, "fr-soleil", "es", "sol", None)
        .await
        .unwrap();
    assert_eq!(outcome.action, ProposalAction::Merged);
    let translation_id = outcome.translation_id.expect("merged translation is stored");

    let validate = parse(&[
        "glossa-cli",
        "validate",
        &translation_id,
        "separate",
        "--reason",
        "different register",
    ]);
    let Commands::Validate(args) = validate.command else {
        panic!("Expected validate command");
    };
    handle_validate_command(args, &ctx, OutputFormat::Json)
        .await
        .unwrap();

    let translation = ctx.engine.get_translation(&translation_id).await.unwrap();
    assert!(translation.target_entry_id.is_none());
    assert!(translation.translation_group_id.is_none());

    // Validation overwrites the auto-merge case for the same pair
    let cases = ctx.engine.list_cases(None, None).await.unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].human_decision, Decision::Separate);
    assert_eq!(cases[0].validated_by, "tester");
    assert_eq!(cases[0].reason.as_deref(), Some("different register"));

    let vote = parse(&["glossa-cli", "vote", &translation_id, "up"]);
    let Commands::Vote(args) = vote.command else {
        panic!("Expected vote command");
    };
    handle_vote_command(args, &ctx, OutputFormat::Table)
        .await
        .unwrap();

    let again = parse(&["glossa-cli", "vote", &translation_id, "down"]);
    let Commands::Vote(args) = again.command else {
        panic!("Expected vote command");
    };
    let result = handle_vote_command(args, &ctx, OutputFormat::Table).await;
    assert!(matches!(result, Err(GlossaError::InvalidVote(_))));

    let insights = parse(&["glossa-cli", "insights"]);
    let Commands::Insights(args) = insights.command else {
        panic!("Expected insights command");
    };
    handle_insights_command(args, &ctx, OutputFormat::Json)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_handlers_surface_not_found() {
    let ctx = create_test_context().await;

    let get = parse(&["glossa-cli", "entry", "get", "nope"]);
    let Commands::Entry(cmd) = get.command else {
        panic!("Expected entry command");
    };
    let result = handle_entry_command(cmd, &ctx, OutputFormat::Table).await;
    assert!(matches!(result, Err(GlossaError::NotFound { kind: "entry", .. })));

    let propose = parse(&["glossa-cli", "propose", "nope", "es", "sol"]);
    let Commands::Propose(args) = propose.command else {
        panic!("Expected propose command");
    };
    let result = handle_propose_command(args, &ctx, OutputFormat::Table).await;
    assert!(matches!(result, Err(GlossaError::NotFound { .. })));
}
