use clap::Parser;
use colored::Colorize;
use glossa_cli::commands::Commands;
use glossa_cli::handlers::*;
use glossa_cli::{Cli, CliColors, GlossaCliContext, OutputFormat, output_error};
use tracing::Level;

fn parse_level(level: Option<&str>) -> Level {
    match level.map(str::to_lowercase).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("error") => Level::ERROR,
        _ => Level::WARN,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let output_format = cli.output;

    tracing_subscriber::fmt()
        .with_max_level(parse_level(cli.log_level.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        output_error(&e, output_format);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> glossa::Result<()> {
    let output_format = cli.output;

    match cli.command {
        Commands::Version => {
            if output_format == OutputFormat::Json {
                glossa_cli::print_json(&serde_json::json!({ "version": glossa::VERSION }));
            } else {
                println!(
                    "{} {}",
                    "glossa-cli".color(CliColors::accent()).bold(),
                    glossa::VERSION
                );
            }
            return Ok(());
        }
        Commands::Completions(args) => {
            handle_completions_command(args);
            return Ok(());
        }
        _ => {}
    }

    let ctx = GlossaCliContext::new(cli.data_dir, cli.user).await?;

    match cli.command {
        Commands::Entry(cmd) => handle_entry_command(cmd, &ctx, output_format).await,
        Commands::Propose(args) => handle_propose_command(args, &ctx, output_format).await,
        Commands::Suggest(args) => handle_suggest_command(args, &ctx, output_format).await,
        Commands::Validate(args) => handle_validate_command(args, &ctx, output_format).await,
        Commands::Vote(args) => handle_vote_command(args, &ctx, output_format).await,
        Commands::Cases(cmd) => handle_case_command(cmd, &ctx, output_format).await,
        Commands::Insights(args) => handle_insights_command(args, &ctx, output_format).await,
        Commands::Recalibrate => handle_recalibrate_command(&ctx, output_format).await,
        Commands::Version | Commands::Completions(_) => Ok(()),
    }
}
