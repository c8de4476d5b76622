use colored::*;
use glossa::GlossaError;
use glossa::calibration::CalibrationResult;
use glossa::engine::{
    CandidateSuggestion, LearningInsights, ProposalAction, ProposalOutcome, ValidationOutcome,
};
use glossa::models::{CaseRecord, Decision, DictionaryEntry, ThresholdConfig};
use serde::Serialize;
use serde_json::json;

use crate::args::OutputFormat;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Output a GlossaError, as structured JSON in json mode
pub fn output_error(error: &GlossaError, output_format: OutputFormat) {
    if output_format == OutputFormat::Json {
        let (code, details) = match error {
            GlossaError::NotFound { kind, id } => {
                ("NOT_FOUND", Some(json!({ "kind": kind, "id": id })))
            }
            GlossaError::InvalidVote(_) => ("INVALID_VOTE", None),
            GlossaError::Validation(_) => ("VALIDATION_ERROR", None),
            GlossaError::Storage(_) => ("STORAGE_ERROR", None),
            GlossaError::Configuration(_) => ("CONFIGURATION_ERROR", None),
            GlossaError::Logging(_) => ("LOGGING_ERROR", None),
            GlossaError::Other(_) => ("ERROR", None),
        };

        let mut response = json!({
            "error": true,
            "code": code,
            "message": error.to_string(),
            "retryable": error.is_retryable(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        if let Some(details) = details {
            response["details"] = details;
        }
        print_json(&response);
    } else {
        eprintln!("{}", format_error(&error.to_string()));
    }
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_decision(decision: Decision) -> ColoredString {
    let text = decision.to_string();
    match decision {
        Decision::Merge => text.color(CliColors::success()),
        Decision::Uncertain => text.color(CliColors::warning()),
        Decision::Separate => text.color(CliColors::info()),
    }
}

pub fn format_action(action: ProposalAction) -> ColoredString {
    let text = action.to_string();
    match action {
        ProposalAction::Merged => text.color(CliColors::success()).bold(),
        ProposalAction::NeedsReview => text.color(CliColors::warning()).bold(),
        ProposalAction::Separated => text.color(CliColors::info()).bold(),
    }
}

fn format_score(score: f64) -> String {
    format!("{:.3}", score)
}

pub fn print_entry(entry: &DictionaryEntry) {
    println!("{}", "━━━ Entry Details ━━━".color(CliColors::info()).bold());
    println!(
        "{}: {}",
        "ID".color(CliColors::muted()),
        entry.id.color(CliColors::accent()).bold()
    );
    println!("{}: {}", "Word".color(CliColors::muted()), entry.word.bold());
    println!("{}: {}", "Language".color(CliColors::muted()), entry.language);
    println!(
        "{}: {}",
        "Category".color(CliColors::muted()),
        entry.category_id.as_deref().unwrap_or("-")
    );
    println!("{}: {}", "Status".color(CliColors::muted()), entry.status);

    for (i, meaning) in entry.meanings.iter().enumerate() {
        println!();
        println!(
            "{} {}",
            format!("{}.", i + 1).color(CliColors::muted()),
            meaning.definition
        );
        for example in &meaning.examples {
            println!("   {} {}", "e.g.".color(CliColors::muted()), example.italic());
        }
        if !meaning.synonyms.is_empty() {
            println!(
                "   {} {}",
                "syn.".color(CliColors::muted()),
                meaning.synonyms.join(", ")
            );
        }
    }

    if let Some(etymology) = &entry.etymology {
        println!();
        println!("{}: {}", "Etymology".color(CliColors::muted()), etymology);
    }
    if let Some(keywords) = &entry.keywords {
        let keywords: Vec<&str> = keywords.iter().map(String::as_str).collect();
        println!(
            "{}: {}",
            "Keywords".color(CliColors::muted()),
            keywords.join(", ")
        );
    }
}

pub fn print_entry_list(entries: &[DictionaryEntry]) {
    if entries.is_empty() {
        println!("{}", format_info("No entries found."));
        return;
    }

    println!(
        "{}",
        format_info(&format!("Found {} entries:", entries.len()))
    );
    println!();

    println!(
        "{:<36} {:<24} {:<6} {}",
        "ID".color(CliColors::muted()).bold(),
        "Word".color(CliColors::muted()).bold(),
        "Lang".color(CliColors::muted()).bold(),
        "Category".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(80).color(CliColors::muted()));

    for entry in entries {
        println!(
            "{:<36} {:<24} {:<6} {}",
            entry.id.color(CliColors::accent()),
            entry.word,
            entry.language,
            entry.category_id.as_deref().unwrap_or("-")
        );
    }
}

pub fn print_proposal(outcome: &ProposalOutcome) {
    println!("{} {}", format_action(outcome.action), outcome.message);

    if let Some(id) = &outcome.translation_id {
        println!(
            "{}: {}",
            "Translation".color(CliColors::muted()),
            id.color(CliColors::accent())
        );
    }
    if let Some(candidate) = &outcome.candidate_id {
        println!("{}: {}", "Candidate".color(CliColors::muted()), candidate);
    }
    if let Some(group) = &outcome.group_id {
        println!("{}: {}", "Concept group".color(CliColors::muted()), group);
    }
    if let Some(score) = outcome.score {
        println!("{}: {}", "Score".color(CliColors::muted()), format_score(score));
    }
    if let Some(confidence) = outcome.confidence {
        println!(
            "{}: {}",
            "Confidence".color(CliColors::muted()),
            format_score(confidence)
        );
    }

    if !outcome.reasoning.is_empty() {
        println!();
        for line in &outcome.reasoning {
            println!("  {} {}", "•".color(CliColors::muted()), line);
        }
    }
}

pub fn print_suggestions(suggestions: &[CandidateSuggestion]) {
    if suggestions.is_empty() {
        println!("{}", format_info("No candidates found."));
        return;
    }

    println!(
        "{:<36} {:<24} {:<7} {:<10} {}",
        "ID".color(CliColors::muted()).bold(),
        "Word".color(CliColors::muted()).bold(),
        "Score".color(CliColors::muted()).bold(),
        "Call".color(CliColors::muted()).bold(),
        "Shared keywords".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(100).color(CliColors::muted()));

    for suggestion in suggestions {
        let shared: Vec<&str> = suggestion
            .shared_keywords
            .iter()
            .map(String::as_str)
            .collect();
        println!(
            "{:<36} {:<24} {:<7} {:<10} {}",
            suggestion.candidate_id.color(CliColors::accent()),
            suggestion.word,
            format_score(suggestion.score),
            format_decision(suggestion.recommendation),
            shared.join(", ")
        );
    }
}

pub fn print_validation(outcome: &ValidationOutcome) {
    if outcome.success {
        println!(
            "{}",
            format_success(&format!(
                "Validation recorded ({} translation(s) updated)",
                outcome.affected_count
            ))
        );
    } else {
        println!("{}", format_warning("Validation did not change anything"));
    }
}

pub fn print_cases(cases: &[CaseRecord]) {
    if cases.is_empty() {
        println!("{}", format_info("No cases recorded."));
        return;
    }

    println!(
        "{:<48} {:<7} {:<10} {:<8} {}",
        "Pair".color(CliColors::muted()).bold(),
        "Score".color(CliColors::muted()).bold(),
        "Decision".color(CliColors::muted()).bold(),
        "Static".color(CliColors::muted()).bold(),
        "By".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(90).color(CliColors::muted()));

    for case in cases {
        let agreement = if case.was_correct_prediction {
            "agreed".color(CliColors::success())
        } else {
            "missed".color(CliColors::error())
        };
        println!(
            "{:<48} {:<7} {:<10} {:<8} {}",
            case.id,
            format_score(case.similarity_score),
            format_decision(case.human_decision),
            agreement,
            case.validated_by
        );
    }
}

fn print_thresholds(thresholds: &ThresholdConfig) {
    println!(
        "  {:<16} {}",
        "auto-merge".color(CliColors::muted()),
        format_score(thresholds.auto_merge_threshold)
    );
    println!(
        "  {:<16} {}",
        "ask user".color(CliColors::muted()),
        format_score(thresholds.ask_user_threshold)
    );
    println!(
        "  {:<16} {}",
        "auto-separate".color(CliColors::muted()),
        format_score(thresholds.auto_separate_threshold)
    );
}

pub fn print_calibration(result: &CalibrationResult) {
    println!(
        "{}",
        format_info(&format!(
            "Calibrated from {} cases ({} merges, {} separations)",
            result.case_count, result.merge_count, result.separate_count
        ))
    );
    print_thresholds(&result.thresholds);
}

pub fn print_insights(insights: &LearningInsights) {
    println!(
        "{}",
        "━━━ Learning Insights ━━━".color(CliColors::info()).bold()
    );
    println!(
        "{}: {}",
        "Cases analysed".color(CliColors::muted()),
        insights.sample_size
    );
    println!(
        "{}: {:.1}%",
        "Static threshold accuracy".color(CliColors::muted()),
        insights.overall_accuracy * 100.0
    );

    if !insights.accuracy_by_feature.is_empty() {
        println!();
        println!("{}", "Accuracy by feature".bold());
        for stat in insights.accuracy_by_feature.values() {
            println!(
                "  {:<24} {:>6.1}%  ({} cases)",
                stat.pattern.to_string(),
                stat.accuracy * 100.0,
                stat.count
            );
        }
    }

    if !insights.top_patterns.is_empty() {
        println!();
        println!("{}", "Top patterns".bold());
        for stat in &insights.top_patterns {
            println!(
                "  {:<24} {:>6.1}%",
                stat.pattern.to_string().color(CliColors::accent()),
                stat.accuracy * 100.0
            );
        }
    }

    println!();
    println!("{}", "Recommended thresholds".bold());
    print_thresholds(&insights.recommended_thresholds);
}
