//! The decision policy for proposals.
//!
//! The final action always comes from the score bands. The case-based
//! prediction contributes the confidence and the rationale, and its own
//! action is kept for audit. When the two disagree the rationale says so.

use serde::{Deserialize, Serialize};

use crate::models::{Decision, ThresholdConfig};
use crate::prediction::Prediction;
use crate::similarity::SimilarityResult;

/// Outcome of the decision policy for one candidate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    /// Action chosen from the score bands
    pub action: Decision,

    /// Confidence reported by the predictor
    pub confidence: f64,

    pub reasoning: Vec<String>,

    /// What case history alone would have done
    pub predicted_action: Decision,
}

/// Choose the action for a scored pair.
///
/// `score > auto_merge` merges, `score > ask_user` asks a human, anything
/// else stays separate.
pub fn decide(
    similarity: &SimilarityResult,
    prediction: Prediction,
    thresholds: &ThresholdConfig,
) -> DecisionOutcome {
    let action = thresholds.recommend(similarity.score);
    let mut reasoning = prediction.reasoning;

    reasoning.push(format!(
        "Score {:.2} falls in the {} band (merge > {:.2}, ask > {:.2})",
        similarity.score, action, thresholds.auto_merge_threshold, thresholds.ask_user_threshold
    ));
    if prediction.action != action {
        reasoning.push(format!(
            "Case history leans {} but the score band decides {}",
            prediction.action, action
        ));
    }

    DecisionOutcome {
        action,
        confidence: prediction.confidence,
        reasoning,
        predicted_action: prediction.action,
    }
}
