//! Similarity scoring between dictionary entries.
//!
//! The score combines category identity with keyword-set overlap. It is a
//! surface-lexical measure only; no embeddings, stemming or cross-lingual
//! normalization are involved.

mod jaccard;
mod scorer;

pub use jaccard::jaccard;
pub use scorer::{SimilarityResult, SimilarityScorer};

/// Recommendation derived from a score; the same three outcomes as a human
/// decision
pub type Recommendation = crate::models::Decision;
