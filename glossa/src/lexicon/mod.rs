//! Keyword extraction from dictionary entries.
//!
//! A [`LexiconProfile`] carries the stop words, suffix patterns and length
//! thresholds as plain configuration; [`KeywordExtractor`] compiles it once
//! and derives keyword sets from entries.

mod defaults;
mod extractor;

pub use defaults::{STOP_WORDS, SUFFIX_PATTERNS};
pub use extractor::KeywordExtractor;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current version of the built-in profile
pub const PROFILE_VERSION: u32 = 1;

/// Serializable configuration of keyword extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconProfile {
    /// Bumped whenever the word lists change, so cached keyword sets can be
    /// traced to the profile that produced them
    pub version: u32,

    /// Tokens shorter than this are dropped
    pub min_token_chars: usize,

    /// Tokens at least this long are significant without a suffix match
    pub significant_chars: usize,

    /// Only the first N tokens of each usage example are considered
    pub example_token_cap: usize,

    /// Stop words per language; the union of all lists is applied to every entry
    pub stop_words: BTreeMap<String, Vec<String>>,

    /// Suffix regexes per language
    pub suffixes: BTreeMap<String, Vec<String>>,

    /// Write extracted keyword sets back to the entry store
    pub cache_keywords: bool,
}

impl Default for LexiconProfile {
    fn default() -> Self {
        let to_map = |table: &[(&str, &[&str])]| {
            table
                .iter()
                .map(|(lang, words)| {
                    (
                        (*lang).to_string(),
                        words.iter().map(|w| (*w).to_string()).collect(),
                    )
                })
                .collect()
        };

        Self {
            version: PROFILE_VERSION,
            min_token_chars: 3,
            significant_chars: 6,
            example_token_cap: 3,
            stop_words: to_map(STOP_WORDS),
            suffixes: to_map(SUFFIX_PATTERNS),
            cache_keywords: true,
        }
    }
}

impl LexiconProfile {
    /// Validate the profile, returning an error if invalid
    pub fn validate(&self) -> Result<(), String> {
        if self.min_token_chars == 0 {
            return Err("lexicon.min_token_chars must be greater than 0".to_string());
        }
        if self.significant_chars == 0 {
            return Err("lexicon.significant_chars must be greater than 0".to_string());
        }
        for (language, patterns) in &self.suffixes {
            for pattern in patterns {
                regex::Regex::new(pattern).map_err(|e| {
                    format!("Invalid suffix pattern '{}' for '{}': {}", pattern, language, e)
                })?;
            }
        }
        Ok(())
    }
}
