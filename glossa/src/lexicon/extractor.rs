//! Keyword extractor compiled from a lexicon profile.

use regex::RegexSet;
use std::collections::{HashMap, HashSet};

use super::LexiconProfile;
use crate::models::{DictionaryEntry, KeywordSet};

/// Derives normalized keyword sets from entries.
///
/// Pure: extraction never touches storage. Cloning is cheap enough to hand
/// one to each component that needs it.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    profile_version: u32,
    min_token_chars: usize,
    significant_chars: usize,
    example_token_cap: usize,
    stop_words: HashSet<String>,
    suffixes: HashMap<String, RegexSet>,
    any_suffix: RegexSet,
}

impl KeywordExtractor {
    /// Compile a profile
    pub fn new(profile: &LexiconProfile) -> Result<Self, regex::Error> {
        let stop_words = profile
            .stop_words
            .values()
            .flatten()
            .map(|w| w.to_lowercase())
            .collect();

        let mut suffixes = HashMap::new();
        for (language, patterns) in &profile.suffixes {
            suffixes.insert(language.to_lowercase(), RegexSet::new(patterns)?);
        }
        let any_suffix = RegexSet::new(profile.suffixes.values().flatten())?;

        Ok(Self {
            profile_version: profile.version,
            min_token_chars: profile.min_token_chars,
            significant_chars: profile.significant_chars,
            example_token_cap: profile.example_token_cap,
            stop_words,
            suffixes,
            any_suffix,
        })
    }

    /// Version of the profile this extractor was compiled from
    pub fn profile_version(&self) -> u32 {
        self.profile_version
    }

    /// Keyword set of an entry; a cached set is returned unchanged
    pub fn extract(&self, entry: &DictionaryEntry) -> KeywordSet {
        match &entry.keywords {
            Some(cached) => cached.clone(),
            None => self.extract_fresh(entry),
        }
    }

    /// Keyword set computed from the entry's text, ignoring any cached set
    pub fn extract_fresh(&self, entry: &DictionaryEntry) -> KeywordSet {
        let language = entry.language.to_lowercase();
        let mut candidates: Vec<String> = Vec::new();

        for meaning in &entry.meanings {
            candidates.extend(tokenize(&meaning.definition));
            for example in &meaning.examples {
                candidates.extend(tokenize(example).take(self.example_token_cap));
            }
            for synonym in &meaning.synonyms {
                candidates.extend(tokenize(synonym));
            }
        }
        if let Some(etymology) = &entry.etymology {
            candidates.extend(tokenize(etymology));
        }

        candidates
            .into_iter()
            .filter(|token| self.is_keyword(token, &language))
            .collect()
    }

    /// Whether a lower-cased token survives filtering
    fn is_keyword(&self, token: &str, language: &str) -> bool {
        let chars = token.chars().count();
        if chars < self.min_token_chars {
            return false;
        }
        if self.stop_words.contains(token) {
            return false;
        }
        chars >= self.significant_chars || self.matches_suffix(token, language)
    }

    fn matches_suffix(&self, token: &str, language: &str) -> bool {
        match self.suffixes.get(language) {
            Some(set) => set.is_match(token),
            None => self.any_suffix.is_match(token),
        }
    }
}

/// Split text into lower-cased runs of letters; digits and punctuation separate tokens
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Meaning;

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&LexiconProfile::default()).unwrap()
    }

    #[test]
    fn test_cached_keywords_returned_unchanged() {
        let entry = DictionaryEntry::new("solaire", "fr")
            .with_meaning(Meaning::new("Relatif au soleil et à son énergie"))
            .with_keywords(["solaire", "soleil", "énergie"]);

        let keywords = extractor().extract(&entry);
        let expected: KeywordSet = ["solaire", "soleil", "énergie"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keywords, expected);
    }

    #[test]
    fn test_filters_short_numeric_and_stop_words() {
        let entry = DictionaryEntry::new("photosynthesis", "en").with_meaning(Meaning::new(
            "The process plants use in 1779 to convert sunlight into chemical energy",
        ));

        let keywords = extractor().extract_fresh(&entry);
        assert!(keywords.contains("process"));
        assert!(keywords.contains("plants"));
        assert!(keywords.contains("convert"));
        assert!(keywords.contains("sunlight"));
        assert!(keywords.contains("chemical"));
        assert!(keywords.contains("energy"));
        assert!(!keywords.contains("the"));
        assert!(!keywords.contains("use"));
        assert!(!keywords.contains("1779"));
        assert!(!keywords.contains("into"));
        assert!(!keywords.contains("in"));
    }

    #[test]
    fn test_digits_split_tokens() {
        let tokens: Vec<String> = tokenize("covid19 h2o2x2").collect();
        assert_eq!(tokens, vec!["covid", "h", "o", "x"]);

        let entry = DictionaryEntry::new("x", "en")
            .with_meaning(Meaning::new("covid19 h2o2x2 thermostat2000"));
        let keywords = extractor().extract_fresh(&entry);
        assert!(!keywords.contains("covid19"));
        assert!(!keywords.contains("h2o2x2"));
        assert!(!keywords.contains("thermostat2000"));
        assert!(keywords.contains("thermostat"));
    }

    #[test]
    fn test_suffix_makes_short_token_significant() {
        let entry = DictionaryEntry::new("mente", "es")
            .with_meaning(Meaning::new("Una mente con sol"));

        let keywords = extractor().extract_fresh(&entry);
        assert!(keywords.contains("mente"));
        assert!(!keywords.contains("sol"));
        assert!(!keywords.contains("con"));
    }

    #[test]
    fn test_suffixes_follow_entry_language() {
        let english = DictionaryEntry::new("x", "en").with_meaning(Meaning::new("unity"));
        assert!(extractor().extract_fresh(&english).contains("unity"));

        let german = DictionaryEntry::new("x", "de").with_meaning(Meaning::new("unity"));
        assert!(extractor().extract_fresh(&german).is_empty());

        // No patterns for Dutch, so every language's patterns apply
        let dutch = DictionaryEntry::new("x", "nl").with_meaning(Meaning::new("unity halt"));
        let keywords = extractor().extract_fresh(&dutch);
        assert!(keywords.contains("unity"));
        assert!(!keywords.contains("halt"));
    }

    #[test]
    fn test_example_token_cap() {
        let entry = DictionaryEntry::new("x", "en").with_meaning(
            Meaning::new("")
                .with_example("photovoltaic collectors generate electricity everywhere"),
        );

        let keywords = extractor().extract_fresh(&entry);
        assert!(keywords.contains("photovoltaic"));
        assert!(keywords.contains("collectors"));
        assert!(keywords.contains("generate"));
        assert!(!keywords.contains("electricity"));
        assert!(!keywords.contains("everywhere"));
    }

    #[test]
    fn test_synonyms_and_etymology_contribute() {
        let entry = DictionaryEntry::new("soleil", "fr")
            .with_meaning(Meaning::new("").with_synonym("astre"))
            .with_etymology("Du latin populaire soliculus");

        let keywords = extractor().extract_fresh(&entry);
        assert!(keywords.contains("populaire"));
        assert!(keywords.contains("soliculus"));
        // "astre" is short and carries no listed suffix
        assert!(!keywords.contains("astre"));
    }

    #[test]
    fn test_entry_without_meanings_is_empty() {
        let entry = DictionaryEntry::new("vide", "fr");
        assert!(extractor().extract(&entry).is_empty());
    }

    #[test]
    fn test_token_length_counts_chars_not_bytes() {
        // "éé" is 4 bytes but 2 chars
        let tokens: Vec<String> = tokenize("éé Été").collect();
        assert_eq!(tokens, vec!["éé".to_string(), "été".to_string()]);

        let entry = DictionaryEntry::new("x", "fr").with_meaning(Meaning::new("éé"));
        assert!(extractor().extract_fresh(&entry).is_empty());
    }
}
