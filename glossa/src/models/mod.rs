//! Data model shared by every Glossa component.
//!
//! Entries and translations belong to the content layer; Glossa reads them and
//! writes back only merge links, cached keywords and votes. Case records and
//! threshold snapshots are owned by the decision engine itself.

pub mod case;
pub mod entry;
pub mod thresholds;
pub mod translation;

pub use case::{CaseContext, CaseRecord, Decision, PairIdentity, pair_key};
pub use entry::{DictionaryEntry, EntryStatus, KeywordSet, Meaning};
pub use thresholds::{ThresholdConfig, ThresholdSnapshot, ThresholdSource};
pub use translation::{ConceptGroup, Translation, ValidationType, Vote};
