//! Term-frequency relevance: tokenizer, frequency ranker, and scorer.

/// Frequency table and ranking of favorites terms.
pub mod frequency;
/// Overlap scoring of items against a vocabulary.
pub mod scorer;
/// Whitespace tokenizer with punctuation stripping and stop word removal.
pub mod tokenizer;

use std::collections::HashSet;

/// The top-N most frequent terms of the reference corpus.
pub type Vocabulary = HashSet<String>;
