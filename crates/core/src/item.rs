//! Timeline item type.
//!
//! An `Item` is one status from a timeline collection: its text, the relevance
//! assigned by the scorer, and every other field the upstream API sent, kept
//! verbatim so the client receives the full status object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single timeline entry.
///
/// Identity is positional within its source collection. `relevance` is `None`
/// until [`crate::relevance::scorer::score_items`] assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Status text, split on whitespace for term extraction.
    pub text: String,
    /// Fraction of the item's unique terms found in the vocabulary.
    #[serde(default)]
    pub relevance: Option<f64>,
    /// Remaining upstream fields (ids, author, timestamps, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Creates an unscored item with no extra fields.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            relevance: None,
            extra: Map::new(),
        }
    }

    /// Relevance, treating an unscored item as 0.
    pub fn relevance_or_zero(&self) -> f64 {
        self.relevance.unwrap_or(0.0)
    }
}
