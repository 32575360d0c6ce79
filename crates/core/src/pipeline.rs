//! Relevance pipeline over fetched timeline pages.
//!
//! Builds a vocabulary from the favorites collection and uses it to score and
//! filter the home timeline:
//!
//! 1. flatten the successful favorites pages,
//! 2. extract and count their terms,
//! 3. keep the `vocabulary_size` most frequent terms,
//! 4. score every home timeline item against that vocabulary,
//! 5. keep items with relevance above zero, or all of them if none qualify.
//!
//! Pages that came back with a non-success status are skipped. Partial data is
//! acceptable; no page failure aborts the pipeline.

use crate::item::Item;
use crate::relevance::frequency::FrequencyTable;
use crate::relevance::scorer::{filter_relevant, score_items};
use crate::relevance::tokenizer::terms;
use crate::relevance::Vocabulary;
use serde::Serialize;

/// A paginated upstream collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Statuses the user marked as favorite. Source of the vocabulary.
    Favorites,
    /// The user's home timeline. The items being ranked.
    HomeTimeline,
}

impl Collection {
    /// Stable name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Favorites => "favorites",
            Collection::HomeTimeline => "home_timeline",
        }
    }
}

/// One fetched page of a collection.
#[derive(Debug, Clone)]
pub struct Page {
    pub collection: Collection,
    /// 1-based page number.
    pub number: u32,
    /// HTTP status of the fetch. `0` when the request never got a response.
    pub status: u16,
    pub items: Vec<Item>,
}

impl Page {
    /// A successfully fetched page.
    pub fn ok(collection: Collection, number: u32, items: Vec<Item>) -> Self {
        Self {
            collection,
            number,
            status: 200,
            items,
        }
    }

    /// A page that contributes nothing.
    pub fn failed(collection: Collection, number: u32, status: u16) -> Self {
        Self {
            collection,
            number,
            status,
            items: Vec::new(),
        }
    }

    /// Only status 200 pages contribute items.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Diagnostics of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    /// Favorites items that fed the vocabulary.
    pub favorites: usize,
    /// Home timeline items that were scored.
    pub home_items: usize,
    /// Distinct terms seen in favorites.
    pub distinct_terms: usize,
    /// Terms kept in the vocabulary.
    pub vocabulary_size: usize,
    /// Pages skipped because of a non-success status.
    pub pages_skipped: usize,
    /// Items returned.
    pub returned: usize,
    /// `true` when no item scored above zero and all items were returned.
    pub fallback: bool,
}

/// Result of a pipeline run: the items to show plus run diagnostics.
#[derive(Debug, Clone)]
pub struct RankedTimeline {
    /// Home timeline items in their original order, relevance attached.
    pub items: Vec<Item>,
    pub stats: PipelineStats,
}

/// Concatenate the items of successful pages, skipping failed ones.
///
/// Returns the items and the number of skipped pages.
pub fn flatten_pages(pages: Vec<Page>) -> (Vec<Item>, usize) {
    let mut items = Vec::new();
    let mut skipped = 0;
    for page in pages {
        if page.is_success() {
            items.extend(page.items);
        } else {
            tracing::warn!(
                collection = page.collection.name(),
                page = page.number,
                status = page.status,
                "Expected 200 response, skipping page"
            );
            skipped += 1;
        }
    }
    (items, skipped)
}

/// Count the terms of `items` into a frequency table.
pub fn term_frequencies(items: &[Item]) -> FrequencyTable {
    items.iter().flat_map(|item| terms(&item.text)).collect()
}

/// The `size` most frequent terms of `items`.
pub fn build_vocabulary(items: &[Item], size: usize) -> Vocabulary {
    term_frequencies(items).top_terms(size)
}

/// Rank the home timeline against the vocabulary of the favorites.
pub fn build_relevant_items(
    favorites_pages: Vec<Page>,
    home_pages: Vec<Page>,
    vocabulary_size: usize,
) -> RankedTimeline {
    let (favorites, favorites_skipped) = flatten_pages(favorites_pages);
    let (mut home, home_skipped) = flatten_pages(home_pages);

    let frequencies = term_frequencies(&favorites);
    let vocabulary = frequencies.top_terms(vocabulary_size);
    tracing::debug!(
        distinct_terms = frequencies.len(),
        vocabulary = ?vocabulary,
        "Top terms from favorites"
    );

    score_items(&vocabulary, &mut home);
    let home_items = home.len();
    let (items, fallback) = filter_relevant(home);
    if fallback {
        tracing::info!(
            home_items,
            "No item matched the favorites vocabulary, returning the full timeline"
        );
    }

    let stats = PipelineStats {
        favorites: favorites.len(),
        home_items,
        distinct_terms: frequencies.len(),
        vocabulary_size: vocabulary.len(),
        pages_skipped: favorites_skipped + home_skipped,
        returned: items.len(),
        fallback,
    };
    RankedTimeline { items, stats }
}
