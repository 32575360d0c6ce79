//! # tweetview-core
//!
//! Term-frequency relevance ranking for social timelines: the terms of a
//! user's favorites form a vocabulary, and home timeline items are scored by
//! how many of their unique terms fall inside it.
//!
//! This is the core library crate with zero async dependencies. Fetching,
//! sessions, metering and payments live in `tweetview-server`.

/// Global configuration constants: ranking defaults, metering, limits.
pub mod config;
/// Timeline item type: `Item` with text, relevance and upstream fields.
pub mod item;
/// Relevance pipeline over fetched pages: vocabulary, scoring, fallback.
pub mod pipeline;
/// Tokenizer, frequency ranker and overlap scorer.
pub mod relevance;

pub use item::Item;
pub use pipeline::{build_relevant_items, Collection, Page, PipelineStats, RankedTimeline};
