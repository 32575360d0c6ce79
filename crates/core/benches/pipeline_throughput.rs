//! Relevance pipeline benchmark on a synthetic timeline corpus.
//! Measures vocabulary build time and end-to-end pipeline throughput.
//!
//! Usage: cargo bench --bench pipeline_throughput

use std::time::Instant;
use tweetview_core::config;
use tweetview_core::pipeline::{build_relevant_items, build_vocabulary, Collection, Page};
use tweetview_core::Item;

const WORDS: &[&str] = &[
    "rust", "async", "tokio", "release", "compiler", "(borrow)", "checker.", "memory",
    "safety", "cats", "dogs", "coffee", "weekend", "conference", "talk:", "slides", "video",
    "benchmark", "the", "and", "a", "to", "of", "RT", "via", "http://t.co/abc", "#rustlang",
    "why?", "ship", "it", "today.", "new", "crate", "published", "docs", "thread",
];

const PAGES: u32 = config::DEFAULT_NUM_PAGES;
const ITEMS_PER_PAGE: usize = 20;
const ITERATIONS: usize = 1_000;

/// Deterministic linear congruential generator so runs are comparable.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }
}

fn synthetic_pages(collection: Collection, rng: &mut Lcg) -> Vec<Page> {
    (1..=PAGES)
        .map(|number| {
            let items = (0..ITEMS_PER_PAGE)
                .map(|_| {
                    let len = 6 + rng.next() % 14;
                    let words: Vec<&str> = (0..len).map(|_| WORDS[rng.next() % WORDS.len()]).collect();
                    Item::new(words.join(" "))
                })
                .collect();
            Page::ok(collection, number, items)
        })
        .collect()
}

fn main() {
    println!("=== Relevance Pipeline Benchmark ===");
    println!();

    let mut rng = Lcg(42);
    let favorites = synthetic_pages(Collection::Favorites, &mut rng);
    let home = synthetic_pages(Collection::HomeTimeline, &mut rng);
    let favorites_items: Vec<Item> = favorites.iter().flat_map(|p| p.items.clone()).collect();
    println!(
        "Corpus: {} favorites, {} home items ({} pages x {} items)",
        favorites_items.len(),
        PAGES as usize * ITEMS_PER_PAGE,
        PAGES,
        ITEMS_PER_PAGE
    );

    println!();
    println!("--- Vocabulary Construction ---");
    let t0 = Instant::now();
    let mut vocabulary_size = 0;
    for _ in 0..ITERATIONS {
        vocabulary_size = build_vocabulary(&favorites_items, config::DEFAULT_VOCABULARY_SIZE).len();
    }
    let elapsed = t0.elapsed();
    println!(
        "  {} terms | avg {:.1} us per build",
        vocabulary_size,
        elapsed.as_micros() as f64 / ITERATIONS as f64
    );

    println!();
    println!("--- End-to-end Pipeline ---");
    for &size in &[10usize, 50, config::DEFAULT_VOCABULARY_SIZE] {
        // Warm up
        for _ in 0..10 {
            let _ = build_relevant_items(favorites.clone(), home.clone(), size);
        }

        let t0 = Instant::now();
        let mut returned = 0;
        let mut fallbacks = 0;
        for _ in 0..ITERATIONS {
            let ranked = build_relevant_items(favorites.clone(), home.clone(), size);
            returned = ranked.stats.returned;
            fallbacks += usize::from(ranked.stats.fallback);
        }
        let elapsed = t0.elapsed();
        let runs_per_sec = ITERATIONS as f64 / elapsed.as_secs_f64();
        let avg_latency_us = elapsed.as_micros() as f64 / ITERATIONS as f64;

        println!("  vocab={size:<4} | returned {returned:<4} | runs/s: {runs_per_sec:.0} | Avg latency: {avg_latency_us:.0} us | Fallbacks: {fallbacks}");
    }

    println!();
    println!("=== Benchmark complete ===");
}
