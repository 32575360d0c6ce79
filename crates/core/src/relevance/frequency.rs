//! Term frequency table and ranking.
//!
//! Counts every occurrence of every term and ranks terms by descending count.
//! Terms with equal counts keep the order in which they were first seen, so
//! the ranking is reproducible for a given input.

use super::Vocabulary;
use std::collections::HashMap;

/// Term → occurrence count, remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    /// `(term, count)` in first-seen order.
    entries: Vec<(String, usize)>,
    /// Position of each term in `entries`.
    positions: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `term`.
    pub fn add(&mut self, term: String) {
        match self.positions.get(&term) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.positions.insert(term.clone(), self.entries.len());
                self.entries.push((term, 1));
            }
        }
    }

    /// Number of occurrences recorded for `term`.
    pub fn count(&self, term: &str) -> usize {
        self.positions
            .get(term)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no term was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total occurrences across all terms.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Terms ordered by descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<(String, usize)> {
        let mut ranked = self.entries.clone();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` highest ranked terms (all of them if fewer than `n` exist).
    pub fn top_terms(&self, n: usize) -> Vocabulary {
        self.ranked()
            .into_iter()
            .take(n)
            .map(|(term, _)| term)
            .collect()
    }
}

impl FromIterator<String> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = String>>(terms: I) -> Self {
        let mut table = Self::new();
        for term in terms {
            table.add(term);
        }
        table
    }
}

/// Rank `terms` by descending frequency.
pub fn rank<I>(terms: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    terms.into_iter().collect::<FrequencyTable>().ranked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relevance::tokenizer::{normalize, terms};

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_rank_orders_by_count() {
        let ranked = rank(owned(&["b", "a", "b", "c", "b", "a"]));
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_rank_ties_keep_first_seen_order() {
        let ranked = rank(owned(&["zebra", "apple", "mango", "apple", "zebra", "mango"]));
        let order: Vec<&str> = ranked.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_counts_sum_to_unfiltered_terms() {
        let text = "The cat sat on the mat. The cat (again) sat? rt - & ...";
        let raw: Vec<&str> = text.split_whitespace().collect();
        let kept = raw.iter().filter(|w| normalize(w).is_some()).count();
        let ranked = rank(terms(text));
        let sum: usize = ranked.iter().map(|(_, c)| c).sum();
        assert_eq!(sum, kept);
        // cat, sat, mat, cat, sat ("again" is a stop word)
        assert_eq!(sum, 5);
    }

    #[test]
    fn test_table_counts() {
        let table: FrequencyTable = owned(&["x", "y", "x"]).into_iter().collect();
        assert_eq!(table.count("x"), 2);
        assert_eq!(table.count("y"), 1);
        assert_eq!(table.count("z"), 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_top_terms_bounded() {
        let table: FrequencyTable = owned(&["a", "a", "a", "b", "b", "c"]).into_iter().collect();
        let top = table.top_terms(2);
        assert_eq!(top.len(), 2);
        assert!(top.contains("a"));
        assert!(top.contains("b"));
        assert!(!top.contains("c"));
    }

    #[test]
    fn test_top_terms_fewer_than_n() {
        let table: FrequencyTable = owned(&["a", "b"]).into_iter().collect();
        assert_eq!(table.top_terms(200).len(), 2);
        assert!(table.top_terms(0).is_empty());
    }
}
