//! Vocabulary overlap scoring.
//!
//! An item's relevance is the fraction of its unique terms that appear in the
//! vocabulary built from the user's favorites.

use super::tokenizer::term_set;
use super::Vocabulary;
use crate::item::Item;

/// Relevance of `text` against `vocabulary`, in `[0.0, 1.0]`.
pub fn relevance(vocabulary: &Vocabulary, text: &str) -> f64 {
    let terms = term_set(text);
    // Policy: an item with no usable terms scores 0.0 rather than dividing by zero.
    if terms.is_empty() {
        return 0.0;
    }
    let overlap = terms
        .iter()
        .filter(|term| vocabulary.contains(term.as_str()))
        .count();
    overlap as f64 / terms.len() as f64
}

/// Assign a relevance to every item.
pub fn score_items(vocabulary: &Vocabulary, items: &mut [Item]) {
    for item in items.iter_mut() {
        item.relevance = Some(relevance(vocabulary, &item.text));
    }
}

/// Keep items with relevance above zero.
///
/// When nothing qualifies, every item is returned unfiltered (scores attached)
/// so a user without usable favorites still sees their timeline. The flag is
/// `true` when that fallback was taken.
pub fn filter_relevant(items: Vec<Item>) -> (Vec<Item>, bool) {
    if items.iter().any(|item| item.relevance_or_zero() > 0.0) {
        let relevant = items
            .into_iter()
            .filter(|item| item.relevance_or_zero() > 0.0)
            .collect();
        (relevant, false)
    } else {
        (items, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> Vocabulary {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_relevance_partial_overlap() {
        let v = vocab(&["love", "cats", "dogs"]);
        assert_eq!(relevance(&v, "cats are great"), 0.5);
    }

    #[test]
    fn test_relevance_full_containment_is_one() {
        let v = vocab(&["love", "cats", "dogs"]);
        assert_eq!(relevance(&v, "Cats? dogs. LOVE"), 1.0);
    }

    #[test]
    fn test_relevance_counts_unique_terms_once() {
        let v = vocab(&["cats"]);
        // {cats, great}: repetition of "cats" does not raise the score.
        assert_eq!(relevance(&v, "cats cats cats great"), 0.5);
    }

    #[test]
    fn test_relevance_empty_term_set_is_zero() {
        let v = vocab(&["cats"]);
        assert_eq!(relevance(&v, ""), 0.0);
        assert_eq!(relevance(&v, "the and of ..."), 0.0);
    }

    #[test]
    fn test_relevance_empty_vocabulary_is_zero() {
        let v = Vocabulary::new();
        assert_eq!(relevance(&v, "cats are great"), 0.0);
    }

    #[test]
    fn test_score_items_sets_every_relevance() {
        let v = vocab(&["rust"]);
        let mut items = vec![Item::new("rust is fast"), Item::new("python"), Item::new("")];
        score_items(&v, &mut items);
        assert_eq!(items[0].relevance, Some(0.5));
        assert_eq!(items[1].relevance, Some(0.0));
        assert_eq!(items[2].relevance, Some(0.0));
    }

    #[test]
    fn test_filter_keeps_positive_in_order() {
        let v = vocab(&["rust"]);
        let mut items = vec![
            Item::new("rust one"),
            Item::new("nothing"),
            Item::new("rust two"),
        ];
        score_items(&v, &mut items);
        let (kept, fallback) = filter_relevant(items);
        assert!(!fallback);
        let texts: Vec<&str> = kept.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["rust one", "rust two"]);
    }

    #[test]
    fn test_filter_falls_back_to_all_items() {
        let mut items = vec![Item::new("alpha"), Item::new("beta")];
        score_items(&Vocabulary::new(), &mut items);
        let (kept, fallback) = filter_relevant(items);
        assert!(fallback);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|i| i.relevance == Some(0.0)));
    }

    #[test]
    fn test_filter_empty_input() {
        let (kept, fallback) = filter_relevant(Vec::new());
        assert!(kept.is_empty());
        assert!(fallback);
    }
}
