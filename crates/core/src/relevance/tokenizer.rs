//! Whitespace tokenizer with punctuation stripping and stop word removal.
//!
//! Text is split on whitespace; each raw word is lowercased, stripped of a
//! fixed set of boundary punctuation, and dropped if the result is a stop word.

use std::collections::HashSet;
use std::sync::LazyLock;

// NLTK English stop words plus a few timeline tokens.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
        "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
        "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
        "for", "with", "about", "against", "between", "into", "through", "during", "before",
        "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
        "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
        "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
        "just", "don", "should", "now",
        // Timeline noise
        "via", "rt", "-", "&", "",
    ]
    .into_iter()
    .collect()
});

/// Boundary characters removed from each word, in strip order.
///
/// Each character is stripped from both ends exactly once, in this order. A
/// character exposed by a later strip is not revisited, so `"(word)."` ends up
/// as `"word)"`. That is most likely a latent bug in the cleanup rule, but it
/// is kept as-is so vocabularies stay comparable across versions.
const STRIP_ORDER: [char; 5] = [')', '(', '?', ':', '.'];

/// Returns `true` if the normalized term is a stop word.
pub fn is_stopword(term: &str) -> bool {
    STOP_WORDS.contains(term)
}

/// Lowercase and strip one raw word. Stop words are not filtered.
pub fn clean(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    STRIP_ORDER
        .iter()
        .fold(lowered.as_str(), |term, &c| term.trim_matches(c))
        .to_string()
}

/// Normalize one raw word into a term.
///
/// Returns `None` when the cleaned word is a stop word (including the empty
/// string left over from pure punctuation).
pub fn normalize(raw: &str) -> Option<String> {
    let term = clean(raw);
    if is_stopword(&term) {
        None
    } else {
        Some(term)
    }
}

/// Iterate over the non-filtered terms of `text`, duplicates included.
pub fn terms(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(normalize)
}

/// The set of unique non-filtered terms of `text`.
pub fn term_set(text: &str) -> HashSet<String> {
    terms(text).collect()
}
