//! Fuzzy similarity for guess deduplication.

use crate::domain::rules::MIN_SIMILARITY_RANK;

/// Similarity score on a 0..=100 scale.
pub fn similarity_rank(a: &str, b: &str) -> u32 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u32
}

/// True when `candidate` is close enough to `existing` to count as a
/// duplicate of it (also guards against near-miss paraphrases of the true
/// answer).
pub fn too_similar(candidate: &str, existing: &str) -> bool {
    similarity_rank(candidate, existing) >= MIN_SIMILARITY_RANK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_rank_100() {
        assert_eq!(similarity_rank("кот", "кот"), 100);
        assert!(too_similar("кот", "кот"));
    }

    #[test]
    fn short_edit_distance_is_not_enough_on_short_words() {
        // One substitution in a three-letter word is only ~67.
        assert!(similarity_rank("cat", "kat") < MIN_SIMILARITY_RANK);
        assert!(!too_similar("cat", "kat"));
    }

    #[test]
    fn near_miss_of_a_long_answer_is_a_duplicate() {
        assert!(too_similar("зелёный трактор", "зелёный тракторр"));
    }

    #[test]
    fn unrelated_texts_are_accepted() {
        assert!(!too_similar("синий кит", "красная панда"));
    }
}
