//! Fuzzy matching utilities
//!
//! Pairs words the learner said with the expected words they most likely
//! attempted. Matching is on normalized Levenshtein similarity.

use strsim::normalized_levenshtein;

/// Result of a fuzzy match with the matched value and score
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub value: String,
    pub score: f64,
}

/// Find matches in a list of candidates
///
/// Returns up to `n` matches with scores at or above `cutoff`, best first.
/// Ties keep candidate order.
pub fn find_matches(
    search_term: &str,
    candidates: &[String],
    n: usize,
    cutoff: f64,
) -> Vec<FuzzyMatch> {
    let search_lower = search_term.to_lowercase();

    let mut matches: Vec<FuzzyMatch> = Vec::new();

    for candidate in candidates {
        // Skip duplicates so one expected word is not reported twice
        if matches.iter().any(|m| m.value == *candidate) {
            continue;
        }

        let score = normalized_levenshtein(&search_lower, &candidate.to_lowercase());

        if score >= cutoff {
            matches.push(FuzzyMatch {
                value: candidate.clone(),
                score,
            });
        }
    }

    // Stable sort keeps candidate order among equal scores
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    matches.truncate(n);

    matches
}

/// Find the best match above a minimum score
///
/// Returns None if no match meets the cutoff
pub fn find_best_match(
    search_term: &str,
    candidates: &[String],
    cutoff: f64,
) -> Option<FuzzyMatch> {
    let matches = find_matches(search_term, candidates, 1, cutoff);
    matches.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches() {
        let candidates = vec![
            "three".to_string(),
            "tree".to_string(),
            "apple".to_string(),
        ];

        let matches = find_matches("free", &candidates, 5, 0.5);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "tree");
        assert!(matches[0].score >= matches[1].score);
    }

    #[test]
    fn test_find_matches_dedups_candidates() {
        let candidates = vec!["the".to_string(), "the".to_string()];
        let matches = find_matches("thee", &candidates, 5, 0.5);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_find_best_match() {
        let candidates = vec!["think".to_string(), "world".to_string()];

        let best = find_best_match("sink", &candidates, 0.5);
        assert!(best.is_some());
        assert_eq!(best.unwrap().value, "think");

        assert!(find_best_match("banana", &candidates, 0.5).is_none());
    }

    #[test]
    fn test_cutoff_thresholds() {
        let pairs = |spoken: &str, expected: &str| {
            find_best_match(spoken, &[expected.to_string()], 0.5).is_some()
        };

        // Typical ASR confusions should clear the default 0.5 cutoff
        assert!(pairs("sink", "think")); // 0.6
        assert!(pairs("wery", "very")); // 0.75
        assert!(pairs("Bed", "bad")); // 0.66

        // Unrelated words should not pair up
        assert!(!pairs("apple", "think"));
        assert!(!pairs("dog", "elephant"));
    }
}
