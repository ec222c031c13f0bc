//! Duplicate suppression and advisory content-similarity, grounded on
//! `original_source/backend/webhook_handler.py`'s `DuplicateDetector`.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use db::DecisionRepo;
use tracing::warn;

/// Non-signal words dropped before computing keyword overlap.
const STOPWORDS: [&str; 16] = [
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "to", "of", "in", "on", "at", "for",
];

/// `true` when a `TriageDecision` already exists for `issue_id` within the
/// `window`-minute suppression window. Repository errors fail open (treated
/// as "not a duplicate") so a transient DB hiccup never silently drops an
/// issue.
pub async fn is_duplicate(decisions: &DecisionRepo, issue_id: &str, window: Duration) -> bool {
    match decisions.most_recent_for_issue(issue_id).await {
        Ok(Some(decision)) => Utc::now() - decision.created_at < window,
        Ok(None) => false,
        Err(e) => {
            warn!(issue_id, error = %e, "duplicate check failed, treating as not a duplicate");
            false
        }
    }
}

/// Tokenize on non-alphanumeric runs, lowercase, and drop stopwords.
#[must_use]
pub fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_ascii_lowercase)
        .filter(|word| word.len() > 1 && !STOPWORDS.contains(&word.as_str()))
        .collect()
}

/// Jaccard-style overlap: the fraction of `new_keywords` also present in
/// `stored_keywords`. Advisory only — the caller decides what, if anything,
/// to do with a high-overlap match; it never blocks ingestion.
#[must_use]
pub fn overlap_ratio(new_keywords: &HashSet<String>, stored_keywords: &HashSet<String>) -> f64 {
    if new_keywords.is_empty() {
        return 0.0;
    }
    let shared = new_keywords.intersection(stored_keywords).count();
    shared as f64 / new_keywords.len() as f64
}

/// Whether `body`'s keywords overlap a stored stack trace by at least 50%.
#[must_use]
pub fn is_similar(body: &str, stored_stack_trace: &str) -> bool {
    let new_keywords = keywords(body);
    if new_keywords.is_empty() {
        return false;
    }
    overlap_ratio(&new_keywords, &keywords(stored_stack_trace)) >= 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_drops_stopwords_and_lowercases() {
        let found = keywords("The Null Pointer Exception in the Parser");
        assert!(found.contains("null"));
        assert!(found.contains("pointer"));
        assert!(found.contains("exception"));
        assert!(found.contains("parser"));
        assert!(!found.contains("the"));
        assert!(!found.contains("in"));
    }

    #[test]
    fn is_similar_true_when_half_of_keywords_match() {
        let body = "NullPointerException in widget renderer";
        let stored = "widget renderer crashed with nullpointerexception during startup";
        assert!(is_similar(body, stored));
    }

    #[test]
    fn is_similar_false_for_unrelated_text() {
        let body = "database connection timeout";
        let stored = "widget renderer layout overflow";
        assert!(!is_similar(body, stored));
    }

    #[test]
    fn overlap_ratio_empty_new_keywords_is_zero() {
        let empty = HashSet::new();
        let other: HashSet<String> = ["a".to_string()].into_iter().collect();
        assert_eq!(overlap_ratio(&empty, &other), 0.0);
    }
}
