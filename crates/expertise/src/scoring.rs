use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::types::{BlameRecord, ExpertiseScore};

/// `recency_weight = max(0.1, exp(-age_days / 365))`.
#[must_use]
pub fn recency_weight(age_days: f64, now: DateTime<Utc>) -> f64 {
    let _ = now;
    (-age_days / 365.0).exp().max(0.1)
}

/// Group surviving blame records by author email and derive a score per
/// developer: `lines_owned * commit_count * recency_weight(last_commit)`.
#[must_use]
pub fn score_records(records: &[BlameRecord], now: DateTime<Utc>) -> Vec<ExpertiseScore> {
    #[derive(Default)]
    struct Acc {
        name: String,
        lines: u32,
        commits: std::collections::HashSet<String>,
        last_commit: Option<DateTime<Utc>>,
    }

    let mut by_email: HashMap<String, Acc> = HashMap::new();

    for record in records {
        let acc = by_email.entry(record.email.clone()).or_default();
        acc.name = record.name.clone();
        acc.lines += 1;
        acc.commits.insert(record.commit.clone());
        acc.last_commit = Some(acc.last_commit.map_or(record.timestamp, |prev| prev.max(record.timestamp)));
    }

    let mut scores: Vec<ExpertiseScore> = by_email
        .into_iter()
        .map(|(email, acc)| {
            let commit_count = acc.commits.len() as u32;
            let age_days = acc
                .last_commit
                .map(|ts| (now - ts).num_seconds() as f64 / 86_400.0)
                .unwrap_or(f64::MAX);
            let weight = recency_weight(age_days, now);
            let score = f64::from(acc.lines) * f64::from(commit_count) * weight;

            ExpertiseScore {
                email,
                name: acc.name,
                score,
                commit_count,
                lines_owned: acc.lines,
                last_commit_date: acc.last_commit,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn recency_weight_floors_at_point_one() {
        let now = Utc::now();
        assert!((recency_weight(0.0, now) - 1.0).abs() < 1e-9);
        assert!((recency_weight(10_000.0, now) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn scores_sorted_descending_and_deduplicate_commits() {
        let now = Utc::now();
        let recent = now - Duration::days(1);
        let records = vec![
            BlameRecord { commit: "c1".into(), email: "alice@example.com".into(), name: "Alice".into(), timestamp: recent },
            BlameRecord { commit: "c1".into(), email: "alice@example.com".into(), name: "Alice".into(), timestamp: recent },
            BlameRecord { commit: "c2".into(), email: "bob@example.com".into(), name: "Bob".into(), timestamp: now - Duration::days(1000) },
        ];

        let scores = score_records(&records, now);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].email, "alice@example.com");
        assert_eq!(scores[0].lines_owned, 2);
        assert_eq!(scores[0].commit_count, 1);
        assert!(scores[0].score > scores[1].score);
    }
}
