use std::collections::HashMap;

use ai::BugAnalysis;
use chrono::{DateTime, Utc};
use expertise::ExpertiseScore;

/// Sum of four clamped, non-negative components. Missing input (no
/// analysis, no expertise data) contributes zero for that factor.
#[must_use]
pub fn compute(
    bug_analysis: Option<&BugAnalysis>,
    expertise_by_file: &HashMap<String, Vec<ExpertiseScore>>,
    affected_files: &[String],
    now: DateTime<Utc>,
) -> f64 {
    let ai_quality = bug_analysis.map_or(0.0, |b| (b.confidence * 40.0).clamp(0.0, 40.0));

    let max_score = expertise_by_file
        .values()
        .flatten()
        .map(|s| s.score)
        .fold(0.0_f64, f64::max);
    let expertise_component = (max_score / 1000.0 * 35.0).clamp(0.0, 35.0);

    let coverage = if affected_files.is_empty() {
        0.0
    } else {
        let covered = affected_files
            .iter()
            .filter(|f| expertise_by_file.get(*f).is_some_and(|v| !v.is_empty()))
            .count();
        (covered as f64 / affected_files.len() as f64) * 15.0
    };

    let recent_count = expertise_by_file
        .values()
        .flatten()
        .filter(|s| s.last_commit_date.is_some_and(|d| (now - d).num_days() <= 30))
        .count();
    let recency = (2.0 * recent_count as f64).min(10.0);

    (ai_quality + expertise_component + coverage + recency).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai::FixComplexity;
    use chrono::Duration;
    use std::collections::HashMap as Map;

    fn score(email: &str, value: f64, days_ago: i64) -> ExpertiseScore {
        ExpertiseScore {
            email: email.to_string(),
            name: String::new(),
            score: value,
            commit_count: 1,
            lines_owned: 1,
            last_commit_date: Some(Utc::now() - Duration::days(days_ago)),
        }
    }

    fn analysis(confidence: f64) -> BugAnalysis {
        BugAnalysis {
            affected_files: vec![],
            root_cause_hypothesis: String::new(),
            plain_english_explanation: String::new(),
            fix_complexity: FixComplexity::Simple,
            confidence,
            error_translation: String::new(),
            additional_context: Map::new(),
            analysis_timestamp: Utc::now(),
        }
    }

    #[test]
    fn missing_inputs_contribute_zero() {
        let now = Utc::now();
        let result = compute(None, &Map::new(), &[], now);
        assert!((result - 0.0).abs() < 1e-9);
    }

    #[test]
    fn full_inputs_sum_all_four_components() {
        let now = Utc::now();
        let mut by_file = Map::new();
        by_file.insert("src/lib.rs".to_string(), vec![score("alice@example.com", 1000.0, 1)]);
        let files = vec!["src/lib.rs".to_string()];

        let result = compute(Some(&analysis(1.0)), &by_file, &files, now);
        // 40 (ai) + 35 (expertise) + 15 (coverage) + 2 (one recent commit) = 92
        assert!((result - 92.0).abs() < 1e-9);
    }
}
