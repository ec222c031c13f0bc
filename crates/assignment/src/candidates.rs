use std::collections::HashMap;

use db::AssignmentRepo;
use expertise::{ExpertiseEngine, ExpertiseScore};
use tracing::warn;

use crate::types::Candidate;

/// For each affected file, fetch active-contributor expertise and accumulate
/// per-developer expertise summed across files; attach current workload.
/// Inactive developers never appear here (`get_active_contributors` already
/// dropped them). Returns the per-file expertise (for confidence scoring)
/// alongside the ranked candidate list (descending by combined score).
pub async fn assemble(
    expertise: &ExpertiseEngine,
    assignments: &AssignmentRepo,
    affected_files: &[String],
) -> (HashMap<String, Vec<ExpertiseScore>>, Vec<Candidate>) {
    let mut by_file = HashMap::new();
    let mut summed_expertise: HashMap<String, f64> = HashMap::new();

    for file in affected_files {
        let scores = expertise.get_active_contributors(file).await;
        for score in &scores {
            *summed_expertise.entry(score.email.clone()).or_insert(0.0) += score.score;
        }
        by_file.insert(file.clone(), scores);
    }

    let mut candidates = Vec::with_capacity(summed_expertise.len());
    for (email, expertise_score) in summed_expertise {
        let active_assignments = match assignments.active_count(&email).await {
            Ok(count) => count,
            Err(e) => {
                warn!(email = %email, error = %e, "workload lookup failed, assuming zero active assignments");
                0
            }
        };
        let workload_score = (-(active_assignments as f64) / 5.0).exp();
        let combined_score = 0.7 * expertise_score + 0.3 * workload_score * 100.0;

        candidates.push(Candidate { email, expertise_score, active_assignments, workload_score, combined_score });
    }

    candidates.sort_by(|a, b| b.combined_score.partial_cmp(&a.combined_score).unwrap_or(std::cmp::Ordering::Equal));
    (by_file, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workload_score_decays_with_active_count() {
        let idle = (-0.0_f64 / 5.0).exp();
        let busy = (-5.0_f64 / 5.0).exp();
        assert!((idle - 1.0).abs() < 1e-9);
        assert!(busy < idle);
    }
}
