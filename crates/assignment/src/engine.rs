use std::sync::Arc;

use ai::BugAnalysis;
use chrono::Utc;
use config::{keys, ConfigStore, DEFAULT_CONFIDENCE_THRESHOLD};
use db::AssignmentRepo;
use expertise::ExpertiseEngine;
use tracing::warn;

use crate::types::{AssignmentDecision, Candidate, EstimatedEffort, Priority};
use crate::{candidates, confidence, reasoning};

/// `original_source/backend/assignment_engine.py`'s `AssignmentEngine`:
/// confidence scoring, candidate ranking, loop prevention, and the
/// auto-assign/route-to-human decision.
pub struct AssignmentEngine {
    expertise: Arc<ExpertiseEngine>,
    assignments: AssignmentRepo,
    config_store: Arc<dyn ConfigStore>,
}

impl AssignmentEngine {
    #[must_use]
    pub fn new(expertise: Arc<ExpertiseEngine>, assignments: AssignmentRepo, config_store: Arc<dyn ConfigStore>) -> Self {
        Self { expertise, assignments, config_store }
    }

    pub async fn decide(
        &self,
        issue_id: &str,
        issue_url: &str,
        bug_analysis: Option<&BugAnalysis>,
        affected_files: &[String],
    ) -> AssignmentDecision {
        let now = Utc::now();
        let (by_file, ranked) = candidates::assemble(&self.expertise, &self.assignments, affected_files).await;
        let overall_confidence = confidence::compute(bug_analysis, &by_file, affected_files, now);
        let estimated_effort = EstimatedEffort::from_complexity(bug_analysis.map(|b| b.fix_complexity));

        if ranked.is_empty() {
            return AssignmentDecision {
                assignee: None,
                route_to_human: true,
                confidence: overall_confidence,
                priority: Priority::from_confidence(overall_confidence),
                estimated_effort,
                reasoning: reasoning::NO_CANDIDATES.to_string(),
                fallbacks: Vec::new(),
            };
        }

        let threshold = self.confidence_threshold().await;
        let Some(selected) = self.first_non_looped(issue_id, &ranked).await else {
            return AssignmentDecision {
                assignee: None,
                route_to_human: true,
                confidence: overall_confidence,
                priority: Priority::from_confidence(overall_confidence),
                estimated_effort,
                reasoning: reasoning::ALL_LOOPED.to_string(),
                fallbacks: ranked,
            };
        };

        let route_to_human = overall_confidence < threshold;
        let reasoning_text = reasoning::build(&selected, bug_analysis, overall_confidence, threshold, route_to_human);
        let fallbacks: Vec<Candidate> =
            if route_to_human { ranked.into_iter().filter(|c| c.email != selected.email).collect() } else { Vec::new() };

        let assignee = if route_to_human { None } else { Some(selected.email.clone()) };

        if let Some(email) = &assignee {
            if let Err(e) = self.assignments.create(issue_id, issue_url, email, overall_confidence, &reasoning_text).await {
                warn!(issue_id, email = %email, error = %e, "failed to persist auto-assignment");
            }
        }

        AssignmentDecision {
            assignee,
            route_to_human,
            confidence: overall_confidence,
            priority: Priority::from_confidence(overall_confidence),
            estimated_effort,
            reasoning: reasoning_text,
            fallbacks,
        }
    }

    async fn confidence_threshold(&self) -> f64 {
        self.config_store
            .get(keys::CONFIDENCE_THRESHOLD)
            .await
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// First ranked candidate not already assigned to this issue. A failed
    /// loop check skips the candidate conservatively rather than risking a
    /// duplicate assignment.
    async fn first_non_looped(&self, issue_id: &str, ranked: &[Candidate]) -> Option<Candidate> {
        for candidate in ranked {
            match self.assignments.already_assigned(issue_id, &candidate.email).await {
                Ok(false) => return Some(candidate.clone()),
                Ok(true) => continue,
                Err(e) => {
                    warn!(issue_id, email = %candidate.email, error = %e, "loop check failed, skipping candidate");
                    continue;
                }
            }
        }
        None
    }
}
