use ai::BugAnalysis;

use crate::types::Candidate;

pub const NO_CANDIDATES: &str = "No active contributors found for affected files";
pub const ALL_LOOPED: &str = "All potential assignees would create assignment loops";

/// Space-joined sentence fragments, reproducing
/// `original_source/backend/assignment_engine.py`'s reasoning builder.
#[must_use]
pub fn build(selected: &Candidate, bug_analysis: Option<&BugAnalysis>, confidence: f64, threshold: f64, route_to_human: bool) -> String {
    let mut fragments = vec![format!(
        "Selected {} based on combined expertise and workload analysis.",
        selected.email
    )];

    if let Some(analysis) = bug_analysis {
        fragments.push(format!("AI analysis confidence: {:.0}%", analysis.confidence * 100.0));
        fragments.push(format!("Estimated complexity: {}", analysis.fix_complexity.as_str()));
    }

    fragments.push(format!("Developer expertise score: {:.1}", selected.expertise_score));
    fragments.push(format!("Current workload: {} active bugs", selected.active_assignments));

    if route_to_human {
        fragments.push(format!(
            "Confidence {confidence:.0} below threshold {threshold:.0}, routing to human triage"
        ));
    }

    fragments.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> Candidate {
        Candidate {
            email: "alice@example.com".to_string(),
            expertise_score: 1200.0,
            active_assignments: 2,
            workload_score: 0.67,
            combined_score: 900.0,
        }
    }

    #[test]
    fn builds_full_reasoning_when_confident() {
        let text = build(&candidate(), None, 75.0, 60.0, false);
        assert!(text.starts_with("Selected alice@example.com based on combined expertise and workload analysis."));
        assert!(text.contains("Developer expertise score: 1200.0"));
        assert!(text.contains("Current workload: 2 active bugs"));
        assert!(!text.contains("routing to human triage"));
    }

    #[test]
    fn appends_routing_note_when_below_threshold() {
        let text = build(&candidate(), None, 45.0, 60.0, true);
        assert!(text.ends_with("Confidence 45 below threshold 60, routing to human triage"));
    }
}
