use ai::BugAnalysis;
use chrono::{DateTime, Utc};

use crate::types::DraftFix;

/// `<prefix>-fix-<issue_id>-<YYYYMMDD-HHMMSS>`.
#[must_use]
pub fn branch_name(prefix: &str, issue_id: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}-fix-{issue_id}-{}", now.format("%Y%m%d-%H%M%S"))
}

#[must_use]
pub fn commit_message(issue_id: &str, bug_analysis: &BugAnalysis) -> String {
    format!("Draft fix for issue #{issue_id}: {}...", truncate(&bug_analysis.root_cause_hypothesis, 50))
}

#[must_use]
pub fn pr_title(issue_id: &str, bug_analysis: &BugAnalysis) -> String {
    format!("DRAFT - Fix for issue #{issue_id}: {}...", truncate(&bug_analysis.root_cause_hypothesis, 60))
}

#[must_use]
pub fn pr_description(fix: &DraftFix, bug_analysis: &BugAnalysis, issue_id: &str) -> String {
    [
        "## Automated Draft Fix".to_string(),
        String::new(),
        "**This is a DRAFT PR generated automatically. Please review carefully before merging.**".to_string(),
        String::new(),
        format!("**Related Issue:** #{issue_id}"),
        format!("**Confidence Score:** {:.1}%", fix.confidence * 100.0),
        format!("**Lines Changed:** {}", fix.line_changes),
        String::new(),
        "## Bug Analysis".to_string(),
        format!("**Root Cause:** {}", bug_analysis.root_cause_hypothesis),
        String::new(),
        format!("**Explanation:** {}", bug_analysis.plain_english_explanation),
        String::new(),
        format!("**Error Translation:** {}", bug_analysis.error_translation),
        String::new(),
        "## Fix Details".to_string(),
        format!("**File Modified:** `{}`", fix.file_path),
        String::new(),
        format!("**What Changed:** {}", fix.explanation),
        String::new(),
        "## Review Checklist".to_string(),
        "- [ ] Fix addresses the root cause correctly".to_string(),
        "- [ ] No unintended side effects introduced".to_string(),
        "- [ ] Code follows project style guidelines".to_string(),
        "- [ ] Tests pass (if applicable)".to_string(),
        "- [ ] Documentation updated (if needed)".to_string(),
        String::new(),
        "## Caveats".to_string(),
        "- This fix was generated by an AI model and may not be perfect".to_string(),
        "- Please test thoroughly before merging".to_string(),
        "- Consider adding tests to prevent regression".to_string(),
        "- Feel free to modify or close this PR if needed".to_string(),
    ]
    .join("\n")
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn analysis() -> BugAnalysis {
        BugAnalysis {
            affected_files: vec![],
            root_cause_hypothesis: "a".repeat(80),
            plain_english_explanation: "explanation".to_string(),
            fix_complexity: ai::FixComplexity::Simple,
            confidence: 0.9,
            error_translation: "err".to_string(),
            additional_context: HashMap::new(),
            analysis_timestamp: Utc::now(),
        }
    }

    #[test]
    fn branch_name_matches_expected_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 45).unwrap();
        let name = branch_name("auto-fix", "42", now);
        assert_eq!(name, "auto-fix-fix-42-20240305-123045");
    }

    #[test]
    fn commit_message_truncates_root_cause_to_50_chars() {
        let msg = commit_message("42", &analysis());
        assert_eq!(msg, format!("Draft fix for issue #42: {}...", "a".repeat(50)));
    }

    #[test]
    fn pr_title_truncates_root_cause_to_60_chars() {
        let title = pr_title("42", &analysis());
        assert_eq!(title, format!("DRAFT - Fix for issue #42: {}...", "a".repeat(60)));
    }
}
