use std::collections::HashMap;

use chrono::Utc;
use serde_json::json;
use stacktrace::StackTrace;
use tracing::info;

use crate::types::{BugAnalysis, FixComplexity};

const ERROR_KEYWORDS: &[&str] = &["null", "undefined", "timeout", "connection", "permission", "syntax"];

/// Heuristic analysis used when the LLM breaker is open or every retry is
/// exhausted, grounded on `ai_fallback_strategy` in
/// `original_source/backend/ai_analysis_service.py`.
#[must_use]
pub fn heuristic_analysis(issue_body: &str, trace: Option<&StackTrace>) -> BugAnalysis {
    info!("using fallback analysis strategy (AI service unavailable)");

    let affected_files = trace
        .map(|t| t.frames.iter().take(3).map(|f| f.file_path.clone()).collect())
        .unwrap_or_default();

    let lower = issue_body.to_lowercase();
    let detected: Vec<&str> = ERROR_KEYWORDS.iter().copied().filter(|kw| lower.contains(kw)).collect();

    let confidence = if detected.is_empty() { 0.3 } else { 0.4 };

    let root_cause_hypothesis = if detected.is_empty() {
        "Potential issue related to: unknown error pattern".to_string()
    } else {
        format!("Potential issue related to: {}", detected.join(", "))
    };

    let error_translation = if detected.is_empty() {
        "Unable to translate error - AI service unavailable".to_string()
    } else {
        format!("Error detected with keywords: {detected:?}")
    };

    let mut additional_context = HashMap::new();
    additional_context.insert("fallback".to_string(), json!(true));
    additional_context.insert("method".to_string(), json!("keyword"));
    additional_context.insert("detected_keywords".to_string(), json!(detected));

    BugAnalysis {
        affected_files,
        root_cause_hypothesis,
        plain_english_explanation: "AI analysis unavailable. This appears to be a technical error that requires manual investigation.".to_string(),
        fix_complexity: FixComplexity::Moderate,
        confidence,
        error_translation,
        additional_context,
        analysis_timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_keywords_and_raises_confidence() {
        let analysis = heuristic_analysis("Request timed out while connecting", None);
        assert_eq!(analysis.confidence, 0.4);
        assert!(analysis.root_cause_hypothesis.contains("timeout"));
    }

    #[test]
    fn no_keywords_uses_baseline_confidence() {
        let analysis = heuristic_analysis("The button moved slightly", None);
        assert_eq!(analysis.confidence, 0.3);
    }

    #[test]
    fn takes_top_three_frames_as_affected_files() {
        let trace = stacktrace::parse_stack_trace(
            "Traceback (most recent call last):\n  File \"a.py\", line 1, in f\nFile \"b.py\", line 2, in g\nFile \"c.py\", line 3, in h\nFile \"d.py\", line 4, in i\nValueError: x\n",
        );
        let analysis = heuristic_analysis("crash", trace.as_ref());
        assert!(analysis.affected_files.len() <= 3);
    }
}
