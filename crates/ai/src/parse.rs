use std::collections::HashMap;
use std::str::FromStr;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::types::{BugAnalysis, FixComplexity};

const REQUIRED_FIELDS: &[&str] = &[
    "affected_files",
    "root_cause_hypothesis",
    "plain_english_explanation",
    "fix_complexity",
    "confidence",
    "error_translation",
];

/// Parse a model response into [`BugAnalysis`], grounded on
/// `_parse_analysis_response` in `original_source/backend/ai_analysis_service.py`.
#[must_use]
pub fn parse_response(response_text: &str) -> Option<BugAnalysis> {
    let json_start = response_text.find('{')?;
    let json_end = response_text.rfind('}')? + 1;
    if json_end <= json_start {
        error!("no JSON object found in AI response");
        return None;
    }

    let json_text = &response_text[json_start..json_end];
    let data: Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "failed to parse AI response as JSON");
            debug!(response = response_text, "raw response");
            return None;
        }
    };

    for field in REQUIRED_FIELDS {
        if data.get(field).is_none() {
            error!(field, "missing required field in AI response");
            return None;
        }
    }

    let confidence = data["confidence"].as_f64().unwrap_or(0.0);
    let confidence = if (0.0..=1.0).contains(&confidence) {
        confidence
    } else {
        warn!(confidence, "invalid confidence score, clamping to [0.0, 1.0]");
        confidence.clamp(0.0, 1.0)
    };

    let fix_complexity_raw = data["fix_complexity"].as_str().unwrap_or("").to_lowercase();
    let fix_complexity = FixComplexity::from_str(&fix_complexity_raw).unwrap_or_else(|()| {
        warn!(fix_complexity = fix_complexity_raw, "invalid fix complexity, defaulting to 'moderate'");
        FixComplexity::Moderate
    });

    let affected_files = data["affected_files"]
        .as_array()
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();

    let additional_context = data
        .get("additional_context")
        .and_then(Value::as_object)
        .map(|obj| obj.clone().into_iter().collect::<HashMap<_, _>>())
        .unwrap_or_default();

    Some(BugAnalysis {
        affected_files,
        root_cause_hypothesis: data["root_cause_hypothesis"].as_str().unwrap_or_default().to_string(),
        plain_english_explanation: data["plain_english_explanation"].as_str().unwrap_or_default().to_string(),
        fix_complexity,
        confidence,
        error_translation: data["error_translation"].as_str().unwrap_or_default().to_string(),
        additional_context,
        analysis_timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let text = r#"Here is my analysis:
        {
            "affected_files": ["app/billing.py"],
            "root_cause_hypothesis": "Null card reference",
            "plain_english_explanation": "A card object was missing.",
            "fix_complexity": "Simple",
            "confidence": 1.5,
            "error_translation": "Card was null"
        }
        Hope that helps."#;

        let analysis = parse_response(text).expect("should parse");
        assert_eq!(analysis.confidence, 1.0);
        assert_eq!(analysis.fix_complexity, FixComplexity::Simple);
        assert_eq!(analysis.affected_files, vec!["app/billing.py"]);
    }

    #[test]
    fn missing_required_field_yields_none() {
        let text = r#"{"root_cause_hypothesis": "x"}"#;
        assert!(parse_response(text).is_none());
    }

    #[test]
    fn invalid_complexity_defaults_to_moderate() {
        let text = r#"{
            "affected_files": [],
            "root_cause_hypothesis": "x",
            "plain_english_explanation": "y",
            "fix_complexity": "catastrophic",
            "confidence": 0.5,
            "error_translation": "z"
        }"#;
        let analysis = parse_response(text).unwrap();
        assert_eq!(analysis.fix_complexity, FixComplexity::Moderate);
    }

    #[test]
    fn no_json_object_yields_none() {
        assert!(parse_response("no json here").is_none());
    }
}
