use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawFix {
    fixed_content: String,
    explanation: String,
    line_changes: i64,
    confidence: f64,
}

/// Extracted, clamped fix fields from the model's JSON response; one step
/// short of a [`crate::DraftFix`] because the caller still has to attach
/// `file_path` and `original_content`.
#[derive(Debug, Clone)]
pub struct ParsedFix {
    pub fixed_content: String,
    pub explanation: String,
    pub line_changes: u32,
    pub confidence: f64,
}

/// Extracts the first `{...}` span and parses it, clamping `confidence` to
/// `[0, 1]` and `line_changes` to non-negative, mirroring
/// `original_source/backend/draft_pr_generator.py::_parse_fix_response`.
#[must_use]
pub fn parse(response_text: &str) -> Option<ParsedFix> {
    let start = response_text.find('{')?;
    let end = response_text.rfind('}')? + 1;
    if end <= start {
        return None;
    }

    let raw: RawFix = serde_json::from_str(&response_text[start..end]).ok()?;

    Some(ParsedFix {
        fixed_content: raw.fixed_content,
        explanation: raw.explanation,
        line_changes: raw.line_changes.max(0) as u32,
        confidence: raw.confidence.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_response() {
        let text = r#"Here you go:
        {"fixed_content": "fn main() {}", "explanation": "fixed the bug", "line_changes": 3, "confidence": 0.92}
        Thanks!"#;
        let fix = parse(text).unwrap();
        assert_eq!(fix.fixed_content, "fn main() {}");
        assert_eq!(fix.line_changes, 3);
        assert!((fix.confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn clamps_out_of_range_confidence_and_negative_line_changes() {
        let text = r#"{"fixed_content": "x", "explanation": "y", "line_changes": -4, "confidence": 1.5}"#;
        let fix = parse(text).unwrap();
        assert_eq!(fix.line_changes, 0);
        assert!((fix.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_response_without_json() {
        assert!(parse("no json here").is_none());
    }

    #[test]
    fn rejects_response_missing_required_field() {
        let text = r#"{"fixed_content": "x", "explanation": "y", "line_changes": 1}"#;
        assert!(parse(text).is_none());
    }
}
