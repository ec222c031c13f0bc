//! Relevance scoring, grounded on `original_source/backend/stack_trace_parser.py`
//! (`_calculate_relevance_score`).

use crate::types::Language;

const SYSTEM_INDICATORS: &[&str] = &[
    "/usr/",
    "/lib/",
    "node_modules/",
    "site-packages/",
    "java.lang.",
    "java.util.",
    "__pycache__",
    "webpack://",
    "chrome-extension://",
];

const APP_INDICATORS: &[&str] = &[
    "/src/", "/app/", "/components/", "/services/", "main.", "index.", "app.", "server.",
];

const GENERIC_FUNCTION_NAMES: &[&str] = &[
    "<anonymous>", "__init__", "main", "run", "execute", "call", "apply", "invoke",
];

const ERROR_HANDLING_KEYWORDS: &[&str] =
    &["error", "exception", "fail", "throw", "assert", "validate", "check"];

/// Score a single frame in `[0, 1]`.
#[must_use]
pub fn calculate(
    file_path: &str,
    function_name: &str,
    position: usize,
    total_frames: usize,
    language: Language,
) -> f64 {
    let mut score = 1.0_f64;

    if total_frames > 1 {
        let position_penalty = (position as f64 / (total_frames - 1) as f64) * 0.3;
        score -= position_penalty;
    }

    if !file_path.is_empty() {
        let lower = file_path.to_lowercase();
        if SYSTEM_INDICATORS.iter().any(|i| lower.contains(i)) {
            score *= 0.5;
        } else if APP_INDICATORS.iter().any(|i| lower.contains(i)) {
            score *= 1.2;
        }
    }

    if !function_name.is_empty() {
        let lower = function_name.to_lowercase();
        if GENERIC_FUNCTION_NAMES.iter().any(|f| f.to_lowercase() == lower) {
            score *= 0.8;
        }
        if ERROR_HANDLING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            score *= 1.3;
        }
    }

    let lower_path = file_path.to_lowercase();
    match language {
        Language::Python => {
            if ["django", "flask", "fastapi"].iter().any(|f| lower_path.contains(f)) {
                score *= 1.1;
            }
        }
        Language::Javascript => {
            if ["react", "node", "express"].iter().any(|f| lower_path.contains(f)) {
                score *= 1.1;
            }
        }
        Language::Java | Language::Unknown => {}
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_frame_has_no_position_penalty() {
        let score = calculate("app/handler.py", "process", 0, 1, Language::Python);
        assert!(score > 1.0 || (score - 1.2).abs() < 1e-9);
    }

    #[test]
    fn system_path_is_penalized() {
        let score = calculate("/usr/lib/python3/foo.py", "process", 0, 1, Language::Python);
        assert!(score < 1.0);
    }

    #[test]
    fn generic_function_name_is_penalized() {
        let low = calculate("app/x.py", "main", 0, 3, Language::Python);
        let high = calculate("app/x.py", "handle_request", 0, 3, Language::Python);
        assert!(low < high);
    }
}
