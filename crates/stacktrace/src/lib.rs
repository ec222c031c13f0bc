//! Stack-trace extraction and relevance ranking.
//!
//! Detects the embedded language in free-form issue text, extracts frames
//! with a language-specific parser, and scores each frame's relevance so
//! downstream components can focus on the lines that matter.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod detect;
mod error_info;
mod generic;
mod java;
mod javascript;
mod python;
mod relevance;
mod snippet;
mod types;

pub use detect::detect_language;
pub use types::{Language, StackFrame, StackTrace};

/// Parse a stack trace out of raw issue text.
///
/// Returns `None` for blank input or text with no recognizable frames.
#[must_use]
pub fn parse_stack_trace(issue_body: &str) -> Option<StackTrace> {
    if issue_body.trim().is_empty() {
        return None;
    }

    match detect_language(issue_body) {
        Language::Python => python::parse(issue_body),
        Language::Javascript => javascript::parse(issue_body),
        Language::Java => java::parse(issue_body),
        Language::Unknown => generic::parse(issue_body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_yields_none() {
        assert!(parse_stack_trace("   \n\t").is_none());
    }

    #[test]
    fn python_traceback_end_to_end() {
        let body = "We saw this crash:\n\nTraceback (most recent call last):\n  File \"app/services/billing.py\", line 120, in charge_card\n    raise ValueError(\"invalid card\")\nValueError: invalid card\n";
        let trace = parse_stack_trace(body).expect("should detect a trace");
        assert_eq!(trace.language, Language::Python);
        assert_eq!(trace.error_type, "ValueError");
        let top = trace.most_relevant(1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].file_path, "app/services/billing.py");
    }

    #[test]
    fn unrecognized_text_falls_back_to_generic() {
        let body = "something broke near main.rs:12, cause unclear";
        let trace = parse_stack_trace(body).expect("should fall back to generic parsing");
        assert_eq!(trace.language, Language::Unknown);
    }

    #[test]
    fn plain_prose_with_no_frames_yields_none() {
        assert!(parse_stack_trace("The button is the wrong color.").is_none());
    }
}
