use regex::Regex;
use std::sync::LazyLock;

use crate::error_info;
use crate::relevance;
use crate::snippet;
use crate::types::{Language, StackFrame, StackTrace};

static TRACEBACK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Traceback \(most recent call last\):").unwrap());
static FRAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"File "([^"]+)", line (\d+), in (.+)"#).unwrap());
static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\w+(?:Error|Exception)): (.+)$").unwrap());

#[must_use]
pub fn parse(text: &str) -> Option<StackTrace> {
    TRACEBACK_START.find(text)?;

    let frame_matches: Vec<_> = FRAME.captures_iter(text).collect();
    let total = frame_matches.len();

    let mut frames = Vec::new();
    for (i, caps) in frame_matches.iter().enumerate() {
        let file_path = caps.get(1).unwrap().as_str();
        let function_name = caps.get(3).unwrap().as_str().trim();
        let Ok(line_number) = caps.get(2).unwrap().as_str().parse::<u32>() else {
            continue;
        };

        let code_snippet = snippet::extract(text, file_path, line_number);
        let score = relevance::calculate(file_path, function_name, i, total, Language::Python);

        frames.push(StackFrame::new(file_path, line_number, function_name, code_snippet, score));
    }

    if frames.is_empty() {
        return None;
    }

    let (error_type, error_message) = error_info::extract(text, &ERROR_LINE);

    Some(StackTrace { language: Language::Python, error_type, error_message, frames })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_traceback() {
        let text = "Traceback (most recent call last):\n  File \"app/views.py\", line 42, in handle\n    raise ValueError(\"bad\")\nValueError: bad\n";
        let trace = parse(text).expect("should parse");
        assert_eq!(trace.frames.len(), 1);
        assert_eq!(trace.frames[0].file_path, "app/views.py");
        assert_eq!(trace.error_type, "ValueError");
    }

    #[test]
    fn no_traceback_marker_yields_none() {
        assert!(parse("just some text").is_none());
    }
}
