use regex::Regex;
use std::sync::LazyLock;

use crate::error_info;
use crate::relevance;
use crate::snippet;
use crate::types::{Language, StackFrame, StackTrace};

static FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"at (?:(.+) \()?([^:]+):(\d+):(\d+)\)?").unwrap());
static NODE_FRAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"at (.+) \(([^:]+):(\d+):(\d+)\)").unwrap());
static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\w+(?:Error|Exception)): (.+)$").unwrap());

#[must_use]
pub fn parse(text: &str) -> Option<StackTrace> {
    let mut frames = Vec::new();

    for pattern in [&*FRAME, &*NODE_FRAME] {
        let matches: Vec<_> = pattern.captures_iter(text).collect();
        let total = matches.len();

        for (i, caps) in matches.iter().enumerate() {
            let file_path = caps.get(2).unwrap().as_str();
            let Ok(line_number) = caps.get(3).unwrap().as_str().parse::<u32>() else {
                continue;
            };

            let mut function_name = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            if function_name.is_empty() {
                function_name = "<anonymous>".to_string();
            }

            let code_snippet = snippet::extract(text, file_path, line_number);
            let score =
                relevance::calculate(file_path, &function_name, i, total, Language::Javascript);

            frames.push(StackFrame::new(file_path, line_number, function_name, code_snippet, score));
        }
    }

    if frames.is_empty() {
        return None;
    }

    let (error_type, error_message) = error_info::extract(text, &ERROR_LINE);

    Some(StackTrace { language: Language::Javascript, error_type, error_message, frames })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_node_frame() {
        let text = "TypeError: Cannot read property 'x' of undefined\n    at handleRequest (/app/src/server.js:10:5)\n";
        let trace = parse(text).expect("should parse");
        assert!(!trace.frames.is_empty());
        assert_eq!(trace.error_type, "TypeError");
    }

    #[test]
    fn anonymous_frame_gets_placeholder_name() {
        let text = "at /app/src/server.js:10:5\n";
        let trace = parse(text);
        if let Some(t) = trace {
            assert!(t.frames.iter().any(|f| f.function_name == "<anonymous>"));
        }
    }
}
