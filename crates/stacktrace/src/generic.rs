use regex::Regex;
use std::sync::LazyLock;

use crate::snippet;
use crate::types::{Language, StackFrame, StackTrace};

static FILE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^:\s]+):(\d+)").unwrap());
static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"at ([^(]+)\(([^:]+):(\d+)\)").unwrap());
static PYTHON_FRAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"File "([^"]+)", line (\d+)"#).unwrap());

/// Fallback parser applied when language detection yields [`Language::Unknown`]
/// or a language-specific parser finds no frames.
#[must_use]
pub fn parse(text: &str) -> Option<StackTrace> {
    let mut frames = Vec::new();

    for caps in FILE_LINE.captures_iter(text) {
        push_frame(&mut frames, text, caps.get(1).unwrap().as_str(), caps.get(2).unwrap().as_str(), "<unknown>");
    }
    for caps in FUNCTION_CALL.captures_iter(text) {
        push_frame(
            &mut frames,
            text,
            caps.get(2).unwrap().as_str(),
            caps.get(3).unwrap().as_str(),
            caps.get(1).unwrap().as_str().trim(),
        );
    }
    for caps in PYTHON_FRAME.captures_iter(text) {
        push_frame(&mut frames, text, caps.get(1).unwrap().as_str(), caps.get(2).unwrap().as_str(), "<unknown>");
    }

    if frames.is_empty() {
        return None;
    }

    let error_message = text
        .lines()
        .find(|l| {
            let lower = l.to_lowercase();
            lower.contains("error") || lower.contains("exception")
        })
        .map_or_else(|| "Unknown error".to_string(), |l| l.trim().to_string());

    Some(StackTrace {
        language: Language::Unknown,
        error_type: "UnknownError".to_string(),
        error_message,
        frames,
    })
}

fn push_frame(frames: &mut Vec<StackFrame>, text: &str, file_path: &str, line_num: &str, function_name: &str) {
    let Ok(line_number) = line_num.parse::<u32>() else {
        return;
    };
    let i = frames.len();
    let code_snippet = snippet::extract(text, file_path, line_number);
    let score = (1.0_f64 - (i as f64 * 0.1)).max(0.1);
    frames.push(StackFrame::new(file_path, line_number, function_name, code_snippet, score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_file_line_pairs() {
        let trace = parse("somewhere in module.rs:42 things broke, error detected").expect("should parse");
        assert!(!trace.frames.is_empty());
    }

    #[test]
    fn no_recognizable_frame_yields_none() {
        assert!(parse("nothing useful").is_none());
    }
}
