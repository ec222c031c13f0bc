use regex::Regex;
use std::sync::LazyLock;

use crate::error_info;
use crate::relevance;
use crate::snippet;
use crate::types::{Language, StackFrame, StackTrace};

static FRAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"at ([^(]+)\(([^:]+):(\d+)\)").unwrap());
static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\w+(?:Exception|Error)): (.+)$").unwrap());
static CAUSED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Caused by: (\w+(?:Exception|Error)): (.+)$").unwrap());

#[must_use]
pub fn parse(text: &str) -> Option<StackTrace> {
    let frame_matches: Vec<_> = FRAME.captures_iter(text).collect();
    let total = frame_matches.len();

    let mut frames = Vec::new();
    for (i, caps) in frame_matches.iter().enumerate() {
        let method_info = caps.get(1).unwrap().as_str().trim();
        let file_name = caps.get(2).unwrap().as_str();
        let Ok(line_number) = caps.get(3).unwrap().as_str().parse::<u32>() else {
            continue;
        };

        let (class_name, function_name) = if let Some((class_name, method_name)) =
            method_info.rsplit_once('.')
        {
            (class_name.to_string(), format!("{class_name}.{method_name}"))
        } else {
            (method_info.to_string(), method_info.to_string())
        };

        let file_path = if file_name == "Unknown Source" {
            format!("{class_name}.java")
        } else {
            file_name.to_string()
        };

        let code_snippet = snippet::extract(text, &file_path, line_number);
        let score = relevance::calculate(&file_path, &function_name, i, total, Language::Java);

        frames.push(StackFrame::new(file_path, line_number, function_name, code_snippet, score));
    }

    if frames.is_empty() {
        return None;
    }

    let (mut error_type, mut error_message) = error_info::extract(text, &ERROR_LINE);
    if error_type == "UnknownError" {
        (error_type, error_message) = error_info::extract(text, &CAUSED_BY);
    }

    Some(StackTrace { language: Language::Java, error_type, error_message, frames })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_java_frame_with_known_source() {
        let text = "Exception in thread \"main\" java.lang.NullPointerException: oops\n\tat com.example.Service.process(Service.java:88)\n";
        let trace = parse(text).expect("should parse");
        assert_eq!(trace.frames[0].file_path, "Service.java");
        assert_eq!(trace.frames[0].function_name, "com.example.Service.process");
    }

    #[test]
    fn falls_back_to_caused_by() {
        let text = "at com.example.Service.process(Service.java:88)\nCaused by: java.lang.IllegalStateException: bad state\n";
        let trace = parse(text).expect("should parse");
        assert_eq!(trace.error_type, "java.lang.IllegalStateException");
    }
}
