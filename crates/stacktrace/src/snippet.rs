//! Code-snippet extraction, grounded on `_extract_code_snippet` in
//! `original_source/backend/stack_trace_parser.py`.

/// Look for a line mentioning `file_path` and `line_number`, then return the
/// first non-empty line after it that doesn't look like another frame header.
#[must_use]
pub fn extract(text: &str, file_path: &str, line_number: u32) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let line_str = line_number.to_string();

    for (i, line) in lines.iter().enumerate() {
        if line.contains(file_path) && line.contains(&line_str) {
            for candidate in lines.iter().skip(i + 1).take(3) {
                let trimmed = candidate.trim();
                if !trimmed.is_empty() && !trimmed.starts_with("File") && !trimmed.starts_with("at")
                {
                    return trimmed.to_string();
                }
            }
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_next_non_empty_line() {
        let text = "File \"a.py\", line 2, in foo\n    raise ValueError(\"boom\")\n";
        assert_eq!(extract(text, "a.py", 2), "raise ValueError(\"boom\")");
    }

    #[test]
    fn missing_reference_yields_empty() {
        assert_eq!(extract("no match here", "a.py", 2), "");
    }
}
