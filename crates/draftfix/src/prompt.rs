use ai::BugAnalysis;
use stacktrace::StackTrace;

/// Mirrors `original_source/backend/draft_pr_generator.py::_build_fix_prompt`.
#[must_use]
pub fn build(bug_analysis: &BugAnalysis, file_path: &str, file_content: &str, trace: Option<&StackTrace>) -> String {
    let mut parts = vec![
        "You are an expert software engineer. Generate a minimal code fix for the following bug.".to_string(),
        String::new(),
        "## Bug Analysis:".to_string(),
        format!("Root Cause: {}", bug_analysis.root_cause_hypothesis),
        format!("Explanation: {}", bug_analysis.plain_english_explanation),
        format!("Error Translation: {}", bug_analysis.error_translation),
        format!("Fix Complexity: {}", bug_analysis.fix_complexity.as_str()),
        String::new(),
        format!("## File to Fix: {file_path}"),
        "```".to_string(),
        file_content.to_string(),
        "```".to_string(),
        String::new(),
    ];

    if let Some(trace) = trace {
        parts.push("## Stack Trace Context:".to_string());
        parts.push(format!("Error: {}", trace.error_message));
        parts.push(format!("Type: {}", trace.error_type));

        for frame in trace.most_relevant(3) {
            if frame.file_path == file_path {
                parts.push(format!("Problem at line {} in {}", frame.line_number, frame.function_name));
            }
        }
        parts.push(String::new());
    }

    parts.extend([
        "## Fix Requirements:".to_string(),
        "1. Make MINIMAL changes (prefer single-file fixes under 20 lines)".to_string(),
        "2. Focus on the root cause identified in the analysis".to_string(),
        "3. Add explanatory comments for the fix".to_string(),
        "4. Preserve existing code style and patterns".to_string(),
        "5. Ensure the fix is safe and doesn't introduce new issues".to_string(),
        String::new(),
        "## Response Format:".to_string(),
        "Provide your response in the following JSON format:".to_string(),
        "{".to_string(),
        "  \"fixed_content\": \"complete fixed file content\",".to_string(),
        "  \"explanation\": \"clear explanation of what was changed and why\",".to_string(),
        "  \"line_changes\": 5,".to_string(),
        "  \"confidence\": 0.92".to_string(),
        "}".to_string(),
        String::new(),
        "Guidelines:".to_string(),
        "- Include the complete file content with your fixes applied".to_string(),
        "- Explain the changes in simple terms".to_string(),
        "- Count only the lines that were actually modified".to_string(),
        "- Provide confidence score between 0.0 and 1.0".to_string(),
        "- If the fix requires more than 20 line changes, explain why it's necessary".to_string(),
    ]);

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn analysis() -> BugAnalysis {
        BugAnalysis {
            affected_files: vec!["src/lib.rs".to_string()],
            root_cause_hypothesis: "off-by-one".to_string(),
            plain_english_explanation: "loop runs one too many times".to_string(),
            fix_complexity: ai::FixComplexity::Simple,
            confidence: 0.9,
            error_translation: "IndexError".to_string(),
            additional_context: HashMap::new(),
            analysis_timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn includes_file_content_and_response_schema() {
        let prompt = build(&analysis(), "src/lib.rs", "fn main() {}", None);
        assert!(prompt.contains("fn main() {}"));
        assert!(prompt.contains("\"fixed_content\""));
        assert!(prompt.contains("Root Cause: off-by-one"));
    }
}
