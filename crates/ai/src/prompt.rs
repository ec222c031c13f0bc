use stacktrace::StackTrace;

/// Deterministic prompt construction, grounded on
/// `original_source/backend/ai_analysis_service.py::_build_analysis_prompt`.
#[must_use]
pub fn build(issue_body: &str, trace: Option<&StackTrace>, extra: Option<&str>) -> String {
    let mut parts = vec![
        "You are an expert software engineer analyzing a bug report. Please provide a comprehensive analysis.".to_string(),
        String::new(),
        "## Bug Report:".to_string(),
        issue_body.to_string(),
        String::new(),
    ];

    if let Some(trace) = trace {
        parts.push("## Stack Trace Analysis:".to_string());
        parts.push(format!("Language: {:?}", trace.language).to_lowercase());
        parts.push(format!("Error Type: {}", trace.error_type));
        parts.push(format!("Error Message: {}", trace.error_message));
        parts.push(String::new());
        parts.push("### Stack Frames (most relevant first):".to_string());

        for (i, frame) in trace.most_relevant(5).into_iter().enumerate() {
            parts.push(format!("{}. {}:{} in {}", i + 1, frame.file_path, frame.line_number, frame.function_name));
            if !frame.code_snippet.is_empty() {
                parts.push(format!("   Code: {}", frame.code_snippet));
            }
        }
        parts.push(String::new());
    }

    if let Some(extra) = extra {
        parts.push("## Additional Code Context:".to_string());
        parts.push(extra.to_string());
        parts.push(String::new());
    }

    parts.extend([
        "## Analysis Required:".to_string(),
        String::new(),
        "Please provide your analysis in the following JSON format:".to_string(),
        "{".to_string(),
        r#"  "affected_files": ["list of file paths that might be affected beyond the stack trace"],"#.to_string(),
        r#"  "root_cause_hypothesis": "your hypothesis about what caused this bug","#.to_string(),
        r#"  "plain_english_explanation": "explain the technical issue in simple terms","#.to_string(),
        r#"  "fix_complexity": "simple|moderate|complex","#.to_string(),
        r#"  "confidence": 0.85,"#.to_string(),
        r#"  "error_translation": "translate cryptic error messages into actionable descriptions","#.to_string(),
        r#"  "additional_context": {"#.to_string(),
        r#"    "likely_impact": "description of impact","#.to_string(),
        r#"    "suggested_investigation": "what to look at first","#.to_string(),
        r#"    "related_components": ["list of related system components"]"#.to_string(),
        "  }".to_string(),
        "}".to_string(),
        String::new(),
        "Guidelines:".to_string(),
        "- Focus on actionable insights for developers".to_string(),
        "- Consider the programming language and framework context".to_string(),
        "- Identify files beyond the stack trace that might need attention, using repository-relative paths".to_string(),
        "- Do not invent file paths that aren't present in the trace or issue body".to_string(),
        "- Translate technical jargon into clear explanations".to_string(),
        "- Assess fix complexity based on scope and risk".to_string(),
        "- Provide confidence score between 0.0 and 1.0".to_string(),
        "- Be specific about investigation steps".to_string(),
    ]);

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_bug_report_and_schema() {
        let prompt = build("NullPointerException on checkout", None, None);
        assert!(prompt.contains("## Bug Report:"));
        assert!(prompt.contains("NullPointerException on checkout"));
        assert!(prompt.contains(r#""fix_complexity": "simple|moderate|complex","#));
    }

    #[test]
    fn includes_trace_frames_when_present() {
        let trace = stacktrace::parse_stack_trace(
            "Traceback (most recent call last):\n  File \"app/billing.py\", line 10, in charge\n    raise ValueError(\"bad\")\nValueError: bad\n",
        )
        .unwrap();
        let prompt = build("crash", Some(&trace), None);
        assert!(prompt.contains("Stack Frames"));
        assert!(prompt.contains("app/billing.py"));
    }
}
