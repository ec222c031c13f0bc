use crate::types::Language;

const PYTHON_INDICATORS: &[&str] = &[
    "traceback (most recent call last)",
    "file \"",
    "line ",
    "in ",
    ".py\"",
    "python",
    "django",
    "flask",
];

const JAVASCRIPT_INDICATORS: &[&str] = &[
    "at ",
    "node.js",
    "javascript",
    ".js:",
    "typeerror:",
    "referenceerror:",
    "syntaxerror:",
    "webpack://",
    "chrome-extension://",
];

const JAVA_INDICATORS: &[&str] = &[
    "exception in thread",
    "at ",
    ".java:",
    "caused by:",
    "java.lang.",
    "java.util.",
    "org.springframework",
    "com.example",
];

/// Score `text` against each language's indicator bag and return the
/// highest-scoring non-zero language. Ties favor Python, then JavaScript,
/// then Java.
#[must_use]
pub fn detect_language(text: &str) -> Language {
    let lower = text.to_lowercase();
    let count = |indicators: &[&str]| indicators.iter().filter(|i| lower.contains(*i)).count();

    let python_score = count(PYTHON_INDICATORS);
    let js_score = count(JAVASCRIPT_INDICATORS);
    let java_score = count(JAVA_INDICATORS);

    if python_score >= js_score && python_score >= java_score && python_score > 0 {
        Language::Python
    } else if js_score >= java_score && js_score > 0 {
        Language::Javascript
    } else if java_score > 0 {
        Language::Java
    } else {
        Language::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_python_traceback() {
        let text = "Traceback (most recent call last):\n  File \"a.py\", line 1, in <module>";
        assert_eq!(detect_language(text), Language::Python);
    }

    #[test]
    fn detects_java_from_exception_in_thread() {
        let text = "Exception in thread \"main\" java.lang.NullPointerException";
        assert_eq!(detect_language(text), Language::Java);
    }

    #[test]
    fn empty_text_is_unknown() {
        assert_eq!(detect_language(""), Language::Unknown);
    }
}
