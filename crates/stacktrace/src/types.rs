use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Java,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFrame {
    pub file_path: String,
    pub line_number: u32,
    pub function_name: String,
    pub code_snippet: String,
    pub relevance: f64,
}

impl StackFrame {
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        line_number: u32,
        function_name: impl Into<String>,
        code_snippet: impl Into<String>,
        relevance: f64,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            function_name: function_name.into(),
            code_snippet: code_snippet.into(),
            relevance: relevance.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackTrace {
    pub language: Language,
    pub error_type: String,
    pub error_message: String,
    pub frames: Vec<StackFrame>,
}

impl StackTrace {
    /// Frames sorted by relevance descending, capped at `limit`.
    #[must_use]
    pub fn most_relevant(&self, limit: usize) -> Vec<&StackFrame> {
        let mut frames: Vec<&StackFrame> = self.frames.iter().collect();
        frames.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap());
        frames.truncate(limit);
        frames
    }

    /// Unique file paths referenced by the trace, in first-seen order.
    #[must_use]
    pub fn file_paths(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut paths = Vec::new();
        for frame in &self.frames {
            if !frame.file_path.is_empty() && seen.insert(frame.file_path.clone()) {
                paths.push(frame.file_path.clone());
            }
        }
        paths
    }
}
