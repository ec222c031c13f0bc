use chrono::{DateTime, Utc};

/// A proposed single-file code change, before a draft review request exists.
#[derive(Debug, Clone)]
pub struct DraftFix {
    pub file_path: String,
    pub original_content: String,
    pub fixed_content: String,
    pub line_changes: u32,
    pub explanation: String,
    pub confidence: f64,
}

/// The opened draft review request plus the fix that produced it.
#[derive(Debug, Clone)]
pub struct DraftReviewRequest {
    pub title: String,
    pub description: String,
    pub file_path: String,
    pub url: String,
    pub confidence: f64,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}
