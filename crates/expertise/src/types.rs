use chrono::{DateTime, Utc};

/// A single blame attribution, after porcelain parsing, before bot/merge filtering.
#[derive(Debug, Clone)]
pub struct BlameRecord {
    pub commit: String,
    pub email: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-developer ownership score for one file, sorted descending by `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertiseScore {
    pub email: String,
    pub name: String,
    pub score: f64,
    pub commit_count: u32,
    pub lines_owned: u32,
    pub last_commit_date: Option<DateTime<Utc>>,
}

/// Result of `get_primary_and_fallbacks`: a top candidate plus up to four
/// runners-up, both already filtered to active contributors.
#[derive(Debug, Clone, Default)]
pub struct PrimaryAndFallbacks {
    pub primary: Option<ExpertiseScore>,
    pub fallbacks: Vec<ExpertiseScore>,
}
