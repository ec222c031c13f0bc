use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixComplexity {
    Simple,
    Moderate,
    Complex,
}

impl FromStr for FixComplexity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "moderate" => Ok(Self::Moderate),
            "complex" => Ok(Self::Complex),
            _ => Err(()),
        }
    }
}

impl FixComplexity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugAnalysis {
    pub affected_files: Vec<String>,
    pub root_cause_hypothesis: String,
    pub plain_english_explanation: String,
    pub fix_complexity: FixComplexity,
    pub confidence: f64,
    pub error_translation: String,
    pub additional_context: HashMap<String, Value>,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Deterministic generation parameters for the LLM call: low temperature
/// for consistent, reproducible analysis.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.1, top_p: 0.8, top_k: 40, max_output_tokens: 2048 }
    }
}
