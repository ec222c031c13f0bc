//! AI analysis adapter: prompt construction, a Gemini-backed [`Analyzer`],
//! response parsing, and a keyword-heuristic fallback.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod fallback;
mod gemini;
mod parse;
mod prompt;
mod types;

pub use fallback::heuristic_analysis;
pub use gemini::{AnalysisError, Analyzer, GeminiAnalyzer, TextGenerator};
pub use parse::parse_response;
pub use prompt::build as build_prompt;
pub use types::{BugAnalysis, FixComplexity, GenerationConfig};
