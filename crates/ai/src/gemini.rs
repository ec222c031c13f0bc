use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use resilience::{BreakerConfig, CircuitBreaker};
use serde_json::json;
use stacktrace::StackTrace;
use thiserror::Error;
use tracing::warn;

use crate::fallback::heuristic_analysis;
use crate::parse::parse_response;
use crate::prompt::build as build_prompt;
use crate::types::{BugAnalysis, GenerationConfig};

const GEMINI_MODEL: &str = "gemini-1.5-pro";
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("empty response from model")]
    Empty,
    #[error("response did not contain a parseable analysis")]
    Unparseable,
}

/// Analyzes issue text and an optional stack trace, producing a
/// [`BugAnalysis`]. Implementors may be mocked in tests via `mockall`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, issue_body: &str, trace: Option<&StackTrace>, extra: Option<&str>) -> Option<BugAnalysis>;
}

/// Calls the Gemini REST API under the `llm` circuit breaker, retrying with
/// exponential backoff, and falling back to a keyword heuristic when the
/// breaker is open or every attempt fails.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_key: String,
    breaker: Arc<CircuitBreaker>,
    attempt_timeout: Duration,
    generation_config: GenerationConfig,
}

impl GeminiAnalyzer {
    #[must_use]
    pub fn new(api_key: String, attempt_timeout: Duration, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            breaker,
            attempt_timeout,
            generation_config: GenerationConfig::default(),
        }
    }

    #[must_use]
    pub fn breaker_config() -> BreakerConfig {
        BreakerConfig::default()
    }

    async fn call_once(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent?key={}",
            self.api_key
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.generation_config.temperature,
                "topP": self.generation_config.top_p,
                "topK": self.generation_config.top_k,
                "maxOutputTokens": self.generation_config.max_output_tokens,
            }
        });

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        let payload: serde_json::Value = response.json().await?;

        if !status.is_success() {
            warn!(%status, "gemini API returned an error status");
            return Err(AnalysisError::Empty);
        }

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::trim)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(AnalysisError::Empty)
    }

    async fn call_with_retry(&self, prompt: &str) -> Result<String, AnalysisError> {
        let mut last_err = AnalysisError::Empty;

        for attempt in 0..MAX_ATTEMPTS {
            let result = tokio::time::timeout(self.attempt_timeout, self.call_once(prompt)).await;

            match result {
                Ok(Ok(text)) => return Ok(text),
                Ok(Err(e)) => {
                    warn!(attempt = attempt + 1, error = %e, "AI analysis error");
                    last_err = e;
                }
                Err(_) => {
                    warn!(attempt = attempt + 1, "AI analysis timeout");
                    last_err = AnalysisError::Timeout;
                }
            }

            if attempt + 1 < MAX_ATTEMPTS {
                tokio::time::sleep(Duration::from_secs(2_u64.pow(attempt))).await;
            }
        }

        Err(last_err)
    }
}

/// Raw prompt-in, text-out completion, for callers (`draftfix`) that need
/// their own response schema rather than a [`BugAnalysis`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Option<String>;
}

#[async_trait]
impl TextGenerator for GeminiAnalyzer {
    async fn generate(&self, prompt: &str) -> Option<String> {
        let primary = || async { self.call_with_retry(prompt).await };
        let no_fallback: Option<fn() -> std::future::Ready<Result<String, AnalysisError>>> = None;
        self.breaker.call(primary, no_fallback).await.ok()
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, issue_body: &str, trace: Option<&StackTrace>, extra: Option<&str>) -> Option<BugAnalysis> {
        let prompt = build_prompt(issue_body, trace, extra);

        let primary = || async {
            let text = self.call_with_retry(&prompt).await?;
            parse_response(&text).ok_or(AnalysisError::Unparseable)
        };
        let fallback = || async { Ok::<BugAnalysis, AnalysisError>(heuristic_analysis(issue_body, trace)) };

        self.breaker.call(primary, Some(fallback)).await.ok()
    }
}
