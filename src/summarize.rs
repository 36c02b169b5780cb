//! Summarization orchestration: one article with retries, a batch of articles, or many
//! articles folded into one consolidated summary.

mod attempt;
mod batch;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::article::ArticleInput;
use crate::config::AiConfig;
use crate::llm::{LLMParams, ModelGateway};
use crate::prompt::{PromptLanguage, SummaryMode};

pub use attempt::AttemptError;

/// Summary reported when every attempt for an article failed.
pub const FALLBACK_SUMMARY: &str = "Summary not generated due to repeated model failure.";

/// Summary reported when an article's run died outright instead of finishing.
pub const BATCH_FAILURE_SUMMARY: &str = "Summary failed to generate for this article.";

/// A paraphrased title and summary, as returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    pub summary: String,
}

impl SummaryResult {
    /// Placeholder returned once retries are exhausted.
    pub fn fallback(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: FALLBACK_SUMMARY.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    #[error("Failed to summarize articles: no articles were supplied")]
    EmptyBatch,
}

/// Knobs for the retry loop and the model call.
#[derive(Clone, Debug)]
pub struct SummarizerConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub min_content_length: usize,
    pub max_input_length: usize,
    pub request_timeout: Duration,
    pub llm: LLMParams,
}

impl From<&AiConfig> for SummarizerConfig {
    fn from(config: &AiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            min_content_length: config.min_content_length,
            max_input_length: config.max_input_length,
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            llm: LLMParams::from(config),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self::from(&AiConfig::default())
    }
}

#[cfg(test)]
impl SummarizerConfig {
    /// Defaults with millisecond delays, so retry paths finish quickly.
    pub(crate) fn fast() -> Self {
        Self {
            retry_delay: Duration::from_millis(1),
            request_timeout: Duration::from_millis(200),
            ..Self::default()
        }
    }
}

/// Drives the model gateway for every summarization request.
///
/// Cloning is cheap: the gateway handle is shared.
#[derive(Clone, Debug)]
pub struct Summarizer {
    gateway: Arc<dyn ModelGateway>,
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(gateway: Arc<dyn ModelGateway>, config: SummarizerConfig) -> Self {
        Self { gateway, config }
    }

    /// Summarize one article, retrying on any failure.
    ///
    /// Never fails: once retries run out the placeholder result is returned instead.
    pub async fn summarize_single_article(
        &self,
        article: &ArticleInput,
        language: PromptLanguage,
        mode: SummaryMode,
    ) -> SummaryResult {
        let fallback_title = article.fallback_title();
        self.with_retries(&fallback_title, |_| {
            self.attempt_article(article, language, mode)
        })
        .await
    }
}
