use std::future::Future;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use super::{Summarizer, SummaryResult};
use crate::article::{extract_article_content, ArticleInput};
use crate::llm::GatewayError;
use crate::parse::{parse_summary_response, ParseError};
use crate::prompt::{build_article_prompt, PromptLanguage, SummaryMode};
use crate::TARGET_LLM_REQUEST;

/// Responses shorter than this are treated as no answer at all.
const MIN_RESPONSE_CHARS: usize = 10;

/// Why a single attempt did not produce a summary. Every variant is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("Article content too short ({found} chars, need {required})")]
    ContentTooShort { found: usize, required: usize },

    #[error("Empty or too short response from model")]
    ResponseTooShort,

    #[error("Model request timed out after {0} ms")]
    TimedOut(u128),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Summarizer {
    /// Run `attempt` until it succeeds or the retry budget is spent.
    ///
    /// The gateway is reached at most `max_retries + 1` times, with a fixed pause between tries.
    pub(super) async fn with_retries<F, Fut>(&self, fallback_title: &str, mut attempt: F) -> SummaryResult
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<SummaryResult, AttemptError>>,
    {
        let max_retries = self.config.max_retries;
        let mut retry_count = 0;
        loop {
            match attempt(retry_count).await {
                Ok(result) => return result,
                Err(e) => {
                    warn!(
                        target: TARGET_LLM_REQUEST,
                        "Error on attempt {} for article \"{}\": {}",
                        retry_count + 1,
                        fallback_title,
                        e
                    );
                }
            }

            if retry_count >= max_retries {
                error!(
                    target: TARGET_LLM_REQUEST,
                    "Giving up on article \"{}\" after {} attempts",
                    fallback_title,
                    retry_count + 1
                );
                return SummaryResult::fallback(fallback_title);
            }

            retry_count += 1;
            info!(target: TARGET_LLM_REQUEST, "Retrying... ({}/{})", retry_count, max_retries);
            sleep(self.config.retry_delay).await;
        }
    }

    /// One pass over a single article: extract, validate, prompt, call, parse.
    pub(super) async fn attempt_article(
        &self,
        article: &ArticleInput,
        language: PromptLanguage,
        mode: SummaryMode,
    ) -> Result<SummaryResult, AttemptError> {
        let content = extract_article_content(article);
        let clean_content = content.clean_content();
        self.check_content_length(clean_content.chars().count())?;

        let prompt = build_article_prompt(
            &content,
            &clean_content,
            language,
            mode,
            self.config.max_input_length,
        );
        self.complete_prompt(&prompt).await
    }

    /// `found` is a character count, not bytes.
    pub(super) fn check_content_length(&self, found: usize) -> Result<(), AttemptError> {
        let required = self.config.min_content_length;
        if found < required {
            return Err(AttemptError::ContentTooShort { found, required });
        }
        Ok(())
    }

    /// Send a finished prompt and parse whatever comes back.
    pub(super) async fn complete_prompt(&self, prompt: &str) -> Result<SummaryResult, AttemptError> {
        let request_timeout = self.config.request_timeout;
        let raw = timeout(request_timeout, self.gateway.generate(prompt, &self.config.llm))
            .await
            .map_err(|_| AttemptError::TimedOut(request_timeout.as_millis()))??;

        debug!(target: TARGET_LLM_REQUEST, "Raw response from {}: {}", self.gateway.name(), raw);

        if raw.trim().chars().count() < MIN_RESPONSE_CHARS {
            return Err(AttemptError::ResponseTooShort);
        }
        Ok(parse_summary_response(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{ScriptedGateway, Step};
    use crate::summarize::SummarizerConfig;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_attempt_errors_are_classified() {
        let gateway = Arc::new(ScriptedGateway::sequence(vec![
            Step::Reply("{}".to_string()),
            Step::Reply("no json here, just prose".to_string()),
            Step::Fail(GatewayError::Quota("limit".to_string())),
            Step::Hang,
        ]));
        let summarizer = Summarizer::new(
            gateway,
            SummarizerConfig {
                request_timeout: Duration::from_millis(10),
                ..SummarizerConfig::fast()
            },
        );

        assert_eq!(
            summarizer.complete_prompt("p").await,
            Err(AttemptError::ResponseTooShort)
        );
        assert_eq!(
            summarizer.complete_prompt("p").await,
            Err(AttemptError::Parse(ParseError::Unparseable))
        );
        assert_eq!(
            summarizer.complete_prompt("p").await,
            Err(AttemptError::Gateway(GatewayError::Quota("limit".to_string())))
        );
        assert_eq!(
            summarizer.complete_prompt("p").await,
            Err(AttemptError::TimedOut(10))
        );
    }

    #[tokio::test]
    async fn test_retry_loop_counts_attempts() {
        let summarizer = Summarizer::new(
            Arc::new(ScriptedGateway::always(Step::Hang)),
            SummarizerConfig {
                max_retries: 2,
                ..SummarizerConfig::fast()
            },
        );
        let mut seen = Vec::new();
        let result = summarizer
            .with_retries("Title", |n| {
                seen.push(n);
                async { Err(AttemptError::ResponseTooShort) }
            })
            .await;

        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(result, SummaryResult::fallback("Title"));
    }

    #[test]
    fn test_content_length_threshold() {
        let summarizer = Summarizer::new(Arc::new(ScriptedGateway::always(Step::Hang)), SummarizerConfig::fast());
        assert!(summarizer.check_content_length(50).is_ok());
        assert_eq!(
            summarizer.check_content_length(5),
            Err(AttemptError::ContentTooShort {
                found: 5,
                required: 50
            })
        );
    }
}
