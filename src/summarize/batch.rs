use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

use super::{SummarizeError, Summarizer, SummaryResult, BATCH_FAILURE_SUMMARY};
use crate::article::{extract_article_content, truncate_chars, ArticleInput};
use crate::prompt::{
    consolidated_segments, consolidated_summary_prompt, PromptLanguage, SummaryMode, WordRange,
    SEGMENT_SEPARATOR,
};
use crate::TARGET_LLM_REQUEST;

impl Summarizer {
    /// Summarize every article concurrently in short mode.
    ///
    /// Results come back in input order, one per article. A failed article yields its
    /// placeholder and never affects the others.
    pub async fn summarize_articles(
        &self,
        articles: &[ArticleInput],
        language: PromptLanguage,
    ) -> Result<Vec<SummaryResult>, SummarizeError> {
        if articles.is_empty() {
            return Err(SummarizeError::EmptyBatch);
        }
        info!(target: TARGET_LLM_REQUEST, "Summarizing {} articles in {}", articles.len(), language);

        let runs = articles.iter().map(|article| {
            AssertUnwindSafe(self.summarize_single_article(article, language, SummaryMode::Short))
                .catch_unwind()
        });
        let outcomes = join_all(runs).await;

        let results = outcomes
            .into_iter()
            .zip(articles)
            .map(|(outcome, article)| match outcome {
                Ok(result) => result,
                Err(_) => {
                    let title = article.fallback_title();
                    error!(target: TARGET_LLM_REQUEST, "Final failure for article \"{}\": run panicked", title);
                    SummaryResult {
                        title,
                        summary: BATCH_FAILURE_SUMMARY.to_string(),
                    }
                }
            })
            .collect();
        Ok(results)
    }

    /// Fold all `articles` into one consolidated title and summary.
    ///
    /// The whole set shares a single retry cycle; on exhaustion the placeholder carries the
    /// first article's title.
    pub async fn summarize_long_articles(
        &self,
        articles: &[ArticleInput],
        language: PromptLanguage,
        range: WordRange,
    ) -> Result<SummaryResult, SummarizeError> {
        let first = articles.first().ok_or(SummarizeError::EmptyBatch)?;
        let fallback_title = first.fallback_title();
        info!(
            target: TARGET_LLM_REQUEST,
            "Consolidating {} articles in {} ({} words)",
            articles.len(),
            language,
            range
        );

        let pairs: Vec<(String, String)> = articles
            .iter()
            .map(|article| {
                let content = extract_article_content(article);
                let clean = content.clean_content();
                (content.title, clean)
            })
            .collect();
        let total_chars: usize = pairs.iter().map(|(_, clean)| clean.chars().count()).sum();

        let segments = consolidated_segments(&pairs);
        let kept = segments_starting_within(&segments, self.config.max_input_length);
        if kept < segments.len() {
            warn!(
                target: TARGET_LLM_REQUEST,
                "Consolidated input exceeds {} chars; dropping {} of {} articles",
                self.config.max_input_length,
                segments.len() - kept,
                segments.len()
            );
        }
        let combined = segments.join(SEGMENT_SEPARATOR);
        let combined = truncate_chars(&combined, self.config.max_input_length);
        let prompt = consolidated_summary_prompt(language, combined, range);
        let prompt = prompt.as_str();

        let result = self
            .with_retries(&fallback_title, |_| async move {
                self.check_content_length(total_chars)?;
                self.complete_prompt(prompt).await
            })
            .await;
        Ok(result)
    }
}

/// How many joined segments begin before `limit` characters.
fn segments_starting_within(segments: &[String], limit: usize) -> usize {
    let separator = SEGMENT_SEPARATOR.chars().count();
    let mut start = 0;
    segments
        .iter()
        .take_while(|segment| {
            let begins_within = start < limit;
            start += segment.chars().count() + separator;
            begins_within
        })
        .count()
}
