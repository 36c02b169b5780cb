//! Turn whatever the model sent back into a `{title, summary}` record.
//!
//! Models only mostly follow "JSON only". Each stage here is a fallback for the one before:
//! strip reasoning and code fences, parse JSON (twice for double-encoded output), retry with
//! typographic quotes normalized, and finally pull the two fields out with a regex.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::summarize::SummaryResult;
use crate::TARGET_LLM_REQUEST;

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think regex"));
static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?").expect("valid fence regex"));
static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```$").expect("valid fence regex"));
// Does not cope with escaped quotes inside values.
static TITLE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"title"\s*:\s*"([^"]*?)""#).expect("valid title regex"));
static SUMMARY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"summary"\s*:\s*"([^"]*?)""#).expect("valid summary regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to parse summary JSON from model response.")]
    Unparseable,
}

/// Parse a raw model response into a summary record.
pub fn parse_summary_response(raw: &str) -> Result<SummaryResult, ParseError> {
    let cleaned = strip_code_fences(&strip_reasoning(raw));

    if let Some(result) = parse_structured(&cleaned) {
        return Ok(result);
    }

    let normalized = normalize_quotes(&cleaned);
    if normalized != cleaned {
        if let Some(result) = parse_structured(&normalized) {
            debug!(target: TARGET_LLM_REQUEST, "Recovered summary after normalizing typographic quotes");
            return Ok(result);
        }
    }

    warn!(target: TARGET_LLM_REQUEST, "JSON parse failed, attempting regex fallback");
    extract_with_regex(&normalized).ok_or(ParseError::Unparseable)
}

/// Drop `<think>...</think>` blocks emitted by reasoning models.
fn strip_reasoning(raw: &str) -> String {
    THINK_BLOCK.replace_all(raw, "").trim().to_string()
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` marker and a trailing ```` ``` ````.
pub fn strip_code_fences(text: &str) -> String {
    let text = text.trim();
    let text = LEADING_FENCE.replace(text, "");
    let text = TRAILING_FENCE.replace(text.trim(), "");
    text.trim().to_string()
}

fn parse_structured(text: &str) -> Option<SummaryResult> {
    let mut value: Value = serde_json::from_str(text).ok()?;
    if let Value::String(inner) = &value {
        // Double-encoded: the model returned a JSON string containing the object.
        value = serde_json::from_str(inner).ok()?;
    }
    summary_from_value(&value)
}

fn summary_from_value(value: &Value) -> Option<SummaryResult> {
    let title = value.get("title")?.as_str()?.trim();
    let summary = value.get("summary")?.as_str()?.trim();
    if title.is_empty() || summary.is_empty() {
        return None;
    }
    Some(SummaryResult {
        title: title.to_string(),
        summary: summary.to_string(),
    })
}

fn normalize_quotes(text: &str) -> String {
    text.replace(['\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}'], "\"")
}

fn extract_with_regex(text: &str) -> Option<SummaryResult> {
    let title = TITLE_FIELD.captures(text)?.get(1)?.as_str().trim();
    let summary = SUMMARY_FIELD.captures(text)?.get(1)?.as_str().trim();
    if title.is_empty() || summary.is_empty() {
        return None;
    }
    Some(SummaryResult {
        title: title.to_string(),
        summary: summary.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected() -> SummaryResult {
        SummaryResult {
            title: "T".to_string(),
            summary: "S".to_string(),
        }
    }

    #[test]
    fn test_plain_json() {
        assert_eq!(
            parse_summary_response(r#"{"title":"T","summary":"S"}"#),
            Ok(expected())
        );
    }

    #[test]
    fn test_code_fenced_json() {
        let raw = "```json\n{\"title\":\"T\",\"summary\":\"S\"}\n```";
        assert_eq!(parse_summary_response(raw), Ok(expected()));

        let raw = "```JSON\n{\"title\":\"T\",\"summary\":\"S\"}```";
        assert_eq!(parse_summary_response(raw), Ok(expected()));

        let raw = "```\n{\"title\":\"T\",\"summary\":\"S\"}\n```\n";
        assert_eq!(parse_summary_response(raw), Ok(expected()));
    }

    #[test]
    fn test_double_encoded_json() {
        let inner = r#"{"title":"T","summary":"S"}"#;
        let raw = serde_json::to_string(inner).unwrap();
        assert_eq!(parse_summary_response(&raw), Ok(expected()));
    }

    #[test]
    fn test_typographic_quotes() {
        let raw = "{\u{201C}title\u{201D}: \u{201C}T\u{201D}, \u{201C}summary\u{201D}: \u{201C}S\u{201D}}";
        assert_eq!(parse_summary_response(raw), Ok(expected()));
    }

    #[test]
    fn test_regex_fallback_on_malformed_json() {
        let raw = r#"Sure! {"title": "T", "summary": "S", trailing garbage"#;
        assert_eq!(parse_summary_response(raw), Ok(expected()));
    }

    #[test]
    fn test_reasoning_block_is_ignored() {
        let raw = "<think>\nThe user wants {\"title\": \"wrong\"}\n</think>\n{\"title\":\"T\",\"summary\":\"S\"}";
        assert_eq!(parse_summary_response(raw), Ok(expected()));
    }

    #[test]
    fn test_values_are_trimmed_and_unicode_kept() {
        let raw = r#"{"title":"  बजट पारित ","summary":" संसद ने बजट पारित किया। "}"#;
        let result = parse_summary_response(raw).unwrap();
        assert_eq!(result.title, "बजट पारित");
        assert_eq!(result.summary, "संसद ने बजट पारित किया।");
    }

    #[test]
    fn test_failures() {
        assert_eq!(
            parse_summary_response("I cannot help with that."),
            Err(ParseError::Unparseable)
        );
        assert_eq!(
            parse_summary_response(r#"{"title":"T"}"#),
            Err(ParseError::Unparseable)
        );
        assert_eq!(
            parse_summary_response(r#"{"title":"","summary":""}"#),
            Err(ParseError::Unparseable)
        );
    }
}
