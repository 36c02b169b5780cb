//! Article records as callers send them, and the canonical form the prompts are built from.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Title used when an article carries no usable title field.
pub const UNTITLED: &str = "Untitled";

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").expect("valid tag regex"));

/// An article exactly as the caller supplied it.
///
/// Feeds disagree on field names, so every variant is optional. Non-string JSON values are
/// treated as absent rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleInput {
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        rename = "sTitle",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub s_title: Option<String>,
    #[serde(
        rename = "shortTitle",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub short_title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "sDescription",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub s_description: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        rename = "sContent",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub s_content: Option<String>,
}

/// Normalized (title, description, body) triple. Never empty in the title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalContent {
    pub title: String,
    pub description: String,
    pub content: String,
}

impl CanonicalContent {
    /// The longer of the stripped description and the stripped body.
    pub fn clean_content(&self) -> String {
        let description = strip_html(&self.description);
        let content = strip_html(&self.content);
        if content.chars().count() > description.chars().count() {
            content
        } else {
            description
        }
    }
}

impl ArticleInput {
    pub fn has_title(&self) -> bool {
        first_non_empty(&[&self.title, &self.s_title, &self.short_title]).is_some()
    }

    pub fn has_content(&self) -> bool {
        first_non_empty(&[
            &self.description,
            &self.s_description,
            &self.content,
            &self.s_content,
        ])
        .is_some()
    }

    /// Title reported on placeholder results, taken from the raw fields.
    pub fn fallback_title(&self) -> String {
        first_non_empty(&[&self.title, &self.s_title])
            .unwrap_or(UNTITLED)
            .to_string()
    }
}

/// Resolve the best available title, description and body of an article.
pub fn extract_article_content(article: &ArticleInput) -> CanonicalContent {
    let title = first_non_empty(&[&article.title, &article.s_title, &article.short_title])
        .unwrap_or(UNTITLED);
    let description = first_non_empty(&[&article.description, &article.s_description]).unwrap_or("");
    let content = first_non_empty(&[&article.content, &article.s_content]).unwrap_or("");

    CanonicalContent {
        title: title.to_string(),
        description: description.to_string(),
        content: content.to_string(),
    }
}

/// Remove markup tags and the handful of entities news feeds actually emit.
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    HTML_TAG
        .replace_all(html, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Cut `text` to at most `max_chars` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn first_non_empty<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|field| field.as_deref())
        .find(|value| !value.trim().is_empty())
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(value: serde_json::Value) -> ArticleInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_title_priority() {
        let a = article(json!({"sTitle": "Second", "shortTitle": "Third"}));
        assert_eq!(extract_article_content(&a).title, "Second");

        let a = article(json!({"title": "First", "sTitle": "Second"}));
        assert_eq!(extract_article_content(&a).title, "First");

        let a = article(json!({"shortTitle": "Third"}));
        assert_eq!(extract_article_content(&a).title, "Third");

        let a = article(json!({"title": "", "description": "x"}));
        assert_eq!(extract_article_content(&a).title, UNTITLED);
    }

    #[test]
    fn test_content_priority() {
        let a = article(json!({
            "sDescription": "from s",
            "content": "main body",
            "sContent": "s body"
        }));
        let canonical = extract_article_content(&a);
        assert_eq!(canonical.description, "from s");
        assert_eq!(canonical.content, "main body");
    }

    #[test]
    fn test_non_string_fields_are_ignored() {
        let a = article(json!({"title": 42, "sTitle": "Real", "description": ["x"]}));
        assert_eq!(a.title, None);
        assert_eq!(a.description, None);
        assert_eq!(extract_article_content(&a).title, "Real");
        assert!(!a.has_content());
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Short</p>"), "Short");
        assert_eq!(strip_html("  <b>a</b>&nbsp;b &amp; c "), "a b & c");
        assert_eq!(strip_html("broken <span"), "broken");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_clean_content_prefers_longer_text() {
        let a = article(json!({
            "title": "T",
            "description": "<p>short teaser</p>",
            "content": "<div>a much longer body of text for the article</div>"
        }));
        let canonical = extract_article_content(&a);
        assert_eq!(
            canonical.clean_content(),
            "a much longer body of text for the article"
        );

        let a = article(json!({"title": "T", "description": "only a description"}));
        assert_eq!(extract_article_content(&a).clean_content(), "only a description");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let a = article(json!({
            "sTitle": "<b>Title</b>",
            "sDescription": "<p>Body&nbsp;text</p>",
            "sContent": "Longer body text here"
        }));
        let first = extract_article_content(&a);
        let second = extract_article_content(&a);
        assert_eq!(first, second);
        assert_eq!(first.clean_content(), second.clean_content());
    }

    #[test]
    fn test_fallback_title_uses_raw_fields() {
        let a = article(json!({"shortTitle": "Only short"}));
        assert_eq!(a.fallback_title(), UNTITLED);

        let a = article(json!({"sTitle": "S"}));
        assert_eq!(a.fallback_title(), "S");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("नमस्ते दुनिया", 3), "नमस");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
    }
}
