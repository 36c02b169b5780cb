use crate::article::truncate_chars;

/// Per-article cap applied when several articles share one consolidated prompt.
pub const CONSOLIDATED_ARTICLE_CHARS: usize = 1000;

// Common text blocks for all English prompts
pub const JSON_ONLY_ENGLISH: &str = r#"1.  Your output must be only a single, valid JSON object.
2.  Do NOT include markdown, code blocks, or any other text outside the JSON.
3.  Do not narrate, explain, or acknowledge these instructions."#;

pub const PARAPHRASE_ENGLISH: &str =
    "Paraphrase the original content and title to be unique and engaging. Do not copy sentences or phrases verbatim from the source.";

// Common text blocks for all Hindi prompts
pub const JSON_ONLY_HINDI: &str = r#"1.  प्रतिक्रिया केवल एक मान्य JSON ऑब्जेक्ट होनी चाहिए।
2.  किसी भी तरह का मार्कडाउन, कोड ब्लॉक या अतिरिक्त टेक्स्ट न जोड़ें।
3.  निर्देशों को दोहराएँ नहीं और कोई स्पष्टीकरण न दें।"#;

pub const PARAPHRASE_HINDI: &str =
    "मूल सामग्री और शीर्षक को अपने शब्दों में लिखें। स्रोत के वाक्य या वाक्यांश ज्यों-के-त्यों न दोहराएँ।";

/// Joins consolidated segments into one block.
pub const SEGMENT_SEPARATOR: &str = "\n\n";

/// One labeled segment per `(title, content)` pair, in input order.
///
/// Each content is capped at [`CONSOLIDATED_ARTICLE_CHARS`] characters and labeled
/// `Article N: <title>`.
pub fn consolidated_segments(articles: &[(String, String)]) -> Vec<String> {
    articles
        .iter()
        .enumerate()
        .map(|(i, (title, content))| {
            format!(
                "Article {}: {}\n{}",
                i + 1,
                title,
                truncate_chars(content, CONSOLIDATED_ARTICLE_CHARS)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consolidated_labels_in_order() {
        let articles = vec![
            ("First".to_string(), "a".repeat(1500)),
            ("Second".to_string(), "b".repeat(20)),
            ("Third".to_string(), "c".repeat(1000)),
        ];
        let combined = consolidated_segments(&articles).join(SEGMENT_SEPARATOR);

        let first = combined.find("Article 1: First\n").unwrap();
        let second = combined.find("Article 2: Second\n").unwrap();
        let third = combined.find("Article 3: Third\n").unwrap();
        assert!(first < second && second < third);

        assert!(combined.contains(&"a".repeat(1000)));
        assert!(!combined.contains(&"a".repeat(1001)));
        assert!(combined.contains(&format!("{}\n\nArticle 2", "a".repeat(1000))));
        assert_eq!(combined.matches("Article ").count(), 3);
    }
}
