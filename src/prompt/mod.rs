// Declare submodules
mod common;
mod summarization;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::article::{truncate_chars, CanonicalContent};

pub use common::{consolidated_segments, CONSOLIDATED_ARTICLE_CHARS, SEGMENT_SEPARATOR};
pub use summarization::{
    consolidated_summary_prompt, long_summary_prompt, short_summary_prompt,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("No prompt available for the selected language: \"{0}\"")]
    UnknownLanguage(String),
}

/// Language the model is instructed to answer in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    English,
    Hindi,
}

impl PromptLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptLanguage::English => "english",
            PromptLanguage::Hindi => "hindi",
        }
    }
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptLanguage {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(PromptLanguage::English),
            "hi" | "hindi" => Ok(PromptLanguage::Hindi),
            other => Err(PromptError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Inclusive target word range written into the prompt. Not enforced on the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordRange {
    pub min: u32,
    pub max: u32,
}

impl WordRange {
    pub const SHORT: WordRange = WordRange { min: 50, max: 60 };
    pub const LONG: WordRange = WordRange { min: 80, max: 100 };
    pub const CONSOLIDATED: WordRange = WordRange { min: 140, max: 160 };

    /// Parse a caller supplied `"min-max"` limit, falling back to `default` when malformed.
    pub fn parse_or(limit: Option<&str>, default: WordRange) -> WordRange {
        limit
            .and_then(|raw| raw.parse::<WordRange>().ok())
            .unwrap_or(default)
    }
}

impl fmt::Display for WordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for WordRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once(['-', '–'])
            .ok_or_else(|| format!("word limit '{}' is not a range", s))?;
        let min: u32 = min
            .trim()
            .parse()
            .map_err(|_| format!("invalid lower bound in '{}'", s))?;
        let max: u32 = max
            .trim()
            .parse()
            .map_err(|_| format!("invalid upper bound in '{}'", s))?;
        if min == 0 || min > max {
            return Err(format!("word limit '{}' is out of order", s));
        }
        Ok(WordRange { min, max })
    }
}

/// Which template family, and therefore which length contract, a request uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryMode {
    /// Batch endpoints: 50-60 word paraphrase.
    Short,
    /// Single-article endpoint.
    Long(WordRange),
}

/// Render the prompt for a single article.
///
/// Content is truncated to `max_input_length` characters before it reaches the template.
pub fn build_article_prompt(
    content: &CanonicalContent,
    clean_content: &str,
    language: PromptLanguage,
    mode: SummaryMode,
    max_input_length: usize,
) -> String {
    let truncated = truncate_chars(clean_content, max_input_length);
    match mode {
        SummaryMode::Short => short_summary_prompt(language, &content.title, truncated),
        SummaryMode::Long(range) => long_summary_prompt(language, &content.title, truncated, range),
    }
}
