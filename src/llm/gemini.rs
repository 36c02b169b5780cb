//! Google Gemini over the public `generateContent` REST endpoint.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{GatewayError, LLMParams};
use crate::TARGET_LLM_REQUEST;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Finish reasons that mean the candidate was withheld rather than simply cut short.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or the reason there is none.
    pub(crate) fn into_text(self) -> Result<String, GatewayError> {
        if let Some(reason) = self.prompt_feedback.and_then(|feedback| feedback.block_reason) {
            return Err(GatewayError::Blocked(reason));
        }

        let candidate = self.candidates.into_iter().next().ok_or(GatewayError::Empty)?;
        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }
        match candidate.finish_reason {
            Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
                Err(GatewayError::Blocked(reason))
            }
            _ => Err(GatewayError::Empty),
        }
    }
}

impl GeminiClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self { http, api_key })
    }

    pub async fn generate_content(
        &self,
        prompt: &str,
        params: &LLMParams,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, params.model);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: params.max_output_tokens,
                temperature: params.temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Quota(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider(format!("HTTP {}: {}", status, message)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Provider(format!("invalid response body: {}", e)))?;
        debug!(target: TARGET_LLM_REQUEST, "Gemini returned {} candidate(s)", parsed.candidates.len());
        parsed.into_text()
    }
}
