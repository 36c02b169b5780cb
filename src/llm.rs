pub mod gemini;

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, FinishReason,
};
use async_openai::Client as OpenAIClient;
use async_trait::async_trait;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use ollama_rs::generation::parameters::FormatType;
use ollama_rs::Ollama;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AiConfig, Provider};
use crate::TARGET_LLM_REQUEST;
use gemini::GeminiClient;

/// Generation parameters sent with every prompt.
#[derive(Clone, Debug, PartialEq)]
pub struct LLMParams {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl From<&AiConfig> for LLMParams {
    fn from(config: &AiConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        }
    }
}

/// Why the model did not hand back usable text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Content blocked by model for safety reasons: {0}")]
    Blocked(String),

    #[error("Model returned no text")]
    Empty,

    #[error("Provider quota exceeded: {0}")]
    Quota(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// The external generative model, as the summarizer sees it.
///
/// Implementations must be safe to call concurrently; one handle is shared by every request.
#[async_trait]
pub trait ModelGateway: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str, params: &LLMParams) -> Result<String, GatewayError>;
}

#[derive(Clone, Debug)]
pub enum LLMClient {
    Gemini(GeminiClient),
    Ollama(Ollama),
    OpenAI(OpenAIClient<OpenAIConfig>),
}

impl LLMClient {
    /// Build the client selected by `AI_PROVIDER`.
    pub fn from_config(config: &AiConfig) -> anyhow::Result<Self> {
        let client = match config.provider {
            Provider::Gemini => {
                let api_key = config
                    .api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY is required for the gemini provider"))?;
                LLMClient::Gemini(GeminiClient::new(api_key)?)
            }
            Provider::Ollama => {
                info!(target: TARGET_LLM_REQUEST, "Connecting to Ollama at {}:{}", config.ollama_host, config.ollama_port);
                LLMClient::Ollama(Ollama::new(config.ollama_host.clone(), config.ollama_port))
            }
            Provider::OpenAI => {
                let api_key = config
                    .api_key
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for the openai provider"))?;
                let openai_config = OpenAIConfig::new().with_api_key(api_key);
                LLMClient::OpenAI(OpenAIClient::with_config(openai_config))
            }
        };
        Ok(client)
    }

    /// Send a trivial prompt to confirm the provider is reachable and the key works.
    pub async fn validate(&self, params: &LLMParams) -> bool {
        match self.generate("Hello", params).await {
            Ok(_) => true,
            Err(e) => {
                warn!(target: TARGET_LLM_REQUEST, "{} validation failed: {}", self.name(), e);
                false
            }
        }
    }
}

#[async_trait]
impl ModelGateway for LLMClient {
    fn name(&self) -> &str {
        match self {
            LLMClient::Gemini(_) => "Gemini",
            LLMClient::Ollama(_) => "Ollama",
            LLMClient::OpenAI(_) => "OpenAI",
        }
    }

    async fn generate(&self, prompt: &str, params: &LLMParams) -> Result<String, GatewayError> {
        debug!(target: TARGET_LLM_REQUEST, "Sending {} request to model {}", self.name(), params.model);
        match self {
            LLMClient::Gemini(client) => client.generate_content(prompt, params).await,
            LLMClient::Ollama(ollama) => generate_ollama(ollama, prompt, params).await,
            LLMClient::OpenAI(client) => generate_openai(client, prompt, params).await,
        }
    }
}

async fn generate_ollama(
    ollama: &Ollama,
    prompt: &str,
    params: &LLMParams,
) -> Result<String, GatewayError> {
    let mut request = GenerationRequest::new(params.model.clone(), prompt.to_string());
    request.options = Some(
        GenerationOptions::default()
            .temperature(params.temperature)
            .num_predict(params.max_output_tokens as i32),
    );
    request.format = Some(FormatType::Json);

    let response = ollama
        .generate(request)
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;

    if response.response.trim().is_empty() {
        return Err(GatewayError::Empty);
    }
    Ok(response.response)
}

async fn generate_openai(
    client: &OpenAIClient<OpenAIConfig>,
    prompt: &str,
    params: &LLMParams,
) -> Result<String, GatewayError> {
    let message = ChatCompletionRequestUserMessageArgs::default()
        .content(prompt)
        .build()
        .map_err(|e| GatewayError::Provider(e.to_string()))?;
    let request = CreateChatCompletionRequestArgs::default()
        .model(params.model.clone())
        .temperature(params.temperature)
        .max_completion_tokens(params.max_output_tokens)
        .messages([message.into()])
        .build()
        .map_err(|e| GatewayError::Provider(e.to_string()))?;

    let response = client.chat().create(request).await.map_err(map_openai_error)?;

    let choice = response.choices.into_iter().next().ok_or(GatewayError::Empty)?;
    if choice.finish_reason == Some(FinishReason::ContentFilter) {
        return Err(GatewayError::Blocked("CONTENT_FILTER".to_string()));
    }
    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(GatewayError::Empty),
    }
}

fn map_openai_error(error: OpenAIError) -> GatewayError {
    match error {
        OpenAIError::Reqwest(e) => GatewayError::Transport(e.to_string()),
        OpenAIError::ApiError(e) if e.message.to_lowercase().contains("quota") => {
            GatewayError::Quota(e.message)
        }
        other => GatewayError::Provider(other.to_string()),
    }
}
