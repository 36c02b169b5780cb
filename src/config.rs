//! Service configuration, read once from the environment at startup.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::environment::{non_empty, parse_bool, parse_or, split_list};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Which model provider backs the gateway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    Ollama,
    OpenAI,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAI),
            other => Err(format!("unknown AI provider '{}'", other)),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
            Provider::OpenAI => "openai",
        })
    }
}

/// Per-window request allowance when `RATE_LIMIT_MAX` is unset.
fn default_rate_limit_max(environment: &str) -> u32 {
    match environment {
        "development" => 1000,
        "staging" => 200,
        _ => 100,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Only honoured with an explicit origin list.
    pub cors_credentials: bool,
    pub max_payload_bytes: usize,
    pub max_articles: usize,
    pub show_error_details: bool,
    pub rate_limit_window_ms: u64,
    /// Requests per client per window. Zero disables the limiter.
    pub rate_limit_max: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Article Summarization API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
            cors_credentials: true,
            max_payload_bytes: 10 * 1024 * 1024,
            max_articles: 50,
            show_error_details: true,
            rate_limit_window_ms: 15 * 60 * 1000,
            rate_limit_max: default_rate_limit_max("development"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AiConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_retries: u32,
    pub min_content_length: usize,
    pub max_input_length: usize,
    pub retry_delay_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            api_key: None,
            ollama_host: "http://localhost".to_string(),
            ollama_port: 11434,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 5000,
            temperature: 0.7,
            max_retries: 3,
            min_content_length: 50,
            max_input_length: 8000,
            retry_delay_ms: 1000,
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub level: String,
    pub enable_file: bool,
    pub dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_file: false,
            dir: "logs".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub app: AppConfig,
    pub ai: AiConfig,
    pub logging: LogConfig,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            // Logging is not configured yet.
            eprintln!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Missing or malformed values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_defaults = AppConfig::default();
        let environment = non_empty(lookup("APP_ENV")).unwrap_or(app_defaults.environment);
        let is_development = environment == "development";

        let app = AppConfig {
            name: non_empty(lookup("APP_NAME")).unwrap_or(app_defaults.name),
            version: non_empty(lookup("APP_VERSION")).unwrap_or(app_defaults.version),
            host: non_empty(lookup("HOST")).unwrap_or(app_defaults.host),
            port: parse_or(lookup("PORT"), app_defaults.port),
            allowed_origins: split_list(lookup("ALLOWED_ORIGINS"), ','),
            cors_credentials: parse_bool(lookup("CORS_CREDENTIALS")).unwrap_or(app_defaults.cors_credentials),
            max_payload_bytes: parse_or(lookup("MAX_PAYLOAD_BYTES"), app_defaults.max_payload_bytes),
            max_articles: parse_or(lookup("MAX_ARTICLES"), app_defaults.max_articles),
            show_error_details: parse_bool(lookup("SHOW_ERROR_DETAILS")).unwrap_or(is_development),
            rate_limit_window_ms: parse_or(lookup("RATE_LIMIT_WINDOW_MS"), app_defaults.rate_limit_window_ms),
            rate_limit_max: parse_or(lookup("RATE_LIMIT_MAX"), default_rate_limit_max(&environment)),
            environment,
        };

        let ai_defaults = AiConfig::default();
        let provider = parse_or(lookup("AI_PROVIDER"), ai_defaults.provider);
        let api_key = match provider {
            Provider::Gemini => non_empty(lookup("GEMINI_API_KEY")),
            Provider::OpenAI => non_empty(lookup("OPENAI_API_KEY")),
            Provider::Ollama => None,
        };
        let ai = AiConfig {
            provider,
            api_key,
            ollama_host: non_empty(lookup("OLLAMA_HOST")).unwrap_or(ai_defaults.ollama_host),
            ollama_port: parse_or(lookup("OLLAMA_PORT"), ai_defaults.ollama_port),
            model: non_empty(lookup("AI_MODEL")).unwrap_or(ai_defaults.model),
            max_tokens: parse_or(lookup("AI_MAX_TOKENS"), ai_defaults.max_tokens),
            temperature: parse_or(lookup("AI_TEMPERATURE"), ai_defaults.temperature),
            max_retries: parse_or(lookup("AI_MAX_RETRIES"), ai_defaults.max_retries),
            min_content_length: parse_or(lookup("AI_MIN_CONTENT_LENGTH"), ai_defaults.min_content_length),
            max_input_length: parse_or(lookup("AI_MAX_INPUT_LENGTH"), ai_defaults.max_input_length),
            retry_delay_ms: parse_or(lookup("AI_RETRY_DELAY"), ai_defaults.retry_delay_ms),
            request_timeout_ms: parse_or(lookup("AI_REQUEST_TIMEOUT_MS"), ai_defaults.request_timeout_ms),
        };

        let log_defaults = LogConfig::default();
        let logging = LogConfig {
            level: non_empty(lookup("LOG_LEVEL")).unwrap_or(log_defaults.level),
            enable_file: parse_bool(lookup("LOG_ENABLE_FILE")).unwrap_or(log_defaults.enable_file),
            dir: non_empty(lookup("LOG_DIR")).unwrap_or(log_defaults.dir),
        };

        Self { app, ai, logging }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.ai.model, "gemini-1.5-flash");
        assert_eq!(config.ai.max_retries, 3);
        assert_eq!(config.ai.max_input_length, 8000);
        assert_eq!(config.app.port, 3000);
        assert_eq!(config.app.max_articles, 50);
        assert!(config.app.show_error_details);
        assert!(config.app.cors_credentials);
        assert_eq!(config.app.rate_limit_window_ms, 900_000);
        assert_eq!(config.app.rate_limit_max, 1000);
    }

    #[test]
    fn test_rate_limit_and_credentials_settings() {
        let config = config_from(&[
            ("APP_ENV", "staging"),
            ("RATE_LIMIT_WINDOW_MS", "60000"),
            ("CORS_CREDENTIALS", "false"),
        ]);
        assert_eq!(config.app.rate_limit_window_ms, 60_000);
        assert_eq!(config.app.rate_limit_max, 200);
        assert!(!config.app.cors_credentials);

        let config = config_from(&[("RATE_LIMIT_MAX", "5"), ("APP_ENV", "production")]);
        assert_eq!(config.app.rate_limit_max, 5);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("AI_MAX_RETRIES", "five"),
            ("AI_TEMPERATURE", "0.2"),
            ("AI_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GEMINI_API_KEY", "ignored"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
            ("APP_ENV", "production"),
            ("LOG_ENABLE_FILE", "true"),
        ]);
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.ai.max_retries, 3);
        assert!((config.ai.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.ai.provider, Provider::OpenAI);
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.app.allowed_origins.len(), 2);
        assert_eq!(config.app.environment, "production");
        assert!(!config.app.show_error_details);
        assert_eq!(config.app.rate_limit_max, 100);
        assert!(config.logging.enable_file);
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        let config = config_from(&[("AI_PROVIDER", "mystery")]);
        assert_eq!(config.ai.provider, Provider::Gemini);
    }
}
