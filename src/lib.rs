pub mod app;
pub mod article;
pub mod config;
pub mod environment;
pub mod llm;
pub mod logging;
pub mod parse;
pub mod prompt;
pub mod summarize;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";
