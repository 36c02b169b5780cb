use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use samachar::app::{self, AppState};
use samachar::config::Config;
use samachar::llm::{LLMClient, LLMParams, ModelGateway};
use samachar::logging;
use samachar::summarize::{Summarizer, SummarizerConfig};
use samachar::TARGET_LLM_REQUEST;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let _log_guard = logging::configure_logging(&config.logging);

    info!(
        "Starting {} v{} with {} model {}",
        config.app.name, config.app.version, config.ai.provider, config.ai.model
    );

    let client = LLMClient::from_config(&config.ai)?;
    if client.validate(&LLMParams::from(&config.ai)).await {
        info!(target: TARGET_LLM_REQUEST, "{} connection validated", client.name());
    } else {
        warn!(target: TARGET_LLM_REQUEST, "{} validation failed; requests may fail until it recovers", client.name());
    }

    let summarizer = Summarizer::new(Arc::new(client), SummarizerConfig::from(&config.ai));
    let state = AppState {
        summarizer,
        config: Arc::new(config.app.clone()),
    };

    app::serve(&config.app, state).await
}
