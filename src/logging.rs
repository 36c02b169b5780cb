use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Stdout filter directives for a base level. The request targets follow the base level;
/// the file layer keeps `llm_request` at `debug` regardless.
pub fn stdout_directives(level: &str) -> String {
    format!("{level},llm_request={level},web_request={level},hyper=warn,reqwest=warn")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer and must live as long as the process.
pub fn configure_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(EnvFilter::new(stdout_directives(&config.level)));

    let (file_log, guard) = if config.enable_file {
        let file_appender = rolling::daily(&config.dir, "app.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(EnvFilter::new("llm_request=debug,info"));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_directives_parse() {
        let directives = stdout_directives("debug");
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("llm_request=debug"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_request_targets_follow_base_level() {
        let directives = stdout_directives("warn");
        assert!(directives.contains("llm_request=warn"));
        assert!(directives.contains("web_request=warn"));
        assert!(!directives.contains("=info"));
    }
}
