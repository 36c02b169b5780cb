//! HTTP surface: routes, CORS, body limits and the server loop.

mod api;
mod error;
mod rate_limit;
mod validation;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};

pub use error::ApiError;

use crate::config::AppConfig;
use crate::summarize::Summarizer;
use crate::TARGET_WEB_REQUEST;

/// Shared by every handler. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    pub summarizer: Summarizer,
    pub config: Arc<AppConfig>,
}

/// Hardening headers added to every response that does not already set them.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

fn with_security_headers(router: Router<AppState>) -> Router<AppState> {
    SECURITY_HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

/// Any origin when none are configured, otherwise only the listed ones.
///
/// Credentials are only allowed together with an explicit origin list.
fn cors_layer(allowed_origins: &[String], allow_credentials: bool) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT]);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(target: TARGET_WEB_REQUEST, "Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(allow_credentials)
}

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins, state.config.cors_credentials);
    let limiter = rate_limit::limiter_from_config(&state.config);
    let body_limit = DefaultBodyLimit::max(state.config.max_payload_bytes);

    // Static language routes take priority over the `{language}` capture.
    let articles = Router::new()
        .route("/summarize/hindi", post(api::summarize_hindi))
        .route("/summarize/english", post(api::summarize_english))
        .route("/summarize/{language}", post(api::summarize_article))
        .route("/summarize-long", post(api::summarize_long))
        .route("/health", get(api::articles_health));

    let mut router = Router::new()
        .route("/health", get(api::health))
        .nest("/api/articles", articles)
        .fallback(api::not_found)
        .layer(body_limit);

    if let Some(limiter) = limiter {
        router = router.layer(middleware::from_fn_with_state(limiter, rate_limit::rate_limit));
    }

    with_security_headers(router).layer(cors).with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("{} running on http://{} ({})", config.name, addr, config.environment);
    info!("Health check: http://{}/health", addr);

    let make_service = create_router(state).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, make_service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down gracefully"),
        Err(e) => {
            error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
