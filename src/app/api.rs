use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::validation::{validate_article_batch, validate_single_article};
use super::{ApiError, AppState};
use crate::prompt::{PromptLanguage, SummaryMode, WordRange};
use crate::summarize::SummaryResult;
use crate::TARGET_WEB_REQUEST;

/// Success envelope shared by every summarization route.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    message: String,
    data: T,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    total_articles: usize,
    summarized_articles: Vec<SummaryResult>,
}

#[derive(Deserialize)]
pub struct LongQuery {
    lang: Option<String>,
}

type JsonBody = Result<Json<Value>, JsonRejection>;

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn respond<T: Serialize>(message: String, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message,
        data,
        timestamp: timestamp(),
    })
}

/// Unwrap the body, turning malformed JSON into a 400 (or 413 when over the size limit).
fn json_body(body: JsonBody) -> Result<Value, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        warn!(target: TARGET_WEB_REQUEST, "Rejected request body: {}", rejection.body_text());
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        ApiError::new(status, rejection.body_text())
    })
}

/// POST /api/articles/summarize/hindi
pub async fn summarize_hindi(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<ApiResponse<BatchSummary>>, ApiError> {
    summarize_batch(state, PromptLanguage::Hindi, body).await
}

/// POST /api/articles/summarize/english
pub async fn summarize_english(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<Json<ApiResponse<BatchSummary>>, ApiError> {
    summarize_batch(state, PromptLanguage::English, body).await
}

async fn summarize_batch(
    state: AppState,
    language: PromptLanguage,
    body: JsonBody,
) -> Result<Json<ApiResponse<BatchSummary>>, ApiError> {
    let request = validate_article_batch(&json_body(body)?, state.config.max_articles)?;
    info!(
        target: TARGET_WEB_REQUEST,
        "Batch summarization of {} articles in {}",
        request.articles.len(),
        language
    );

    let summarized_articles = state
        .summarizer
        .summarize_articles(&request.articles, language)
        .await
        .map_err(|e| ApiError::orchestration(e, state.config.show_error_details))?;

    Ok(respond(
        format!("Articles summarized successfully in {}", language),
        BatchSummary {
            total_articles: summarized_articles.len(),
            summarized_articles,
        },
    ))
}

/// POST /api/articles/summarize/{language}
pub async fn summarize_article(
    State(state): State<AppState>,
    Path(language): Path<String>,
    body: JsonBody,
) -> Result<Json<ApiResponse<SummaryResult>>, ApiError> {
    let language: PromptLanguage = language
        .parse()
        .map_err(|e: crate::prompt::PromptError| ApiError::bad_request(e.to_string()))?;
    let request = validate_single_article(&json_body(body)?)?;
    let range = WordRange::parse_or(request.word_limit.as_deref(), WordRange::LONG);
    info!(target: TARGET_WEB_REQUEST, "Single article summarization in {} ({} words)", language, range);

    let result = state
        .summarizer
        .summarize_single_article(&request.article, language, SummaryMode::Long(range))
        .await;

    Ok(respond(
        format!("Article summarized successfully in {}", language),
        result,
    ))
}

/// POST /api/articles/summarize-long?lang=en|hi
pub async fn summarize_long(
    State(state): State<AppState>,
    Query(query): Query<LongQuery>,
    body: JsonBody,
) -> Result<Json<ApiResponse<SummaryResult>>, ApiError> {
    let language = match query.lang.as_deref() {
        Some("hi") => PromptLanguage::Hindi,
        _ => PromptLanguage::English,
    };
    let request = validate_article_batch(&json_body(body)?, state.config.max_articles)?;
    let range = WordRange::parse_or(request.word_limit.as_deref(), WordRange::CONSOLIDATED);
    info!(
        target: TARGET_WEB_REQUEST,
        "Consolidated summarization of {} articles in {} ({} words)",
        request.articles.len(),
        language,
        range
    );

    let result = state
        .summarizer
        .summarize_long_articles(&request.articles, language, range)
        .await
        .map_err(|e| ApiError::orchestration(e, state.config.show_error_details))?;

    Ok(respond(
        format!(
            "Long articles summarized successfully into consolidated summary in {}",
            language
        ),
        result,
    ))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": format!("{} is running", state.config.name),
        "version": state.config.version,
        "environment": state.config.environment,
        "timestamp": timestamp(),
    }))
}

/// GET /api/articles/health
pub async fn articles_health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "Article Summarization Service",
        "timestamp": timestamp(),
    }))
}

pub async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "message": format!("Cannot {} {}", method, uri.path()),
        })),
    )
}
