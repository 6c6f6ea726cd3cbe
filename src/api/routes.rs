//! HTTP route handlers for Axum.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    api::types::{ErrorDto, TopicDto},
    data::reviews::{self, LoadOptions},
    error::InputError,
    insights::AnalysisReport,
    nlp::topics::Topic,
};

use super::AppState;

type ApiError = (StatusCode, Json<ErrorDto>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn fail(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub brand: Option<String>,
}

/// Run the pipeline over an uploaded CSV body and keep the result.
pub async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
    body: Bytes,
) -> ApiResult<AnalysisReport> {
    if body.is_empty() {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            InputError::MissingInput.to_string(),
        ));
    }
    info!(bytes = body.len(), brand = ?query.brand, "received upload");

    let pipeline = state.pipeline.clone();
    let options = LoadOptions { brand: query.brand };
    let report = tokio::task::spawn_blocking(move || {
        let loaded = reviews::load_reviews(body.as_ref(), &options).map_err(|err| {
            let status = if err.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            fail(status, err.to_string())
        })?;
        pipeline
            .run(loaded)
            .map_err(|err| fail(StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}")))
    })
    .await
    .map_err(|err| fail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))??;

    *state.latest.write().await = Some(report.clone());
    Ok(Json(report))
}

/// Most recent analysis.
pub async fn summary(State(state): State<AppState>) -> ApiResult<AnalysisReport> {
    match state.latest.read().await.as_ref() {
        Some(report) => Ok(Json(report.clone())),
        None => {
            warn!("summary requested before any upload");
            Err(fail(
                StatusCode::NOT_FOUND,
                "no analysis yet: upload a CSV file to /analyze",
            ))
        }
    }
}

/// Expanded keyword lists per topic.
pub async fn topics(State(state): State<AppState>) -> ApiResult<Vec<TopicDto>> {
    let vocabulary = state.pipeline.vocabulary();
    let topics = Topic::KEYED
        .into_iter()
        .map(|topic| TopicDto {
            topic,
            seeds: topic.seeds().iter().map(|s| s.to_string()).collect(),
            keywords: vocabulary.keywords(topic).to_vec(),
        })
        .collect();
    Ok(Json(topics))
}

/// HTML report of the latest analysis, or the upload prompt.
#[cfg(feature = "askama")]
pub async fn index(
    State(state): State<AppState>,
) -> Result<axum::response::Html<String>, ApiError> {
    let rendered = match state.latest.read().await.as_ref() {
        Some(report) => crate::ui::render_report(report),
        None => crate::ui::render_upload_prompt(&InputError::MissingInput.to_string()),
    };
    rendered
        .map(axum::response::Html)
        .map_err(|err| fail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}
