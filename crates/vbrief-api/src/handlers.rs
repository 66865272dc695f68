//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use vbrief_models::{Job, Report, VideoId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Enqueue request body.
#[derive(Debug, Deserialize)]
pub struct EnqueueRequest {
    pub url: String,
    #[serde(default)]
    pub query: Option<String>,
}

/// Enqueue response body.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    /// `false` when the URL was already queued.
    pub queued: bool,
}

/// Queue a video URL for summarization.
///
/// Accepts any non-empty URL; whether an ID can be derived from it is the
/// worker's problem, and surfaces in the dead-letter file rather than here.
pub async fn enqueue_video(
    State(state): State<AppState>,
    Json(request): Json<EnqueueRequest>,
) -> ApiResult<(StatusCode, Json<EnqueueResponse>)> {
    let url = request.url.trim().to_string();
    if url.is_empty() {
        return Err(ApiError::bad_request("url must not be empty"));
    }

    let mut job = Job::new(url);
    if let Some(query) = request.query.filter(|q| !q.trim().is_empty()) {
        job = job.with_query(query);
    }

    info!(url = %job.url, query = job.query.is_some(), "enqueue requested");

    let queue = Arc::clone(&state.queue);
    let queued = tokio::task::spawn_blocking(move || queue.enqueue_job(job))
        .await
        .map_err(|e| ApiError::internal(format!("enqueue task failed: {e}")))??;

    Ok((StatusCode::ACCEPTED, Json(EnqueueResponse { queued })))
}

/// One listed report.
#[derive(Serialize)]
pub struct ReportEntry {
    pub video_id: VideoId,
    #[serde(flatten)]
    pub report: Report,
}

/// List every stored report.
pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<Vec<ReportEntry>>> {
    let reports = Arc::clone(&state.reports);
    let entries = tokio::task::spawn_blocking(move || reports.list())
        .await
        .map_err(|e| ApiError::internal(format!("report task failed: {e}")))??;

    Ok(Json(
        entries
            .into_iter()
            .map(|(video_id, report)| ReportEntry { video_id, report })
            .collect(),
    ))
}

/// Fetch one report by video ID.
pub async fn get_report(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<Report>> {
    let reports = Arc::clone(&state.reports);
    let id = VideoId::from(video_id);

    let report = tokio::task::spawn_blocking(move || reports.load(&id))
        .await
        .map_err(|e| ApiError::internal(format!("report task failed: {e}")))?
        .ok_or_else(|| ApiError::not_found("no report for that video"))?;

    Ok(Json(report))
}

/// Delete one report by video ID.
pub async fn delete_report(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<StatusCode> {
    let reports = Arc::clone(&state.reports);
    let id = VideoId::from(video_id);

    let deleted = {
        let id = id.clone();
        tokio::task::spawn_blocking(move || reports.delete(&id))
            .await
            .map_err(|e| ApiError::internal(format!("report task failed: {e}")))??
    };

    if deleted {
        info!(video_id = %id, "report deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("no report for that video"))
    }
}
