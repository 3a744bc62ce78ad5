use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationId;
use super::repository::{ApplicationSnapshotSource, QueueEntry, ScoreStore};
use super::service::{PriorityScoringService, ScoringServiceError};

const DEFAULT_QUEUE_LIMIT: usize = 20;

/// Router builder exposing score recalculation and the staff triage queue.
pub fn scoring_router<S, W>(service: Arc<PriorityScoringService<S, W>>) -> Router
where
    S: ApplicationSnapshotSource + 'static,
    W: ScoreStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications/:application_id/score",
            get(score_handler::<S, W>).post(recalculate_handler::<S, W>),
        )
        .route("/api/v1/scores/queue", get(queue_handler::<S, W>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueueParams {
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn recalculate_handler<S, W>(
    State(service): State<Arc<PriorityScoringService<S, W>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationSnapshotSource + 'static,
    W: ScoreStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.recalculate(&id) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<S, W>(
    State(service): State<Arc<PriorityScoringService<S, W>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationSnapshotSource + 'static,
    W: ScoreStore + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(stored) => (StatusCode::OK, axum::Json(stored)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queue_handler<S, W>(
    State(service): State<Arc<PriorityScoringService<S, W>>>,
    Query(params): Query<QueueParams>,
) -> Response
where
    S: ApplicationSnapshotSource + 'static,
    W: ScoreStore + 'static,
{
    let limit = params.limit.unwrap_or(DEFAULT_QUEUE_LIMIT);
    match service.queue(limit) {
        Ok(scores) => {
            let entries: Vec<QueueEntry> = scores.iter().map(|stored| stored.queue_entry()).collect();
            (StatusCode::OK, axum::Json(entries)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        other if other.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
        "retryable": error.is_retryable(),
    });
    (status, axum::Json(payload)).into_response()
}
