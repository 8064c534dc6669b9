//! Task handlers: create, add links, status, download.

use super::{AddLinksRequest, AddLinksResponse};
use crate::api::AppState;
use crate::error::{Error, TaskError};
use crate::types::TaskId;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Parse a task id from the path; malformed ids cannot name a task
fn parse_task_id(raw: &str) -> Result<TaskId, Error> {
    raw.parse()
        .map_err(|_| Error::Task(TaskError::not_found(raw)))
}

/// POST /tasks - Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 201, description = "Task created", body = crate::types::TaskCreated),
        (
            status = 503,
            description = "Maximum number of active tasks reached",
            body = crate::error::ApiError
        )
    )
)]
pub async fn create_task(State(state): State<AppState>) -> Response {
    match state.bundler.create_task().await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /tasks/:id/links - Add links to a pending task
///
/// When the task reaches its link quota the request blocks until every link
/// has been fetched and packaged, and the terminal status is returned.
#[utoipa::path(
    post,
    path = "/tasks/{id}/links",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = AddLinksRequest,
    responses(
        (status = 200, description = "Links accepted", body = AddLinksResponse),
        (status = 404, description = "Task not found", body = crate::error::ApiError),
        (status = 409, description = "Task no longer accepts links", body = crate::error::ApiError)
    )
)]
pub async fn add_links(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddLinksRequest>,
) -> Result<Json<AddLinksResponse>, Error> {
    let id = parse_task_id(&id)?;
    let status = state.bundler.add_links(id, &request.links).await?;
    Ok(Json(AddLinksResponse { status }))
}

/// GET /tasks/:id - Get task status
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task status", body = crate::types::StatusReport),
        (status = 404, description = "Task not found", body = crate::error::ApiError)
    )
)]
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<crate::types::StatusReport>, Error> {
    let id = parse_task_id(&id)?;
    Ok(Json(state.bundler.status(id).await?))
}

/// GET /tasks/:id/download - Download the archive and remove the task
///
/// The task is removed when the archive is taken from the registry, before
/// the body is written. If the transfer to the client fails afterwards the
/// archive is gone. Concurrent downloads of one task serve the archive at
/// most once. A task that ended in Error is removed by the attempt as well.
#[utoipa::path(
    get,
    path = "/tasks/{id}/download",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "ZIP archive", content_type = "application/zip"),
        (status = 404, description = "Task not found", body = crate::error::ApiError),
        (status = 409, description = "Task has no archive", body = crate::error::ApiError)
    )
)]
pub async fn download_archive(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_task_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.bundler.take_archive(id).await {
        Ok(archive) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}.zip\"", id),
                ),
            ],
            archive,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(task_id = %id, error = %e, "download refused");
            e.into_response()
        }
    }
}
