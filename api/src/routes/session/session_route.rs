//! Session lifecycle and repository selection.
//!
//! - POST   /sessions
//! - GET    /sessions/{id}
//! - DELETE /sessions/{id}
//! - PUT    /sessions/{id}/repository

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_qa::RepositoryChoice;
use tracing::info;
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::session::session_response::{EndSessionResponse, SelectRepositoryRequest, SessionView},
};

/// Handler: POST /sessions
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/sessions
/// ```
pub async fn create_session(State(state): State<Arc<AppState>>) -> Response {
    let (id, handle) = state.sessions.create().await;
    let view = SessionView::from(&*handle.lock().await);
    info!(session_id = %id, repository = %view.repository, "session created");
    ApiResponse::success(view).into_response_with_status(StatusCode::CREATED)
}

/// Handler: GET /sessions/{id}. Unknown ids start a fresh session.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResponse<SessionView> {
    let handle = state.sessions.get_or_create(id).await;
    let session = handle.lock().await;
    ApiResponse::success(SessionView::from(&*session))
}

/// Handler: DELETE /sessions/{id}
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let ended = state.sessions.end(id).await;
    info!(session_id = %id, ended, "session end requested");
    ApiResponse::success(EndSessionResponse { ended })
}

/// Handler: PUT /sessions/{id}/repository
///
/// # Example
/// ```bash
/// curl -X PUT http://127.0.0.1:8080/sessions/$ID/repository \
///   -H 'content-type: application/json' \
///   -d '{"repository":"standard-pipeline"}'
/// ```
pub async fn select_repository(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectRepositoryRequest>,
) -> AppResult<ApiResponse<SessionView>> {
    let repository: RepositoryChoice = body.repository.parse()?;

    let handle = state.sessions.get_or_create(id).await;
    let mut session = handle.lock().await;
    session.select_repository(repository);

    info!(session_id = %id, %repository, "repository selected");
    Ok(ApiResponse::success(SessionView::from(&*session)))
}
