//! POST /sessions/{id}/search: documentation lookup + answer.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use doc_qa::{RepositoryChoice, run_search};
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
    routes::search::search_request::{SearchRequest, SearchResponse},
};

/// Handler: POST /sessions/{id}/search
///
/// Searches in one session run one at a time.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/sessions/$ID/search \
///   -H 'content-type: application/json' \
///   -d '{"query":"What is the standard pipeline?","repository":"standard-pipeline"}'
/// ```
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<SearchRequest>,
) -> AppResult<ApiResponse<SearchResponse>> {
    let repository = body
        .repository
        .as_deref()
        .map(str::parse::<RepositoryChoice>)
        .transpose()?;

    let handle = state.sessions.get_or_create(id).await;
    let mut session = handle.lock().await;
    if let Some(repository) = repository {
        session.select_repository(repository);
    }

    let outcome = run_search(
        &mut *session,
        &body.query,
        state.source.as_ref(),
        state.synthesizer.as_ref(),
    )
    .await;
    let history_len = session.history().len();
    drop(session);
    // Synthesis can outlast the idle TTL.
    state.sessions.touch(id).await;

    Ok(ApiResponse::success(SearchResponse::from_outcome(
        outcome?,
        body.include_context,
        history_len,
    )))
}
