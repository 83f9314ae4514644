//! GET/DELETE /sessions/{id}/history

use std::sync::Arc;

use axum::extract::{Path, State};
use doc_qa::RECENT_LIMIT;
use tracing::info;
use uuid::Uuid;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::history::history_response::{ClearHistoryResponse, HistoryItem, HistoryView},
};

pub async fn recent_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResponse<HistoryView> {
    let handle = state.sessions.get_or_create(id).await;
    let session = handle.lock().await;
    let history = session.history();

    ApiResponse::success(HistoryView {
        total: history.len(),
        items: history.recent(RECENT_LIMIT).map(HistoryItem::from).collect(),
    })
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResponse<ClearHistoryResponse> {
    let handle = state.sessions.get_or_create(id).await;
    let mut session = handle.lock().await;
    let cleared = session.history().len();
    session.clear_history();

    info!(session_id = %id, cleared, "history cleared");
    ApiResponse::success(ClearHistoryResponse { cleared })
}
