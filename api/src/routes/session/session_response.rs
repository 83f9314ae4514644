use doc_qa::{RepositoryChoice, SearchSession};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of PUT /sessions/{id}/repository.
#[derive(Debug, Deserialize)]
pub struct SelectRepositoryRequest {
    /// Repository slug, e.g. `standard-pipeline`.
    pub repository: String,
}

/// Snapshot of one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub repository: RepositoryChoice,
    pub repository_name: String,
    pub history_len: usize,
}

impl From<&SearchSession> for SessionView {
    fn from(s: &SearchSession) -> Self {
        Self {
            session_id: s.id(),
            repository: s.repository(),
            repository_name: s.repository().display_name(),
            history_len: s.history().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    /// `false` when the id was unknown or already expired.
    pub ended: bool,
}
