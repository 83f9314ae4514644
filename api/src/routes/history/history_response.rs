use chrono::{DateTime, Utc};
use doc_qa::{RepositoryChoice, SearchRecord};
use serde::Serialize;

/// Query characters kept in a history item's title.
pub const TITLE_CHARS: usize = 60;

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub title: String,
    pub query: String,
    pub answer: String,
    pub repository: RepositoryChoice,
    pub repository_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&SearchRecord> for HistoryItem {
    fn from(r: &SearchRecord) -> Self {
        Self {
            title: r.title(TITLE_CHARS),
            query: r.query().to_string(),
            answer: r.answer().to_string(),
            repository: r.repository(),
            repository_name: r.repository().display_name(),
            created_at: r.created_at(),
        }
    }
}

/// Recent searches, newest first.
#[derive(Debug, Serialize)]
pub struct HistoryView {
    /// All records in the session, not only the ones listed.
    pub total: usize,
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub cleared: usize,
}
