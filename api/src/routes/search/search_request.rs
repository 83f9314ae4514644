use doc_qa::{RepositoryChoice, SearchOutcome};
use serde::{Deserialize, Serialize};

/// Request payload for POST /sessions/{id}/search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Natural language question.
    pub query: String,
    /// Switches the session's repository before searching.
    #[serde(default)]
    pub repository: Option<String>,
    /// Echo the retrieved documentation back in the response.
    #[serde(default)]
    pub include_context: bool,
}

/// Response payload, tagged by `status`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchResponse {
    Answered {
        query: String,
        repository: RepositoryChoice,
        repository_name: String,
        answer: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<String>,
        history_len: usize,
    },
    NotFound {
        query: String,
        repository: RepositoryChoice,
        message: String,
        hint: &'static str,
    },
}

impl SearchResponse {
    pub fn from_outcome(outcome: SearchOutcome, include_context: bool, history_len: usize) -> Self {
        match outcome {
            SearchOutcome::Answered { record, context } => SearchResponse::Answered {
                query: record.query().to_string(),
                repository: record.repository(),
                repository_name: record.repository().display_name(),
                answer: record.answer().to_string(),
                context: include_context.then_some(context),
                history_len,
            },
            SearchOutcome::NotFound { query, repository } => SearchResponse::NotFound {
                message: format!("No documentation found for '{query}'"),
                hint: "Try different search terms or switch repositories",
                query,
                repository,
            },
        }
    }
}
