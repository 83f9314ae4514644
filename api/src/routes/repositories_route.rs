//! GET /repositories: the selectable documentation corpora.

use doc_qa::RepositoryChoice;
use serde::Serialize;

use crate::core::http::response_envelope::ApiResponse;

#[derive(Debug, Serialize)]
pub struct RepositoryItem {
    pub slug: &'static str,
    pub name: String,
    pub description: &'static str,
}

impl From<RepositoryChoice> for RepositoryItem {
    fn from(r: RepositoryChoice) -> Self {
        Self {
            slug: r.slug(),
            name: r.display_name(),
            description: r.description(),
        }
    }
}

pub async fn list_repositories() -> ApiResponse<Vec<RepositoryItem>> {
    ApiResponse::success(
        RepositoryChoice::ALL
            .into_iter()
            .map(RepositoryItem::from)
            .collect(),
    )
}
