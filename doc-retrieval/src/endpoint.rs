//! Endpoint descriptors for the documentation service.
//!
//! The service exposes the same repository under two views: `info` (prose
//! docs) and `code` (snippets). Each view is one descriptor; the client
//! walks them in declared order.

use std::{fmt, str::FromStr};

/// Path prefix shared by every docs endpoint.
pub const DOCS_API_PREFIX: &str = "api/v2/docs";

/// Which view of a repository to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Info,
    Code,
}

impl EndpointKind {
    /// Default lookup order.
    pub const DEFAULT_ORDER: [EndpointKind; 2] = [EndpointKind::Info, EndpointKind::Code];

    pub fn as_str(self) -> &'static str {
        match self {
            EndpointKind::Info => "info",
            EndpointKind::Code => "code",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(EndpointKind::Info),
            "code" => Ok(EndpointKind::Code),
            other => Err(format!("unknown endpoint kind `{other}` (expected info|code)")),
        }
    }
}

/// A fully resolved endpoint URL for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub url: String,
}

/// `{namespace}/{repository}` with stray slashes removed.
pub fn repository_path(namespace: &str, repository: &str) -> String {
    let ns = namespace.trim().trim_matches('/');
    let repo = repository.trim().trim_matches('/');
    if ns.is_empty() {
        repo.to_string()
    } else {
        format!("{ns}/{repo}")
    }
}

/// Resolves `kinds` (in order) into endpoint URLs for `repository`.
///
/// # Example
/// ```
/// use doc_retrieval::endpoint::{EndpointKind, build_endpoints};
/// let eps = build_endpoints("https://context7.com/", "bhfdsc", "documentation", &EndpointKind::DEFAULT_ORDER);
/// assert_eq!(eps[0].url, "https://context7.com/api/v2/docs/info/bhfdsc/documentation");
/// assert_eq!(eps[1].url, "https://context7.com/api/v2/docs/code/bhfdsc/documentation");
/// ```
pub fn build_endpoints(
    base_url: &str,
    namespace: &str,
    repository: &str,
    kinds: &[EndpointKind],
) -> Vec<Endpoint> {
    let base = base_url.trim().trim_end_matches('/');
    let path = repository_path(namespace, repository);
    kinds
        .iter()
        .map(|&kind| Endpoint {
            kind,
            url: format!("{base}/{DOCS_API_PREFIX}/{kind}/{path}"),
        })
        .collect()
}
