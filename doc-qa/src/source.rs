//! Seam between orchestration and the documentation service.

use std::{future::Future, pin::Pin};

use doc_retrieval::DocRetrievalClient;

/// Anything that can turn `(topic, repository)` into documentation text.
///
/// Implementations never fail: an unusable lookup is `""`.
pub trait ContextSource: Send + Sync {
    fn fetch_context<'a>(
        &'a self,
        topic: &'a str,
        repository: &'a str,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>>;
}

impl ContextSource for DocRetrievalClient {
    fn fetch_context<'a>(
        &'a self,
        topic: &'a str,
        repository: &'a str,
    ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
        Box::pin(DocRetrievalClient::fetch_context(self, topic, repository))
    }
}
