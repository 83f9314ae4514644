//! Documentation-retrieval client.
//!
//! Public API: [`DocRetrievalClient::fetch_context`]. Given a topic and a
//! repository identifier it queries the `info` and `code` views of the
//! documentation service and returns matching text, or `""` when nothing
//! usable came back.

pub mod cfg;
pub mod client;
pub mod endpoint;
mod error;

pub use cfg::{AuthScheme, ContextStrategy, RetrievalConfig};
pub use client::DocRetrievalClient;
pub use endpoint::{Endpoint, EndpointKind};
pub use error::RetrievalError;
