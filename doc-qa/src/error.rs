//! Typed error for the doc-qa crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    /// The submitted question is blank.
    #[error("query must not be empty")]
    EmptyQuery,

    /// Repository slug is not one of the known choices.
    #[error("unknown repository `{0}`")]
    InvalidRepository(String),

    /// A search record would violate its non-empty invariants.
    #[error("invalid search record: {0}")]
    InvalidRecord(&'static str),

    /// The model replied, but with blank text.
    #[error("answer generation returned an empty answer")]
    EmptyAnswer,

    /// Answer generation failed upstream.
    #[error("answer generation failed: {0}")]
    Synthesis(#[from] AiLlmError),
}
