//! Documentation Q&A core.
//!
//! A [`SearchSession`] tracks the selected [`RepositoryChoice`] and a
//! [`SearchHistory`]. [`run_search`] pulls context through a
//! [`ContextSource`], asks an [`AnswerSynthesizer`] for an answer and records
//! it. Sessions for the HTTP surface live in a [`SessionStore`].

pub mod error;
pub mod history;
pub mod prompt;
pub mod repository;
pub mod search;
pub mod session;
pub mod source;
pub mod synthesizer;

pub use error::QaError;
pub use history::{RECENT_LIMIT, SearchHistory, SearchRecord};
pub use prompt::build_answer_prompt;
pub use repository::RepositoryChoice;
pub use search::{MIN_CONTEXT_CHARS, SearchOutcome, run_search};
pub use session::{SearchSession, SessionHandle, SessionStore};
pub use source::ContextSource;
pub use synthesizer::{AnswerSynthesizer, LlmSynthesizer};
