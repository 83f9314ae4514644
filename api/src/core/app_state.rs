use std::sync::Arc;

use ai_llm_service::{LlmService, config::default_config::config_from_env};
use doc_qa::{AnswerSynthesizer, ContextSource, LlmSynthesizer, SessionStore};
use doc_retrieval::{DocRetrievalClient, RetrievalConfig};
use tracing::info;

use crate::{core::config::ApiConfig, error_handler::AppError};

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Live search sessions keyed by id.
    pub sessions: SessionStore,
    /// Documentation lookup.
    pub source: Arc<dyn ContextSource>,
    /// Answer generation.
    pub synthesizer: Arc<dyn AnswerSynthesizer>,
}

impl AppState {
    pub fn new(
        sessions: SessionStore,
        source: Arc<dyn ContextSource>,
        synthesizer: Arc<dyn AnswerSynthesizer>,
    ) -> Self {
        Self {
            sessions,
            source,
            synthesizer,
        }
    }

    /// Builds the retrieval and generation clients from the environment.
    ///
    /// Both are created once here and shared by every session.
    pub fn from_env(cfg: &ApiConfig) -> Result<Self, AppError> {
        let retrieval = DocRetrievalClient::new(RetrievalConfig::from_env()?)?;
        let llm = Arc::new(LlmService::new(config_from_env()?)?);

        info!(
            docs_base = %retrieval.config().base_url,
            namespace = %retrieval.config().namespace,
            llm_provider = %llm.provider(),
            llm_model = %llm.model(),
            default_repository = %cfg.default_repository,
            "application state ready"
        );

        Ok(Self::new(
            SessionStore::new(cfg.default_repository, cfg.session_idle_ttl),
            Arc::new(retrieval),
            Arc::new(LlmSynthesizer::new(llm)),
        ))
    }
}
