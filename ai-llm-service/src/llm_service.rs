//! Shared answer-generation service.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Dispatches to the provider client selected by [`LlmModelConfig::provider`].
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{config::default_config::config_from_env, llm_service::LlmService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmService::new(config_from_env()?)?);
//!     let txt = svc.generate("Say hello").await?;
//!     println!("{txt}");
//!     Ok(())
//! }
//! ```

use tracing::instrument;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{anthropic_service::AnthropicService, open_ai_service::OpenAiService},
};

/// Provider-specific client behind [`LlmService`].
#[derive(Debug)]
enum Backend {
    Anthropic(AnthropicService),
    OpenAI(OpenAiService),
}

/// Single-profile generation service.
#[derive(Debug)]
pub struct LlmService {
    provider: LlmProvider,
    max_tokens: u32,
    backend: Backend,
}

impl LlmService {
    /// Builds the provider client for `cfg`.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the provider client rejects the config or the
    /// HTTP client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let provider = cfg.provider;
        let max_tokens = cfg.max_tokens;
        let backend = match provider {
            LlmProvider::Anthropic => Backend::Anthropic(AnthropicService::new(cfg)?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAiService::new(cfg)?),
        };

        Ok(Self {
            provider,
            max_tokens,
            backend,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        match &self.backend {
            Backend::Anthropic(c) => c.model(),
            Backend::OpenAI(c) => c.model(),
        }
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Sends `prompt` as a single user message and returns the first text segment.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    #[instrument(level = "debug", skip_all, fields(provider = %self.provider, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match &self.backend {
            Backend::Anthropic(c) => c.generate(prompt).await,
            Backend::OpenAI(c) => c.generate(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: LlmProvider) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: provider.default_model().to_string(),
            endpoint: provider.default_endpoint().to_string(),
            api_key: "key".into(),
            max_tokens: 2048,
            temperature: None,
            timeout_secs: None,
        }
    }

    #[test]
    fn picks_backend_from_provider() {
        let a = LlmService::new(cfg(LlmProvider::Anthropic)).unwrap();
        assert_eq!(a.provider(), LlmProvider::Anthropic);
        assert_eq!(a.model(), "claude-sonnet-4-20250514");
        assert_eq!(a.max_tokens(), 2048);

        let o = LlmService::new(cfg(LlmProvider::OpenAI)).unwrap();
        assert_eq!(o.provider(), LlmProvider::OpenAI);
        assert_eq!(o.model(), "gpt-4o");
    }
}
