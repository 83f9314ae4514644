use crate::config::llm_provider::LlmProvider;

/// Output budget used by the answer synthesizer unless overridden.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Request timeout used when `timeout_secs` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an answer-generation model invocation.
///
/// # Fields
///
/// - `provider`: Which backend to use (Anthropic or OpenAI).
/// - `model`: The model identifier (e.g., `"claude-sonnet-4-20250514"`).
/// - `endpoint`: Base URL of the API (without the `/v1/...` path).
/// - `api_key`: API key sent with every request.
/// - `max_tokens`: Maximum number of tokens to generate.
/// - `temperature`: Optional sampling temperature.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Anthropic,
///     model: "claude-sonnet-4-20250514".to_string(),
///     endpoint: "https://api.anthropic.com".to_string(),
///     api_key: "sk-ant-...".to_string(),
///     max_tokens: 2048,
///     temperature: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.timeout().as_secs(), 60);
/// ```
#[derive(Clone)]
pub struct LlmModelConfig {
    /// The generation backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// API base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Effective request timeout.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Endpoint without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
