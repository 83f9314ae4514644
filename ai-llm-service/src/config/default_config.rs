//! Answer-generation config loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_API_KEY`      = provider API key (mandatory)
//! - `LLM_PROVIDER`     = `anthropic` (default) or `openai`
//! - `LLM_ENDPOINT`     = API base URL (defaults per provider)
//! - `LLM_MODEL`        = model identifier (defaults per provider)
//! - `LLM_MAX_TOKENS`   = output budget (u32, default 2048)
//! - `LLM_TEMPERATURE`  = optional sampling temperature (0.0..=1.0)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64, > 0)

use crate::{
    config::{
        llm_model_config::{DEFAULT_MAX_TOKENS, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, env_opt, env_opt_f32, env_opt_u32, env_opt_u64,
        must_env, process_env, validate_http_endpoint, validate_range_f32,
    },
};

/// Builds the generation config from the process environment.
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `LLM_API_KEY` is absent
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad numeric knobs
/// - [`ConfigError::InvalidFormat`] if `LLM_ENDPOINT` is not an http(s) URL
pub fn config_from_env() -> Result<LlmModelConfig, AiLlmError> {
    config_from_lookup(&process_env)
}

/// Same as [`config_from_env`] but reads variables through `lookup`.
pub fn config_from_lookup(lookup: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env(lookup, "LLM_API_KEY")?;

    let provider = match env_opt(lookup, "LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::default(),
    };

    let endpoint = env_opt(lookup, "LLM_ENDPOINT")
        .unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("LLM_ENDPOINT", &endpoint)?;

    let model =
        env_opt(lookup, "LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let max_tokens = env_opt_u32(lookup, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
    if max_tokens == 0 {
        return Err(ConfigError::OutOfRange {
            field: "max_tokens",
            detail: "expected a positive token budget",
        }
        .into());
    }

    let temperature = env_opt_f32(lookup, "LLM_TEMPERATURE")?;
    if let Some(t) = temperature {
        validate_range_f32("temperature", t, 0.0, 1.0)?;
    }

    let timeout_secs = env_opt_u64(lookup, "LLM_TIMEOUT_SECS")?;
    if timeout_secs == Some(0) {
        return Err(ConfigError::OutOfRange {
            field: "timeout_secs",
            detail: "expected a positive timeout",
        }
        .into());
    }

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature,
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_anthropic_with_2048_budget() {
        let env = lookup_from(&[("LLM_API_KEY", "sk-ant-test")]);
        let cfg = config_from_lookup(&env).unwrap();

        assert_eq!(cfg.provider, LlmProvider::Anthropic);
        assert_eq!(cfg.endpoint, "https://api.anthropic.com");
        assert_eq!(cfg.model, "claude-sonnet-4-20250514");
        assert_eq!(cfg.max_tokens, 2048);
        assert_eq!(cfg.api_key, "sk-ant-test");
        assert!(cfg.temperature.is_none());
    }

    #[test]
    fn missing_key_fails_fast() {
        let env = lookup_from(&[("LLM_PROVIDER", "openai")]);
        let err = config_from_lookup(&env).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::MissingVar("LLM_API_KEY"))
        ));
    }

    #[test]
    fn openai_overrides_are_applied() {
        let env = lookup_from(&[
            ("LLM_API_KEY", "sk-test"),
            ("LLM_PROVIDER", "OpenAI"),
            ("LLM_ENDPOINT", "http://127.0.0.1:9999/"),
            ("LLM_MODEL", "gpt-4o-mini"),
            ("LLM_MAX_TOKENS", "1024"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_TIMEOUT_SECS", "15"),
        ]);
        let cfg = config_from_lookup(&env).unwrap();

        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.base_url(), "http://127.0.0.1:9999");
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.max_tokens, 1024);
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.timeout_secs, Some(15));
    }

    #[test]
    fn rejects_bad_values() {
        let unknown = lookup_from(&[("LLM_API_KEY", "k"), ("LLM_PROVIDER", "mistral")]);
        assert!(matches!(
            config_from_lookup(&unknown).unwrap_err(),
            AiLlmError::Config(ConfigError::UnsupportedProvider(_))
        ));

        let bad_url = lookup_from(&[("LLM_API_KEY", "k"), ("LLM_ENDPOINT", "ftp://x")]);
        assert!(matches!(
            config_from_lookup(&bad_url).unwrap_err(),
            AiLlmError::Config(ConfigError::InvalidFormat { .. })
        ));

        let zero = lookup_from(&[("LLM_API_KEY", "k"), ("LLM_MAX_TOKENS", "0")]);
        assert!(matches!(
            config_from_lookup(&zero).unwrap_err(),
            AiLlmError::Config(ConfigError::OutOfRange { .. })
        ));

        let hot = lookup_from(&[("LLM_API_KEY", "k"), ("LLM_TEMPERATURE", "1.7")]);
        assert!(config_from_lookup(&hot).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let env = lookup_from(&[("LLM_API_KEY", "k"), ("LLM_TIMEOUT_SECS", "0")]);
        assert!(matches!(
            config_from_lookup(&env).unwrap_err(),
            AiLlmError::Config(ConfigError::OutOfRange {
                field: "timeout_secs",
                ..
            })
        ));

        let one = lookup_from(&[("LLM_API_KEY", "k"), ("LLM_TIMEOUT_SECS", "1")]);
        assert_eq!(config_from_lookup(&one).unwrap().timeout_secs, Some(1));
    }
}
