//! HTTP-layer settings read from the environment.

use std::time::Duration;

use ai_llm_service::error_handler::{EnvLookup, env_opt, process_env};
use doc_qa::RepositoryChoice;

use crate::error_handler::AppError;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `host:port` the listener binds to.
    pub address: String,
    /// Repository new sessions start with.
    pub default_repository: RepositoryChoice,
    /// `None` keeps sessions until they are ended explicitly.
    pub session_idle_ttl: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            default_repository: RepositoryChoice::default(),
            session_idle_ttl: Some(Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS)),
        }
    }
}

impl ApiConfig {
    /// Reads `API_ADDRESS`, `DEFAULT_REPOSITORY`, `SESSION_IDLE_TTL_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, AppError> {
        let get = |k: &'static str| env_opt(lookup, k);
        let mut cfg = Self::default();

        if let Some(addr) = get("API_ADDRESS") {
            cfg.address = addr;
        }
        if let Some(repo) = get("DEFAULT_REPOSITORY") {
            cfg.default_repository = repo
                .parse()
                .map_err(|e| AppError::Config(format!("DEFAULT_REPOSITORY: {e}")))?;
        }
        if let Some(raw) = get("SESSION_IDLE_TTL_SECS") {
            let secs: u64 = raw
                .parse()
                .map_err(|e| AppError::Config(format!("SESSION_IDLE_TTL_SECS: {e}")))?;
            cfg.session_idle_ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(cfg)
    }
}
