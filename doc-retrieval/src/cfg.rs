//! Runtime configuration loaded from environment variables.

use std::{fmt, str::FromStr, time::Duration};

use ai_llm_service::error_handler::{EnvLookup, env_opt, process_env};

use crate::{endpoint::EndpointKind, error::RetrievalError};

pub const DEFAULT_BASE_URL: &str = "https://context7.com";
pub const DEFAULT_NAMESPACE: &str = "bhfdsc";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// How the API key is carried in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    #[default]
    Bearer,
    /// `Authorization: <key>`
    Raw,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "raw" => Ok(AuthScheme::Raw),
            other => Err(format!("unknown auth scheme `{other}` (expected bearer|raw)")),
        }
    }
}

/// What to do with the responses of the endpoint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextStrategy {
    /// Body of the first endpoint answering 200; the rest are not contacted.
    #[default]
    FirstSuccess,
    /// Every endpoint is tried; non-blank 200 bodies are joined in order.
    Combined,
}

impl FromStr for ContextStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-success" | "fallback" => Ok(ContextStrategy::FirstSuccess),
            "combined" | "concat" => Ok(ContextStrategy::Combined),
            other => Err(format!(
                "unknown strategy `{other}` (expected first-success|combined)"
            )),
        }
    }
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextStrategy::FirstSuccess => f.write_str("first-success"),
            ContextStrategy::Combined => f.write_str("combined"),
        }
    }
}

/// Config bag for the retrieval client.
#[derive(Clone)]
pub struct RetrievalConfig {
    /// Service base URL, e.g. `https://context7.com`.
    pub base_url: String,
    /// Namespace prefixed to every repository identifier.
    pub namespace: String,
    pub api_key: String,
    pub auth_scheme: AuthScheme,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Endpoint views, in lookup order.
    pub endpoints: Vec<EndpointKind>,
    pub strategy: ContextStrategy,
    /// Optional `page` query parameter.
    pub page: Option<u32>,
}

impl RetrievalConfig {
    /// Config with defaults for everything except the connection triple.
    pub fn new(
        base_url: impl Into<String>,
        namespace: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            namespace: namespace.into(),
            api_key: api_key.into(),
            auth_scheme: AuthScheme::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            endpoints: EndpointKind::DEFAULT_ORDER.to_vec(),
            strategy: ContextStrategy::default(),
            page: None,
        }
    }

    /// Build from the process environment.
    ///
    /// - `DOC_SERVICE_API_KEY` (required)
    /// - `DOC_SERVICE_URL`, `DOC_NAMESPACE`, `DOC_AUTH_SCHEME`, `DOC_TIMEOUT_SECS`,
    ///   `DOC_ENDPOINTS` (comma list), `DOC_CONTEXT_STRATEGY`, `DOC_PAGE`
    pub fn from_env() -> Result<Self, RetrievalError> {
        Self::from_lookup(&process_env)
    }

    /// Same as [`RetrievalConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, RetrievalError> {
        let get = |k: &'static str| env_opt(lookup, k);

        let api_key =
            get("DOC_SERVICE_API_KEY").ok_or(RetrievalError::MissingVar("DOC_SERVICE_API_KEY"))?;

        let base_url = get("DOC_SERVICE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(invalid(
                "DOC_SERVICE_URL",
                "must start with http:// or https://",
            ));
        }

        let namespace = get("DOC_NAMESPACE").unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let mut cfg = Self::new(base_url, namespace, api_key);

        if let Some(v) = get("DOC_AUTH_SCHEME") {
            cfg.auth_scheme = v.parse().map_err(|e| invalid("DOC_AUTH_SCHEME", e))?;
        }
        if let Some(v) = get("DOC_TIMEOUT_SECS") {
            let secs = parse::<u64>("DOC_TIMEOUT_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("DOC_TIMEOUT_SECS", "must be positive"));
            }
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Some(v) = get("DOC_ENDPOINTS") {
            let kinds = v
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(EndpointKind::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| invalid("DOC_ENDPOINTS", e))?;
            if kinds.is_empty() {
                return Err(invalid("DOC_ENDPOINTS", "at least one endpoint is required"));
            }
            cfg.endpoints = kinds;
        }
        if let Some(v) = get("DOC_CONTEXT_STRATEGY") {
            cfg.strategy = v.parse().map_err(|e| invalid("DOC_CONTEXT_STRATEGY", e))?;
        }
        if let Some(v) = get("DOC_PAGE") {
            cfg.page = Some(parse::<u32>("DOC_PAGE", &v)?);
        }

        Ok(cfg)
    }
}

impl fmt::Debug for RetrievalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrievalConfig")
            .field("base_url", &self.base_url)
            .field("namespace", &self.namespace)
            .field("api_key", &"***")
            .field("auth_scheme", &self.auth_scheme)
            .field("timeout", &self.timeout)
            .field("endpoints", &self.endpoints)
            .field("strategy", &self.strategy)
            .field("page", &self.page)
            .finish()
    }
}

fn invalid(var: &'static str, reason: impl Into<String>) -> RetrievalError {
    RetrievalError::InvalidConfig {
        var,
        reason: reason.into(),
    }
}

fn parse<T: FromStr>(var: &'static str, raw: &str) -> Result<T, RetrievalError> {
    raw.parse::<T>()
        .map_err(|_| invalid(var, format!("`{raw}` is not a valid number")))
}
