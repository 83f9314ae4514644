//! HTTP client for the documentation-retrieval service.
//!
//! One GET per endpoint descriptor, strictly in order, never retried. Any
//! failure of a single endpoint (transport, timeout, non-200) is logged and
//! treated as "no result from this endpoint"; callers only ever see text or
//! an empty string.

use std::time::Instant;

use reqwest::{StatusCode, header};
use tracing::{debug, info, instrument, warn};

use crate::{
    cfg::{AuthScheme, ContextStrategy, RetrievalConfig},
    endpoint::{Endpoint, EndpointKind, build_endpoints},
    error::RetrievalError,
};

/// Value of the `type` query parameter; the service returns plain text.
const RESPONSE_TYPE: &str = "txt";

/// Separator placed between bodies in the combined strategy.
const COMBINED_SEPARATOR: &str = "\n\n";

/// Documentation-retrieval client.
///
/// # Example
/// ```no_run
/// # use doc_retrieval::{DocRetrievalClient, RetrievalConfig};
/// # #[tokio::main] async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DocRetrievalClient::new(RetrievalConfig::new(
///     "https://context7.com",
///     "bhfdsc",
///     "ctx7-key",
/// ))?;
/// let text = client.fetch_context("phenotype definition", "documentation").await;
/// println!("{} chars", text.len());
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct DocRetrievalClient {
    http: reqwest::Client,
    cfg: RetrievalConfig,
}

impl DocRetrievalClient {
    /// Builds the HTTP client (timeout + authorization header).
    ///
    /// # Errors
    /// - [`RetrievalError::InvalidApiKey`] if the key cannot be a header value
    /// - [`RetrievalError::Http`] if the HTTP client cannot be built
    pub fn new(cfg: RetrievalConfig) -> Result<Self, RetrievalError> {
        let raw = match cfg.auth_scheme {
            AuthScheme::Bearer => format!("Bearer {}", cfg.api_key.trim()),
            AuthScheme::Raw => cfg.api_key.trim().to_string(),
        };
        let mut auth =
            header::HeaderValue::from_str(&raw).map_err(|_| RetrievalError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .default_headers(headers)
            .build()?;

        info!(
            base_url = %cfg.base_url,
            namespace = %cfg.namespace,
            strategy = %cfg.strategy,
            timeout_ms = cfg.timeout.as_millis(),
            endpoints = ?cfg.endpoints,
            "DocRetrievalClient initialized"
        );

        Ok(Self { http, cfg })
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.cfg
    }

    /// Endpoint descriptors for `repository`, in lookup order.
    pub fn endpoints_for(&self, repository: &str) -> Vec<Endpoint> {
        build_endpoints(
            &self.cfg.base_url,
            &self.cfg.namespace,
            repository,
            &self.cfg.endpoints,
        )
    }

    /// Fetches documentation text for `topic` from `repository`.
    ///
    /// Returns `""` when no endpoint produced a usable response.
    #[instrument(level = "debug", skip(self), fields(strategy = %self.cfg.strategy))]
    pub async fn fetch_context(&self, topic: &str, repository: &str) -> String {
        let endpoints = self.endpoints_for(repository);
        let started = Instant::now();

        let text = match self.cfg.strategy {
            ContextStrategy::FirstSuccess => self
                .first_success(&endpoints, topic)
                .await
                .map(|(_, body)| body)
                .unwrap_or_default(),
            ContextStrategy::Combined => self
                .all_successes(&endpoints, topic)
                .await
                .into_iter()
                .map(|(_, body)| body)
                .collect::<Vec<_>>()
                .join(COMBINED_SEPARATOR),
        };

        info!(
            repository,
            context_len = text.len(),
            latency_ms = started.elapsed().as_millis(),
            "documentation lookup finished"
        );

        text
    }

    /// Walks `endpoints` in order and returns the first 200 body.
    ///
    /// Endpoints after the winner are not contacted.
    pub async fn first_success(
        &self,
        endpoints: &[Endpoint],
        topic: &str,
    ) -> Option<(EndpointKind, String)> {
        for ep in endpoints {
            match self.try_endpoint(ep, topic).await {
                Ok(body) => return Some((ep.kind, body)),
                Err(e) => warn!(endpoint = %ep.kind, url = %ep.url, error = %e, "endpoint failed, trying next"),
            }
        }
        None
    }

    /// Tries every endpoint in order, keeping non-blank 200 bodies.
    pub async fn all_successes(
        &self,
        endpoints: &[Endpoint],
        topic: &str,
    ) -> Vec<(EndpointKind, String)> {
        let mut out = Vec::with_capacity(endpoints.len());
        for ep in endpoints {
            match self.try_endpoint(ep, topic).await {
                Ok(body) if !body.trim().is_empty() => out.push((ep.kind, body)),
                Ok(_) => debug!(endpoint = %ep.kind, "endpoint returned a blank body"),
                Err(e) => warn!(endpoint = %ep.kind, url = %ep.url, error = %e, "endpoint failed, skipping"),
            }
        }
        out
    }

    /// One GET against one endpoint. Only status 200 counts as success.
    async fn try_endpoint(&self, ep: &Endpoint, topic: &str) -> Result<String, RetrievalError> {
        let started = Instant::now();
        let mut query: Vec<(&str, String)> = vec![
            ("topic", topic.to_string()),
            ("type", RESPONSE_TYPE.to_string()),
        ];
        if let Some(page) = self.cfg.page {
            query.push(("page", page.to_string()));
        }

        debug!(endpoint = %ep.kind, "GET {}", ep.url);

        let resp = self.http.get(&ep.url).query(&query).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(RetrievalError::Status {
                status,
                url: ep.url.clone(),
            });
        }

        let body = resp.text().await?;
        debug!(
            endpoint = %ep.kind,
            body_len = body.len(),
            latency_ms = started.elapsed().as_millis(),
            "endpoint answered 200"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        Router,
        extract::{Path, Query},
        http::HeaderMap,
        routing::{MethodRouter, get},
    };

    use super::*;

    #[derive(Clone)]
    struct Reply {
        status: StatusCode,
        body: &'static str,
        delay: Duration,
    }

    impl Reply {
        fn ok(body: &'static str) -> Self {
            Self {
                status: StatusCode::OK,
                body,
                delay: Duration::ZERO,
            }
        }

        fn status(status: StatusCode) -> Self {
            Self {
                status,
                body: "nope",
                delay: Duration::ZERO,
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Hit {
        kind: &'static str,
        path: String,
        query: HashMap<String, String>,
        auth: Option<String>,
    }

    type Hits = Arc<Mutex<Vec<Hit>>>;

    fn stub_route(kind: &'static str, reply: Reply, hits: Hits) -> MethodRouter {
        get(
            move |Path(path): Path<String>,
                  Query(query): Query<HashMap<String, String>>,
                  headers: HeaderMap| {
                let reply = reply.clone();
                let hits = hits.clone();
                async move {
                    hits.lock().unwrap().push(Hit {
                        kind,
                        path: path.trim_start_matches('/').to_string(),
                        query,
                        auth: headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    if !reply.delay.is_zero() {
                        tokio::time::sleep(reply.delay).await;
                    }
                    (reply.status, reply.body)
                }
            },
        )
    }

    async fn stub_service(info: Reply, code: Reply) -> (String, Hits) {
        let hits: Hits = Arc::default();
        let app = Router::new()
            .route(
                "/api/v2/docs/info/{*path}",
                stub_route("info", info, hits.clone()),
            )
            .route(
                "/api/v2/docs/code/{*path}",
                stub_route("code", code, hits.clone()),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), hits)
    }

    fn client(base: &str) -> DocRetrievalClient {
        DocRetrievalClient::new(RetrievalConfig::new(base, "bhfdsc", "ctx7-key")).unwrap()
    }

    fn kinds(hits: &Hits) -> Vec<&'static str> {
        hits.lock().unwrap().iter().map(|h| h.kind).collect()
    }

    #[tokio::test]
    async fn info_hit_is_returned_and_code_is_not_contacted() {
        let (base, hits) =
            stub_service(Reply::ok("A phenotype is..."), Reply::ok("def phenotype(): ...")).await;

        let text = client(&base)
            .fetch_context("phenotype definition", "documentation")
            .await;

        assert_eq!(text, "A phenotype is...");
        assert_eq!(kinds(&hits), vec!["info"]);

        let hit = hits.lock().unwrap()[0].clone();
        assert_eq!(hit.path, "bhfdsc/documentation");
        assert_eq!(hit.query.get("topic").map(String::as_str), Some("phenotype definition"));
        assert_eq!(hit.query.get("type").map(String::as_str), Some("txt"));
        assert!(!hit.query.contains_key("page"));
        assert_eq!(hit.auth.as_deref(), Some("Bearer ctx7-key"));
    }

    #[tokio::test]
    async fn all_404_yields_empty_string() {
        let (base, hits) = stub_service(
            Reply::status(StatusCode::NOT_FOUND),
            Reply::status(StatusCode::NOT_FOUND),
        )
        .await;

        let text = client(&base).fetch_context("anything", "documentation").await;

        assert_eq!(text, "");
        assert_eq!(kinds(&hits), vec!["info", "code"]);
    }

    #[tokio::test]
    async fn falls_back_to_code_when_info_fails() {
        let (base, hits) = stub_service(
            Reply::status(StatusCode::INTERNAL_SERVER_ERROR),
            Reply::ok("The pipeline is configured via config.yaml"),
        )
        .await;

        let text = client(&base)
            .fetch_context("pipeline config", "standard-pipeline")
            .await;

        assert_eq!(text, "The pipeline is configured via config.yaml");
        assert_eq!(kinds(&hits), vec!["info", "code"]);
        assert_eq!(hits.lock().unwrap()[1].path, "bhfdsc/standard-pipeline");
    }

    #[tokio::test]
    async fn only_exact_200_counts_as_success() {
        let (base, _hits) = stub_service(
            Reply {
                status: StatusCode::ACCEPTED,
                body: "accepted but not ok",
                delay: Duration::ZERO,
            },
            Reply::ok("code body"),
        )
        .await;

        let text = client(&base).fetch_context("t", "documentation").await;
        assert_eq!(text, "code body");
    }

    #[tokio::test]
    async fn timeout_moves_on_to_next_endpoint() {
        let (base, hits) = stub_service(
            Reply {
                status: StatusCode::OK,
                body: "too late",
                delay: Duration::from_secs(3),
            },
            Reply::ok("fast code body"),
        )
        .await;

        let mut cfg = RetrievalConfig::new(&base, "bhfdsc", "k");
        cfg.timeout = Duration::from_millis(200);
        let text = DocRetrievalClient::new(cfg)
            .unwrap()
            .fetch_context("t", "documentation")
            .await;

        assert_eq!(text, "fast code body");
        assert_eq!(kinds(&hits), vec!["info", "code"]);
    }

    #[tokio::test]
    async fn connection_failure_is_swallowed() {
        // Grab a free port and release it so nothing is listening there.
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let text = client(&format!("http://{addr}"))
            .fetch_context("t", "documentation")
            .await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn combined_strategy_joins_successful_bodies_in_order() {
        let (base, hits) = stub_service(Reply::ok("info text"), Reply::ok("code text")).await;

        let mut cfg = RetrievalConfig::new(&base, "bhfdsc", "k");
        cfg.strategy = ContextStrategy::Combined;
        let c = DocRetrievalClient::new(cfg).unwrap();

        assert_eq!(c.fetch_context("t", "documentation").await, "info text\n\ncode text");
        assert_eq!(kinds(&hits), vec!["info", "code"]);
    }

    #[tokio::test]
    async fn combined_strategy_skips_failed_and_blank_endpoints() {
        let (base, _) =
            stub_service(Reply::status(StatusCode::NOT_FOUND), Reply::ok("code text")).await;
        let mut cfg = RetrievalConfig::new(&base, "bhfdsc", "k");
        cfg.strategy = ContextStrategy::Combined;
        let c = DocRetrievalClient::new(cfg).unwrap();
        assert_eq!(c.fetch_context("t", "documentation").await, "code text");

        let (base, _) = stub_service(Reply::ok("  \n"), Reply::status(StatusCode::NOT_FOUND)).await;
        let mut cfg = RetrievalConfig::new(&base, "bhfdsc", "k");
        cfg.strategy = ContextStrategy::Combined;
        let c = DocRetrievalClient::new(cfg).unwrap();
        assert_eq!(c.fetch_context("t", "documentation").await, "");
    }

    #[tokio::test]
    async fn raw_auth_and_page_are_sent() {
        let (base, hits) = stub_service(Reply::ok("body"), Reply::ok("unused")).await;

        let mut cfg = RetrievalConfig::new(&base, "bhfdsc", "raw-key");
        cfg.auth_scheme = AuthScheme::Raw;
        cfg.page = Some(2);
        DocRetrievalClient::new(cfg)
            .unwrap()
            .fetch_context("t", "documentation")
            .await;

        let hit = hits.lock().unwrap()[0].clone();
        assert_eq!(hit.auth.as_deref(), Some("raw-key"));
        assert_eq!(hit.query.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let res = DocRetrievalClient::new(RetrievalConfig::new(
            "https://context7.com",
            "bhfdsc",
            "bad\nkey",
        ));
        assert!(matches!(res, Err(RetrievalError::InvalidApiKey)));
    }
}
