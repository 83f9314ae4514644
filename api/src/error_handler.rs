use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_qa::QaError;
use thiserror::Error;
use tracing::{error, warn};

use ai_llm_service::AiLlmError;
use doc_retrieval::RetrievalError;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
        hint: Option<&'static str>,
    },
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,
            // startup-only
            AppError::Config(_)
            | AppError::Retrieval(_)
            | AppError::Llm(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Retrieval(_) => "RETRIEVAL_CONFIG_ERROR",
            AppError::Llm(_) => "LLM_CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        } else {
            warn!(code = self.error_code(), error = %self, "request rejected");
        }

        let details = match &self {
            AppError::Http {
                hint: Some(hint), ..
            } => vec![ApiErrorDetail::hint(*hint)],
            _ => Vec::new(),
        };
        ApiResponse::<()>::error(self.error_code(), self.to_string(), details)
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<QaError> for AppError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::EmptyQuery | QaError::InvalidRecord(_) => AppError::BadRequest(err.to_string()),
            QaError::InvalidRepository(_) => AppError::Http {
                status: StatusCode::BAD_REQUEST,
                code: "INVALID_REPOSITORY",
                message: err.to_string(),
                hint: Some("Use one of the slugs listed by GET /repositories"),
            },
            QaError::EmptyAnswer | QaError::Synthesis(_) => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "SYNTHESIS_FAILED",
                message: err.to_string(),
                hint: Some("The answer service is unavailable, try again shortly"),
            },
        }
    }
}
