//! Answer-generation client shared by the doc-search workspace.
//!
//! One configured provider (Anthropic or OpenAI), one non-streaming call per
//! question, unified [`error_handler::AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use llm_service::LlmService;
