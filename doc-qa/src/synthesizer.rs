//! Answer synthesis: prompt + one generation call.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmService;
use tracing::{debug, info};

use crate::{error::QaError, prompt::build_answer_prompt};

/// Turns a question plus retrieved documentation into an answer.
pub trait AnswerSynthesizer: Send + Sync {
    fn synthesize_answer<'a>(
        &'a self,
        query: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>>;
}

/// [`AnswerSynthesizer`] backed by the hosted model in [`LlmService`].
#[derive(Debug, Clone)]
pub struct LlmSynthesizer {
    svc: Arc<LlmService>,
}

impl LlmSynthesizer {
    pub fn new(svc: Arc<LlmService>) -> Self {
        Self { svc }
    }

    async fn run(&self, query: &str, context: &str) -> Result<String, QaError> {
        let prompt = build_answer_prompt(query, context);
        debug!(
            model = %self.svc.model(),
            prompt_len = prompt.len(),
            context_len = context.len(),
            "synthesizing answer"
        );

        let answer = self.svc.generate(&prompt).await?;

        info!(answer_len = answer.len(), "answer synthesized");
        Ok(answer)
    }
}

impl AnswerSynthesizer for LlmSynthesizer {
    fn synthesize_answer<'a>(
        &'a self,
        query: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>> {
        Box::pin(self.run(query, context))
    }
}
