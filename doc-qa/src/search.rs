//! Search pipeline: retrieve → (maybe) synthesize → record.

use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::{
    error::QaError,
    history::SearchRecord,
    repository::RepositoryChoice,
    session::SearchSession,
    source::ContextSource,
    synthesizer::AnswerSynthesizer,
};

/// Retrieved text shorter than this (after trimming) counts as "nothing found".
pub const MIN_CONTEXT_CHARS: usize = 20;

/// Result of one search.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Answer produced and recorded in the session history.
    Answered {
        record: SearchRecord,
        /// Raw documentation the answer was based on.
        context: String,
    },
    /// Retrieval came back empty; nothing was recorded.
    NotFound {
        query: String,
        repository: RepositoryChoice,
    },
}

impl SearchOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, SearchOutcome::Answered { .. })
    }
}

/// Whether retrieved text is substantial enough to answer from.
pub fn has_usable_context(context: &str) -> bool {
    context.trim().chars().count() >= MIN_CONTEXT_CHARS
}

/// Runs one search for `query` against the session's selected repository.
///
/// # Errors
/// - [`QaError::EmptyQuery`] for a blank query (nothing is called)
/// - [`QaError::Synthesis`] when answer generation fails
/// - [`QaError::EmptyAnswer`] when the model returns blank text
///
/// The history is only touched on success.
#[instrument(
    level = "info",
    skip_all,
    fields(session_id = %session.id(), repository = %session.repository())
)]
pub async fn run_search(
    session: &mut SearchSession,
    query: &str,
    source: &dyn ContextSource,
    synthesizer: &dyn AnswerSynthesizer,
) -> Result<SearchOutcome, QaError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(QaError::EmptyQuery);
    }
    let repository = session.repository();
    let started = Instant::now();

    let context = source.fetch_context(query, repository.slug()).await;
    if !has_usable_context(&context) {
        warn!(
            context_len = context.len(),
            "no documentation found, skipping synthesis"
        );
        return Ok(SearchOutcome::NotFound {
            query: query.to_string(),
            repository,
        });
    }

    let answer = synthesizer.synthesize_answer(query, &context).await?;
    if answer.trim().is_empty() {
        return Err(QaError::EmptyAnswer);
    }

    let record = SearchRecord::new(query, answer, repository)?;
    session.record(record.clone());

    info!(
        history_len = session.history().len(),
        latency_ms = started.elapsed().as_millis(),
        "search answered"
    );

    Ok(SearchOutcome::Answered { record, context })
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        pin::Pin,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use ai_llm_service::error_handler::{
        AiLlmError, Provider, ProviderError, ProviderErrorKind,
    };
    use uuid::Uuid;

    use super::*;

    struct StubSource {
        text: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl StubSource {
        fn returning(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ContextSource for StubSource {
        fn fetch_context<'a>(
            &'a self,
            topic: &'a str,
            repository: &'a str,
        ) -> Pin<Box<dyn Future<Output = String> + Send + 'a>> {
            self.calls
                .lock()
                .unwrap()
                .push((topic.to_string(), repository.to_string()));
            let text = self.text.clone();
            Box::pin(async move { text })
        }
    }

    enum Reply {
        Text(&'static str),
        Fail,
    }

    struct StubSynth {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl StubSynth {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AnswerSynthesizer for StubSynth {
        fn synthesize_answer<'a>(
            &'a self,
            _query: &'a str,
            _context: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let out = match self.reply {
                Reply::Text(t) => Ok(t.to_string()),
                Reply::Fail => Err(QaError::Synthesis(AiLlmError::Provider(ProviderError::new(
                    Provider::Anthropic,
                    ProviderErrorKind::MissingApiKey,
                )))),
            };
            Box::pin(async move { out })
        }
    }

    fn session(repo: RepositoryChoice) -> SearchSession {
        SearchSession::new(Uuid::new_v4(), repo)
    }

    #[tokio::test]
    async fn answered_search_is_recorded() {
        let context = "The standard pipeline has 5 steps"; // >= 20 chars
        let source = StubSource::returning(context);
        let synth = StubSynth::new(Reply::Text("The pipeline is..."));
        let mut s = session(RepositoryChoice::StandardPipeline);

        let out = run_search(&mut s, "What is the standard pipeline?", &source, &synth)
            .await
            .unwrap();

        match out {
            SearchOutcome::Answered { record, context: ctx } => {
                assert_eq!(record.query(), "What is the standard pipeline?");
                assert_eq!(record.answer(), "The pipeline is...");
                assert_eq!(record.repository(), RepositoryChoice::StandardPipeline);
                assert_eq!(ctx, context);
            }
            other => panic!("expected answer, got {other:?}"),
        }
        assert_eq!(s.history().len(), 1);
        assert_eq!(synth.calls(), 1);
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            &[(
                "What is the standard pipeline?".to_string(),
                "standard-pipeline".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn short_context_short_circuits_without_synthesis() {
        for ctx in ["", "   ", "tiny", "   nineteen chars!!   "] {
            let source = StubSource::returning(ctx);
            let synth = StubSynth::new(Reply::Text("never"));
            let mut s = session(RepositoryChoice::Documentation);

            let out = run_search(&mut s, "phenotype definition", &source, &synth)
                .await
                .unwrap();

            assert!(matches!(
                out,
                SearchOutcome::NotFound { ref query, repository: RepositoryChoice::Documentation }
                    if query == "phenotype definition"
            ));
            assert_eq!(synth.calls(), 0, "context {ctx:?} must not reach the synthesizer");
            assert!(s.history().is_empty());
        }
    }

    #[test]
    fn threshold_counts_trimmed_chars() {
        assert!(!has_usable_context(&format!("  {}  ", "a".repeat(19))));
        assert!(has_usable_context(&"a".repeat(20)));
        assert!(has_usable_context(&"é".repeat(20)));
    }

    #[tokio::test]
    async fn synthesis_failure_propagates_and_records_nothing() {
        let source = StubSource::returning("Enough documentation text to answer from.");
        let synth = StubSynth::new(Reply::Fail);
        let mut s = session(RepositoryChoice::Documentation);

        let err = run_search(&mut s, "q", &source, &synth).await.unwrap_err();

        assert!(matches!(err, QaError::Synthesis(_)));
        assert!(s.history().is_empty());
    }

    #[tokio::test]
    async fn blank_answer_is_rejected() {
        let source = StubSource::returning("Enough documentation text to answer from.");
        let synth = StubSynth::new(Reply::Text("  \n"));
        let mut s = session(RepositoryChoice::Documentation);

        let err = run_search(&mut s, "q", &source, &synth).await.unwrap_err();

        assert!(matches!(err, QaError::EmptyAnswer));
        assert!(s.history().is_empty());
    }

    #[tokio::test]
    async fn blank_query_calls_nothing() {
        let source = StubSource::returning("Enough documentation text to answer from.");
        let synth = StubSynth::new(Reply::Text("x"));
        let mut s = session(RepositoryChoice::Documentation);

        let err = run_search(&mut s, "   ", &source, &synth).await.unwrap_err();

        assert!(matches!(err, QaError::EmptyQuery));
        assert!(source.calls.lock().unwrap().is_empty());
        assert_eq!(synth.calls(), 0);
    }

    #[tokio::test]
    async fn history_keeps_everything_and_shows_five() {
        let source = StubSource::returning("Enough documentation text to answer from.");
        let synth = StubSynth::new(Reply::Text("answer"));
        let mut s = session(RepositoryChoice::Documentation);

        for i in 0..6 {
            run_search(&mut s, &format!("question {i}"), &source, &synth)
                .await
                .unwrap();
        }

        assert_eq!(s.history().len(), 6);
        let recent: Vec<&str> = s
            .history()
            .recent(crate::history::RECENT_LIMIT)
            .map(|r| r.query())
            .collect();
        assert_eq!(recent.first().copied(), Some("question 5"));
        assert_eq!(recent.len(), 5);
        assert!(!recent.contains(&"question 0"));
    }
}
