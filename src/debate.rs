// Debate round orchestrator: prompt -> provider -> segmentation -> store

use std::sync::Arc;

use thiserror::Error;

use crate::providers::{CompletionProvider, ProviderError};
use crate::retry::RetryPolicy;
use crate::round_builder::{build_instructions, RoundMode};
use crate::segmenter::segment_response;
use crate::session::SessionState;
use crate::types::Round;

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("no debate topic set")]
    EmptyTopic,
    #[error("persona roster is empty")]
    EmptyRoster,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub struct DebateOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    retry: RetryPolicy,
}

impl DebateOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, retry: RetryPolicy) -> Self {
        DebateOrchestrator { provider, retry }
    }

    /// Run one complete debate turn against the session. On success the round
    /// is appended and its 1-based display number returned. On failure
    /// nothing is stored: no partial rounds ever reach the store.
    pub async fn run_round(
        &self,
        session: &mut SessionState,
        mode: RoundMode,
    ) -> Result<usize, RoundError> {
        if session.topic().trim().is_empty() {
            return Err(RoundError::EmptyTopic);
        }
        if session.personas().is_empty() {
            return Err(RoundError::EmptyRoster);
        }

        let mode_name = match &mode {
            RoundMode::NewRound => "new round",
            RoundMode::FollowUp(_) => "follow-up",
        };
        let display_number = session.rounds.count() + 1;
        eprintln!("[Debate] requesting round {} ({})", display_number, mode_name);

        let instructions = build_instructions(session.topic(), session.personas(), &mode);
        let raw_text = self
            .retry
            .run(|| self.provider.complete(&instructions.system, &instructions.user))
            .await?;

        let segmented = segment_response(&raw_text, session.personas());
        if segmented.is_all_empty() {
            // Soft warning only: the raw text is still stored for display.
            eprintln!("[Segment] no persona headings recognized in round {}", display_number);
        }

        let index = session.rounds.append(Round {
            raw_text,
            fragments: segmented.fragments,
            speaker_order: segmented.speaker_order,
            moderator_summary: segmented.moderator_summary,
        });
        eprintln!("[Debate] round {} stored", index + 1);
        Ok(index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personas::{default_roster, MODERATOR_NAME};
    use crate::round_builder::FIRST_ROUND_SUMMARY_LABEL;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct StubProvider {
        // One entry per expected call, popped front to back.
        responses: std::sync::Mutex<Vec<Result<String, ProviderError>>>,
        calls: AtomicU32,
    }

    impl StubProvider {
        fn new(responses: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(StubProvider {
                responses: std::sync::Mutex::new(responses),
                calls: AtomicU32::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                panic!("stub provider called more times than scripted");
            }
            responses.remove(0)
        }
    }

    fn transcript() -> String {
        format!(
            "### The Rational Analyst\nExpected value favors it.\n\
             ### The Intuitive Humanist\nPeople will feel the losses.\n\
             ### The Devil's Advocate\nBoth of you assume stable prices.\n\
             ### {} \u{2013} {}\nThe round leaned toward adoption.\n",
            MODERATOR_NAME, FIRST_ROUND_SUMMARY_LABEL
        )
    }

    fn orchestrator(provider: Arc<dyn CompletionProvider>) -> DebateOrchestrator {
        DebateOrchestrator::new(provider, RetryPolicy::new(3, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn test_successful_round_is_segmented_and_stored() {
        let provider = StubProvider::new(vec![Ok(transcript())]);
        let mut session = SessionState::new("Universal basic income", default_roster());
        let number = orchestrator(provider).run_round(&mut session, RoundMode::NewRound).await.unwrap();

        assert_eq!(number, 1);
        assert_eq!(session.rounds.count(), 1);
        let round = session.rounds.get(0).unwrap();
        assert_eq!(round.fragments["The Rational Analyst"], "Expected value favors it.");
        assert!(round.moderator_summary.ends_with("The round leaned toward adoption."));
        assert_eq!(round.speaker_order.len(), 4);
    }

    #[tokio::test]
    async fn test_blocked_completion_stores_no_round() {
        let provider = StubProvider::new(vec![Err(ProviderError::Blocked)]);
        let mut session = SessionState::new("Universal basic income", default_roster());
        let err = orchestrator(provider.clone())
            .run_round(&mut session, RoundMode::NewRound)
            .await
            .unwrap_err();

        assert!(matches!(err, RoundError::Provider(ProviderError::Blocked)));
        assert_eq!(session.rounds.count(), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_then_stored() {
        let provider = StubProvider::new(vec![Err(ProviderError::RateLimited), Ok(transcript())]);
        let mut session = SessionState::new("Universal basic income", default_roster());
        let number = orchestrator(provider.clone())
            .run_round(&mut session, RoundMode::NewRound)
            .await
            .unwrap();

        assert_eq!(number, 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unformatted_response_still_stored_with_empty_fragments() {
        let provider = StubProvider::new(vec![Ok("A wall of prose with no headings.".to_string())]);
        let mut session = SessionState::new("Universal basic income", default_roster());
        orchestrator(provider).run_round(&mut session, RoundMode::NewRound).await.unwrap();

        let round = session.rounds.get(0).unwrap();
        assert_eq!(round.raw_text, "A wall of prose with no headings.");
        assert!(round.speaker_order.is_empty());
        assert_eq!(round.moderator_summary, "");
    }

    #[tokio::test]
    async fn test_empty_topic_is_rejected_before_any_call() {
        let provider = StubProvider::new(vec![]);
        let mut session = SessionState::new("  ", default_roster());
        let err = orchestrator(provider.clone())
            .run_round(&mut session, RoundMode::NewRound)
            .await
            .unwrap_err();

        assert!(matches!(err, RoundError::EmptyTopic));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
