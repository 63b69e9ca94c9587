// Completion provider trait and failure taxonomy

use thiserror::Error;

/// Typed failure kinds for a completion call. Only the first two are worth
/// retrying; the rest are surfaced to the user with no round recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("rate limited by the completion provider")]
    RateLimited,
    #[error("completion provider unavailable (status {0})")]
    ServiceUnavailable(u16),
    /// The model's safety filter refused the completion. Distinguished from
    /// a normal empty string so an empty debate turn is never stored as if
    /// it were a successful round.
    #[error("completion blocked by the model safety filter")]
    Blocked,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("missing or rejected API credential")]
    Unauthenticated,
}

impl ProviderError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited | ProviderError::ServiceUnavailable(_)
        )
    }
}

#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one (system, user) instruction pair and return the generated
    /// text blob.
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<String, ProviderError>;
}
