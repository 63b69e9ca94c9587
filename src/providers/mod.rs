// Completion provider module

pub mod openai_compatible;
pub mod provider_trait;

pub use openai_compatible::{OpenAiCompatibleProvider, ProviderConfig};
pub use provider_trait::{CompletionProvider, ProviderError};
