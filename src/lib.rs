// Debate Room server library

mod debate;
mod export;
mod keychain;
mod personas;
mod retry;
mod round_builder;
mod segmenter;
mod session;
mod types;
pub mod http_server;
pub mod providers;

// Re-export necessary items for the external binary
pub use debate::{DebateOrchestrator, RoundError};
pub use export::export_markdown;
pub use keychain::{resolve_api_key, ConfigError, Keychain, KEYCHAIN_SERVICE, KEYCHAIN_USER};
pub use personas::{default_roster, PersonaRoster, MODERATOR_NAME};
pub use retry::RetryPolicy;
pub use round_builder::{build_instructions, InstructionPair, RoundMode};
pub use segmenter::{segment_response, strip_summary_label, SegmentedResponse};
pub use session::{BookmarkStore, RoundStore, SessionError, SessionState};
pub use types::{Bookmark, Persona, Relevance, Round};
