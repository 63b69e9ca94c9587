// Type definitions shared across the debate session

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named debate role with a fixed behavioral description used to condition
/// the model's voice for that segment of output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Persona {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One completed debate turn. Never mutated after creation; appended to the
/// round store in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub raw_text: String,
    /// Fragment per roster persona. Empty string when that persona's heading
    /// was absent from the raw text.
    pub fragments: HashMap<String, String>,
    /// Personas whose heading was found, ordered by occurrence offset in the
    /// raw text. May differ from roster order when the model emits headings
    /// out of sequence.
    pub speaker_order: Vec<String>,
    /// The moderator's fragment, verbatim (heading label included).
    pub moderator_summary: String,
}

/// User tag attached to a bookmarked fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relevance {
    Relevant,
    #[serde(rename = "Not Relevant")]
    NotRelevant,
}

impl Relevance {
    pub fn label(&self) -> &'static str {
        match self {
            Relevance::Relevant => "Relevant",
            Relevance::NotRelevant => "Not Relevant",
        }
    }

    /// Badge style the UI renders the bookmark with.
    pub fn display_style(&self) -> &'static str {
        match self {
            Relevance::Relevant => "success",
            Relevance::NotRelevant => "warning",
        }
    }
}

/// A user-created, immutable annotation on one persona's fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// 1-based display number of the round the fragment came from.
    pub round_number: usize,
    pub content: String,
    pub relevance: Relevance,
}
