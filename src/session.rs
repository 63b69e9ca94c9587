// In-memory session state: round store, bookmark store, topic.
//
// All state lives only for the life of the server process; there is no file
// or database format to preserve. The state is an explicit struct handed to
// each operation, never an ambient global.

use std::collections::HashMap;

use thiserror::Error;

use crate::personas::PersonaRoster;
use crate::types::{Bookmark, Relevance, Round};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Bookmark for a persona not in the current roster. Should not occur
    /// with a correctly maintained roster; treated as a contract violation.
    #[error("unknown persona: {0}")]
    UnknownPersona(String),
    #[error("round {0} out of range")]
    IndexOutOfRange(usize),
}

/// Ordered, append-only sequence of completed rounds.
#[derive(Debug, Default)]
pub struct RoundStore {
    rounds: Vec<Round>,
}

impl RoundStore {
    pub fn new() -> Self {
        RoundStore { rounds: Vec::new() }
    }

    /// Append is the only mutator. Returns the assigned index: current length
    /// before the append (0-based internally, displayed 1-based).
    pub fn append(&mut self, round: Round) -> usize {
        let index = self.rounds.len();
        self.rounds.push(round);
        index
    }

    pub fn get(&self, index: usize) -> Result<&Round, SessionError> {
        self.rounds
            .get(index)
            .ok_or(SessionError::IndexOutOfRange(index))
    }

    pub fn count(&self) -> usize {
        self.rounds.len()
    }

    pub fn all(&self) -> &[Round] {
        &self.rounds
    }
}

/// Per-persona ordered lists of user-tagged fragments. Pure accumulation:
/// no dedup, no update, no delete.
#[derive(Debug, Default)]
pub struct BookmarkStore {
    by_persona: HashMap<String, Vec<Bookmark>>,
}

impl BookmarkStore {
    /// Seed one empty list per roster persona, so every key in the store is
    /// a roster name by construction.
    pub fn seeded(roster: &PersonaRoster) -> Self {
        BookmarkStore {
            by_persona: roster
                .names()
                .map(|name| (name.to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Content is stored verbatim; trim policy is the caller's job.
    pub fn add(
        &mut self,
        persona: &str,
        round_number: usize,
        content: String,
        relevance: Relevance,
    ) -> Result<(), SessionError> {
        let list = self
            .by_persona
            .get_mut(persona)
            .ok_or_else(|| SessionError::UnknownPersona(persona.to_string()))?;
        list.push(Bookmark {
            round_number,
            content,
            relevance,
        });
        Ok(())
    }

    pub fn list_for(&self, persona: &str) -> &[Bookmark] {
        self.by_persona.get(persona).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn list_all(&self) -> &HashMap<String, Vec<Bookmark>> {
        &self.by_persona
    }
}

/// Everything one debate session holds. Single-threaded access model: the
/// server wraps this in one async mutex held across each round so appends
/// never interleave.
#[derive(Debug)]
pub struct SessionState {
    topic: String,
    personas: PersonaRoster,
    pub rounds: RoundStore,
    pub bookmarks: BookmarkStore,
}

impl SessionState {
    pub fn new(topic: impl Into<String>, personas: PersonaRoster) -> Self {
        let bookmarks = BookmarkStore::seeded(&personas);
        SessionState {
            topic: topic.into(),
            personas,
            rounds: RoundStore::new(),
            bookmarks,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn personas(&self) -> &PersonaRoster {
        &self.personas
    }

    /// Changing the topic clears rounds and bookmarks; the roster is
    /// topic-independent and preserved. Setting the same topic is a no-op.
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if topic == self.topic {
            return;
        }
        self.topic = topic;
        self.rounds = RoundStore::new();
        self.bookmarks = BookmarkStore::seeded(&self.personas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personas::default_roster;

    fn round(raw: &str) -> Round {
        Round {
            raw_text: raw.to_string(),
            fragments: HashMap::new(),
            speaker_order: Vec::new(),
            moderator_summary: String::new(),
        }
    }

    #[test]
    fn test_round_numbering_is_monotonic() {
        let mut store = RoundStore::new();
        assert_eq!(store.count(), 0);
        assert_eq!(store.append(round("r1")), 0);
        assert_eq!(store.append(round("r2")), 1);
        assert_eq!(store.append(round("r3")), 2);
        assert_eq!(store.count(), 3);
        assert_eq!(store.get(1).unwrap().raw_text, "r2");
    }

    #[test]
    fn test_out_of_range_read_fails() {
        let store = RoundStore::new();
        assert!(matches!(store.get(0), Err(SessionError::IndexOutOfRange(0))));
    }

    #[test]
    fn test_bookmark_add_then_list() {
        let roster = default_roster();
        let mut store = BookmarkStore::seeded(&roster);
        store
            .add("The Rational Analyst", 1, "Good point".into(), Relevance::Relevant)
            .unwrap();
        let list = store.list_for("The Rational Analyst");
        assert_eq!(list.last().unwrap().content, "Good point");
        assert_eq!(list.last().unwrap().round_number, 1);
        // Zero additions yields an empty sequence, not an error.
        assert!(store.list_for("The Moderator").is_empty());
    }

    #[test]
    fn test_bookmarks_accumulate_without_dedup() {
        // Scenario D: the same fragment bookmarked twice produces two entries
        let roster = default_roster();
        let mut store = BookmarkStore::seeded(&roster);
        for _ in 0..2 {
            store
                .add("The Rational Analyst", 1, "Good point".into(), Relevance::Relevant)
                .unwrap();
        }
        assert_eq!(store.list_for("The Rational Analyst").len(), 2);
    }

    #[test]
    fn test_bookmark_for_unknown_persona_is_rejected() {
        let roster = default_roster();
        let mut store = BookmarkStore::seeded(&roster);
        let err = store
            .add("The Imposter", 1, "hm".into(), Relevance::NotRelevant)
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownPersona("The Imposter".into()));
    }

    #[test]
    fn test_topic_change_resets_rounds_and_bookmarks_not_roster() {
        // Scenario E
        let mut session = SessionState::new("Old topic", default_roster());
        session.rounds.append(round("r1"));
        session
            .bookmarks
            .add("The Moderator", 1, "note".into(), Relevance::Relevant)
            .unwrap();

        session.set_topic("New topic");
        assert_eq!(session.topic(), "New topic");
        assert_eq!(session.rounds.count(), 0);
        assert!(session.bookmarks.list_for("The Moderator").is_empty());
        assert_eq!(session.personas().len(), 4);
        // Bookmark keys are still seeded for the full roster.
        assert_eq!(session.bookmarks.list_all().len(), 4);
    }

    #[test]
    fn test_setting_same_topic_keeps_state() {
        let mut session = SessionState::new("Same", default_roster());
        session.rounds.append(round("r1"));
        session.set_topic("Same");
        assert_eq!(session.rounds.count(), 1);
    }
}
