// Persona roster - static for a debate topic's lifetime

use crate::types::Persona;

/// Reserved persona whose fragment is treated as the round's summary.
pub const MODERATOR_NAME: &str = "The Moderator";

/// Ordered list of debate personas. Immutable once built; a new roster
/// replaces the old one wholesale, there is no in-place editing.
#[derive(Debug, Clone)]
pub struct PersonaRoster {
    personas: Vec<Persona>,
}

impl PersonaRoster {
    /// Names are expected to be unique and non-empty; the roster does not
    /// police this beyond what callers construct.
    pub fn new(personas: Vec<Persona>) -> Self {
        PersonaRoster { personas }
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.personas.iter().map(|p| p.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.personas.iter().any(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

/// The roster seeded at first initialization. Topic-independent: changing the
/// topic resets rounds and bookmarks but keeps these personas.
pub fn default_roster() -> PersonaRoster {
    PersonaRoster::new(vec![
        Persona::new(
            "The Rational Analyst",
            "You are a rational decision analyst. Rely strictly on logic, statistical evidence, \
             and expected value. Avoid emotional language. Your goal is to provide normatively \
             correct choices regardless of human intuitions or biases.",
        ),
        Persona::new(
            "The Intuitive Humanist",
            "You are a humanistic advisor who cares deeply about emotions, fairness, and \
             perceived losses. You reason like a typical human, placing greater weight on loss \
             aversion, fairness, and emotionally charged outcomes.",
        ),
        Persona::new(
            "The Devil's Advocate",
            "Your role is to challenge the consensus and expose flawed reasoning. Always \
             question assumptions, point out inconsistencies or missing data, and provide \
             counterarguments even if they are unpopular.",
        ),
        Persona::new(
            MODERATOR_NAME,
            "You are a moderator who observes and summarises the debate. You introduce rounds, \
             connect points, and provide brief summaries after each round.",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_ends_with_moderator() {
        let roster = default_roster();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.personas().last().unwrap().name, MODERATOR_NAME);
    }

    #[test]
    fn test_contains_is_exact_match() {
        let roster = default_roster();
        assert!(roster.contains("The Rational Analyst"));
        assert!(!roster.contains("The Rational"));
        assert!(!roster.contains("rational analyst"));
    }
}
