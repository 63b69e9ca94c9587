// Builds the two-message prompt for a debate round

use crate::personas::{PersonaRoster, MODERATOR_NAME};

/// Heading marker prefix the model is told to use and the segmenter looks for.
pub const HEADING_PREFIX: &str = "### ";

/// Label on the moderator heading in the opening round.
pub const FIRST_ROUND_SUMMARY_LABEL: &str = "Round Summary and Provisional Result";
/// Label on the moderator heading in follow-up rounds.
pub const FOLLOW_UP_SUMMARY_LABEL: &str = "Round Summary and Updated Result";

/// Whether the round opens the debate or continues it with a user question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundMode {
    NewRound,
    FollowUp(String),
}

impl RoundMode {
    pub fn summary_label(&self) -> &'static str {
        match self {
            RoundMode::NewRound => FIRST_ROUND_SUMMARY_LABEL,
            RoundMode::FollowUp(_) => FOLLOW_UP_SUMMARY_LABEL,
        }
    }
}

/// The (system, user) message pair sent to the completion provider.
#[derive(Debug, Clone)]
pub struct InstructionPair {
    pub system: String,
    pub user: String,
}

/// Pure function of its inputs; no side effects. The system instruction fixes
/// the heading format the segmenter depends on: one `### <name>` heading per
/// persona in roster order, the moderator's heading last and suffixed with
/// the round's summary label.
pub fn build_instructions(topic: &str, roster: &PersonaRoster, mode: &RoundMode) -> InstructionPair {
    let mut heading_block = String::new();
    for persona in roster.iter() {
        if persona.name == MODERATOR_NAME {
            heading_block.push_str(&format!(
                "{}{} \u{2013} {}\n",
                HEADING_PREFIX,
                persona.name,
                mode.summary_label()
            ));
        } else {
            heading_block.push_str(&format!("{}{}\n", HEADING_PREFIX, persona.name));
        }
    }

    let opening = match mode {
        RoundMode::NewRound => {
            "You are a debate moderator. Each persona should respond to the others' arguments \
             as if in real conversation. Use a turn-taking structure with back-and-forth \
             critique or support, and include a summary from the Moderator at the end."
        }
        RoundMode::FollowUp(_) => {
            "Continue responding in character as the defined personas. Each should interact, \
             reference others' views, and respond as in a real-time moderated debate, ending \
             with a final summary by the Moderator."
        }
    };

    let system = format!(
        "{}\n\nFormat the response with exactly one markdown heading per persona, in this \
         order and spelled exactly as given:\n{}\nPlace each persona's contribution under its \
         own heading and write nothing outside the headings.",
        opening, heading_block
    );

    let roster_lines: String = roster
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.description))
        .collect::<Vec<_>>()
        .join("\n");

    let user = match mode {
        RoundMode::NewRound => format!(
            "Debate topic: {}\n\nSimulate one round of dynamic interaction between the \
             following personas, each reacting to at least one other:\n{}\n\nOutput a full \
             conversational round where personas address one another's reasoning, ending with \
             a short summary from the Moderator.",
            topic, roster_lines
        ),
        RoundMode::FollowUp(question) => format!(
            "Topic: {}\n\nQuestion: {}\n\nPersonas:\n{}",
            topic, question, roster_lines
        ),
    };

    InstructionPair { system, user }
}
