// Markdown export of the debate transcript

use crate::segmenter::strip_summary_label;
use crate::session::SessionState;

pub fn export_markdown(session: &SessionState) -> String {
    let mut markdown = String::new();
    markdown.push_str(&format!("# Debate: {}\n\n", session.topic()));

    markdown.push_str("## Transcript\n\n");
    for (i, round) in session.rounds.all().iter().enumerate() {
        markdown.push_str(&format!("### Round {}\n\n", i + 1));
        if round.speaker_order.is_empty() {
            // Unsegmented round: fall back to the raw response.
            markdown.push_str(&format!("{}\n\n", round.raw_text));
            continue;
        }
        for name in &round.speaker_order {
            let fragment = round.fragments.get(name).map(String::as_str).unwrap_or("");
            markdown.push_str(&format!("**{}:** {}\n\n", name, fragment));
        }
    }

    markdown.push_str("## Moderator Summaries by Round\n\n");
    for (i, round) in session.rounds.all().iter().enumerate() {
        if !round.moderator_summary.is_empty() {
            markdown.push_str(&format!(
                "**Round {}:** {}\n\n",
                i + 1,
                strip_summary_label(&round.moderator_summary)
            ));
        }
    }

    markdown.push_str("## Bookmarked Arguments by Persona\n\n");
    for persona in session.personas().iter() {
        let bookmarks = session.bookmarks.list_for(&persona.name);
        if bookmarks.is_empty() {
            continue;
        }
        markdown.push_str(&format!("### {}\n\n", persona.name));
        for (i, bookmark) in bookmarks.iter().enumerate() {
            markdown.push_str(&format!(
                "{}. ({}, Round {}) {}\n",
                i + 1,
                bookmark.relevance.label(),
                bookmark.round_number,
                bookmark.content
            ));
        }
        markdown.push('\n');
    }

    markdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personas::default_roster;
    use crate::segmenter::segment_response;
    use crate::types::{Relevance, Round};

    #[test]
    fn test_export_includes_rounds_summaries_and_bookmarks() {
        let roster = default_roster();
        let raw = "### The Rational Analyst\nNumbers first.\n\
                   ### The Moderator \u{2013} Round Summary and Provisional Result\nEven round.\n";
        let segmented = segment_response(raw, &roster);

        let mut session = SessionState::new("Carbon tax", roster);
        session.rounds.append(Round {
            raw_text: raw.to_string(),
            fragments: segmented.fragments,
            speaker_order: segmented.speaker_order,
            moderator_summary: segmented.moderator_summary,
        });
        session
            .bookmarks
            .add("The Rational Analyst", 1, "Numbers first.".into(), Relevance::Relevant)
            .unwrap();

        let markdown = export_markdown(&session);
        assert!(markdown.contains("# Debate: Carbon tax"));
        assert!(markdown.contains("### Round 1"));
        assert!(markdown.contains("**The Rational Analyst:** Numbers first."));
        // Summary label is stripped in the display copy.
        assert!(markdown.contains("**Round 1:** Even round."));
        assert!(markdown.contains("(Relevant, Round 1) Numbers first."));
    }

    #[test]
    fn test_unsegmented_round_exports_raw_text() {
        let mut session = SessionState::new("Carbon tax", default_roster());
        let roster = default_roster();
        let raw = "No headings anywhere.";
        let segmented = segment_response(raw, &roster);
        session.rounds.append(Round {
            raw_text: raw.to_string(),
            fragments: segmented.fragments,
            speaker_order: segmented.speaker_order,
            moderator_summary: segmented.moderator_summary,
        });

        let markdown = export_markdown(&session);
        assert!(markdown.contains("No headings anywhere."));
    }
}
