// Splits a raw model response into per-persona fragments by heading markers.
//
// This is a best-effort heuristic parse, not a guaranteed correct parser: the
// model's output formatting is not fully controlled, so a persona name quoted
// inside another persona's text can shadow a later real heading. The tie-break
// is deliberate and fixed: the first occurrence of each persona's heading
// marker wins, and no attempt is made to disambiguate nested mentions.

use std::collections::HashMap;

use crate::personas::{PersonaRoster, MODERATOR_NAME};
use crate::round_builder::{FIRST_ROUND_SUMMARY_LABEL, FOLLOW_UP_SUMMARY_LABEL, HEADING_PREFIX};

/// Per-persona fragments recovered from one raw response blob.
#[derive(Debug, Clone, Default)]
pub struct SegmentedResponse {
    /// One entry per roster persona; empty string when the heading was absent.
    pub fragments: HashMap<String, String>,
    /// Personas whose heading was found, sorted by ascending occurrence
    /// offset. This is the presentation order, which may differ from roster
    /// order when the model emits headings out of sequence.
    pub speaker_order: Vec<String>,
    /// The moderator's trimmed fragment, verbatim (label text included).
    pub moderator_summary: String,
}

impl SegmentedResponse {
    /// True when no heading was recognized at all. The caller still stores
    /// the raw text for display; this only drives a soft warning.
    pub fn is_all_empty(&self) -> bool {
        self.speaker_order.is_empty()
    }
}

/// Locate each persona's first `### <name>` heading and slice the text into
/// fragments between consecutive found headings.
pub fn segment_response(raw: &str, roster: &PersonaRoster) -> SegmentedResponse {
    // (heading offset, persona name, marker byte length), first occurrence per persona
    let mut found: Vec<(usize, &str, usize)> = Vec::new();
    for persona in roster.iter() {
        let marker = format!("{}{}", HEADING_PREFIX, persona.name);
        if let Some(pos) = raw.find(&marker) {
            found.push((pos, persona.name.as_str(), marker.len()));
        }
    }
    // One name can be a prefix of another ("Alice" / "Alice Smith"), in which
    // case both markers match at the same offset. Keep only the longest marker
    // per offset so the heading is attributed to the more specific name.
    found.sort_by(|a, b| a.0.cmp(&b.0).then(b.2.cmp(&a.2)));
    found.dedup_by_key(|entry| entry.0);

    let mut fragments: HashMap<String, String> = roster
        .names()
        .map(|name| (name.to_string(), String::new()))
        .collect();
    let mut speaker_order = Vec::with_capacity(found.len());
    let mut moderator_summary = String::new();

    for (i, &(pos, name, marker_len)) in found.iter().enumerate() {
        let start = pos + marker_len;
        let end = found
            .get(i + 1)
            .map(|&(next, _, _)| next)
            .unwrap_or(raw.len())
            .max(start);
        let fragment = raw[start..end].trim().to_string();
        if name == MODERATOR_NAME {
            moderator_summary = fragment.clone();
        }
        fragments.insert(name.to_string(), fragment);
        speaker_order.push(name.to_string());
    }

    SegmentedResponse {
        fragments,
        speaker_order,
        moderator_summary,
    }
}

/// Display copy of the moderator summary with the decorative heading label
/// removed. The stored fragment itself keeps the raw content.
pub fn strip_summary_label(summary: &str) -> &str {
    let trimmed = summary.trim();
    let mut body = trimmed;
    for dash in ['\u{2013}', '\u{2014}', '-'] {
        if let Some(rest) = body.strip_prefix(dash) {
            body = rest.trim_start();
            break;
        }
    }
    for label in [FIRST_ROUND_SUMMARY_LABEL, FOLLOW_UP_SUMMARY_LABEL] {
        if let Some(rest) = body.strip_prefix(label) {
            return rest.trim_start();
        }
    }
    trimmed
}
