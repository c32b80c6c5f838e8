// piiredact/src/redactor.rs
//! Builds the redacted text and finalizes entity metadata.
//!
//! Replacements are applied to a single working copy of the input in
//! descending start order: replacement length generally differs from the
//! span length, so ascending-order replacement would invalidate the byte
//! offsets of later spans. Entities keep their offsets into the *original*
//! text, and the raw matched value is dropped as soon as its fingerprint is
//! computed.

use crate::analysis::{fingerprint, log_redaction_debug, Candidate, Entity};

/// Produces the redacted text and the finalized entity list from resolved,
/// start-sorted, non-overlapping winners.
///
/// Entities are returned ascending by start. For empty input or an empty
/// winner set, the text is returned unchanged.
pub fn redact(text: &str, winners: &[Candidate]) -> (String, Vec<Entity>) {
    let mut entities: Vec<Entity> = winners
        .iter()
        .map(|c| Entity {
            rule_name: c.rule_name.clone(),
            start: c.start,
            end: c.end,
            value_fingerprint: fingerprint(&c.text),
            original_len: c.end - c.start,
        })
        .collect();
    entities.sort_by_key(|e| e.start);

    let mut redacted = text.to_string();
    for winner in winners.iter().rev() {
        log_redaction_debug(
            "[piiredact::redactor]",
            &winner.rule_name,
            &winner.text,
            &winner.replace_with,
        );
        redacted.replace_range(winner.start..winner.end, &winner.replace_with);
    }

    (redacted, entities)
}
