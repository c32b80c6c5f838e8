// piiredact/src/analysis.rs
//! Provides core data structures and utility functions for candidates,
//! resolved entities, and analysis results within the `piiredact` library.
//!
//! Raw matched text lives only in [`Candidate`], which is consumed during
//! redaction. The public [`Entity`] carries a truncated one-way fingerprint
//! and length metadata instead; the original value never serializes and
//! never reaches logs unless explicitly allowed via an env gate.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest of a matched value.
pub const FINGERPRINT_LEN: usize = 16;

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PIIREDACT_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A provisional detector match, before overlap resolution.
///
/// Offsets are byte offsets into the original text, half-open
/// (`start < end`), and always fall on UTF-8 character boundaries since they
/// come from the regex engine. Candidates are ephemeral: produced by a
/// catalog scan, consumed by resolution and redaction, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Name of the detector that produced this match.
    pub rule_name: String,
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// The exact matched substring. Dropped once the entity is finalized.
    pub text: String,
    /// The placeholder this span will be replaced with.
    pub replace_with: String,
}

/// A resolved, winning match included in the final result.
///
/// Carries only audit-safe metadata: the raw value is replaced by a
/// truncated one-way fingerprint and the original span length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Name of the detector that produced this entity (the type label).
    pub rule_name: String,
    /// Byte offset of the span start in the original text.
    pub start: usize,
    /// Byte offset one past the span end in the original text.
    pub end: usize,
    /// First [`FINGERPRINT_LEN`] hex chars of SHA-256 over the matched bytes.
    pub value_fingerprint: String,
    /// Length in bytes of the original matched span.
    pub original_len: usize,
}

/// An advisory topical-similarity signal, independent of redaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticFlag {
    /// The sensitive-topic exemplar the input was scored against.
    pub exemplar: String,
    /// Cosine similarity between the input and the exemplar.
    pub score: f32,
}

/// The complete output of a single `analyze` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The input text, unchanged.
    pub original_text: String,
    /// The input with every winning entity span replaced by its placeholder.
    pub redacted_text: String,
    /// Winning entities, pairwise non-overlapping, sorted ascending by `start`.
    pub entities: Vec<Entity>,
    /// Advisory topical flags; empty when the semantic stage is off or fails.
    pub semantic_flags: Vec<SemanticFlag>,
}

/// Computes the truncated one-way content fingerprint of a matched value.
///
/// The digest is taken over the exact matched bytes so identical sensitive
/// values produce identical fingerprints anywhere in the system, supporting
/// audit correlation without storing the value.
pub fn fingerprint(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let mut hex_digest = hex::encode(hasher.finalize());
    hex_digest.truncate(FINGERPRINT_LEN);
    hex_digest
}

/// Replaces sensitive content with a length-hinted marker for log output.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub(crate) fn log_candidate_debug(module_path: &str, rule_name: &str, sensitive_content: &str) {
    debug!(
        "{} Captured candidate for detector '{}': '{}'",
        module_path,
        rule_name,
        get_loggable_content(sensitive_content)
    );
}

pub(crate) fn log_redaction_debug(
    module_path: &str,
    rule_name: &str,
    sensitive_content: &str,
    replacement: &str,
) {
    debug!(
        "{} Redaction action: Original='{}', Redacted='{}' for detector '{}'",
        module_path,
        get_loggable_content(sensitive_content),
        replacement,
        rule_name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_sixteen_hex_chars() {
        let fp = fingerprint("sarah.j@example.com");
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint("456-78-9012"), fingerprint("456-78-9012"));
        assert_ne!(fingerprint("456-78-9012"), fingerprint("456-78-9013"));
    }

    #[test]
    fn test_entity_serialization_has_no_raw_value() {
        let entity = Entity {
            rule_name: "email".to_string(),
            start: 8,
            end: 27,
            value_fingerprint: fingerprint("sarah.j@example.com"),
            original_len: 19,
        };
        let json = serde_json::to_string(&entity).unwrap();
        assert!(!json.contains("sarah.j@example.com"));
        assert!(json.contains("value_fingerprint"));
    }

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }
}
