// piiredact/src/lib.rs
//! # piiredact
//!
//! `piiredact` provides the fundamental, platform-independent logic for PII
//! detection and redaction. It scans arbitrary free text against an ordered
//! catalog of detectors, resolves overlaps between competing matches into a
//! deterministic set of winners, replaces winning spans with a placeholder,
//! and emits an auditable, non-reversible record (truncated SHA-256
//! fingerprints plus length metadata, never raw values) of what was found.
//!
//! The library is designed to be pure and stateless: `analyze` is a function
//! of its input plus the catalog configuration, with no I/O, no shared
//! mutable state across calls, and no concerns for the surrounding
//! application (HTTP surfaces, transcription, persistence all live
//! elsewhere).
//!
//! ## Modules
//!
//! * `config`: Defines `DetectorRule`s, `DetectorConfig`, and `SemanticConfig`.
//! * `catalog`: Compiles rules into an ordered `DetectorCatalog` of `Matcher`s.
//! * `resolver`: Greedy first-fit overlap resolution.
//! * `redactor`: Placeholder substitution and entity finalization.
//! * `analysis`: `Candidate`, `Entity`, `AnalysisResult`, fingerprinting.
//! * `semantic`: The injectable `SemanticScorer` capability and flag adapter.
//! * `engine`: The `AnalysisEngine` exposing the single `analyze` operation.
//! * `validators`: Programmatic validation for specific data types.
//!
//! ## Usage Example
//!
//! ```rust
//! use piiredact::{AnalysisEngine, DetectorConfig};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Load the default detector catalog.
//!     let config = DetectorConfig::load_default_detectors()?;
//!
//!     // 2. Build the engine (compiles and caches the catalog).
//!     let engine = AnalysisEngine::new(config)?;
//!
//!     // 3. Analyze some content.
//!     let result = engine.analyze("Contact sarah.j@example.com or 456-78-9012 today", false);
//!     assert_eq!(result.redacted_text, "Contact [REDACTED] or [REDACTED] today");
//!     assert_eq!(result.entities.len(), 2);
//!
//!     // Entities carry fingerprints and span metadata, never the raw value.
//!     for entity in &result.entities {
//!         println!("{} at {}..{}: {}", entity.rule_name, entity.start, entity.end,
//!             entity.value_fingerprint);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Malformed detector patterns are construction-time defects reported as
//! [`RedactError`]; `analyze` itself is infallible for any input text. The
//! semantic capability fails soft: scorer errors degrade to an empty flag
//! list and never reach the caller.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod errors;
pub mod redactor;
pub mod resolver;
pub mod semantic;
pub mod validators;

/// Re-exports the public configuration types and functions for managing detectors.
pub use config::{
    merge_detectors,
    validate_detectors,
    DetectorConfig,
    DetectorRule,
    SemanticConfig,
    DEFAULT_PLACEHOLDER,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the custom error types for clear error reporting.
pub use errors::{RedactError, SemanticError};

/// Re-exports the engine exposing the `analyze` operation.
pub use engine::AnalysisEngine;

/// Re-exports the public result types.
pub use analysis::{AnalysisResult, Entity, SemanticFlag, FINGERPRINT_LEN};

/// Re-exports the injectable semantic capability contract.
pub use semantic::{cosine_similarity, SemanticFlagAdapter, SemanticScorer};

/// Re-exports catalog types for advanced usage (custom matchers, pre-compiled
/// catalogs).
pub use catalog::{compile_detectors, DetectorCatalog, Matcher, RegexMatcher};
