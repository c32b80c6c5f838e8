// piiredact/src/catalog.rs
//! catalog.rs - Compilation and caching of the detector catalog.
//!
//! This module turns a `DetectorConfig` into a `DetectorCatalog`: an ordered
//! set of compiled matchers ready for scanning. It uses a global, shared
//! cache keyed by a hash of the detector list to avoid redundant
//! compilation, and exposes the `Matcher` trait so detector implementations
//! other than regex can be plugged in.
//!
//! License: MIT OR APACHE 2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::analysis::{log_candidate_debug, Candidate};
use crate::config::{DetectorConfig, DetectorRule, MAX_PATTERN_LENGTH};
use crate::errors::RedactError;
use crate::validators;

/// A polymorphic matching capability over text.
///
/// Implementations must be deterministic and must remain linear-or-bounded
/// on adversarial input; the shipped [`RegexMatcher`] satisfies this because
/// the `regex` crate executes in time linear in the haystack.
pub trait Matcher: Send + Sync + Debug {
    /// Returns all non-overlapping match spans in left-to-right order,
    /// as half-open byte ranges into `text`.
    fn find_all(&self, text: &str) -> Vec<(usize, usize)>;
}

/// The default `Matcher`, backed by a compiled regular expression.
#[derive(Debug)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Matcher for RegexMatcher {
    fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex.find_iter(text).map(|m| (m.start(), m.end())).collect()
    }
}

/// A single compiled detector, ready for scanning.
#[derive(Debug)]
pub struct CompiledDetector {
    /// The unique name of the detector (the entity type label).
    pub name: String,
    /// The compiled matching capability.
    pub matcher: Box<dyn Matcher>,
    /// The placeholder substituted for this detector's winning spans.
    pub replace_with: String,
    /// Whether matches are additionally checked by a programmatic validator.
    pub programmatic_validation: bool,
}

/// The ordered, read-only pattern catalog.
///
/// Declaration order is preserved from the configuration; it encodes
/// precedence among candidates with equal start offsets downstream.
#[derive(Debug)]
pub struct DetectorCatalog {
    pub detectors: Vec<CompiledDetector>,
}

impl DetectorCatalog {
    /// Produces the full candidate multiset for `text`.
    ///
    /// Deterministic: per-detector results are concatenated in catalog
    /// declaration order, and within a detector in left-to-right match
    /// order. Every detector matches against the original text, so two
    /// detectors may legitimately claim overlapping spans; resolution
    /// happens downstream. Never fails, for any input.
    pub fn scan(&self, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for detector in &self.detectors {
            for (start, end) in detector.matcher.find_all(text) {
                let matched = &text[start..end];
                if detector.programmatic_validation
                    && !validators::run_programmatic_validator(&detector.name, matched)
                {
                    debug!(
                        "[piiredact::catalog] Dropping candidate for '{}' at {}..{}: failed programmatic validation",
                        detector.name, start, end
                    );
                    continue;
                }
                log_candidate_debug("[piiredact::catalog]", &detector.name, matched);
                candidates.push(Candidate {
                    rule_name: detector.name.clone(),
                    start,
                    end,
                    text: matched.to_string(),
                    replace_with: detector.replace_with.clone(),
                });
            }
        }
        candidates
    }
}

lazy_static! {
    /// A thread-safe, global cache for compiled catalogs.
    /// The key is a hash of the ordered detector list.
    static ref COMPILED_CATALOG_CACHE: RwLock<HashMap<u64, Arc<DetectorCatalog>>> =
        RwLock::new(HashMap::new());
}

/// Hashes the detector list to create a stable cache key.
///
/// Unlike name-keyed rule sets, catalog order is semantically significant
/// (it encodes overlap precedence), so the detectors are hashed in
/// declaration order rather than sorted.
fn hash_detectors(detectors: &[DetectorRule]) -> u64 {
    let mut hasher = DefaultHasher::new();
    detectors.hash(&mut hasher);
    hasher.finish()
}

/// Compiles a list of `DetectorRule`s into a `DetectorCatalog`.
/// This is the low-level function that performs the actual regex compilation.
///
/// A malformed pattern is a construction-time defect: all compilation errors
/// are collected and reported together, and no partially usable catalog is
/// returned.
pub fn compile_detectors(rules: Vec<DetectorRule>) -> Result<DetectorCatalog, RedactError> {
    debug!("Starting compilation of {} detectors.", rules.len());

    let mut compiled = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules {
        if let Some(false) = rule.enabled {
            debug!("Skipping detector '{}' (explicitly disabled).", rule.name);
            continue;
        }
        let pattern = match rule.pattern.as_ref() {
            Some(p) => p,
            None => {
                warn!("Skipping detector '{}' because its pattern is missing.", rule.name);
                continue;
            }
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(RedactError::PatternLengthExceeded(
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(pattern)
            .multi_line(rule.multiline)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
            .build();

        match regex_result {
            Ok(regex) => {
                debug!("Detector '{}' compiled successfully.", &rule.name);
                compiled.push(CompiledDetector {
                    name: rule.name,
                    matcher: Box::new(RegexMatcher { regex }),
                    replace_with: rule.replace_with,
                    programmatic_validation: rule.programmatic_validation,
                });
            }
            Err(e) => {
                compilation_errors.push(RedactError::DetectorCompilationError(rule.name, e));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        Err(RedactError::Fatal(format!(
            "Failed to compile {} detector(s):\n{}",
            compilation_errors.len(),
            error_message
        )))
    } else {
        debug!("Finished compiling detectors. Total compiled: {}.", compiled.len());
        Ok(DetectorCatalog { detectors: compiled })
    }
}

/// Gets a `DetectorCatalog` from the cache or compiles it if not found.
///
/// This is the public entry point for retrieving a compiled catalog. It
/// returns an `Arc`, allowing for cheap sharing across engines and threads.
pub fn get_or_compile_catalog(config: &DetectorConfig) -> Result<Arc<DetectorCatalog>> {
    let cache_key = hash_detectors(&config.detectors);

    // Attempt to acquire a read lock first.
    {
        let cache = COMPILED_CATALOG_CACHE.read().unwrap();
        if let Some(catalog) = cache.get(&cache_key) {
            debug!("Serving compiled catalog from cache for key: {}", &cache_key);
            return Ok(Arc::clone(catalog));
        }
    } // Read lock is released here.

    debug!("Compiled catalog not found in cache. Compiling now.");
    let catalog = compile_detectors(config.detectors.clone())?;
    let catalog_arc = Arc::new(catalog);

    COMPILED_CATALOG_CACHE
        .write()
        .unwrap()
        .insert(cache_key, Arc::clone(&catalog_arc));

    debug!("Successfully compiled and cached catalog for key: {}", &cache_key);
    Ok(catalog_arc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, pattern: &str) -> DetectorRule {
        DetectorRule {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_scan_concatenates_in_declaration_order() {
        let catalog = compile_detectors(vec![rule("b_second", "bb"), rule("a_first", "aa")]).unwrap();
        let candidates = catalog.scan("aa bb aa");
        let names: Vec<&str> = candidates.iter().map(|c| c.rule_name.as_str()).collect();
        // Declaration order, not alphabetical and not positional.
        assert_eq!(names, vec!["b_second", "a_first", "a_first"]);
        assert_eq!(candidates[0].start, 3);
        assert_eq!(candidates[1].start, 0);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let catalog = compile_detectors(vec![rule("digits", r"\d+"), rule("words", r"[a-z]+")]).unwrap();
        let text = "abc 123 def 456";
        assert_eq!(catalog.scan(text), catalog.scan(text));
    }

    #[test]
    fn test_compile_rejects_invalid_pattern() {
        let err = compile_detectors(vec![rule("broken", "([unclosed")]).unwrap_err();
        assert!(err.to_string().contains("Failed to compile 1 detector(s)"));
    }

    #[test]
    fn test_compile_rejects_oversized_pattern() {
        let long_pattern = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_detectors(vec![rule("huge", &long_pattern)]).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum allowed"));
    }

    #[test]
    fn test_disabled_detector_is_not_compiled() {
        let mut disabled = rule("gone", "x");
        disabled.enabled = Some(false);
        let catalog = compile_detectors(vec![rule("kept", "y"), disabled]).unwrap();
        assert_eq!(catalog.detectors.len(), 1);
        assert_eq!(catalog.detectors[0].name, "kept");
    }

    #[test]
    fn test_scan_empty_text_yields_no_candidates() {
        let catalog = compile_detectors(vec![rule("digits", r"\d+")]).unwrap();
        assert!(catalog.scan("").is_empty());
    }
}
