// piiredact/src/engine.rs
//! The analysis engine: wires the pattern catalog, overlap resolver,
//! redactor, and the optional semantic flag adapter into the single
//! `analyze` operation exposed to callers.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, warn};
use std::sync::Arc;

use crate::analysis::AnalysisResult;
use crate::catalog::{get_or_compile_catalog, DetectorCatalog};
use crate::config::DetectorConfig;
use crate::redactor::redact;
use crate::resolver::resolve_overlaps;
use crate::semantic::{SemanticFlagAdapter, SemanticScorer};

/// A PII detection and redaction engine.
///
/// Construction compiles the catalog and is the only fallible step; a
/// malformed detector pattern prevents the engine from being built.
/// After construction the engine is read-only: `analyze` is a pure function
/// of its input, holds no state about past calls, and the engine may be
/// shared across threads and invoked concurrently.
#[derive(Debug)]
pub struct AnalysisEngine {
    catalog: Arc<DetectorCatalog>,
    config: DetectorConfig,
    semantic_adapter: Option<SemanticFlagAdapter>,
}

impl AnalysisEngine {
    /// Builds an engine without a semantic capability: `analyze` will always
    /// return empty semantic flags.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let catalog = get_or_compile_catalog(&config)
            .context("Failed to compile detector catalog for AnalysisEngine")?;
        Ok(Self { catalog, config, semantic_adapter: None })
    }

    /// Builds an engine with an injected semantic similarity scorer.
    ///
    /// The scorer's lifecycle is owned by the surrounding system; the engine
    /// only ever reads through it.
    pub fn with_scorer(config: DetectorConfig, scorer: Arc<dyn SemanticScorer>) -> Result<Self> {
        let semantic_adapter = Some(SemanticFlagAdapter::new(scorer, &config.semantic));
        let catalog = get_or_compile_catalog(&config)
            .context("Failed to compile detector catalog for AnalysisEngine")?;
        Ok(Self { catalog, config, semantic_adapter })
    }

    /// Scans, resolves, redacts, and optionally scores `text`.
    ///
    /// Never fails: any text, including empty strings, binary-looking byte
    /// sequences, or pathological repeated-character input, is accepted and
    /// processed; detection simply finds fewer or no entities. A failing or
    /// absent semantic capability degrades to empty flags and is never
    /// surfaced to the caller.
    pub fn analyze(&self, text: &str, semantic: bool) -> AnalysisResult {
        let candidates = self.catalog.scan(text);
        debug!("[piiredact::engine] Scan produced {} candidate(s).", candidates.len());

        let winners = resolve_overlaps(candidates);
        debug!("[piiredact::engine] Resolved to {} non-overlapping winner(s).", winners.len());

        let (redacted_text, entities) = redact(text, &winners);

        let semantic_flags = if semantic {
            match &self.semantic_adapter {
                Some(adapter) => match adapter.score_topics(text) {
                    Ok(flags) => flags,
                    Err(e) => {
                        warn!("[piiredact::engine] Semantic scoring failed, returning no flags: {}", e);
                        Vec::new()
                    }
                },
                None => {
                    debug!("[piiredact::engine] Semantic scoring requested but no scorer is configured.");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        AnalysisResult {
            original_text: text.to_string(),
            redacted_text,
            entities,
            semantic_flags,
        }
    }

    /// Returns the compiled catalog backing this engine.
    pub fn catalog(&self) -> &DetectorCatalog {
        &self.catalog
    }

    /// Returns the engine's configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
