// piiredact/src/config.rs
//! Configuration management for `piiredact`.
//!
//! This module defines the core data structures for detector rules and the
//! semantic-flag settings. It handles serialization/deserialization of YAML
//! configurations and provides utilities for loading, merging, and validating
//! these configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Maximum allowed length for a detector pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// The fixed marker substituted for a winning entity's span unless a rule
/// overrides it.
pub const DEFAULT_PLACEHOLDER: &str = "[REDACTED]";

/// Represents a single detector in the pattern catalog.
///
/// Declaration order in the catalog is significant: when two detectors
/// produce candidates starting at the same offset, the earlier-declared
/// detector wins overlap resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorRule {
    /// Unique identifier for the detector (e.g., "email", "credit_card").
    pub name: String,
    /// Human-readable description of what the detector targets.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: Option<String>,
    /// The string to replace matches with.
    pub replace_with: String,
    /// If true, enables multiline mode for the regex engine.
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// If true, the detector is disabled unless explicitly enabled.
    pub opt_in: bool,
    /// If true, matches are additionally checked by a programmatic validator
    /// (e.g., SSN structure rules, Luhn).
    pub programmatic_validation: bool,
    /// Explicit override for enabling/disabling the detector.
    pub enabled: Option<bool>,
    /// Security severity level (e.g., "high", "medium").
    pub severity: Option<String>,
    /// Metadata tags for categorization.
    pub tags: Option<Vec<String>>,
}

impl Default for DetectorRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: None,
            replace_with: DEFAULT_PLACEHOLDER.to_string(),
            multiline: false,
            dot_matches_new_line: false,
            opt_in: false,
            programmatic_validation: false,
            enabled: None,
            severity: None,
            tags: None,
        }
    }
}

/// Settings for the advisory semantic-flag stage.
///
/// Exemplars and the acceptance threshold are deployment configuration, not
/// business logic; both can be overridden in a user config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Sensitive-topic exemplar phrases the whole input is scored against.
    pub exemplars: Vec<String>,
    /// Minimum cosine similarity for an exemplar to be flagged.
    pub threshold: f32,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            exemplars: vec![
                "patient record".to_string(),
                "medical file".to_string(),
                "bank account".to_string(),
                "credit card".to_string(),
                "social security".to_string(),
                "aadhaar".to_string(),
                "pan".to_string(),
            ],
            threshold: 0.75,
        }
    }
}

/// Represents the top-level configuration structure for piiredact.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// The ordered pattern catalog. Order encodes overlap precedence.
    pub detectors: Vec<DetectorRule>,
    /// Settings for the semantic-flag stage.
    pub semantic: SemanticConfig,
}

impl DetectorConfig {
    /// Loads a detector catalog from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom detectors from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: DetectorConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        validate_detectors(&config.detectors)?;
        info!("Loaded {} detectors from file {}.", config.detectors.len(), path.display());

        Ok(config)
    }

    /// Loads the default detector catalog from the embedded configuration.
    pub fn load_default_detectors() -> Result<Self> {
        debug!("Loading default detectors from embedded string...");
        let default_yaml = include_str!("../config/default_detectors.yaml");
        let config: DetectorConfig = serde_yml::from_str(default_yaml)
            .context("Failed to parse default detectors")?;

        debug!("Loaded {} default detectors.", config.detectors.len());
        Ok(config)
    }

    /// Filters active detectors based on enable/disable name lists.
    ///
    /// Relative catalog order is preserved: filtering removes detectors but
    /// never reorders the survivors, so overlap precedence is unaffected.
    pub fn set_active_detectors(&mut self, enable: &[String], disable: &[String]) {
        let enable_set: HashSet<&str> = enable.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable.iter().map(String::as_str).collect();

        debug!("Initial detector count before filtering: {}", self.detectors.len());

        let all_names: HashSet<&str> = self.detectors.iter().map(|d| d.name.as_str()).collect();

        for name in enable_set.difference(&all_names) {
            warn!("Detector '{}' in `enable` list does not exist.", name);
        }
        for name in disable_set.difference(&all_names) {
            warn!("Detector '{}' in `disable` list does not exist.", name);
        }

        self.detectors.retain(|d| {
            let name = d.name.as_str();
            !disable_set.contains(name) && (!d.opt_in || enable_set.contains(name))
        });

        debug!("Final active detector count after filtering: {}", self.detectors.len());
    }
}

/// Merges user-defined detectors and semantic settings with defaults.
///
/// A user detector with the same name replaces the default in place, keeping
/// the default catalog's position (and therefore its precedence). New user
/// detectors are appended after the defaults.
pub fn merge_detectors(
    default_config: DetectorConfig,
    user_config: Option<DetectorConfig>,
) -> DetectorConfig {
    debug!("merge_detectors called. Default catalog size: {}", default_config.detectors.len());

    let mut detectors = default_config.detectors;
    let mut semantic = default_config.semantic;

    if let Some(user_cfg) = user_config {
        debug!("User config provided. Merging {} user detectors.", user_cfg.detectors.len());
        let mut position: HashMap<String, usize> = detectors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();

        for user_detector in user_cfg.detectors {
            match position.get(user_detector.name.as_str()) {
                Some(&i) => detectors[i] = user_detector,
                None => {
                    position.insert(user_detector.name.clone(), detectors.len());
                    detectors.push(user_detector);
                }
            }
        }

        if user_cfg.semantic != SemanticConfig::default() {
            debug!(
                "Overriding semantic settings with user values (threshold: {}).",
                user_cfg.semantic.threshold
            );
            semantic = user_cfg.semantic;
        }
    }

    debug!("Final catalog size after merge: {}", detectors.len());
    DetectorConfig { detectors, semantic }
}

/// Validates detector integrity (names, pattern presence, regex compilation).
///
/// A malformed pattern is a construction-time defect: it must prevent the
/// catalog from being used rather than surface at scan time.
pub fn validate_detectors(detectors: &[DetectorRule]) -> Result<()> {
    let mut names = HashSet::new();
    let mut errors = Vec::new();

    for detector in detectors {
        if detector.name.is_empty() {
            errors.push("A detector has an empty `name` field.".to_string());
        } else if !names.insert(detector.name.clone()) {
            errors.push(format!("Duplicate detector name found: '{}'.", detector.name));
        }

        let pattern = match &detector.pattern {
            Some(p) => p,
            None => {
                errors.push(format!("Detector '{}' is missing the `pattern` field.", detector.name));
                continue;
            }
        };

        if pattern.is_empty() {
            errors.push(format!("Detector '{}' has an empty `pattern` field.", detector.name));
        }

        if pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(format!(
                "Detector '{}': pattern length ({}) exceeds maximum allowed ({}).",
                detector.name,
                pattern.len(),
                MAX_PATTERN_LENGTH
            ));
            continue;
        }

        if let Err(e) = Regex::new(pattern) {
            errors.push(format!("Detector '{}' has an invalid regex pattern: {}", detector.name, e));
        }
    }

    if !errors.is_empty() {
        let full_error_message = format!("Detector validation failed:\n{}", errors.join("\n"));
        Err(anyhow!(full_error_message))
    } else {
        Ok(())
    }
}
