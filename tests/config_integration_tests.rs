// piiredact/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use piiredact::config::{self, DetectorConfig, DetectorRule, SemanticConfig};

#[test]
fn test_load_default_detectors() {
    let config = DetectorConfig::load_default_detectors().unwrap();
    assert!(!config.detectors.is_empty());
    assert!(config.detectors.iter().any(|d| d.name == "email"));

    // Defaults carry the fixed placeholder.
    let email = config.detectors.iter().find(|d| d.name == "email").unwrap();
    assert_eq!(email.replace_with, "[REDACTED]");
    assert!(!email.programmatic_validation);

    // The generic digit run is declared last so specific detectors win ties.
    assert_eq!(config.detectors.last().unwrap().name, "bank_account");

    // Default semantic settings match the shipped exemplar list.
    assert_eq!(config.semantic.exemplars.len(), 7);
    assert!((config.semantic.threshold - 0.75).abs() < f32::EPSILON);
}

#[test]
fn test_default_catalog_passes_validation() {
    let config = DetectorConfig::load_default_detectors().unwrap();
    config::validate_detectors(&config.detectors).unwrap();
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
detectors:
  - name: badge_id
    pattern: 'BDG-\d{5}'
    replace_with: "[BADGE]"
    description: "Internal badge identifiers"
    programmatic_validation: true
semantic:
  exemplars: ["employee badge"]
  threshold: 0.6
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = DetectorConfig::load_from_file(file.path())?;
    assert_eq!(config.detectors.len(), 1);
    assert_eq!(config.detectors[0].name, "badge_id");
    assert!(config.detectors[0].programmatic_validation);
    assert_eq!(config.detectors[0].replace_with, "[BADGE]");
    assert_eq!(config.semantic.exemplars, vec!["employee badge".to_string()]);
    Ok(())
}

#[test]
fn test_load_from_file_defaults_applied() -> Result<()> {
    let yaml_content = r#"
detectors:
  - name: plain
    pattern: 'plain'
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = DetectorConfig::load_from_file(file.path())?;
    assert_eq!(config.detectors.len(), 1);
    // Omitted fields fall back to the defaults.
    assert_eq!(config.detectors[0].replace_with, "[REDACTED]");
    assert!(!config.detectors[0].programmatic_validation);
    assert!(!config.detectors[0].opt_in);
    assert_eq!(config.semantic, SemanticConfig::default());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_invalid_pattern() -> Result<()> {
    let yaml_content = r#"
detectors:
  - name: broken
    pattern: '([unclosed'
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    assert!(DetectorConfig::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_load_from_file_rejects_duplicate_names() -> Result<()> {
    let yaml_content = r#"
detectors:
  - name: twice
    pattern: 'a'
  - name: twice
    pattern: 'b'
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    assert!(DetectorConfig::load_from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_merge_detectors_no_user_config() {
    let defaults = DetectorConfig::load_default_detectors().unwrap();
    let merged = config::merge_detectors(defaults.clone(), None);
    assert_eq!(merged, defaults);
}

#[test]
fn test_merge_detectors_user_override_keeps_precedence_slot() {
    let defaults = DetectorConfig::load_default_detectors().unwrap();
    let email_index = defaults.detectors.iter().position(|d| d.name == "email").unwrap();

    let user = DetectorConfig {
        detectors: vec![DetectorRule {
            name: "email".to_string(),
            pattern: Some(r"custom-email-pattern".to_string()),
            replace_with: "[MAIL]".to_string(),
            ..Default::default()
        }],
        semantic: SemanticConfig::default(),
    };

    let merged = config::merge_detectors(defaults, Some(user));
    assert_eq!(merged.detectors[email_index].name, "email");
    assert_eq!(
        merged.detectors[email_index].pattern.as_deref(),
        Some("custom-email-pattern")
    );
    assert_eq!(merged.detectors[email_index].replace_with, "[MAIL]");
}

#[test]
fn test_merge_detectors_appends_new_user_detector() {
    let defaults = DetectorConfig::load_default_detectors().unwrap();
    let default_len = defaults.detectors.len();

    let user = DetectorConfig {
        detectors: vec![DetectorRule {
            name: "badge_id".to_string(),
            pattern: Some(r"BDG-\d{5}".to_string()),
            ..Default::default()
        }],
        semantic: SemanticConfig::default(),
    };

    let merged = config::merge_detectors(defaults, Some(user));
    assert_eq!(merged.detectors.len(), default_len + 1);
    assert_eq!(merged.detectors.last().unwrap().name, "badge_id");
}

#[test]
fn test_merge_detectors_user_semantic_override() {
    let defaults = DetectorConfig::load_default_detectors().unwrap();
    let user = DetectorConfig {
        detectors: Vec::new(),
        semantic: SemanticConfig {
            exemplars: vec!["payroll data".to_string()],
            threshold: 0.55,
        },
    };
    let merged = config::merge_detectors(defaults, Some(user));
    assert_eq!(merged.semantic.exemplars, vec!["payroll data".to_string()]);
    assert!((merged.semantic.threshold - 0.55).abs() < f32::EPSILON);
}

#[test]
fn test_set_active_detectors_disable() {
    let mut config = DetectorConfig::load_default_detectors().unwrap();
    let before = config.detectors.len();
    config.set_active_detectors(&[], &["bank_account".to_string()]);
    assert_eq!(config.detectors.len(), before - 1);
    assert!(!config.detectors.iter().any(|d| d.name == "bank_account"));
}
