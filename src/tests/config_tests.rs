use super::*;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = SigningConfig::default_config();
    assert_eq!(config.surface.height, 200);
    assert_eq!(config.surface.stroke_width, 2.0);
    assert!(!config.share.offline);
}

#[test]
fn test_default_config_validates() {
    let config = SigningConfig::default_config();
    assert!(config.validate().is_ok());
}

#[test]
fn test_embedded_document_matches_builtin_default() {
    let config = SigningConfig::default_config();
    assert_eq!(config.document.to_document(), Document::default());
}

#[test]
fn test_missing_sections_use_defaults() {
    let config: SigningConfig = serde_yaml::from_str("share:\n  offline: true\n").unwrap();
    assert!(config.share.offline);
    assert_eq!(config.share.base_url, "https://sign.example.com/s/");
    assert_eq!(config.surface.height, 200);
    assert_eq!(config.document.title, DEFAULT_TITLE);
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
document:
  title: "Lease Acknowledgment"
  body: "I received the keys."
surface:
  height: 160
  stroke_width: 3.5
share:
  base_url: "https://example.org/sign/"
receipt:
  timestamp_format: "%Y-%m-%d %H:%M"
"#;
    let config: SigningConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.document.title, "Lease Acknowledgment");
    assert_eq!(config.surface.height, 160);
    assert_eq!(config.surface.stroke_width, 3.5);
    assert_eq!(config.share.base_url, "https://example.org/sign/");
    assert_eq!(config.receipt.timestamp_format, "%Y-%m-%d %H:%M");
}

#[test]
fn test_validation_zero_height() {
    let config: SigningConfig = serde_yaml::from_str("surface:\n  height: 0\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_oversized_height() {
    let config: SigningConfig = serde_yaml::from_str("surface:\n  height: 8193\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("at most 8192"));

    let config: SigningConfig = serde_yaml::from_str("surface:\n  height: 8192\n").unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_non_positive_stroke_width() {
    let config: SigningConfig = serde_yaml::from_str("surface:\n  stroke_width: 0\n").unwrap();
    assert!(config.validate().is_err());

    let config: SigningConfig = serde_yaml::from_str("surface:\n  stroke_width: -1.5\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_empty_share_url() {
    let config: SigningConfig = serde_yaml::from_str("share:\n  base_url: \"  \"\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_surface_field_rejected() {
    let result: Result<SigningConfig, _> = serde_yaml::from_str("surface:\n  colour: red\n");
    assert!(result.is_err());
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "surface:\n  height: 120\n").unwrap();

    let config = SigningConfig::load(&path).unwrap();
    assert_eq!(config.surface.height, 120);
}

#[test]
fn test_load_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "surface:\n  height: 0\n").unwrap();
    assert!(SigningConfig::load(&path).is_err());

    assert!(SigningConfig::load(&dir.path().join("missing.yaml")).is_err());
}
