//! Configuration loading through the public loader.

use std::path::PathBuf;
use telget::config::{ConfigLoader, TelgetConfig};
use tempfile::TempDir;

#[test]
fn test_serialized_config_loads_back() {
    let temp = TempDir::new().unwrap();
    let mut config = TelgetConfig::default();
    config.provider.base_url = "http://localhost:8000/v1".to_string();
    config.cache.path = PathBuf::from("/var/cache/telget");
    config.output.dir = PathBuf::from("exports");
    config.logging.level = "info".to_string();
    config
        .logging
        .modules
        .insert("telget::provider".to_string(), "debug".to_string());

    let path = temp.path().join("telget.toml");
    std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(loaded.provider.base_url, "http://localhost:8000/v1");
    assert_eq!(loaded.cache.path, PathBuf::from("/var/cache/telget"));
    assert_eq!(loaded.output.dir, PathBuf::from("exports"));
    assert_eq!(loaded.logging.level, "info");
    assert_eq!(
        loaded.logging.modules.get("telget::provider").map(String::as_str),
        Some("debug")
    );
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_empty_workspace_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = ConfigLoader::load(temp.path()).unwrap();
    assert_eq!(config.output.dir, PathBuf::from("."));
    assert_eq!(config.logging.level, "warn");
}
