//! Configuration loading integration tests
//!
//! YAML files on disk, environment overlays and validation.

#[cfg(test)]
mod tests {
    use coursedesk::config::{ENV_DATA_DIR, ENV_LOG_LEVEL, LogFormat};
    use coursedesk::{DeskConfig, DeskError, HttpBatchApi};
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_full_file() {
        let file = yaml_file(
            r#"
api:
  base_url: "https://academy.example.com/api"
  token: "file-token"
  timeout_secs: 10
refresh:
  auto_refresh: false
  interval_secs: 60
  focus_debounce_ms: 250
storage:
  data_dir: "/var/lib/coursedesk"
logging:
  level: "coursedesk=debug"
  format: json
"#,
        );

        let config = DeskConfig::from_file(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.token.as_deref(), Some("file-token"));
        assert_eq!(config.api.timeout().as_secs(), 10);
        assert!(!config.refresh.auto_refresh);
        assert_eq!(config.refresh.interval().as_secs(), 60);
        assert_eq!(config.refresh.focus_debounce().as_millis(), 250);
        assert_eq!(
            config.storage.lesson_store_path(),
            PathBuf::from("/var/lib/coursedesk/lessons.json")
        );
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(HttpBatchApi::new(&config.api).is_ok());
    }

    #[test]
    fn test_environment_beats_file() {
        let file = yaml_file("storage:\n  data_dir: from-file\nlogging:\n  level: info\n");
        let mut config = DeskConfig::from_file(file.path()).unwrap();

        let vars: HashMap<&str, &str> = [(ENV_DATA_DIR, "from-env"), (ENV_LOG_LEVEL, "warn")]
            .into_iter()
            .collect();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("from-env"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_file() {
        let err = DeskConfig::from_file("/nonexistent/coursedesk.yaml").unwrap_err();
        assert!(matches!(err, DeskError::Config(_)));
        assert!(err.to_string().contains("coursedesk.yaml"));
    }

    #[test]
    fn test_malformed_file() {
        let file = yaml_file("api: [this is, not, a map");
        let err = DeskConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, DeskError::Config(_)));
    }

    #[test]
    fn test_file_with_invalid_values_fails_validation() {
        let file = yaml_file("api:\n  base_url: \"http://localhost/api\"\n  timeout_secs: 0\n");
        let config = DeskConfig::from_file(file.path()).unwrap();
        assert!(config.validate().is_err());
        assert!(HttpBatchApi::new(&config.api).is_err());
    }
}
