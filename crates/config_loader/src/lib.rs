//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse JSON/TOML configuration files
//! - Validate configuration legality
//! - Generate `TargetConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("config.json")).unwrap();
//! println!("Destination: {}", config.destination_path.display());
//! ```

mod parser;
mod validator;

pub use contracts::TargetConfig;
pub use parser::ConfigFormat;
pub use validator::validate;

use contracts::TargetError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.json / .toml).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<TargetConfig, TargetError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<TargetConfig, TargetError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize TargetConfig to JSON string
    pub fn to_json(config: &TargetConfig) -> Result<String, TargetError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| TargetError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, TargetError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            TargetError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            TargetError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, TargetError> {
        std::fs::read_to_string(path).map_err(|e| TargetError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Compression;

    const MINIMAL_JSON: &str = r#"{
        "destination_path": "/tmp",
        "destination_partition_path": "wow",
        "file_name": "a.parquet"
    }"#;

    #[test]
    fn test_load_from_str_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_JSON, ConfigFormat::Json).unwrap();
        assert_eq!(config.destination_partition_path.as_deref(), Some("wow"));
        assert_eq!(config.compression(), Compression::None);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_JSON, ConfigFormat::Json).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"{"destination_path": "/tmp", "file_name": "a/b.parquet"}"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Json);
        assert!(matches!(result, Err(TargetError::ConfigValidation { .. })));
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "destination_path = \"/tmp\"\ncompression_method = \"gzip\"\n")
            .unwrap();
        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.compression(), Compression::Gzip);
    }

    #[test]
    fn test_load_from_path_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "destination_path: /tmp\n").unwrap();
        let err = ConfigLoader::load_from_path(&path).unwrap_err().to_string();
        assert!(err.contains("unsupported config format"), "got: {err}");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ConfigLoader::load_from_path(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(TargetError::Io { .. })));
    }
}
