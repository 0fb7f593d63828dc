//! Config parsing
//!
//! JSON is the conventional format for target configs; TOML is accepted too.

use contracts::{TargetConfig, TargetError};

/// Config file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (conventional)
    Json,
    /// TOML format
    Toml,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse JSON config
pub fn parse_json(content: &str) -> Result<TargetConfig, TargetError> {
    serde_json::from_str(content).map_err(|e| TargetError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse TOML config
pub fn parse_toml(content: &str) -> Result<TargetConfig, TargetError> {
    toml::from_str(content).map_err(|e| TargetError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse config according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<TargetConfig, TargetError> {
    match format {
        ConfigFormat::Json => parse_json(content),
        ConfigFormat::Toml => parse_toml(content),
    }
}
