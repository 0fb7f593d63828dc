//! TargetConfig - Config Loader output
//!
//! Describes where flushed streams land and how they are encoded.

use std::fmt;
use std::path::PathBuf;

use serde::{de, Deserialize, Deserializer, Serialize};

/// Complete target configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Root directory; every stream gets its own subdirectory
    pub destination_path: PathBuf,

    /// Optional subpath below each stream directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_partition_path: Option<String>,

    /// Fixed file name; a unique name is generated per flush when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Codec passed to the file writer (also selects the file suffix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_method: Option<Compression>,

    /// Disable the anonymous usage notification
    #[serde(default)]
    pub disable_collection: bool,

    /// Flatten nested records before buffering
    #[serde(default)]
    pub flatten_records: bool,

    /// Key separator used when flattening
    #[serde(default = "default_flatten_separator")]
    pub flatten_separator: String,
}

fn default_flatten_separator() -> String {
    "__".to_string()
}

impl TargetConfig {
    /// Config writing under `destination_path` with every option at its default
    pub fn new(destination_path: impl Into<PathBuf>) -> Self {
        Self {
            destination_path: destination_path.into(),
            destination_partition_path: None,
            file_name: None,
            compression_method: None,
            disable_collection: false,
            flatten_records: false,
            flatten_separator: default_flatten_separator(),
        }
    }

    /// Effective compression method
    pub fn compression(&self) -> Compression {
        self.compression_method.unwrap_or_default()
    }
}

/// Compression method
///
/// Deserialized through [`Compression::from_name`], so config files and CLI
/// flags accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Bz2,
    Zip,
    Xz,
}

impl Compression {
    /// Parse a method name as it appears in config / CLI
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "gzip" => Some(Self::Gzip),
            "bz2" => Some(Self::Bz2),
            "zip" => Some(Self::Zip),
            "xz" => Some(Self::Xz),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bz2 => "bz2",
            Self::Zip => "zip",
            Self::Xz => "xz",
        }
    }

    /// Suffix appended to the file name
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gzip => Some(".gz"),
            Self::Bz2 => Some(".bz2"),
            Self::Zip => Some(".zip"),
            Self::Xz => Some(".xz"),
        }
    }
}

impl<'de> Deserialize<'de> for Compression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| de::Error::unknown_variant(&name, &["none", "gzip", "bz2", "zip", "xz"]))
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
