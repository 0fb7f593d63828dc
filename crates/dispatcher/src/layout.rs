//! Output path construction
//!
//! `root/<stream>[/<partition>]/<file_name | uuid.parquet>[<codec suffix>]`

use std::path::PathBuf;

use contracts::{Compression, TargetConfig};
use uuid::Uuid;

/// Resolves the destination file of each flush
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    root: PathBuf,
    partition: Option<String>,
    file_name: Option<String>,
    compression: Compression,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            partition: None,
            file_name: None,
            compression: Compression::None,
        }
    }

    pub fn from_config(config: &TargetConfig) -> Self {
        Self::new(config.destination_path.clone())
            .with_partition(config.destination_partition_path.clone())
            .with_file_name(config.file_name.clone())
            .with_compression(config.compression())
    }

    /// Empty partitions are dropped, a leading `/` is ignored
    pub fn with_partition(mut self, partition: Option<String>) -> Self {
        self.partition = partition
            .map(|p| p.trim_start_matches('/').to_string())
            .filter(|p| !p.is_empty());
        self
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name.filter(|f| !f.is_empty());
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Destination file for the next flush of `stream`
    ///
    /// Without a fixed file name every call yields a fresh name.
    pub fn path_for(&self, stream: &str) -> PathBuf {
        let mut dir = self.root.join(stream);
        if let Some(partition) = &self.partition {
            dir.push(partition);
        }

        let mut file_name = match &self.file_name {
            Some(name) => name.clone(),
            None => format!("{}.parquet", Uuid::new_v4()),
        };
        if let Some(ext) = self.compression.extension() {
            file_name.push_str(ext);
        }

        dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_full_path() {
        let mut config = TargetConfig::new("/tmp");
        config.destination_partition_path = Some("wow".into());
        config.file_name = Some("a.parquet".into());
        let layout = OutputLayout::from_config(&config);

        assert_eq!(
            layout.path_for("my_stream"),
            Path::new("/tmp/my_stream/wow/a.parquet")
        );
    }

    #[test]
    fn test_empty_partition_is_omitted() {
        let layout = OutputLayout::new("/tmp")
            .with_partition(Some(String::new()))
            .with_file_name(Some("a.parquet".into()));
        assert_eq!(layout.path_for("s"), Path::new("/tmp/s/a.parquet"));
    }

    #[test]
    fn test_leading_slash_partition() {
        let layout = OutputLayout::new("/out")
            .with_partition(Some("/year=2024/month=01".into()))
            .with_file_name(Some("a.parquet".into()));
        assert_eq!(
            layout.path_for("s"),
            Path::new("/out/s/year=2024/month=01/a.parquet")
        );
    }

    #[test]
    fn test_generated_names_are_unique() {
        let layout = OutputLayout::new("/tmp");
        let first = layout.path_for("s");
        let second = layout.path_for("s");

        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(Path::new("/tmp/s")));
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("parquet"));
    }

    #[test]
    fn test_compression_suffix() {
        let layout = OutputLayout::new("/tmp")
            .with_file_name(Some("a.parquet".into()))
            .with_compression(Compression::Gzip);
        assert_eq!(layout.path_for("s"), Path::new("/tmp/s/a.parquet.gz"));

        let layout = layout.with_compression(Compression::Xz);
        assert_eq!(layout.path_for("s"), Path::new("/tmp/s/a.parquet.xz"));
    }
}
