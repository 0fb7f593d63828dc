//! # Integration Tests
//!
//! End-to-end tests across the workspace crates.
//!
//! Covers:
//! - Config file -> output layout
//! - stdin-style input -> Driver -> ParquetSink -> files read back from disk
//! - Flush counts and paths with the recording sink

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::OutputLayout;
    use std::path::Path;

    #[test]
    fn test_config_drives_output_path() {
        let config = ConfigLoader::load_from_str(
            r#"{
                "destination_path": "/tmp",
                "destination_partition_path": "wow",
                "file_name": "a.parquet",
                "compression_method": "gzip"
            }"#,
            ConfigFormat::Json,
        )
        .unwrap();

        let layout = OutputLayout::from_config(&config);
        assert_eq!(
            layout.path_for("my_stream"),
            Path::new("/tmp/my_stream/wow/a.parquet.gz")
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs::File;
    use std::path::{Path, PathBuf};

    use arrow::array::{Array, Int64Array, StringArray};
    use arrow::record_batch::RecordBatch;
    use contracts::{Compression, TargetConfig, TargetError};
    use dispatcher::{
        BatchSink, Dispatcher, Driver, OutputLayout, ParquetSink, RecordingSink, RunSummary,
    };
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    const SCHEMA_TYPED: &str = r#"{"type": "SCHEMA", "stream": "my_stream", "schema": {"properties": {"name": {"type": "string"}, "age": {"type": "integer"}}}, "key_properties": []}"#;
    const SCHEMA_EMPTY: &str = r#"{"type": "SCHEMA", "stream": "my_stream", "schema": {}}"#;
    const SCHEMA_YOUR: &str = r#"{"type": "SCHEMA", "stream": "your_stream", "schema": {}}"#;
    const RECORD_KYRIE: &str =
        r#"{"type": "RECORD", "stream": "my_stream", "record": {"name": "kyrie", "age": 10}}"#;
    const RECORD_PAUL: &str =
        r#"{"type": "RECORD", "stream": "my_stream", "record": {"name": "paul", "age": 20}}"#;
    const RECORD_YOUR: &str =
        r#"{"type": "RECORD", "stream": "your_stream", "record": {"name": "lebron", "age": 39}}"#;

    fn input(lines: &[&str]) -> String {
        lines.iter().map(|l| format!("{l}\n")).collect()
    }

    async fn run<S: BatchSink>(
        sink: S,
        config: &TargetConfig,
        lines: &[&str],
    ) -> (Result<RunSummary, TargetError>, String) {
        let driver = Driver::new(Dispatcher::new(sink, OutputLayout::from_config(config)));
        let input = input(lines);
        let mut output = Vec::new();
        let result = driver.run(input.as_bytes(), &mut output).await;
        (result, String::from_utf8(output).unwrap())
    }

    fn config(root: &Path) -> TargetConfig {
        let mut config = TargetConfig::new(root);
        config.file_name = Some("a.parquet".into());
        config
    }

    fn parquet_files(dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    files.extend(parquet_files(&path));
                } else {
                    files.push(path);
                }
            }
        }
        files.sort();
        files
    }

    fn read_back(path: &Path) -> RecordBatch {
        let file = File::open(path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        arrow::compute::concat_batches(&batches[0].schema(), &batches).unwrap()
    }

    fn strings<'a>(batch: &'a RecordBatch, name: &str) -> &'a StringArray {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
    }

    fn ints<'a>(batch: &'a RecordBatch, name: &str) -> &'a Int64Array {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap()
    }

    /// Typed schema: values read back with their declared types
    #[tokio::test]
    async fn test_round_trip_typed_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let (result, _) = run(
            ParquetSink::default(),
            &config,
            &[SCHEMA_TYPED, RECORD_KYRIE],
        )
        .await;
        result.unwrap();

        let path = dir.path().join("my_stream").join("a.parquet");
        let batch = read_back(&path);
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(strings(&batch, "name").value(0), "kyrie");
        assert_eq!(ints(&batch, "age").value(0), 10);
    }

    /// Empty schema: column types are inferred from the values
    #[tokio::test]
    async fn test_round_trip_empty_schema() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.destination_partition_path = Some("wow".into());

        let (result, _) = run(
            ParquetSink::default(),
            &config,
            &[SCHEMA_EMPTY, RECORD_KYRIE, RECORD_PAUL],
        )
        .await;
        let summary = result.unwrap();

        let path = dir.path().join("my_stream").join("wow").join("a.parquet");
        assert_eq!(parquet_files(dir.path()), vec![path.clone()]);

        let batch = read_back(&path);
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(strings(&batch, "name").value(1), "paul");
        assert_eq!(ints(&batch, "age").values().to_vec(), vec![10, 20]);
        assert_eq!(summary.stats.rows_written, 2);
    }

    #[tokio::test]
    async fn test_two_streams_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let (result, _) = run(
            ParquetSink::default(),
            &config,
            &[
                SCHEMA_EMPTY,
                RECORD_KYRIE,
                RECORD_PAUL,
                SCHEMA_YOUR,
                RECORD_YOUR,
                RECORD_YOUR,
            ],
        )
        .await;
        result.unwrap();

        let my = dir.path().join("my_stream").join("a.parquet");
        let your = dir.path().join("your_stream").join("a.parquet");
        assert_eq!(parquet_files(dir.path()), vec![my.clone(), your.clone()]);
        assert_eq!(read_back(&my).num_rows(), 2);
        assert_eq!(read_back(&your).num_rows(), 2);
    }

    /// A fixed file name means the second activation of a stream replaces its first file
    #[tokio::test]
    async fn test_reactivated_stream_overwrites_fixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let (result, _) = run(
            ParquetSink::default(),
            &config,
            &[
                SCHEMA_EMPTY,
                RECORD_KYRIE,
                RECORD_PAUL,
                SCHEMA_YOUR,
                RECORD_YOUR,
                SCHEMA_EMPTY,
                RECORD_PAUL,
            ],
        )
        .await;
        let summary = result.unwrap();

        let my = dir.path().join("my_stream").join("a.parquet");
        let your = dir.path().join("your_stream").join("a.parquet");
        assert_eq!(parquet_files(dir.path()), vec![my.clone(), your]);
        assert_eq!(summary.stats.flushes, 3);
        assert_eq!(summary.stats.files_written, 3);

        let batch = read_back(&my);
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(strings(&batch, "name").value(0), "paul");
    }

    #[tokio::test]
    async fn test_record_before_schema_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let sink = RecordingSink::new();

        let (result, output) = run(sink.clone(), &config, &[RECORD_KYRIE, RECORD_PAUL]).await;

        assert!(matches!(result, Err(TargetError::RecordBeforeSchema { .. })));
        assert!(sink.batches().is_empty());
        assert!(output.is_empty());
        assert!(parquet_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream_produces_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let (result, _) = run(
            ParquetSink::default(),
            &config,
            &[SCHEMA_YOUR, SCHEMA_EMPTY, RECORD_KYRIE],
        )
        .await;
        let summary = result.unwrap();

        assert_eq!(summary.stats.flushes, 2);
        assert_eq!(summary.stats.files_written, 1);
        assert_eq!(
            parquet_files(dir.path()),
            vec![dir.path().join("my_stream").join("a.parquet")]
        );
    }

    #[tokio::test]
    async fn test_checkpoint_written_after_flush() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());

        let (result, output) = run(
            ParquetSink::default(),
            &config,
            &[
                r#"{"type": "STATE", "value": {"bookmarks": {"my_stream": 1}}}"#,
                SCHEMA_EMPTY,
                RECORD_KYRIE,
                r#"{"type": "STATE", "value": {"bookmarks": {"my_stream": 2}}}"#,
                RECORD_PAUL,
            ],
        )
        .await;
        result.unwrap();

        assert_eq!(output, "{\"bookmarks\":{\"my_stream\":2}}\n");
        assert!(dir.path().join("my_stream").join("a.parquet").exists());
    }

    #[tokio::test]
    async fn test_gzip_suffix_and_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TargetConfig::new(dir.path());
        config.compression_method = Some(Compression::Gzip);

        let (result, _) = run(
            ParquetSink::default(),
            &config,
            &[SCHEMA_EMPTY, RECORD_KYRIE, SCHEMA_YOUR, RECORD_YOUR],
        )
        .await;
        result.unwrap();

        let files = parquet_files(dir.path());
        assert_eq!(files.len(), 2);
        for file in &files {
            let name = file.file_name().unwrap().to_str().unwrap();
            assert!(name.ends_with(".parquet.gz"), "got: {name}");
            assert_eq!(read_back(file).num_rows(), 1);
        }
    }

    #[tokio::test]
    async fn test_unsupported_codec_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.compression_method = Some(Compression::Zip);

        let (result, output) = run(
            ParquetSink::default(),
            &config,
            &[
                SCHEMA_EMPTY,
                RECORD_KYRIE,
                r#"{"type": "STATE", "value": 1}"#,
            ],
        )
        .await;

        assert!(matches!(
            result,
            Err(TargetError::CompressionUnsupported { .. })
        ));
        assert!(output.is_empty());
        assert!(parquet_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_flatten_transform_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let dispatcher = Dispatcher::new(ParquetSink::default(), OutputLayout::from_config(&config))
            .with_transform(Box::new(columnar::Flatten::default()));
        let input = input(&[
            SCHEMA_EMPTY,
            r#"{"type": "RECORD", "stream": "my_stream", "record": {"player": {"name": "kyrie", "tags": ["pg", "sg"]}}}"#,
        ]);
        let mut output = Vec::new();

        Driver::new(dispatcher)
            .run(input.as_bytes(), &mut output)
            .await
            .unwrap();

        let batch = read_back(&dir.path().join("my_stream").join("a.parquet"));
        assert_eq!(strings(&batch, "player__name").value(0), "kyrie");
        assert_eq!(strings(&batch, "player__tags").value(0), r#"["pg","sg"]"#);
    }
}
