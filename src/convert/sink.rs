//! Dataset sinks: where emitted records go after an export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use image::ImageFormat;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::export::{ExportMode, ExportOutput, Record, Schema};

/// Environment variable holding the publish token.
pub const TOKEN_ENV: &str = "HF_TOKEN";

/// Access token for publishing a dataset.
#[derive(Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    /// Wrap an explicit token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Use `explicit` when given, else the `HF_TOKEN` environment variable.
    ///
    /// # Errors
    /// * `Error::Publish` if neither yields a non-empty token
    pub fn resolve(explicit: Option<String>) -> Result<Self> {
        explicit
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| {
                Error::Publish(format!(
                    "no token given; pass one explicitly or set {}",
                    TOKEN_ENV
                ))
            })
    }

    /// The raw token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("token", &"***").finish()
    }
}

/// Visibility of a published dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Receives the records of an export.
pub trait DatasetSink {
    /// Handle to the accepted dataset.
    type Handle: DatasetHandle;

    /// Take ownership of an export's records and schema.
    fn accept(&self, output: ExportOutput) -> Result<Self::Handle>;
}

/// A dataset held by a sink.
pub trait DatasetHandle {
    /// Number of records.
    fn len(&self) -> usize;

    /// Whether the dataset has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the dataset to a local directory.
    fn persist(&self, path: &Path) -> Result<()>;

    /// Publish the dataset under `repo_id` and return its URL.
    fn publish(
        &self,
        repo_id: &str,
        credentials: &Credentials,
        visibility: Visibility,
    ) -> Result<String>;
}

/// Sink keeping records in memory and persisting them as files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDatasetSink;

impl LocalDatasetSink {
    /// Create a new local sink.
    pub fn new() -> Self {
        Self
    }
}

impl DatasetSink for LocalDatasetSink {
    type Handle = LocalDataset;

    fn accept(&self, output: ExportOutput) -> Result<LocalDataset> {
        Ok(LocalDataset {
            mode: output.mode,
            schema: output.schema,
            records: output.records,
        })
    }
}

/// `dataset_info.json` contents.
#[derive(Debug, Serialize)]
struct DatasetInfo<'a> {
    mode: &'static str,
    schema: &'a Schema,
    num_records: usize,
    created_at: DateTime<Utc>,
}

/// Records accepted by a [`LocalDatasetSink`].
///
/// Persisted layout:
///
/// ```text
/// {path}/dataset_info.json
/// {path}/records.jsonl
/// {path}/images/000000.png
/// ```
#[derive(Debug, Clone)]
pub struct LocalDataset {
    mode: ExportMode,
    schema: Schema,
    records: Vec<Record>,
}

impl LocalDataset {
    /// The accepted records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The record schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn write_info(&self, path: &Path) -> Result<()> {
        let info = DatasetInfo {
            mode: self.mode.name(),
            schema: &self.schema,
            num_records: self.records.len(),
            created_at: Utc::now(),
        };
        let writer = BufWriter::new(File::create(path.join("dataset_info.json"))?);
        serde_json::to_writer_pretty(writer, &info)?;
        Ok(())
    }
}

impl DatasetHandle for LocalDataset {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn persist(&self, path: &Path) -> Result<()> {
        let images = path.join("images");
        fs::create_dir_all(&images)?;

        let mut lines = BufWriter::new(File::create(path.join("records.jsonl"))?);
        for (index, record) in self.records.iter().enumerate() {
            let relative = format!("images/{:06}.png", index);
            let image_path = path.join(&relative);
            record
                .image()
                .save_with_format(&image_path, ImageFormat::Png)
                .map_err(|source| Error::ImageWrite {
                    path: image_path.display().to_string(),
                    source,
                })?;

            let mut row = serde_json::to_value(record)?;
            if let serde_json::Value::Object(fields) = &mut row {
                fields.insert("image".into(), serde_json::Value::String(relative));
            }
            serde_json::to_writer(&mut lines, &row)?;
            lines.write_all(b"\n")?;
        }
        lines.flush()?;

        self.write_info(path)?;
        log::info!(
            "Saved {} records to {}",
            self.records.len(),
            path.display()
        );
        Ok(())
    }

    fn publish(
        &self,
        repo_id: &str,
        _credentials: &Credentials,
        _visibility: Visibility,
    ) -> Result<String> {
        Err(Error::Publish(format!(
            "local datasets cannot be published to {}; persist them and upload the directory",
            repo_id
        )))
    }
}
