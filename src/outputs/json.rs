//! JSON-lines output.
//!
//! Appends every entry, with all of its fields, as one JSON object per line
//! to `{dir}/{YYYY-MM-DD}.jsonl`. Enabled with `--json-dir`.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::Sink;
use crate::error::SinkWriteError;
use crate::models::Entry;
use crate::utils::{append_line, ensure_writable_dir};

#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub async fn for_date(dir: impl AsRef<Path>, date: NaiveDate) -> Result<Self, SinkWriteError> {
        let dir = dir.as_ref();
        ensure_writable_dir(dir)
            .await
            .map_err(|source| SinkWriteError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: dir.join(format!("{date}.jsonl")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for JsonLinesSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn add(&self, entry: &Entry) -> Result<(), SinkWriteError> {
        let json = serde_json::to_string(entry)?;
        append_line(&self.path, &json)
            .await
            .map_err(|source| SinkWriteError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(entry_type = entry.type_name(), bytes = json.len(), "Appended JSON line");
        Ok(())
    }
}
