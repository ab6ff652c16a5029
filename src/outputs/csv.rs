//! Flat-file audit trail.
//!
//! One comma-joined line per entry, appended to a file named after the run
//! day: `{dir}/{DD-MM-YYYY}.csv`. Only `date,type,author_link,author_name,tags`
//! are written. Descriptions and heading fields are left to the relational
//! sink. There is no header row and no escaping of embedded commas.
//!
//! The file is opened and closed on every [`Sink::add`] call.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::Sink;
use crate::error::SinkWriteError;
use crate::models::Entry;
use crate::utils::{append_line, ensure_writable_dir};

#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Sink writing to `{dir}/{DD-MM-YYYY}.csv` for `date`.
    ///
    /// Creates `dir` if it does not exist and checks that it is writable.
    pub async fn for_date(dir: impl AsRef<Path>, date: NaiveDate) -> Result<Self, SinkWriteError> {
        let dir = dir.as_ref();
        ensure_writable_dir(dir)
            .await
            .map_err(|source| SinkWriteError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: dir.join(format!("{}.csv", date.format("%d-%m-%Y"))),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The audit line for `entry`, without the trailing newline.
    pub fn line(entry: &Entry) -> String {
        format!(
            "{},{},{},{},{}",
            entry.date,
            entry.type_name(),
            entry.author_link,
            entry.author_name,
            entry.tags
        )
    }
}

#[async_trait]
impl Sink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    #[instrument(level = "debug", skip_all, fields(path = %self.path.display()))]
    async fn add(&self, entry: &Entry) -> Result<(), SinkWriteError> {
        append_line(&self.path, &Self::line(entry))
            .await
            .map_err(|source| SinkWriteError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(entry_type = entry.type_name(), "Appended audit line");
        Ok(())
    }
}
