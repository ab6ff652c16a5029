//! Persistence targets for snapshot entries.
//!
//! Every sink implements [`Sink`], the uniform "store one entry" contract.
//! The pipeline hands each entry to every configured sink in order.
//!
//! # Submodules
//!
//! - [`csv`]: lossy, append-only audit trail (`data/{DD-MM-YYYY}.csv`)
//! - [`sql`]: full entries in one SQLite table per entry type
//! - [`json`]: full entries as JSON lines (`{dir}/{YYYY-MM-DD}.jsonl`)
//!
//! # Output Structure
//!
//! ```text
//! data/
//! └── 15-10-2026.csv         # date,type,author_link,author_name,tags
//! data.db                    # tables Post, Article, News
//! json_dir/
//! └── 2026-10-15.jsonl       # one serialized Entry per line
//! ```

use async_trait::async_trait;

use crate::error::SinkWriteError;
use crate::models::Entry;

pub mod csv;
pub mod json;
pub mod sql;

/// A persistence target that stores one entry per call.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn add(&self, entry: &Entry) -> Result<(), SinkWriteError>;
}
