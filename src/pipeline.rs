//! Run orchestration.
//!
//! [`Pipeline::run_for`] runs every category parser in order and hands each
//! entry a parser produced to every sink in order, then logs one summary
//! line for the whole run:
//!
//! ```text
//! parsed: posts: 4 articles: 2 news: 1 in 3.412s
//! ```
//!
//! # Failure Handling
//!
//! - A parser error (fetch failure, cancellation, or a malformed record under
//!   [`RecordPolicy::Abort`](crate::scrapers::category::RecordPolicy)) ends
//!   the run. Entries of that category are not persisted.
//! - A sink error is logged and counted; the remaining sinks still receive
//!   the entry.

use chrono::NaiveDate;
use itertools::Itertools;
use std::fmt;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::PipelineError;
use crate::models::Category;
use crate::outputs::Sink;
use crate::scrapers::category::CategoryParser;
use crate::utils::millis;

/// Counts and timing for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Entries produced per category, in parser order.
    pub counts: Vec<(Category, usize)>,
    pub sink_failures: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self
            .counts
            .iter()
            .map(|(category, n)| format!("{category}: {n}"))
            .join(" ");
        f.write_str(&counts)
    }
}

/// Ordered category parsers fanned out to ordered sinks.
///
/// Built once at startup; [`Pipeline::run_for`] may be called repeatedly.
pub struct Pipeline {
    parsers: Vec<CategoryParser>,
    sinks: Vec<Box<dyn Sink>>,
}

impl Pipeline {
    /// Wire parsers to sinks.
    ///
    /// # Arguments
    /// * `parsers` - run in this order; normally posts, articles, news
    /// * `sinks` - every entry is offered to each sink in this order
    pub fn new(parsers: Vec<CategoryParser>, sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { parsers, sinks }
    }

    /// Run keeping only entries published on `today`.
    ///
    /// Each call is independent; only the configured parsers and sinks are
    /// shared between calls.
    ///
    /// # Returns
    /// Per-category counts and the number of failed sink writes, or the
    /// first [`PipelineError`] a parser gave up with.
    #[instrument(level = "info", skip_all, fields(%today))]
    pub async fn run_for(
        &self,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, PipelineError> {
        let start = Instant::now();
        let mut counts = Vec::with_capacity(self.parsers.len());
        let mut sink_failures = 0;

        for parser in &self.parsers {
            if cancel.is_cancelled() {
                warn!(category = %parser.category(), "Cancelled before category");
                return Err(PipelineError::Cancelled);
            }

            let batch = parser.run(today, cancel).await.inspect_err(|e| {
                error!(category = %parser.category(), error = %e, "Category failed; aborting run");
            })?;
            counts.push((batch.category, batch.entries.len()));

            for entry in &batch.entries {
                for sink in &self.sinks {
                    if let Err(e) = sink.add(entry).await {
                        sink_failures += 1;
                        error!(
                            sink = sink.name(),
                            entry_type = entry.type_name(),
                            author = %entry.author_link,
                            error = %e,
                            "Sink write failed"
                        );
                    }
                }
            }
        }

        let summary = RunSummary {
            counts,
            sink_failures,
            elapsed: start.elapsed(),
        };
        info!(
            total = summary.total(),
            sink_failures,
            elapsed_ms = millis(summary.elapsed),
            "parsed: {} in {:.3}s",
            summary,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }
}
