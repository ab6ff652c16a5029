//! # flowsnap
//!
//! Takes a daily snapshot of a publishing platform's flows: fetches the
//! posts, articles and news listings of each configured group, keeps the
//! items published today, and stores them in every configured sink.
//!
//! ## Usage
//!
//! ```sh
//! flowsnap
//! flowsnap --json-dir ./json --strict
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one shared HTTP client requests
//!    `{base}/flows/{group}/{category}` for every group
//! 2. **Parsing**: each `<article>` record is dated first; only today's
//!    records have their remaining fields extracted
//! 3. **Output**: every entry goes to the SQLite tables, the CSV audit
//!    trail, and optionally a JSON-lines file
//!
//! Everything runs sequentially on a single-threaded runtime. Ctrl-C stops
//! the run before the next group is fetched.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod fetch;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
#[cfg(test)]
mod testing;
mod utils;

use cli::Cli;
use fetch::HttpFetcher;
use models::Category;
use outputs::Sink;
use outputs::csv::CsvSink;
use outputs::json::JsonLinesSink;
use outputs::sql::SqlSink;
use pipeline::Pipeline;
use scrapers::category::{CategoryParser, FeedSource, RecordPolicy};

/// Send every event to the append-only log file.
fn init_tracing(log_file: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_tracing(&args.log_file)?;

    let start_time = std::time::Instant::now();
    info!("flowsnap starting up");
    debug!(?args, "Parsed CLI arguments");

    let today = Local::now().date_naive();

    // --- Shared feed configuration ---
    let source = Arc::new(FeedSource {
        base_url: args.base_url.clone(),
        groups: args.groups.clone(),
        fetcher: Arc::new(HttpFetcher::new()?),
        on_record_error: if args.strict {
            RecordPolicy::Abort
        } else {
            RecordPolicy::Skip
        },
    });
    let parsers = Category::ALL
        .into_iter()
        .map(|category| CategoryParser::new(category, Arc::clone(&source)))
        .collect();

    // --- Sinks, in write order ---
    let csv = CsvSink::for_date(&args.data_dir, today).await?;
    info!(path = %csv.path().display(), "CSV audit trail ready");
    let mut sinks: Vec<Box<dyn Sink>> = vec![
        Box::new(SqlSink::connect(&args.database_url).await?),
        Box::new(csv),
    ];
    if let Some(dir) = &args.json_dir {
        let json = JsonLinesSink::for_date(dir, today).await?;
        info!(path = %json.path().display(), "JSON-lines output ready");
        sinks.push(Box::new(json));
    }
    info!(
        sinks = %sinks.iter().map(|s| s.name()).collect::<Vec<_>>().join(","),
        groups = %args.groups.join(","),
        %today,
        "Pipeline configured"
    );

    // --- Cooperative cancellation on Ctrl-C ---
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; stopping before the next group");
                cancel.cancel();
            }
        }
    });

    let pipeline = Pipeline::new(parsers, sinks);
    let summary = pipeline.run_for(today, &cancel).await.inspect_err(|e| {
        error!(error = %e, "Run failed");
    })?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        entries = summary.total(),
        sink_failures = summary.sink_failures,
        "Execution complete"
    );
    Ok(())
}
