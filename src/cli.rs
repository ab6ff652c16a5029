//! Command-line interface definitions for flowsnap.
//!
//! Every option has a default, so running the binary with no arguments
//! snapshots posts, articles and news from the `admin` and `develop` flows
//! into `data.db` and `data/{DD-MM-YYYY}.csv`, logging to `info.log`.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

/// Command-line arguments for flowsnap.
///
/// # Examples
///
/// ```sh
/// # Default wiring
/// flowsnap
///
/// # Also keep full entries as JSON lines, and fail on malformed records
/// flowsnap --json-dir ./json --strict
///
/// # A single group from another locale
/// flowsnap --base-url https://habr.com/en --groups develop
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Locale root of the feed; listings live under `{base-url}/flows/`
    #[arg(long, default_value = "https://habr.com/ru")]
    pub base_url: Url,

    /// Flow groups queried for every category, in order
    #[arg(long, value_delimiter = ',', default_value = "admin,develop")]
    pub groups: Vec<String>,

    /// Directory for the daily CSV audit trail
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// SQLite database receiving full entries
    #[arg(long, default_value = "sqlite://data.db?mode=rwc")]
    pub database_url: String,

    /// Append-only log file
    #[arg(short, long, default_value = "info.log")]
    pub log_file: PathBuf,

    /// Optional directory for a daily JSON-lines file of full entries
    #[arg(short, long)]
    pub json_dir: Option<PathBuf>,

    /// Abort the run on the first malformed record instead of skipping it
    #[arg(long)]
    pub strict: bool,
}
