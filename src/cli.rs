//! Command-line interface definitions.
//!
//! Most settings live in the JSON configuration file; the flags here pick
//! that file and override a few run-level options.

use clap::Parser;
use std::path::PathBuf;

/// Search a news site for a phrase and write a report of the results.
///
/// # Examples
///
/// ```sh
/// # Live run with the default config location
/// news_phrase_report
///
/// # Replay a saved results page and write elsewhere
/// news_phrase_report -c work_items/config.json --snapshot results.html -o out/report.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, env = "NEWS_REPORT_CONFIG", default_value = "work_items/config.json")]
    pub config: PathBuf,

    /// Report output path (overrides `file_path` from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read results from a saved HTML page instead of launching Chrome
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,
}
