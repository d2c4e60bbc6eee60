//! # News Phrase Report
//!
//! Searches a news site for a phrase, optionally narrows the results to one
//! category, scrapes the result list, and writes a report with per-article
//! phrase counts and a currency-mention flag.
//!
//! ## Usage
//!
//! ```sh
//! news_phrase_report -c work_items/config.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Search**: open the site, submit the phrase, apply the category filter
//! 2. **Extract**: read titles, dates, descriptions and images into news items
//! 3. **Analyze**: count phrase occurrences and detect money amounts
//! 4. **Output**: save the report (and optionally the article images)

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analytics;
mod browser;
mod cli;
mod config;
mod error;
mod extract;
mod images;
mod models;
mod outputs;
mod pipeline;
mod search;
mod utils;

use browser::{ChromeBrowser, SnapshotBrowser};
use cli::Cli;
use outputs::sink::sink_for_path;
use utils::ensure_parent_writable;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_phrase_report starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = config::load_config(&args.config)?;
    if let Some(output) = args.output {
        config.file_path = output;
    }
    if args.headful {
        config.headless = false;
    }

    // Early check: fail before driving the browser if the report can't be written
    if let Err(e) = ensure_parent_writable(&config.file_path) {
        error!(
            path = %config.file_path.display(),
            error = %e,
            "Report directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let sink = sink_for_path(&config.file_path);
    let summary = match &args.snapshot {
        Some(path) => {
            let mut browser = SnapshotBrowser::from_file(path)?;
            pipeline::run(&mut browser, sink.as_ref(), &config).await?
        }
        None => {
            let mut browser = ChromeBrowser::launch(config.headless, config.wait_timeout()).await?;
            pipeline::run(&mut browser, sink.as_ref(), &config).await?
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        items = summary.items,
        report = %summary.report_path.display(),
        "Execution complete"
    );
    Ok(())
}
