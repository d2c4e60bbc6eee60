//! Persist a finished [`Worksheet`].
//!
//! A sink only borrows the worksheet. A failed save leaves the data with
//! the caller, who can retry with another path without scraping again.
//!
//! | Extension | Sink |
//! |-----------|------|
//! | `.xlsx` | [`XlsxSink`]: typed cells (text, number, boolean) |
//! | anything else | [`CsvSink`] |

use super::report::Worksheet;
pub use super::xlsx::XlsxSink;
use crate::error::{Error, Result};
use csv::{Terminator, WriterBuilder};
use std::path::Path;
use tracing::{error, info, instrument};

/// Anything that can store a worksheet at a path.
pub trait ReportSink {
    fn save(&self, sheet: &Worksheet, path: &Path) -> Result<()>;
}

/// Pick the sink matching the report file's extension.
pub fn sink_for_path(path: &Path) -> Box<dyn ReportSink> {
    let is_xlsx = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        Box::new(XlsxSink)
    } else {
        Box::new(CsvSink)
    }
}

/// Writes the worksheet as comma-separated rows, header first.
///
/// Empty cells become empty fields; booleans are written `TRUE`/`FALSE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSink;

impl ReportSink for CsvSink {
    #[instrument(level = "info", skip_all, fields(path = %path.display(), rows = sheet.max_row()))]
    fn save(&self, sheet: &Worksheet, path: &Path) -> Result<()> {
        write_csv(sheet, path).map_err(|e| {
            error!(error = %e, "Failed to save report");
            Error::Persistence {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        info!("Report saved");
        Ok(())
    }
}

fn write_csv(sheet: &Worksheet, path: &Path) -> std::result::Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)?;
    for row in sheet.rows() {
        let record: Vec<String> = row
            .into_iter()
            .map(|cell| cell.map(ToString::to_string).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
