//! Save a [`Worksheet`] as an Excel workbook.
//!
//! Cells keep their types: text as strings, counts as numbers and the money
//! flag as a real boolean. Worksheet coordinates are 1-based; the workbook's
//! are 0-based.

use super::report::Worksheet;
use super::sink::ReportSink;
use crate::error::{Error, Result};
use crate::models::CellValue;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::Path;
use tracing::{error, info, instrument};

const SHEET_NAME: &str = "News";

#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSink;

impl ReportSink for XlsxSink {
    #[instrument(level = "info", skip_all, fields(path = %path.display(), rows = sheet.max_row()))]
    fn save(&self, sheet: &Worksheet, path: &Path) -> Result<()> {
        write_xlsx(sheet, path).map_err(|e| {
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

fn write_xlsx(sheet: &Worksheet, path: &Path) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let out = workbook.add_worksheet();
    out.set_name(SHEET_NAME)?;

    for (row, col, value) in sheet.cells() {
        let (row, col) = (row - 1, col - 1);
        match value {
            CellValue::Text(s) => out.write_string(row, col, s)?,
            CellValue::Integer(n) => out.write_number(row, col, *n as f64)?,
            CellValue::Bool(b) => out.write_boolean(row, col, *b)?,
        };
    }

    workbook.save(path)?;
    Ok(())
}
