//! In-memory worksheet and the aggregator that fills it.
//!
//! The aggregator writes one row per [`NewsItem`] below a fixed header row.
//! The two computed columns merge rather than overwrite, so a row can be
//! fed evidence in several passes:
//!
//! - **Count** adds to whatever the cell already holds
//! - **Has Money Format** is sticky: once true it stays true
//!
//! Both merges are order-independent.

use crate::models::{
    CellValue, NewsItem, ReportRow, COL_COUNT, COL_DATE, COL_DESCRIPTION, COL_HAS_MONEY,
    COL_IMAGE_NAME, COL_TITLE, REPORT_HEADERS,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Header occupies row 1; data starts at row 2.
pub const FIRST_DATA_ROW: u32 = 2;

/// A sparse grid of typed cells, 1-based like a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    cells: BTreeMap<u32, BTreeMap<u16, CellValue>>,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, row: u32, column: u16, value: CellValue) {
        self.cells.entry(row).or_default().insert(column, value);
    }

    pub fn cell(&self, row: u32, column: u16) -> Option<&CellValue> {
        self.cells.get(&row).and_then(|r| r.get(&column))
    }

    /// Every written cell as `(row, column, value)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.cells
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, value)| (row, col, value)))
    }

    /// Highest row index written so far, 0 when empty.
    pub fn max_row(&self) -> u32 {
        self.cells.keys().next_back().copied().unwrap_or(0)
    }

    /// Highest column index written so far, 0 when empty.
    pub fn max_column(&self) -> u16 {
        self.cells
            .values()
            .filter_map(|r| r.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    /// Every row from 1 to [`max_row`](Self::max_row), padded to
    /// [`max_column`](Self::max_column) with `None` for empty cells.
    pub fn rows(&self) -> Vec<Vec<Option<&CellValue>>> {
        let width = self.max_column();
        (1..=self.max_row())
            .map(|row| (1..=width).map(|col| self.cell(row, col)).collect())
            .collect()
    }
}

/// Per-row analytics contribution from one pass over some of the row's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evidence {
    pub count: usize,
    pub has_money_format: bool,
}

impl From<&ReportRow> for Evidence {
    fn from(row: &ReportRow) -> Self {
        Self {
            count: row.count,
            has_money_format: row.has_money_format,
        }
    }
}

/// Builds the report worksheet for one search phrase.
#[derive(Debug)]
pub struct ReportAggregator {
    search_phrase: String,
    sheet: Worksheet,
}

impl ReportAggregator {
    /// Start a report; the header row is written immediately.
    pub fn new(search_phrase: impl Into<String>) -> Self {
        let mut sheet = Worksheet::new();
        for (col, head) in (1u16..).zip(REPORT_HEADERS) {
            sheet.write(1, col, CellValue::from(head));
        }
        Self {
            search_phrase: search_phrase.into(),
            sheet,
        }
    }

    pub fn sheet(&self) -> &Worksheet {
        &self.sheet
    }

    /// Write every item, in order, starting at [`FIRST_DATA_ROW`].
    #[instrument(level = "info", skip_all, fields(phrase = %self.search_phrase, items = items.len()))]
    pub fn write_items(&mut self, items: &[NewsItem]) {
        for (row, item) in (FIRST_DATA_ROW..).zip(items) {
            self.write_item(row, item);
        }
        info!(rows = items.len(), "Report rows written");
    }

    /// Write one item's verbatim columns and merge its computed columns.
    ///
    /// Count and money flag come from title and description together.
    pub fn write_item(&mut self, row: u32, item: &NewsItem) -> ReportRow {
        let report_row = ReportRow::compute(item, &self.search_phrase);

        self.sheet.write(row, COL_TITLE, CellValue::Text(report_row.title.clone()));
        self.sheet.write(row, COL_DATE, CellValue::Text(report_row.date.clone()));
        self.sheet
            .write(row, COL_DESCRIPTION, CellValue::Text(report_row.description.clone()));
        self.sheet
            .write(row, COL_IMAGE_NAME, CellValue::Text(report_row.image_name.clone()));
        self.record_evidence(row, Evidence::from(&report_row));

        debug!(
            row,
            count = report_row.count,
            has_money_format = report_row.has_money_format,
            "Wrote report row"
        );
        report_row
    }

    /// Merge a partial contribution into a row's computed columns.
    pub fn record_evidence(&mut self, row: u32, evidence: Evidence) {
        self.accumulate_count(row, evidence.count);
        self.merge_money_flag(row, evidence.has_money_format);
    }

    fn accumulate_count(&mut self, row: u32, count: usize) {
        let existing = match self.sheet.cell(row, COL_COUNT) {
            Some(CellValue::Integer(n)) => *n,
            _ => 0,
        };
        let total = existing.saturating_add(i64::try_from(count).unwrap_or(i64::MAX));
        self.sheet.write(row, COL_COUNT, CellValue::Integer(total));
    }

    fn merge_money_flag(&mut self, row: u32, found: bool) {
        let already = matches!(self.sheet.cell(row, COL_HAS_MONEY), Some(CellValue::Bool(true)));
        self.sheet
            .write(row, COL_HAS_MONEY, CellValue::Bool(already || found));
    }

    /// Hand over the finished worksheet.
    pub fn finish(self) -> Worksheet {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str) -> NewsItem {
        NewsItem::new(title, "Oct 1, 2026", description, "https://cdn.test/i/pic.jpg")
    }

    #[test]
    fn test_header_row() {
        let agg = ReportAggregator::new("time");
        let sheet = agg.sheet();
        let header: Vec<String> = (1..=6)
            .map(|c| sheet.cell(1, c).unwrap().to_string())
            .collect();
        assert_eq!(
            header,
            vec!["Title", "Date", "Description", "Image Name", "Count", "Has Money Format"]
        );
    }

    #[test]
    fn test_three_items_end_to_end() {
        let items = vec![
            item("Calm morning", "Nothing to report"),
            item("Time after time", "Tickets cost $50"),
            item("Last one", "Worth 10 USD"),
        ];
        let mut agg = ReportAggregator::new("time");
        agg.write_items(&items);
        let sheet = agg.finish();

        assert_eq!(sheet.max_row(), 4);
        assert_eq!(sheet.cell(3, COL_TITLE), Some(&CellValue::from("Time after time")));
        assert_eq!(sheet.cell(3, COL_COUNT), Some(&CellValue::Integer(2)));
        assert_eq!(sheet.cell(3, COL_HAS_MONEY), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.cell(2, COL_COUNT), Some(&CellValue::Integer(0)));
        assert_eq!(sheet.cell(2, COL_HAS_MONEY), Some(&CellValue::Bool(false)));
        assert_eq!(sheet.cell(4, COL_HAS_MONEY), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.cell(4, COL_IMAGE_NAME), Some(&CellValue::from("pic.jpg")));
    }

    #[test]
    fn test_money_flag_is_order_independent() {
        let title = Evidence { count: 0, has_money_format: true };
        let description = Evidence { count: 0, has_money_format: false };

        let mut forward = ReportAggregator::new("x");
        forward.record_evidence(2, title);
        forward.record_evidence(2, description);

        let mut backward = ReportAggregator::new("x");
        backward.record_evidence(2, description);
        backward.record_evidence(2, title);

        assert_eq!(forward.sheet().cell(2, COL_HAS_MONEY), Some(&CellValue::Bool(true)));
        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_count_accumulation_is_order_independent() {
        let title = Evidence { count: 2, has_money_format: false };
        let description = Evidence { count: 3, has_money_format: false };

        let mut forward = ReportAggregator::new("x");
        forward.record_evidence(2, title);
        forward.record_evidence(2, description);

        let mut backward = ReportAggregator::new("x");
        backward.record_evidence(2, description);
        backward.record_evidence(2, title);

        assert_eq!(forward.sheet().cell(2, COL_COUNT), Some(&CellValue::Integer(5)));
        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_rewrite_adds_to_existing_count() {
        let mut agg = ReportAggregator::new("time");
        let first = agg.write_item(2, &item("time", "time"));
        assert_eq!(first.count, 2);
        agg.write_item(2, &item("time", ""));
        assert_eq!(agg.sheet().cell(2, COL_COUNT), Some(&CellValue::Integer(3)));
    }

    #[test]
    fn test_false_never_clears_true() {
        let mut agg = ReportAggregator::new("time");
        agg.write_item(2, &item("$5 lunch", ""));
        agg.write_item(2, &item("plain", "plain"));
        assert_eq!(agg.sheet().cell(2, COL_HAS_MONEY), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_worksheet_rows_are_padded() {
        let mut sheet = Worksheet::new();
        sheet.write(1, 1, CellValue::from("a"));
        sheet.write(2, 3, CellValue::Integer(1));
        let rows = sheet.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![Some(&CellValue::from("a")), None, None]);
        assert_eq!(rows[1], vec![None, None, Some(&CellValue::Integer(1))]);
    }

    #[test]
    fn test_worksheet_cells_row_major() {
        let mut sheet = Worksheet::new();
        sheet.write(2, 1, CellValue::Bool(true));
        sheet.write(1, 3, CellValue::Integer(4));
        sheet.write(1, 1, CellValue::from("a"));
        let cells: Vec<_> = sheet.cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(cells, vec![(1, 1), (1, 3), (2, 1)]);
    }

    #[test]
    fn test_empty_worksheet() {
        let sheet = Worksheet::new();
        assert_eq!(sheet.max_row(), 0);
        assert_eq!(sheet.max_column(), 0);
        assert!(sheet.rows().is_empty());
    }
}
