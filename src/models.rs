//! Data models for scraped news items and report rows.
//!
//! - [`NewsItem`]: one article as read off the results page
//! - [`ReportRow`]: the six report columns computed for one item
//! - [`CellValue`]: a typed spreadsheet cell

use crate::analytics::{count_phrase, find_money_formats};
use std::fmt;

/// One scraped news article.
///
/// All fields are filled at construction; a field the page did not provide
/// is an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    /// Headline text.
    pub title: String,
    /// Date exactly as displayed on the page, unparsed.
    pub date: String,
    /// Teaser or summary text.
    pub description: String,
    /// Basename of the image URL (everything after the final `/`).
    pub image_name: String,
    /// Raw `src` attribute of the image. Used for downloads, not reported.
    pub image_src: String,
}

impl NewsItem {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
        image_src: impl Into<String>,
    ) -> Self {
        let image_src = image_src.into();
        Self {
            title: title.into(),
            date: date.into(),
            description: description.into(),
            image_name: crate::utils::image_basename(&image_src),
            image_src,
        }
    }
}

/// Column labels, in report order.
pub const REPORT_HEADERS: [&str; 6] = [
    "Title",
    "Date",
    "Description",
    "Image Name",
    "Count",
    "Has Money Format",
];

pub const COL_TITLE: u16 = 1;
pub const COL_DATE: u16 = 2;
pub const COL_DESCRIPTION: u16 = 3;
pub const COL_IMAGE_NAME: u16 = 4;
pub const COL_COUNT: u16 = 5;
pub const COL_HAS_MONEY: u16 = 6;

/// A typed worksheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// The report line for one [`NewsItem`].
///
/// `count` and `has_money_format` are computed from title and description
/// together, in a single pass over the complete evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image_name: String,
    pub count: usize,
    pub has_money_format: bool,
}

impl ReportRow {
    pub fn compute(item: &NewsItem, search_phrase: &str) -> Self {
        let count =
            count_phrase(search_phrase, &item.title) + count_phrase(search_phrase, &item.description);
        let mut matches = find_money_formats(&item.title);
        matches.extend(find_money_formats(&item.description));

        Self {
            title: item.title.clone(),
            date: item.date.clone(),
            description: item.description.clone(),
            image_name: item.image_name.clone(),
            count,
            has_money_format: !matches.is_empty(),
        }
    }
}
