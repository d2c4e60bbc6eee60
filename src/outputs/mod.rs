//! Report generation.
//!
//! # Submodules
//!
//! - [`report`]: builds the in-memory worksheet from news items
//! - [`sink`]: saves a finished worksheet to disk (CSV)
//! - [`xlsx`]: saves it as an Excel workbook
//!
//! # Report Layout
//!
//! ```text
//! Title | Date | Description | Image Name | Count | Has Money Format
//! ------+------+-------------+------------+-------+-----------------
//! ...   | ...  | ...         | photo.jpg  | 2     | TRUE
//! ```

pub mod report;
pub mod sink;
pub mod xlsx;
