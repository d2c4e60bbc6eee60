//! Small helpers shared across the pipeline.
//!
//! - String truncation for log lines carrying scraped text
//! - Image basename derivation from a `src` attribute
//! - Output directory validation before the report is saved

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Everything after the final `/` of an image `src`.
///
/// A `src` without any `/` is returned unchanged; an empty `src` yields an
/// empty name.
pub fn image_basename(src: &str) -> String {
    src.rsplit('/').next().unwrap_or_default().to_string()
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// Creates missing parents, then probes with a throwaway file. Runs before
/// the browser is launched, so an unusable report path fails the run early
/// with the same [`Error::Persistence`] a failed save would produce.
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub fn ensure_parent_writable(file_path: &Path) -> Result<()> {
    let dir = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let persistence = |e: std::io::Error| Error::Persistence {
        path: file_path.to_path_buf(),
        reason: format!("{} is not writable: {e}", dir.display()),
    };
    fs::create_dir_all(dir).map_err(persistence)?;

    let probe_path = dir.join("..__probe_write__");
    fs::File::create(&probe_path).map_err(persistence)?;
    let _ = fs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
