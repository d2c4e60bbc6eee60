//! Error taxonomy for a report run.
//!
//! Configuration, automation and persistence failures are fatal for the run.
//! A category filter that matches nothing is not an error at all; see
//! [`crate::search::CategoryFilter`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error ({path}): {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Timed out after {waited:?} waiting for element {locator}")]
    AutomationTimeout { locator: String, waited: Duration },

    #[error("Browser error: {0}")]
    Automation(String),

    #[error("Failed to save report to {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Automation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
