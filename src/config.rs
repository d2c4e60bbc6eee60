//! Run configuration loaded from a flat JSON file.
//!
//! Every key is optional. Missing keys fall back to the defaults below and
//! unknown keys are ignored. A missing or malformed file is fatal.
//!
//! ```json
//! {
//!   "url": "https://www.latimes.com/",
//!   "search_phrase": "time",
//!   "news_category": "World",
//!   "button_search": "css:button[data-element='search-button']",
//!   "text_area": "css:input[data-element='search-form-input']",
//!   "button_go": "css:button[data-element='search-submit-button']",
//!   "titles_xpath": "//ps-promo//h3[@class='promo-title']/a",
//!   "file_path": "output/news.csv"
//! }
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

fn default_search_phrase() -> String {
    "time".to_string()
}

fn default_num_months() -> u32 {
    1
}

fn default_category_checkboxes() -> String {
    "css:.css-1qtb2wd label.css-1a8ayg6".to_string()
}

fn default_file_path() -> PathBuf {
    PathBuf::from("output/news.csv")
}

fn default_wait_timeout_secs() -> u64 {
    10
}

fn default_headless() -> bool {
    true
}

/// All options recognized in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_search_phrase")]
    pub search_phrase: String,
    /// Empty means no category filter.
    #[serde(default)]
    pub news_category: String,
    /// Read and logged only. Results are never restricted by date.
    #[serde(default = "default_num_months")]
    pub num_months: u32,
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub button_search: String,
    #[serde(default)]
    pub text_area: String,
    #[serde(default)]
    pub button_go: String,
    #[serde(default = "default_category_checkboxes")]
    pub category_checkboxes: String,

    #[serde(default)]
    pub titles_xpath: String,
    #[serde(default)]
    pub dates_xpath: String,
    #[serde(default)]
    pub descriptions_xpath: String,
    #[serde(default)]
    pub images_xpath: String,

    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
    /// When set, article images are downloaded here.
    #[serde(default)]
    pub images_dir: Option<PathBuf>,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_phrase: default_search_phrase(),
            news_category: String::new(),
            num_months: default_num_months(),
            url: String::new(),
            button_search: String::new(),
            text_area: String::new(),
            button_go: String::new(),
            category_checkboxes: default_category_checkboxes(),
            titles_xpath: String::new(),
            dates_xpath: String::new(),
            descriptions_xpath: String::new(),
            images_xpath: String::new(),
            file_path: default_file_path(),
            images_dir: None,
            wait_timeout_secs: default_wait_timeout_secs(),
            headless: default_headless(),
        }
    }
}

impl Config {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Locators for the four result element groups, in report column order.
    pub fn result_locators(&self) -> ResultLocators<'_> {
        ResultLocators {
            titles: &self.titles_xpath,
            dates: &self.dates_xpath,
            descriptions: &self.descriptions_xpath,
            images: &self.images_xpath,
        }
    }
}

/// Borrowed locators for the title/date/description/image groups.
#[derive(Debug, Clone, Copy)]
pub struct ResultLocators<'a> {
    pub titles: &'a str,
    pub dates: &'a str,
    pub descriptions: &'a str,
    pub images: &'a str,
}

/// Load and parse the configuration file.
///
/// # Errors
///
/// [`Error::Config`] when the file cannot be read or is not a JSON object
/// matching [`Config`].
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config = parse_config(&raw).map_err(|reason| Error::Config {
        path: path.to_path_buf(),
        reason,
    })?;
    info!(
        url = %config.url,
        search_phrase = %config.search_phrase,
        news_category = %config.news_category,
        num_months = config.num_months,
        file_path = %config.file_path.display(),
        "Loaded configuration"
    );
    Ok(config)
}

fn parse_config(raw: &str) -> std::result::Result<Config, String> {
    serde_json::from_str(raw).map_err(|e| e.to_string())
}
