//! Search and category filtering on the news site.
//!
//! Two steps, run in order by the pipeline:
//!
//! 1. [`go_and_search`]: open the site, reveal the search field, type the
//!    phrase, submit
//! 2. [`filter_category`]: tick the first category checkbox whose label
//!    contains the requested category
//!
//! A category with no matching label does not fail the run. It is reported
//! back as [`CategoryFilter::NotFound`] and logged as a warning.

use crate::browser::BrowserService;
use crate::config::Config;
use crate::error::{Error, Result};
use tracing::{info, instrument, warn};

/// Outcome of [`filter_category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No category was requested.
    Skipped,
    /// The checkbox with this label was clicked.
    Applied(String),
    /// No label contained the category; results are unfiltered.
    NotFound { category: String, labels: Vec<String> },
}

/// Open the site and submit a search for the configured phrase.
#[instrument(level = "info", skip_all, fields(url = %config.url, phrase = %config.search_phrase))]
pub async fn go_and_search<B: BrowserService>(browser: &mut B, config: &Config) -> Result<()> {
    browser.open(&config.url).await?;
    browser.click(&config.button_search).await?;
    browser.input_text(&config.text_area, &config.search_phrase).await?;
    browser.click(&config.button_go).await?;
    info!("Search submitted");
    Ok(())
}

/// Click the first category checkbox whose label contains `category`,
/// ignoring case.
#[instrument(level = "info", skip(browser))]
pub async fn filter_category<B: BrowserService>(
    browser: &mut B,
    checkboxes_locator: &str,
    category: &str,
) -> Result<CategoryFilter> {
    if category.trim().is_empty() {
        info!("No category requested; skipping filter");
        return Ok(CategoryFilter::Skipped);
    }

    // The go click returns before the results page loads; the labels live there.
    match browser.wait_until_present(checkboxes_locator).await {
        Ok(()) => {}
        Err(Error::AutomationTimeout { waited, .. }) => {
            warn!(%category, ?waited, "No category filter labels appeared; continuing without filter");
            return Ok(CategoryFilter::NotFound {
                category: category.to_string(),
                labels: Vec::new(),
            });
        }
        Err(e) => return Err(e),
    }

    let wanted = category.to_lowercase();
    let checkboxes = browser.find_elements(checkboxes_locator).await?;
    let mut labels = Vec::with_capacity(checkboxes.len());

    for checkbox in &checkboxes {
        let label = browser.get_text(checkbox).await?;
        if label.to_lowercase().contains(&wanted) {
            browser.click_element(checkbox).await?;
            info!(%label, "Category filter applied");
            return Ok(CategoryFilter::Applied(label));
        }
        labels.push(label);
    }

    warn!(
        %category,
        available = ?labels,
        "Category not found among filter labels; continuing without filter"
    );
    Ok(CategoryFilter::NotFound {
        category: category.to_string(),
        labels,
    })
}
