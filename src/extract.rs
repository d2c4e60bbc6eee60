//! Turn the results page into [`NewsItem`] records.
//!
//! Titles, dates, descriptions and images are fetched as four independent
//! element groups and paired by position. When the groups differ in length
//! the result is cut to the shortest one and the surplus is dropped; the
//! counts are logged so a misaligned page is visible.

use crate::browser::BrowserService;
use crate::config::ResultLocators;
use crate::error::Result;
use crate::models::NewsItem;
use crate::utils::truncate_for_log;
use itertools::izip;
use std::fmt::Display;
use tracing::{debug, info, instrument, warn};

/// Wait for `locator` and return every element it matches.
async fn extract_elements<B: BrowserService>(browser: &mut B, locator: &str) -> Result<Vec<B::Handle>> {
    browser.wait_until_present(locator).await?;
    browser.find_elements(locator).await
}

/// Read a text field, degrading to an empty string on failure.
async fn text_or_empty<B: BrowserService>(browser: &mut B, handle: &B::Handle, field: &str, index: usize) -> String {
    match browser.get_text(handle).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn_field(field, index, e);
            String::new()
        }
    }
}

fn warn_field(field: &str, index: usize, error: impl Display) {
    warn!(%field, index, error = %error, "Could not read field; using empty value");
}

/// Scrape every news item on the current results page.
///
/// # Errors
///
/// Fails only when a group never appears (timeout) or cannot be listed.
/// Individual unreadable fields become empty strings.
#[instrument(level = "info", skip_all)]
pub async fn extract_news_items<B: BrowserService>(
    browser: &mut B,
    locators: ResultLocators<'_>,
) -> Result<Vec<NewsItem>> {
    let titles = extract_elements(browser, locators.titles).await?;
    let dates = extract_elements(browser, locators.dates).await?;
    let descriptions = extract_elements(browser, locators.descriptions).await?;
    let images = extract_elements(browser, locators.images).await?;

    let counts = [titles.len(), dates.len(), descriptions.len(), images.len()];
    let paired = counts.iter().copied().min().unwrap_or(0);
    if counts.iter().any(|&c| c != paired) {
        warn!(
            titles = counts[0],
            dates = counts[1],
            descriptions = counts[2],
            images = counts[3],
            kept = paired,
            "Element groups differ in length; surplus elements dropped"
        );
    }

    let mut items = Vec::with_capacity(paired);
    for (index, (title, date, description, image)) in
        izip!(&titles, &dates, &descriptions, &images).enumerate()
    {
        let title = text_or_empty(browser, title, "title", index).await;
        let date = text_or_empty(browser, date, "date", index).await;
        let description = text_or_empty(browser, description, "description", index).await;
        let image_src = match browser.get_attribute(image, "src").await {
            Ok(src) => src.unwrap_or_default(),
            Err(e) => {
                warn_field("image", index, e);
                String::new()
            }
        };

        let item = NewsItem::new(title, date, description, image_src);
        debug!(
            index,
            title = %truncate_for_log(&item.title, 80),
            image_name = %item.image_name,
            "Extracted news item"
        );
        items.push(item);
    }

    info!(count = items.len(), "Extracted news items");
    Ok(items)
}
