//! Offline browser over a saved HTML results page.
//!
//! Useful for replaying a run against a page captured earlier (for example
//! with "Save Page As" after a manual search). Navigation, clicks and typing
//! are logged and otherwise ignored; element lookups run against the saved
//! document. Only CSS locators are supported.

use super::{BrowserService, Locator};
use crate::error::{Error, Result};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Text and attributes captured from one matched element.
#[derive(Debug, Clone)]
pub struct SnapshotElement {
    text: String,
    attributes: HashMap<String, String>,
}

#[derive(Debug)]
pub struct SnapshotBrowser {
    html: String,
}

impl SnapshotBrowser {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path)?;
        info!(bytes = html.len(), "Loaded HTML snapshot");
        Ok(Self::from_html(html))
    }

    fn select(&self, locator: &str) -> Result<Vec<SnapshotElement>> {
        let css = match Locator::parse(locator) {
            Locator::Css(css) => css,
            Locator::XPath(_) => {
                return Err(Error::Automation(format!(
                    "snapshot browser supports CSS locators only, got {locator}"
                )));
            }
        };
        let selector = Selector::parse(css)
            .map_err(|e| Error::Automation(format!("invalid CSS selector {css:?}: {e}")))?;

        let document = Html::parse_document(&self.html);
        let elements = document
            .select(&selector)
            .map(|el| SnapshotElement {
                text: collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")),
                attributes: el
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            })
            .collect();
        Ok(elements)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl BrowserService for SnapshotBrowser {
    type Handle = SnapshotElement;

    async fn open(&mut self, url: &str) -> Result<()> {
        debug!(%url, "Snapshot browser ignores navigation");
        Ok(())
    }

    async fn click(&mut self, locator: &str) -> Result<()> {
        debug!(%locator, "Snapshot browser ignores click");
        Ok(())
    }

    async fn click_element(&mut self, handle: &SnapshotElement) -> Result<()> {
        debug!(text = %handle.text, "Snapshot browser ignores click");
        Ok(())
    }

    async fn input_text(&mut self, locator: &str, text: &str) -> Result<()> {
        debug!(%locator, %text, "Snapshot browser ignores input");
        Ok(())
    }

    async fn find_elements(&mut self, locator: &str) -> Result<Vec<SnapshotElement>> {
        self.select(locator)
    }

    async fn wait_until_present(&mut self, locator: &str) -> Result<()> {
        if self.select(locator)?.is_empty() {
            // A static document never changes, so there is nothing to wait for.
            return Err(Error::AutomationTimeout {
                locator: locator.to_string(),
                waited: Duration::ZERO,
            });
        }
        Ok(())
    }

    async fn get_text(&mut self, handle: &SnapshotElement) -> Result<String> {
        Ok(handle.text.clone())
    }

    async fn get_attribute(&mut self, handle: &SnapshotElement, name: &str) -> Result<Option<String>> {
        Ok(handle.attributes.get(name).cloned())
    }

    async fn close_all(&mut self) -> Result<()> {
        Ok(())
    }
}
