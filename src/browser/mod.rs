//! Browser automation seam.
//!
//! The pipeline never talks to a browser directly. It drives anything that
//! implements [`BrowserService`]:
//!
//! | Implementation | Module | Backing |
//! |----------------|--------|---------|
//! | [`ChromeBrowser`] | [`chrome`] | Live Chrome over the DevTools Protocol |
//! | [`SnapshotBrowser`] | [`snapshot`] | A saved HTML results page |
//!
//! # Locators
//!
//! Locators are opaque strings from the configuration file. They may carry
//! a `css:` or `xpath:` prefix; without one, strings starting with `/` or
//! `(` are XPath and everything else is CSS. See [`Locator::parse`].

pub mod chrome;
pub mod snapshot;

pub use chrome::ChromeBrowser;
pub use snapshot::SnapshotBrowser;

use crate::error::Result;

/// Operations the pipeline needs from a browser.
///
/// Every call blocks the run until the browser answers. Implementations own
/// their timeout; [`wait_until_present`](BrowserService::wait_until_present)
/// fails with [`crate::error::Error::AutomationTimeout`] when it elapses.
pub trait BrowserService {
    /// Opaque reference to one element found on the page.
    type Handle;

    /// Navigate to `url`.
    async fn open(&mut self, url: &str) -> Result<()>;

    /// Click the first element matching `locator`.
    async fn click(&mut self, locator: &str) -> Result<()>;

    /// Click a previously found element.
    async fn click_element(&mut self, handle: &Self::Handle) -> Result<()>;

    /// Type `text` into the first element matching `locator`.
    async fn input_text(&mut self, locator: &str, text: &str) -> Result<()>;

    /// All elements currently matching `locator`, in document order.
    async fn find_elements(&mut self, locator: &str) -> Result<Vec<Self::Handle>>;

    /// Wait until at least one element matches `locator`.
    async fn wait_until_present(&mut self, locator: &str) -> Result<()>;

    /// Visible text of an element.
    async fn get_text(&mut self, handle: &Self::Handle) -> Result<String>;

    /// Attribute value of an element, `None` when the attribute is absent.
    async fn get_attribute(&mut self, handle: &Self::Handle, name: &str) -> Result<Option<String>>;

    /// Close every page and the browser itself.
    async fn close_all(&mut self) -> Result<()>;
}

/// A parsed element locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator<'a> {
    Css(&'a str),
    XPath(&'a str),
}

impl<'a> Locator<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let raw = raw.trim();
        if let Some(css) = raw.strip_prefix("css:") {
            Locator::Css(css.trim())
        } else if let Some(xpath) = raw.strip_prefix("xpath:") {
            Locator::XPath(xpath.trim())
        } else if raw.starts_with('/') || raw.starts_with('(') {
            Locator::XPath(raw)
        } else {
            Locator::Css(raw)
        }
    }
}
