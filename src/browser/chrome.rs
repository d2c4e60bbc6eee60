//! Live browser driven over the Chrome DevTools Protocol.
//!
//! Launches a local Chrome/Chromium through `chromiumoxide`, keeps a single
//! page, and resolves CSS locators with `querySelectorAll` and XPath
//! locators with the DOM search API.

use super::{BrowserService, Locator};
use crate::error::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct ChromeBrowser {
    browser: Browser,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
    wait_timeout: Duration,
}

impl ChromeBrowser {
    /// Launch Chrome and start processing CDP messages.
    #[instrument(level = "info")]
    pub async fn launch(headless: bool, wait_timeout: Duration) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Automation)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler must be polled for any page command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        info!(headless, ?wait_timeout, "Chrome launched");
        Ok(Self {
            browser,
            page: None,
            handler_task: Some(handler_task),
            wait_timeout,
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| Error::Automation("no page open; call open() first".to_string()))
    }

    async fn query(&self, locator: &str) -> Result<Vec<Element>> {
        let page = self.page()?;
        let found = match Locator::parse(locator) {
            Locator::Css(css) => page.find_elements(css).await,
            Locator::XPath(xpath) => page.find_xpaths(xpath).await,
        };
        match found {
            Ok(elements) => Ok(elements),
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn first(&self, locator: &str) -> Result<Element> {
        self.query(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Automation(format!("no element matches {locator}")))
    }
}

impl BrowserService for ChromeBrowser {
    type Handle = Element;

    #[instrument(level = "info", skip(self))]
    async fn open(&mut self, url: &str) -> Result<()> {
        if let Some(page) = &self.page {
            page.goto(url).await?;
        } else {
            let page = self.browser.new_page(url).await?;
            self.page = Some(page);
        }
        info!("Page opened");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn click(&mut self, locator: &str) -> Result<()> {
        self.first(locator).await?.click().await?;
        Ok(())
    }

    async fn click_element(&mut self, handle: &Element) -> Result<()> {
        handle.click().await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn input_text(&mut self, locator: &str, text: &str) -> Result<()> {
        self.first(locator).await?.click().await?.type_str(text).await?;
        Ok(())
    }

    async fn find_elements(&mut self, locator: &str) -> Result<Vec<Element>> {
        let elements = self.query(locator).await?;
        debug!(%locator, count = elements.len(), "Found elements");
        Ok(elements)
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_until_present(&mut self, locator: &str) -> Result<()> {
        let started = Instant::now();
        loop {
            match self.query(locator).await {
                Ok(found) if !found.is_empty() => {
                    debug!(elapsed = ?started.elapsed(), "Element present");
                    return Ok(());
                }
                Ok(_) => {}
                // Lookups can fail transiently while the page is navigating.
                Err(e) => debug!(error = %e, "Lookup failed while waiting"),
            }
            if started.elapsed() >= self.wait_timeout {
                return Err(Error::AutomationTimeout {
                    locator: locator.to_string(),
                    waited: self.wait_timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn get_text(&mut self, handle: &Element) -> Result<String> {
        Ok(handle.inner_text().await?.unwrap_or_default())
    }

    async fn get_attribute(&mut self, handle: &Element, name: &str) -> Result<Option<String>> {
        Ok(handle.attribute(name).await?)
    }

    #[instrument(level = "info", skip(self))]
    async fn close_all(&mut self) -> Result<()> {
        let Some(handler_task) = self.handler_task.take() else {
            return Ok(());
        };
        self.page = None;
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Chrome process did not exit cleanly");
        }
        handler_task.abort();
        closed?;
        info!("Browser closed");
        Ok(())
    }
}
