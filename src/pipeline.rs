//! Run controller: search, filter, extract, report.
//!
//! The browser and the report sink are passed in, so the same pipeline runs
//! against live Chrome, a saved snapshot, or a test double. The browser is
//! always closed after extraction, whether or not extraction succeeded.

use crate::browser::BrowserService;
use crate::config::Config;
use crate::error::Result;
use crate::extract::extract_news_items;
use crate::images::download_images;
use crate::models::NewsItem;
use crate::outputs::report::{ReportAggregator, Worksheet};
use crate::outputs::sink::ReportSink;
use crate::search::{filter_category, go_and_search, CategoryFilter};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub items: usize,
    pub category: CategoryFilter,
    pub report_path: PathBuf,
    pub images_saved: usize,
}

/// Drive the browser through search, filtering and extraction.
///
/// The browser is closed before returning. If both the scrape and the close
/// fail, the scrape error is returned.
#[instrument(level = "info", skip_all)]
pub async fn scrape<B: BrowserService>(
    browser: &mut B,
    config: &Config,
) -> Result<(Vec<NewsItem>, CategoryFilter)> {
    let scraped = scrape_open_browser(browser, config).await;
    let closed = browser.close_all().await;
    match (scraped, closed) {
        (Ok(result), Ok(())) => Ok(result),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!(error = %close_err, "Browser close also failed");
            Err(e)
        }
    }
}

async fn scrape_open_browser<B: BrowserService>(
    browser: &mut B,
    config: &Config,
) -> Result<(Vec<NewsItem>, CategoryFilter)> {
    go_and_search(browser, config).await?;
    let category =
        filter_category(browser, &config.category_checkboxes, &config.news_category).await?;
    let items = extract_news_items(browser, config.result_locators()).await?;
    Ok((items, category))
}

/// Build the report worksheet for `items`.
pub fn build_report(items: &[NewsItem], search_phrase: &str) -> Worksheet {
    let mut aggregator = ReportAggregator::new(search_phrase);
    aggregator.write_items(items);
    aggregator.finish()
}

/// Run the whole pipeline and save the report to `config.file_path`.
#[instrument(level = "info", skip_all, fields(phrase = %config.search_phrase))]
pub async fn run<B: BrowserService, S: ReportSink + ?Sized>(
    browser: &mut B,
    sink: &S,
    config: &Config,
) -> Result<RunSummary> {
    if config.num_months != 1 {
        info!(
            num_months = config.num_months,
            "num_months is recorded but results are not filtered by date"
        );
    }

    let (items, category) = scrape(browser, config).await?;
    if let CategoryFilter::NotFound { category, labels } = &category {
        warn!(
            %category,
            labels_seen = labels.len(),
            "Report covers unfiltered results"
        );
    }

    let images_saved = match &config.images_dir {
        Some(dir) => download_images(&config.url, &items, dir).await.len(),
        None => 0,
    };

    let sheet = build_report(&items, &config.search_phrase);
    sink.save(&sheet, &config.file_path)?;

    let summary = RunSummary {
        items: items.len(),
        category,
        report_path: config.file_path.clone(),
        images_saved,
    };
    info!(
        items = summary.items,
        category = ?summary.category,
        report = %summary.report_path.display(),
        images_saved = summary.images_saved,
        "Run complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakeBrowser, FakeElement};
    use crate::error::Error;
    use crate::models::{CellValue, COL_COUNT, COL_HAS_MONEY, COL_TITLE};
    use crate::outputs::sink::CsvSink;
    use std::cell::RefCell;
    use std::path::Path;

    /// Keeps the last saved worksheet in memory.
    #[derive(Default)]
    struct MemorySink {
        saved: RefCell<Option<Worksheet>>,
    }

    impl ReportSink for MemorySink {
        fn save(&self, sheet: &Worksheet, _path: &Path) -> Result<()> {
            *self.saved.borrow_mut() = Some(sheet.clone());
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            url: "https://news.test".to_string(),
            button_search: "css:button.open".to_string(),
            text_area: "css:input.q".to_string(),
            button_go: "css:button.go".to_string(),
            category_checkboxes: "css:label.topic".to_string(),
            titles_xpath: "//h3".to_string(),
            dates_xpath: "//p[@class='date']".to_string(),
            descriptions_xpath: "//p[@class='desc']".to_string(),
            images_xpath: "//img".to_string(),
            ..Config::default()
        }
    }

    fn texts(values: &[&str]) -> Vec<FakeElement> {
        values.iter().map(|v| FakeElement::text(v)).collect()
    }

    fn results_page(config: &Config) -> FakeBrowser {
        FakeBrowser::default()
            .with_group(&config.category_checkboxes, texts(&["Politics", "Business"]))
            .with_group(
                &config.titles_xpath,
                texts(&["Quiet day", "Time after time", "Markets"]),
            )
            .with_group(&config.dates_xpath, texts(&["Oct 1", "Oct 2", "Oct 3"]))
            .with_group(
                &config.descriptions_xpath,
                texts(&["Nothing new", "Tickets from $50", "Stocks rise"]),
            )
            .with_group(
                &config.images_xpath,
                vec![
                    FakeElement::image("https://cdn.test/1.jpg"),
                    FakeElement::image("https://cdn.test/2.jpg"),
                    FakeElement::image("https://cdn.test/3.jpg"),
                ],
            )
    }

    #[tokio::test]
    async fn test_end_to_end_second_item() {
        let config = config();
        let mut browser = results_page(&config);
        let sink = MemorySink::default();

        let summary = run(&mut browser, &sink, &config).await.unwrap();
        assert_eq!(summary.items, 3);
        assert_eq!(summary.category, CategoryFilter::Skipped);
        assert!(browser.closed);

        let sheet = sink.saved.borrow().clone().unwrap();
        assert_eq!(sheet.cell(3, COL_TITLE), Some(&CellValue::from("Time after time")));
        assert_eq!(sheet.cell(3, COL_COUNT), Some(&CellValue::Integer(2)));
        assert_eq!(sheet.cell(3, COL_HAS_MONEY), Some(&CellValue::Bool(true)));
        assert_eq!(sheet.cell(2, COL_HAS_MONEY), Some(&CellValue::Bool(false)));
    }

    #[tokio::test]
    async fn test_unknown_category_still_completes() {
        let config = Config {
            news_category: "Sports".to_string(),
            ..config()
        };
        let mut browser = results_page(&config);
        let sink = MemorySink::default();

        let summary = run(&mut browser, &sink, &config).await.unwrap();
        assert!(matches!(summary.category, CategoryFilter::NotFound { .. }));
        assert_eq!(summary.items, 3);
        assert!(!browser.actions.iter().any(|a| a.starts_with("click element")));
    }

    #[tokio::test]
    async fn test_known_category_is_clicked() {
        let config = Config {
            news_category: "business".to_string(),
            ..config()
        };
        let mut browser = results_page(&config);
        let summary = run(&mut browser, &MemorySink::default(), &config).await.unwrap();
        assert_eq!(summary.category, CategoryFilter::Applied("Business".to_string()));
        assert!(browser.actions.contains(&"click element Business".to_string()));
    }

    #[tokio::test]
    async fn test_timeout_is_fatal_and_browser_closed() {
        let config = config();
        let mut browser = FakeBrowser::default()
            .with_group(&config.titles_xpath, texts(&["Only titles"]));
        let sink = MemorySink::default();

        let err = run(&mut browser, &sink, &config).await.unwrap_err();
        assert!(matches!(err, Error::AutomationTimeout { .. }));
        assert!(browser.closed);
        assert!(sink.saved.borrow().is_none());
    }

    #[tokio::test]
    async fn test_save_failure_is_persistence_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            file_path: tmp.path().join("no/such/dir/report.csv"),
            ..config()
        };
        let mut browser = results_page(&config);

        let err = run(&mut browser, &CsvSink, &config).await.unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_writes_csv_report() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            file_path: tmp.path().join("report.csv"),
            ..config()
        };
        let mut browser = results_page(&config);

        run(&mut browser, &CsvSink, &config).await.unwrap();
        let written = std::fs::read_to_string(&config.file_path).unwrap();
        assert_eq!(written.lines().count(), 4);
        assert!(written.contains("Time after time,Oct 2,Tickets from $50,2.jpg,2,TRUE"));
    }

    #[test]
    fn test_build_report_empty() {
        let sheet = build_report(&[], "time");
        assert_eq!(sheet.max_row(), 1);
    }
}
