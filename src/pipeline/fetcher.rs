//! Fetching a competitor page into a `ParseOutcome`

use chrono::{DateTime, Local, Utc};
use std::future::Future;
use std::path::PathBuf;

use super::types::{CompetitorRef, ParseOutcome};
use crate::browser_session::{self, CleanupResult};
use crate::config::{BrowserConfig, MonitorConfig};
use crate::error::MonitorError;
use crate::page_extractor;
use crate::utils::{file_timestamp, is_valid_url, sanitize_name};

/// Source of `ParseOutcome`s
///
/// Implementations never fail: every error ends up in the outcome.
pub trait SiteFetcher {
    fn fetch(
        &self,
        competitor: &CompetitorRef,
        capture_screenshot: bool,
    ) -> impl Future<Output = ParseOutcome>;
}

/// Fetches with a fresh headless browser per call
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    browser: BrowserConfig,
    screenshots_dir: PathBuf,
}

impl BrowserFetcher {
    #[must_use]
    pub fn new(browser: BrowserConfig, screenshots_dir: PathBuf) -> Self {
        Self {
            browser,
            screenshots_dir,
        }
    }

    #[must_use]
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.browser.clone(), config.screenshots_dir.clone())
    }

    /// `<screenshots_dir>/<sanitized name>_<YYYYmmdd_HHMMSS>.png`
    #[must_use]
    pub fn screenshot_path_for(
        &self,
        competitor: &CompetitorRef,
        now: DateTime<Local>,
    ) -> PathBuf {
        self.screenshots_dir.join(format!(
            "{}_{}.png",
            sanitize_name(competitor.name()),
            file_timestamp(now)
        ))
    }
}

impl SiteFetcher for BrowserFetcher {
    async fn fetch(&self, competitor: &CompetitorRef, capture_screenshot: bool) -> ParseOutcome {
        let started = Utc::now();
        let url = competitor.url();

        if !is_valid_url(url) {
            let error = MonitorError::InvalidInput(format!("not an http(s) URL: {url:?}"));
            tracing::warn!(competitor = competitor.name(), "{error}");
            return ParseOutcome::failed(competitor.clone(), started, &error);
        }

        let session = match browser_session::acquire(&self.browser).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(competitor = competitor.name(), url, "{e}");
                return ParseOutcome::failed(competitor.clone(), started, &e);
            }
        };

        let screenshot =
            capture_screenshot.then(|| self.screenshot_path_for(competitor, Local::now()));
        let result = page_extractor::fetch(&session, url, screenshot.as_deref()).await;

        if let CleanupResult::PartialFailure(errors) = browser_session::release(session).await {
            tracing::debug!(url, "Browser teardown incomplete: {}", errors.join("; "));
        }

        match result {
            Ok(data) => {
                tracing::info!(competitor = competitor.name(), url, "Fetch succeeded");
                ParseOutcome::succeeded(competitor.clone(), started, data)
            }
            Err(e) => {
                tracing::warn!(competitor = competitor.name(), url, "{e}");
                ParseOutcome::failed(competitor.clone(), started, &e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_screenshot_path_is_sanitized_and_timestamped() {
        let fetcher = BrowserFetcher::new(BrowserConfig::default(), PathBuf::from("/data/shots"));
        let competitor = CompetitorRef::new("https://acme.test", Some("Acme Corp: EU".to_string()));
        let now = Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .unwrap_or_else(Local::now);

        let path = fetcher.screenshot_path_for(&competitor, now);
        let file = path.file_name().and_then(|f| f.to_str()).unwrap_or_default();

        assert!(path.starts_with("/data/shots"));
        assert!(file.starts_with("acme_corp__eu_"), "{file}");
        assert!(file.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_browser() {
        let fetcher = BrowserFetcher::new(BrowserConfig::default(), PathBuf::from("shots"));
        let competitor = CompetitorRef::new("ftp://acme.test", Some("Acme".to_string()));

        let outcome = fetcher.fetch(&competitor, false).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap_or_default().starts_with("Invalid input"));
        assert_eq!(outcome.data, crate::page_extractor::ExtractionResult::default());
    }
}
