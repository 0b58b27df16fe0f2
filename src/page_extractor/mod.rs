//! Competitor page extraction.
//!
//! Given a live browser session, loads one page and pulls the fixed set of
//! structured fields: title, meta description, headings, body paragraphs,
//! call-to-action labels, navigation labels and optionally a screenshot.

// Sub-modules
pub mod extractors;
pub mod js_scripts;
pub mod schema;

use std::path::Path;
use std::time::Duration;

use crate::browser_session::BrowserSession;
use crate::error::{MonitorError, MonitorResult};

// Re-exports for public API
pub use extractors::{Navigation, capture_full_page_screenshot, navigate, wait_for_body};
pub use schema::{ExtractionResult, Heading, RawHeadings, RawPageContent};

/// Fetch `url` in `session` and extract its structured content
///
/// A navigation timeout is not a failure: extraction proceeds on whatever DOM
/// has loaded. When `screenshot_path` is given a full-page PNG is written there.
///
/// # Errors
///
/// `MonitorError::Fetch` for navigation errors other than a timeout, failed
/// script evaluation and screenshot failures.
pub async fn fetch(
    session: &BrowserSession,
    url: &str,
    screenshot_path: Option<&Path>,
) -> MonitorResult<ExtractionResult> {
    extract_page(session, url, screenshot_path)
        .await
        .map_err(|e| MonitorError::fetch(url, format!("{e:#}")))
}

async fn extract_page(
    session: &BrowserSession,
    url: &str,
    screenshot_path: Option<&Path>,
) -> anyhow::Result<ExtractionResult> {
    let config = session.config();
    let page = session.open_page().await?;

    match navigate(&page, url, config.page_timeout_secs).await? {
        Navigation::Loaded => log::debug!("Page loaded: {url}"),
        Navigation::TimedOut => log::info!("Continuing with partial DOM for {url}"),
    }

    wait_for_body(&page, config.implicit_wait_secs).await;
    tokio::time::sleep(Duration::from_millis(config.settle_delay_ms)).await;

    let raw = extractors::extract_raw_content(&page, config.script_timeout_secs).await?;
    let mut result = ExtractionResult::from_raw(raw);

    if let Some(path) = screenshot_path {
        let saved = capture_full_page_screenshot(&page, config, path).await?;
        result.screenshot_path = Some(saved.display().to_string());
    }

    if let Err(e) = page.close().await {
        log::debug!("Failed to close page for {url}: {e}");
    }

    log::info!(
        "Extracted {url}: {} headings, {} paragraphs, {} CTAs, {} nav links",
        result.headings.len(),
        result.paragraphs.len(),
        result.cta_labels.len(),
        result.nav_links.len()
    );

    Ok(result)
}
