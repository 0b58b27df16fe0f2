//! Browser-side steps of a fetch
//!
//! Navigation, readiness polling, script evaluation and screenshot capture.
//! Each best-effort step reports its outcome explicitly instead of hiding a
//! failure behind a catch-all.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::error::CdpError;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::js_scripts::{BODY_READY_SCRIPT, CONTENT_SCRIPT, SCROLL_HEIGHT_SCRIPT};
use super::schema::RawPageContent;
use crate::browser_session::set_viewport;
use crate::config::BrowserConfig;

/// How navigation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The load event fired within the page timeout
    Loaded,
    /// The page timeout elapsed; the DOM may be partially loaded
    TimedOut,
}

/// Wrap an async page operation with an explicit timeout
///
/// Distinguishes a timeout from a failure of the operation itself in the
/// returned error message.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "{operation_name} timeout after {timeout_secs} seconds"
        )),
    }
}

/// Navigate to `url`, treating a timeout as non-fatal
pub async fn navigate(page: &Page, url: &str, timeout_secs: u64) -> Result<Navigation> {
    match tokio::time::timeout(Duration::from_secs(timeout_secs), page.goto(url)).await {
        Ok(Ok(_)) => Ok(Navigation::Loaded),
        Ok(Err(CdpError::Timeout)) | Err(_) => {
            log::warn!(
                "Navigation to {url} exceeded {timeout_secs}s, \
                 extracting from the partially loaded page"
            );
            Ok(Navigation::TimedOut)
        }
        Ok(Err(e)) => Err(anyhow::Error::new(e).context(format!("Navigation to {url} failed"))),
    }
}

/// Poll for `document.body` for at most `max_wait_secs`
///
/// Returns whether the body appeared. Absence is not an error.
pub async fn wait_for_body(page: &Page, max_wait_secs: u64) -> bool {
    let start = Instant::now();
    let max_wait = Duration::from_secs(max_wait_secs);
    let poll_interval = Duration::from_millis(100);

    loop {
        let remaining = max_wait.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            log::debug!("document.body not present after {max_wait_secs}s, continuing");
            return false;
        }

        match tokio::time::timeout(remaining, page.evaluate(BODY_READY_SCRIPT)).await {
            Ok(Ok(result)) => {
                if result.into_value::<bool>().unwrap_or(false) {
                    log::debug!(
                        "document.body present after {:.2}s",
                        start.elapsed().as_secs_f64()
                    );
                    return true;
                }
            }
            Ok(Err(e)) => log::trace!("Readiness probe failed: {e}, retrying"),
            Err(_) => {}
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Evaluate `script` and deserialize its result, bounded by `timeout_secs`
pub async fn evaluate_json<T: DeserializeOwned>(
    page: &Page,
    script: &str,
    timeout_secs: u64,
    name: &str,
) -> Result<T> {
    with_page_timeout(
        async {
            let result = page
                .evaluate(script)
                .await
                .with_context(|| format!("Failed to execute {name} script"))?;
            result
                .into_value::<T>()
                .map_err(|e| anyhow!("Failed to parse {name} result: {e}"))
        },
        timeout_secs,
        name,
    )
    .await
}

/// Collect the raw content texts of the current document
pub async fn extract_raw_content(page: &Page, script_timeout_secs: u64) -> Result<RawPageContent> {
    let raw: RawPageContent =
        evaluate_json(page, CONTENT_SCRIPT, script_timeout_secs, "content extraction").await?;

    log::debug!(
        "Raw content - h1: {}, h2: {}, h3: {}, paragraphs: {}, cta: {}, nav: {}",
        raw.headings.h1.len(),
        raw.headings.h2.len(),
        raw.headings.h3.len(),
        raw.paragraphs.len(),
        raw.cta_candidates.len(),
        if raw.nav_found { raw.nav_links.len() } else { 0 }
    );

    Ok(raw)
}

/// Viewport height for a full-page capture
///
/// The scroll height capped at `max_height`; falls back to `fallback` when the
/// document reports no height.
#[must_use]
pub fn screenshot_height(scroll_height: f64, max_height: u32, fallback: u32) -> u32 {
    if !scroll_height.is_finite() || scroll_height < 1.0 {
        return fallback.min(max_height);
    }
    (scroll_height.ceil() as u64).min(u64::from(max_height)) as u32
}

/// Resize the viewport to the page height and save a PNG to `path`
pub async fn capture_full_page_screenshot(
    page: &Page,
    config: &BrowserConfig,
    path: &Path,
) -> Result<PathBuf> {
    let (width, window_height) = config.window_size;

    let scroll_height: f64 = evaluate_json(
        page,
        SCROLL_HEIGHT_SCRIPT,
        config.script_timeout_secs,
        "scroll height",
    )
    .await?;
    let height = screenshot_height(scroll_height, config.max_screenshot_height, window_height);

    set_viewport(page, width, height).await?;
    tokio::time::sleep(Duration::from_millis(config.screenshot_settle_ms)).await;

    let params = CaptureScreenshotParams {
        format: Some(CaptureScreenshotFormat::Png),
        capture_beyond_viewport: Some(false),
        ..Default::default()
    };

    let screenshot_data = with_page_timeout(
        async {
            page.screenshot(params)
                .await
                .map_err(|e| anyhow!("Failed to capture screenshot: {e}"))
        },
        config.script_timeout_secs,
        "screenshot",
    )
    .await?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, &screenshot_data)
        .await
        .with_context(|| format!("Failed to write screenshot {}", path.display()))?;

    log::info!(
        "Screenshot saved ({}x{}, {} bytes): {}",
        width,
        height,
        screenshot_data.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_height_capped() {
        assert_eq!(screenshot_height(12_000.0, 4000, 1080), 4000);
        assert_eq!(screenshot_height(2500.4, 4000, 1080), 2501);
    }

    #[test]
    fn test_screenshot_height_falls_back_on_empty_document() {
        assert_eq!(screenshot_height(0.0, 4000, 1080), 1080);
        assert_eq!(screenshot_height(f64::NAN, 4000, 1080), 1080);
    }

    #[tokio::test]
    async fn test_with_page_timeout_reports_operation_name() {
        let result: Result<()> = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
            0,
            "content extraction",
        )
        .await;

        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert_eq!(message, "content extraction timeout after 0 seconds");
    }
}
