//! Browser session lifecycle
//!
//! One isolated headless browser per fetch. `acquire` launches it, `release`
//! tears it down and never fails. `BrowserSession` also cleans up on drop so a
//! session abandoned by a cancelled future does not leave a profile behind.

use anyhow::Context;
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser_setup::launch_browser;
use crate::config::BrowserConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::kromekover;

const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of teardown operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// All cleanup operations succeeded
    Success,
    /// Some cleanup operations failed, with error details
    PartialFailure(Vec<String>),
}

/// A live browser owned by exactly one fetch
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    config: BrowserConfig,
}

impl BrowserSession {
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Open a blank page with masking scripts registered and the viewport set
    ///
    /// Scripts must be registered on `about:blank` before the real navigation
    /// so they run ahead of any page script.
    pub async fn open_page(&self) -> anyhow::Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        if self.config.anti_automation_masking
            && let Err(e) = kromekover::inject(&page).await
        {
            warn!("Anti-automation masking failed, continuing without it: {e}");
        }

        let (width, height) = self.config.window_size;
        set_viewport(&page, width, height).await?;

        Ok(page)
    }

    fn cleanup_temp_dir(&mut self) -> Option<String> {
        let path = self.user_data_dir.take()?;
        debug!("Cleaning up browser profile: {}", path.display());
        match std::fs::remove_dir_all(&path) {
            Ok(()) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    "Failed to clean up browser profile {}: {}",
                    path.display(),
                    e
                );
                Some(format!("Directory cleanup failed: {e}"))
            }
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        // chromiumoxide kills the child process when `Browser` drops
        if self.user_data_dir.is_some() {
            warn!("BrowserSession dropped without release - removing profile in Drop");
            self.cleanup_temp_dir();
        }
    }
}

/// Resize the page viewport via device-metrics emulation
pub(crate) async fn set_viewport(page: &Page, width: u32, height: u32) -> anyhow::Result<()> {
    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(width))
            .height(i64::from(height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to set viewport size")?;
    Ok(())
}

/// Launch an isolated browser session
///
/// # Errors
///
/// `MonitorError::SessionCreation` if the browser binary cannot be resolved or
/// the process fails to start. `MonitorError::InvalidInput` for an inconsistent
/// `BrowserConfig`.
pub async fn acquire(config: &BrowserConfig) -> MonitorResult<BrowserSession> {
    config.validate()?;

    let (browser, handler, user_data_dir) = launch_browser(config)
        .await
        .map_err(|e| MonitorError::SessionCreation(format!("{e:#}")))?;

    Ok(BrowserSession {
        browser,
        handler,
        user_data_dir: Some(user_data_dir),
        config: config.clone(),
    })
}

/// Tear down a session, swallowing every failure
///
/// Safe to call when the browser process has already exited. Failures are
/// logged and reported in the returned `CleanupResult`, never as an error.
pub async fn release(mut session: BrowserSession) -> CleanupResult {
    let mut errors = Vec::new();

    match tokio::time::timeout(TEARDOWN_TIMEOUT, session.browser.close()).await {
        Ok(Ok(_)) => debug!("Browser closed successfully"),
        Ok(Err(e)) => {
            debug!("Browser close failed (process may already be gone): {e}");
            errors.push(format!("Browser close failed: {e}"));
        }
        Err(_) => errors.push("Browser close timed out".to_string()),
    }

    match tokio::time::timeout(TEARDOWN_TIMEOUT, session.browser.wait()).await {
        Ok(Ok(_)) => debug!("Browser process exited"),
        Ok(Err(e)) => errors.push(format!("Browser wait failed: {e}")),
        Err(_) => {
            warn!("Browser did not exit in time, killing process");
            if let Some(Err(e)) = session.browser.kill().await {
                errors.push(format!("Browser kill failed: {e}"));
            }
        }
    }

    session.handler.abort();

    if let Some(err) = session.cleanup_temp_dir() {
        errors.push(err);
    }

    if errors.is_empty() {
        info!("Browser session released");
        CleanupResult::Success
    } else {
        debug!("Browser session released with teardown errors: {errors:?}");
        CleanupResult::PartialFailure(errors)
    }
}
