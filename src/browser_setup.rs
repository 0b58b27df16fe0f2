use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::config::BrowserConfig;

/// Find Chrome/Chromium executable on the system with platform-specific search paths.
///
/// Resolution order: explicit `chrome_executable` from config, the
/// `CHROMIUM_PATH` environment variable, well-known install locations, then
/// `which` on Unix. No browser is downloaded: an unresolvable binary is reported
/// immediately so session creation fails fast.
pub fn find_browser_executable(config: &BrowserConfig) -> Result<PathBuf> {
    if let Some(path) = &config.chrome_executable {
        if path.exists() {
            info!("Using configured browser executable: {}", path.display());
            return Ok(path.clone());
        }
        warn!(
            "Configured browser executable does not exist: {}",
            path.display()
        );
    }

    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(
                "Using browser from CHROMIUM_PATH environment variable: {}",
                path.display()
            );
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH environment variable points to non-existent file: {}",
            path.display()
        );
    }

    let paths: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "~/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for path_str in paths {
        let path = match path_str.strip_prefix("~/") {
            Some(rest) => match dirs::home_dir() {
                Some(home) => home.join(rest),
                None => continue,
            },
            None => PathBuf::from(path_str),
        };

        if path.exists() {
            info!("Found browser at: {}", path.display());
            return Ok(path);
        }
    }

    if !cfg!(target_os = "windows") {
        for cmd in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
            let output = Command::new("which").arg(cmd).output();

            if let Ok(output) = output
                && output.status.success()
            {
                let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path_str.is_empty() {
                    let path = PathBuf::from(path_str);
                    info!("Found browser using 'which' command: {}", path.display());
                    return Ok(path);
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "Chrome/Chromium executable not found; install Chrome or set CHROMIUM_PATH"
    ))
}

/// Build the chromiumoxide launch configuration from a `BrowserConfig`
fn build_launch_config(
    config: &BrowserConfig,
    chrome_path: PathBuf,
    user_data_dir: PathBuf,
) -> Result<chromiumoxide::BrowserConfig> {
    let (width, height) = config.window_size;

    // CDP requests (including `goto`) must not time out before our own bounds do
    let request_timeout = config.page_timeout_secs.max(config.script_timeout_secs) + 5;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(request_timeout))
        .window_size(width, height)
        .user_data_dir(user_data_dir)
        .chrome_executable(chrome_path);

    builder = if config.headless {
        builder.headless_mode(HeadlessMode::New)
    } else {
        builder.with_head()
    };

    builder = builder
        .arg(format!("--user-agent={}", config.user_agent))
        .arg("--no-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-gpu")
        .arg("--disable-extensions")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--hide-scrollbars")
        .arg("--mute-audio");

    if config.disable_images {
        builder = builder.arg("--blink-settings=imagesEnabled=false");
    }

    if config.anti_automation_masking {
        builder = builder.arg("--disable-blink-features=AutomationControlled");
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))
}

/// Launch an isolated browser instance for one fetch.
///
/// Returns the browser, its tracked CDP handler task, and the per-session
/// profile directory that must be removed once the browser has exited.
pub async fn launch_browser(config: &BrowserConfig) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let chrome_path = find_browser_executable(config)?;

    let user_data_dir =
        std::env::temp_dir().join(format!("competitor_monitor_chrome_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&user_data_dir).context("Failed to create user data directory")?;

    let launch_config = match build_launch_config(config, chrome_path, user_data_dir.clone()) {
        Ok(c) => c,
        Err(e) => {
            let _ = std::fs::remove_dir_all(&user_data_dir);
            return Err(e);
        }
    };

    debug!("Launching browser with config: {:?}", launch_config);
    let (browser, mut handler) = match Browser::launch(launch_config).await {
        Ok(pair) => pair,
        Err(e) => {
            let _ = std::fs::remove_dir_all(&user_data_dir);
            return Err(anyhow::Error::new(e).context("Failed to launch browser"));
        }
    };

    let handler_task = task::spawn(async move {
        while let Some(h) = handler.next().await {
            if let Err(e) = h {
                let error_msg = e.to_string();

                // chromiumoxide does not recognise every CDP event Chrome emits
                let is_benign_serialization_error = error_msg
                    .contains("data did not match any variant of untagged enum Message")
                    || error_msg.contains("Failed to deserialize WS response");

                if is_benign_serialization_error {
                    trace!("Suppressed benign CDP serialization error: {}", error_msg);
                } else {
                    error!("Browser handler error: {:?}", e);
                }
            }
        }
        debug!("Browser handler task completed");
    });

    info!("Browser launched (headless: {})", config.headless);
    Ok((browser, handler_task, user_data_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_executable_falls_through() {
        let config = BrowserConfig {
            chrome_executable: Some(PathBuf::from("/definitely/not/here/chrome")),
            ..BrowserConfig::default()
        };
        // Either another browser is installed or resolution fails; it never
        // returns the missing path.
        if let Ok(path) = find_browser_executable(&config) {
            assert_ne!(path, PathBuf::from("/definitely/not/here/chrome"));
        }
    }

    #[test]
    fn test_launch_config_builds_with_explicit_paths() {
        let config = BrowserConfig::default();
        let built = build_launch_config(
            &config,
            PathBuf::from("/usr/bin/chromium"),
            std::env::temp_dir().join("competitor_monitor_test_profile"),
        );
        assert!(built.is_ok());
    }
}
