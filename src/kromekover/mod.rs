//! Minimal anti-automation masking
//!
//! Registers a handful of scripts with `Page.addScriptToEvaluateOnNewDocument`
//! so they run before any page script on every subsequent navigation. This is
//! best-effort suppression of the most common automation signals, not a
//! fingerprint-evasion framework.

use anyhow::Result;
use chromiumoxide::{Page, cdp};
use futures::future::join_all;
use tracing::{debug, warn};

// Order matters: navigator checks first, then Chrome-specific APIs
const EVASION_SCRIPTS: &[(&str, &str)] = &[
    (
        "navigator_webdriver",
        r"
        Object.defineProperty(Navigator.prototype, 'webdriver', {
            get: () => undefined,
            configurable: true
        });
        ",
    ),
    (
        "navigator_languages",
        r"
        if (!navigator.languages || navigator.languages.length === 0) {
            Object.defineProperty(Navigator.prototype, 'languages', {
                get: () => ['en-US', 'en']
            });
        }
        ",
    ),
    (
        "chrome_runtime",
        r"
        if (!window.chrome) { window.chrome = {}; }
        if (!window.chrome.runtime) {
            window.chrome.runtime = {
                connect: () => ({
                    onMessage: { addListener: () => {}, removeListener: () => {} },
                    postMessage: () => {}
                }),
                sendMessage: () => {}
            };
        }
        ",
    ),
];

async fn add_script(page: &Page, source: String) -> Result<()> {
    page.execute(
        cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams::new(source),
    )
    .await?;
    Ok(())
}

/// Register the evasion scripts on `page`
///
/// Individual failures are logged and skipped; the call fails only when no
/// script at all could be registered.
pub async fn inject(page: &Page) -> Result<()> {
    debug!("Injecting stealth scripts");

    let inject_futures: Vec<_> = EVASION_SCRIPTS
        .iter()
        .map(|(name, source)| async move { (*name, add_script(page, (*source).to_string()).await) })
        .collect();

    let mut success_count = 0;
    let mut failed = Vec::new();

    for (name, result) in join_all(inject_futures).await {
        match result {
            Ok(()) => {
                debug!("Injected: {}", name);
                success_count += 1;
            }
            Err(e) => {
                warn!("Failed to inject {}: {}", name, e);
                failed.push(name);
            }
        }
    }

    debug!(
        "Successfully injected {}/{} scripts",
        success_count,
        EVASION_SCRIPTS.len()
    );

    if success_count == 0 {
        return Err(anyhow::anyhow!(
            "Failed to inject any stealth scripts: {failed:?}"
        ));
    }

    Ok(())
}
