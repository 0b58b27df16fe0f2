//! Browser profile directories do not outlive a failed fetch
//!
//! Kept in its own test binary so no other browser test runs alongside it
//! while the temp directory is inspected.

use competitor_monitor::{
    BrowserFetcher, CompetitorRef, ExtractionResult, MonitorConfig, SiteFetcher,
};
use std::collections::HashSet;
use std::path::PathBuf;

const PROFILE_PREFIX: &str = "competitor_monitor_chrome_";

fn profile_dirs() -> HashSet<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(PROFILE_PREFIX))
        })
        .map(|entry| entry.path())
        .collect()
}

#[tokio::test]
#[ignore] // Requires browser installation
async fn test_profile_removed_after_extraction_error() {
    let mut server = mockito::Server::new_async().await;
    let _page = server
        .mock("GET", "/")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><head><title>Acme</title></head><body><h1>Acme</h1></body></html>")
        .create_async()
        .await;

    // A regular file where the screenshots directory should be makes the
    // screenshot write fail after the page has loaded
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"").unwrap();
    let config = MonitorConfig::builder()
        .data_dir(dir.path())
        .screenshots_dir(&blocker)
        .api_key("sk-test")
        .build()
        .unwrap();
    let fetcher = BrowserFetcher::from_config(&config);

    let before = profile_dirs();
    let outcome = fetcher
        .fetch(&CompetitorRef::new(server.url(), Some("Acme".to_string())), true)
        .await;
    let leftover: Vec<PathBuf> = profile_dirs().difference(&before).cloned().collect();

    assert!(!outcome.success);
    assert!(
        outcome.error.as_deref().unwrap_or_default().contains("not_a_dir"),
        "{:?}",
        outcome.error
    );
    assert_eq!(outcome.data, ExtractionResult::default());
    assert!(leftover.is_empty(), "profile directories left behind: {leftover:?}");
}
