pub mod analysis;
pub mod browser_session;
pub mod browser_setup;
pub mod config;
pub mod content_formatter;
pub mod error;
pub mod history;
pub mod kromekover;
pub mod page_extractor;
pub mod pipeline;
pub mod utils;

pub use analysis::{AnalysisClient, AnalysisRecord, validate};
pub use browser_session::{BrowserSession, CleanupResult, acquire, release};
pub use browser_setup::{find_browser_executable, launch_browser};
pub use config::{AnalysisConfig, BatchConfig, BrowserConfig, MonitorConfig};
pub use content_formatter::format as to_normalized_text;
pub use error::{MonitorError, MonitorResult};
pub use history::{HistoryKind, save_history_entry, save_report};
pub use page_extractor::schema::*;
pub use pipeline::{
    AnalysisOutcome, AnalysisType, Analyzer, BrowserFetcher, CompetitorRef, CompetitorReport,
    Orchestrator, ParseOutcome, ReportItem, SiteFetcher,
};

/// Fetch one page with a fresh browser
pub async fn fetch_one(
    config: &MonitorConfig,
    url: &str,
    name: Option<String>,
    capture_screenshot: bool,
) -> ParseOutcome {
    let competitor = CompetitorRef::new(url, name);
    BrowserFetcher::from_config(config)
        .fetch(&competitor, capture_screenshot)
        .await
}

/// Text-analyze every competitor with a URL and return the aggregate report
pub async fn run_batch(
    config: &MonitorConfig,
    competitors: &[CompetitorRef],
) -> MonitorResult<CompetitorReport> {
    let orchestrator = Orchestrator::from_config(config)?;
    Ok(orchestrator.run_batch(competitors, false).await)
}
