//! Batch and single-competitor runs
//!
//! Items are processed through a `buffered` stream so report order always
//! matches input order. With the default concurrency of 1 each competitor's
//! fetch-then-analyze sequence finishes before the next one starts.

use chrono::Utc;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::analyzer::{Analyzer, analyze_text_outcome, analyze_with_fallback};
use super::fetcher::{BrowserFetcher, SiteFetcher};
use super::types::{AnalysisOutcome, CompetitorRef, CompetitorReport, ParseOutcome, ReportItem};
use crate::analysis::AnalysisClient;
use crate::config::{BatchConfig, MonitorConfig};
use crate::error::MonitorResult;

/// Start schedule shared by the items of one run
///
/// Every item after the first starts at least one delay after both the
/// previous item's start slot and the moment it became ready. Sequential runs
/// therefore pause between items, and concurrent runs space their starts.
struct Pacer {
    delay: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl Pacer {
    fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_start: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        let start = {
            let mut last_start = self.last_start.lock().await;
            let now = Instant::now();
            let start = match *last_start {
                None => now,
                Some(previous) => previous.max(now) + self.delay,
            };
            *last_start = Some(start);
            start
        };
        if start > Instant::now() {
            tokio::time::sleep_until(start).await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Orchestrator<F, A> {
    fetcher: F,
    analyzer: A,
    batch: BatchConfig,
}

impl Orchestrator<BrowserFetcher, AnalysisClient> {
    /// Browser-backed orchestrator for `config`
    ///
    /// # Errors
    ///
    /// `MonitorError::Config` when the analysis client cannot be built.
    pub fn from_config(config: &MonitorConfig) -> MonitorResult<Self> {
        Ok(Self::new(
            BrowserFetcher::from_config(config),
            AnalysisClient::new(config.analysis.clone())?,
            config.batch.clone(),
        ))
    }
}

impl<F: SiteFetcher, A: Analyzer> Orchestrator<F, A> {
    pub fn new(fetcher: F, analyzer: A, batch: BatchConfig) -> Self {
        Self {
            fetcher,
            analyzer,
            batch,
        }
    }

    fn concurrency(&self) -> usize {
        self.batch.max_concurrency.max(1)
    }

    fn pacer(&self) -> Pacer {
        Pacer::new(self.batch.politeness_delay_ms)
    }

    /// Fetch one page
    pub async fn fetch_one(
        &self,
        url: &str,
        name: Option<String>,
        capture_screenshot: bool,
    ) -> ParseOutcome {
        let competitor = CompetitorRef::new(url, name);
        self.fetcher.fetch(&competitor, capture_screenshot).await
    }

    /// Fetch every competitor, in input order
    pub async fn fetch_many(
        &self,
        competitors: &[CompetitorRef],
        capture_screenshots: bool,
    ) -> Vec<ParseOutcome> {
        let pacer = self.pacer();
        let pacer = &pacer;
        futures::stream::iter(competitors)
            .map(|competitor| async move {
                pacer.wait_turn().await;
                self.fetcher.fetch(competitor, capture_screenshots).await
            })
            .buffered(self.concurrency())
            .collect()
            .await
    }

    /// Fetch and text-analyze every competitor with a URL
    ///
    /// Entries with a blank URL are dropped. Fetch and analysis failures are
    /// recorded on their item; the run itself never fails.
    pub async fn run_batch(
        &self,
        competitors: &[CompetitorRef],
        capture_screenshots: bool,
    ) -> CompetitorReport {
        let started = Utc::now();
        let targets: Vec<&CompetitorRef> = competitors.iter().filter(|c| c.has_url()).collect();

        tracing::info!(
            total = targets.len(),
            skipped = competitors.len() - targets.len(),
            concurrency = self.concurrency(),
            "Starting batch run"
        );

        let pacer = self.pacer();
        let pacer = &pacer;
        let items: Vec<ReportItem> = futures::stream::iter(targets)
            .map(|competitor| async move {
                pacer.wait_turn().await;
                self.batch_item(competitor, capture_screenshots).await
            })
            .buffered(self.concurrency())
            .collect()
            .await;

        let report = CompetitorReport::new(started, items);
        tracing::info!(
            total = report.total_competitors,
            successful = report.successful_count,
            "Batch run finished"
        );
        report
    }

    async fn batch_item(&self, competitor: &CompetitorRef, capture_screenshot: bool) -> ReportItem {
        let outcome = self.fetcher.fetch(competitor, capture_screenshot).await;
        if !outcome.success {
            return ReportItem::fetch_failed(outcome);
        }

        let analysis = analyze_text_outcome(&self.analyzer, &outcome).await;
        if let AnalysisOutcome::Failed(e) = &analysis {
            tracing::warn!(competitor = competitor.name(), "Analysis failed: {e}");
        }
        ReportItem::analyzed(outcome, analysis)
    }

    /// Fetch one competitor and analyze it, preferring the screenshot
    pub async fn run_single(
        &self,
        competitor: &CompetitorRef,
        capture_screenshot: bool,
    ) -> ReportItem {
        let outcome = self.fetcher.fetch(competitor, capture_screenshot).await;
        if !outcome.success {
            return ReportItem::fetch_failed(outcome);
        }

        let analysis = analyze_with_fallback(&self.analyzer, &outcome).await;
        ReportItem::analyzed(outcome, analysis)
    }
}
