use std::future::Future;
use std::path::Path;

use super::types::{AnalysisOutcome, ParseOutcome};
use crate::analysis::{AnalysisClient, AnalysisRecord};
use crate::content_formatter;
use crate::error::MonitorResult;

/// Produces validated analysis records from page text or screenshots
pub trait Analyzer {
    fn analyze_text(
        &self,
        text: &str,
        competitor_name: &str,
    ) -> impl Future<Output = MonitorResult<AnalysisRecord>>;

    fn analyze_image(
        &self,
        path: &Path,
        competitor_name: &str,
    ) -> impl Future<Output = MonitorResult<AnalysisRecord>>;
}

impl Analyzer for AnalysisClient {
    fn analyze_text(
        &self,
        text: &str,
        competitor_name: &str,
    ) -> impl Future<Output = MonitorResult<AnalysisRecord>> {
        AnalysisClient::analyze_text(self, text, competitor_name)
    }

    fn analyze_image(
        &self,
        path: &Path,
        competitor_name: &str,
    ) -> impl Future<Output = MonitorResult<AnalysisRecord>> {
        AnalysisClient::analyze_image(self, path, competitor_name)
    }
}

/// Text-mode analysis of a fetched page
pub async fn analyze_text_outcome<A: Analyzer>(
    analyzer: &A,
    outcome: &ParseOutcome,
) -> AnalysisOutcome {
    let text = content_formatter::format(outcome);
    match analyzer.analyze_text(&text, outcome.competitor.name()).await {
        Ok(record) => AnalysisOutcome::Text(record),
        Err(e) => AnalysisOutcome::Failed(e),
    }
}

/// Image analysis when a screenshot exists, text analysis otherwise
///
/// Any image-mode error is logged and followed by one text-mode attempt.
pub async fn analyze_with_fallback<A: Analyzer>(
    analyzer: &A,
    outcome: &ParseOutcome,
) -> AnalysisOutcome {
    let name = outcome.competitor.name();

    if let Some(path) = outcome.screenshot_path() {
        match analyzer.analyze_image(Path::new(path), name).await {
            Ok(record) => return AnalysisOutcome::Image(record),
            Err(e) => {
                tracing::warn!(
                    competitor = name,
                    "Image analysis failed ({e}), falling back to text"
                );
            }
        }
    }

    analyze_text_outcome(analyzer, outcome).await
}
