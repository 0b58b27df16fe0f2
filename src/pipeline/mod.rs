//! Fetch-extract-analyze pipeline.
//!
//! [`Orchestrator`] drives a [`SiteFetcher`] and an [`Analyzer`] over a list of
//! competitors and assembles a [`CompetitorReport`]. Per-item failures are
//! recorded on the item, never propagated.

pub mod analyzer;
pub mod fetcher;
pub mod orchestrator;
pub mod types;

pub use analyzer::{Analyzer, analyze_text_outcome, analyze_with_fallback};
pub use fetcher::{BrowserFetcher, SiteFetcher};
pub use orchestrator::Orchestrator;
pub use types::{
    AnalysisOutcome, AnalysisType, CompetitorRef, CompetitorReport, ParseOutcome, ReportItem,
};
