use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisRecord;
use crate::error::MonitorError;
use crate::page_extractor::ExtractionResult;
use crate::utils::name_from_url;

/// Input shape of a competitor: `name` may be absent or blank
#[derive(Debug, Clone, Deserialize)]
struct CompetitorInput {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: String,
}

impl From<CompetitorInput> for CompetitorRef {
    fn from(input: CompetitorInput) -> Self {
        Self::new(input.url, input.name)
    }
}

/// A competitor site under analysis
///
/// The display name is resolved once at construction: a blank or absent name
/// becomes the URL's host without a leading `www.`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CompetitorInput")]
pub struct CompetitorRef {
    name: String,
    url: String,
}

impl CompetitorRef {
    pub fn new(url: impl Into<String>, name: Option<String>) -> Self {
        let url = url.into().trim().to_string();
        let name = match name {
            Some(n) if !n.trim().is_empty() => n.trim().to_string(),
            _ => name_from_url(&url),
        };
        Self { name, url }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Entries with a blank URL are skipped by batch runs
    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Result of one fetch, successful or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub competitor: CompetitorRef,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub data: ExtractionResult,
}

impl ParseOutcome {
    #[must_use]
    pub fn succeeded(
        competitor: CompetitorRef,
        started: DateTime<Utc>,
        data: ExtractionResult,
    ) -> Self {
        Self {
            competitor,
            timestamp: started,
            success: true,
            error: None,
            data,
        }
    }

    #[must_use]
    pub fn failed(competitor: CompetitorRef, started: DateTime<Utc>, error: &MonitorError) -> Self {
        Self {
            competitor,
            timestamp: started,
            success: false,
            error: Some(error.to_string()),
            data: ExtractionResult::default(),
        }
    }

    /// Screenshot written during the fetch, if any
    #[must_use]
    pub fn screenshot_path(&self) -> Option<&str> {
        self.data
            .screenshot_path
            .as_deref()
            .filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Image,
    Text,
}

/// Outcome of the analysis step for one competitor
#[derive(Debug)]
pub enum AnalysisOutcome {
    Image(AnalysisRecord),
    Text(AnalysisRecord),
    Failed(MonitorError),
}

impl AnalysisOutcome {
    #[must_use]
    pub fn record(&self) -> Option<&AnalysisRecord> {
        match self {
            Self::Image(record) | Self::Text(record) => Some(record),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn analysis_type(&self) -> Option<AnalysisType> {
        match self {
            Self::Image(_) => Some(AnalysisType::Image),
            Self::Text(_) => Some(AnalysisType::Text),
            Self::Failed(_) => None,
        }
    }
}

/// One competitor's row in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub competitor: CompetitorRef,
    pub parse_outcome: ParseOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

impl ReportItem {
    /// Item for a failed fetch; analysis is never attempted
    #[must_use]
    pub fn fetch_failed(parse_outcome: ParseOutcome) -> Self {
        Self {
            competitor: parse_outcome.competitor.clone(),
            parse_outcome,
            analysis: None,
            analysis_type: None,
            analysis_error: None,
        }
    }

    #[must_use]
    pub fn analyzed(parse_outcome: ParseOutcome, outcome: AnalysisOutcome) -> Self {
        let analysis_type = outcome.analysis_type();
        let (analysis, analysis_error) = match outcome {
            AnalysisOutcome::Image(record) | AnalysisOutcome::Text(record) => (Some(record), None),
            AnalysisOutcome::Failed(e) => (None, Some(e.to_string())),
        };
        Self {
            competitor: parse_outcome.competitor.clone(),
            parse_outcome,
            analysis,
            analysis_type,
            analysis_error,
        }
    }
}

/// Aggregate result of one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorReport {
    pub timestamp: DateTime<Utc>,
    pub total_competitors: usize,
    /// Items whose fetch succeeded, regardless of analysis outcome
    pub successful_count: usize,
    pub items: Vec<ReportItem>,
}

impl CompetitorReport {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, items: Vec<ReportItem>) -> Self {
        let successful_count = items.iter().filter(|i| i.parse_outcome.success).count();
        Self {
            timestamp,
            total_competitors: items.len(),
            successful_count,
            items,
        }
    }
}
