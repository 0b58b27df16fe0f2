//! Hand-off of reports and single analyses to disk
//!
//! Write-only: each call produces one pretty-printed, timestamped JSON file.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::MonitorResult;
use crate::pipeline::CompetitorReport;
use crate::utils::file_timestamp;

/// What a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Fetch plus analysis of one site
    Single,
    /// Analysis of supplied text
    Text,
    /// Analysis of a supplied screenshot
    Image,
}

impl HistoryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryEntry<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: HistoryKind,
    competitor: &'a str,
    timestamp: DateTime<Local>,
    result: &'a T,
}

async fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: String,
    value: &T,
) -> MonitorResult<PathBuf> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, json).await?;
    log::info!("Saved {}", path.display());
    Ok(path)
}

/// Write `report` as `report_<YYYYmmdd_HHMMSS>.json` in `dir`
pub async fn save_report(report: &CompetitorReport, dir: &Path) -> MonitorResult<PathBuf> {
    let name = format!("report_{}.json", file_timestamp(report.timestamp.with_timezone(&Local)));
    write_json(dir, name, report).await
}

/// Write `{type, competitor, timestamp, result}` as `<kind>_<YYYYmmdd_HHMMSS>.json`
pub async fn save_history_entry<T: Serialize>(
    kind: HistoryKind,
    competitor: &str,
    result: &T,
    dir: &Path,
) -> MonitorResult<PathBuf> {
    let now = Local::now();
    let entry = HistoryEntry {
        kind,
        competitor,
        timestamp: now,
        result,
    };
    let name = format!("{}_{}.json", kind.as_str(), file_timestamp(now));
    write_json(dir, name, &entry).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::pipeline::{CompetitorRef, ParseOutcome, ReportItem};
    use chrono::Utc;
    use serde_json::Value;

    #[tokio::test]
    async fn test_save_report_writes_timestamped_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let report = CompetitorReport::new(Utc::now(), Vec::new());

        let path = save_report(&report, &dir.path().join("outputs")).await?;

        let file = path.file_name().and_then(|f| f.to_str()).unwrap_or_default();
        assert!(file.starts_with("report_") && file.ends_with(".json"), "{file}");

        let value: Value = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
        assert_eq!(value["total_competitors"], 0);
        assert_eq!(value["successful_count"], 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_entry_shape() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let result = serde_json::json!({ "average_score": 6.5 });

        let path = save_history_entry(HistoryKind::Text, "Acme", &result, dir.path()).await?;

        let file = path.file_name().and_then(|f| f.to_str()).unwrap_or_default();
        assert!(file.starts_with("text_"), "{file}");

        let value: Value = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
        assert_eq!(value["type"], "text");
        assert_eq!(value["competitor"], "Acme");
        assert_eq!(value["result"]["average_score"], 6.5);
        assert!(value["timestamp"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_single_run_is_recorded() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let competitor = CompetitorRef::new("https://down.test", Some("Acme".to_string()));
        let error = MonitorError::fetch(competitor.url(), "net::ERR_CONNECTION_REFUSED");
        let item = ReportItem::fetch_failed(ParseOutcome::failed(competitor, Utc::now(), &error));

        let path = save_history_entry(HistoryKind::Single, "Acme", &item, dir.path()).await?;

        let value: Value = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
        assert_eq!(value["type"], "single");
        assert_eq!(value["result"]["parse_outcome"]["success"], false);
        assert!(value["result"].get("analysis").is_none());
        Ok(())
    }
}
