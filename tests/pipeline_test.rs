//! Orchestrator runs with a scripted fetcher and a mocked model endpoint

use chrono::Utc;
use competitor_monitor::{
    AnalysisClient, AnalysisType, CompetitorRef, ExtractionResult, Heading, MonitorError,
    Orchestrator, ParseOutcome, SiteFetcher, save_report, to_normalized_text,
};
use serde_json::Value;

mod common;
use common::{full_model_reply, mock_chat_matching, test_config};

/// Serves canned pages; hosts containing "offline" fail
struct ScriptedFetcher;

impl SiteFetcher for ScriptedFetcher {
    async fn fetch(&self, competitor: &CompetitorRef, capture_screenshot: bool) -> ParseOutcome {
        if competitor.url().contains("offline") {
            return ParseOutcome::failed(
                competitor.clone(),
                Utc::now(),
                &MonitorError::fetch(competitor.url(), "net::ERR_NAME_NOT_RESOLVED"),
            );
        }
        let data = ExtractionResult {
            page_title: format!("{} home", competitor.name()),
            headings: vec![Heading {
                level: 1,
                text: format!("Welcome to {}", competitor.name()),
            }],
            screenshot_path: capture_screenshot.then(|| "/nonexistent/shot.png".to_string()),
            ..ExtractionResult::default()
        };
        ParseOutcome::succeeded(competitor.clone(), Utc::now(), data)
    }
}

#[tokio::test]
async fn test_batch_isolates_fetch_and_model_failures() {
    let mut server = mockito::Server::new_async().await;
    let alpha = mock_chat_matching(&mut server, "Welcome to Alpha", 200, &full_model_reply()).await;
    let beta = mock_chat_matching(&mut server, "Welcome to Beta", 500, "{}").await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());
    let orchestrator = Orchestrator::new(
        ScriptedFetcher,
        AnalysisClient::new(config.analysis.clone()).unwrap(),
        config.batch.clone(),
    );

    let competitors: Vec<CompetitorRef> = serde_json::from_str(
        r#"[
            {"name": "Alpha", "url": "https://alpha.test"},
            {"name": "Skipped", "url": ""},
            {"name": "Gamma", "url": "https://offline.test"},
            {"name": "Beta", "url": "https://beta.test"}
        ]"#,
    )
    .unwrap();

    let report = orchestrator.run_batch(&competitors, false).await;

    alpha.assert_async().await;
    beta.assert_async().await;

    assert_eq!(report.total_competitors, 3);
    assert_eq!(report.successful_count, 2);

    let names: Vec<&str> = report.items.iter().map(|i| i.competitor.name()).collect();
    assert_eq!(names, vec!["Alpha", "Gamma", "Beta"]);

    let alpha_item = &report.items[0];
    assert_eq!(alpha_item.analysis_type, Some(AnalysisType::Text));
    assert_eq!(alpha_item.analysis.as_ref().map(|a| a.average_score), Some(6.6));

    let gamma_item = &report.items[1];
    assert!(!gamma_item.parse_outcome.success);
    assert!(gamma_item.analysis.is_none());
    assert!(gamma_item.analysis_error.is_none());

    let beta_item = &report.items[2];
    assert!(beta_item.parse_outcome.success);
    assert!(beta_item.analysis.is_none());
    assert!(beta_item.analysis_error.as_deref().unwrap().contains("500"));

    let path = save_report(&report, &config.reports_dir).await.unwrap();
    let saved = tokio::fs::read_to_string(path).await.unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["total_competitors"], 3);
    assert_eq!(saved["items"][0]["analysis_type"], "text");
    assert_eq!(saved["items"][1]["parse_outcome"]["success"], false);
}

#[tokio::test]
async fn test_single_falls_back_to_text_when_screenshot_unreadable() {
    let mut server = mockito::Server::new_async().await;
    let text_call =
        mock_chat_matching(&mut server, "Welcome to Alpha", 200, &full_model_reply()).await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());
    let orchestrator = Orchestrator::new(
        ScriptedFetcher,
        AnalysisClient::new(config.analysis.clone()).unwrap(),
        config.batch.clone(),
    );

    let competitor = CompetitorRef::new("https://alpha.test", Some("Alpha".to_string()));
    let item = orchestrator.run_single(&competitor, true).await;

    text_call.assert_async().await;
    assert_eq!(item.analysis_type, Some(AnalysisType::Text));
    assert!(item.analysis.is_some());
}

#[tokio::test]
async fn test_normalized_text_of_fetched_page() {
    let competitor = CompetitorRef::new("https://www.alpha.test", None);
    let outcome = ScriptedFetcher.fetch(&competitor, false).await;

    let text = to_normalized_text(&outcome);

    assert!(text.starts_with("# alpha.test\nURL: https://www.alpha.test\n"));
    assert!(text.contains("## Headings\n- [H1] Welcome to alpha.test\n"));
    assert!(text.contains("## Meta description\nnot found\n"));
}
