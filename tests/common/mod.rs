//! Test utilities shared by the competitor-monitor integration tests

use competitor_monitor::MonitorConfig;
use mockito::{Matcher, Mock, ServerGuard};
use std::path::Path;

/// Config pointing the analysis client at `base_url`, data under `data_dir`
#[allow(dead_code)]
pub fn test_config(base_url: &str, data_dir: &Path) -> MonitorConfig {
    MonitorConfig::builder()
        .api_base_url(base_url)
        .data_dir(data_dir)
        .politeness_delay_ms(0)
        .request_timeout_secs(5)
        .api_key("sk-test")
        .build()
        .unwrap()
}

/// Chat-completions response body whose assistant message is `content`
#[allow(dead_code)]
pub fn chat_completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// A complete, well-formed analysis reply
#[allow(dead_code)]
pub fn full_model_reply() -> String {
    serde_json::json!({
        "company_info": {
            "name": "Acme",
            "tagline": "Widgets that work",
            "niche": "B2B hardware",
            "target_audience": "Small manufacturers",
            "main_offer": "Industrial widgets",
            "unique_selling_points": ["Lifetime warranty", "Next-day shipping"]
        },
        "metrics": {
            "visual_design": { "score": 8, "description": "Clean layout" },
            "usability": { "score": 7, "description": "Clear navigation" },
            "content_quality": { "score": 6, "description": "Some jargon" },
            "trust_signals": { "score": 9, "description": "Many case studies" },
            "call_to_action": { "score": 5, "description": "CTA below the fold" },
            "mobile_friendliness": { "score": 7, "description": "Responsive" },
            "innovation": { "score": 4, "description": "Conventional" }
        },
        "competitive_analysis": {
            "strengths": ["Brand recognition"],
            "weaknesses": ["Dated pricing page"],
            "opportunities": ["Self-serve onboarding"],
            "threats": ["Price competition"]
        },
        "positioning_summary": "Acme positions itself as the reliable choice.",
        "recommendations_for_user": ["Publish case studies"],
        "key_takeaways": ["Trust is their main lever"]
    })
    .to_string()
}

/// Mock every chat-completions call with a 200 returning `content`
#[allow(dead_code)]
pub async fn mock_chat(server: &mut ServerGuard, content: &str) -> Mock {
    server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(content))
        .create_async()
        .await
}

/// Mock chat-completions calls whose request body contains `needle`
#[allow(dead_code)]
pub async fn mock_chat_matching(
    server: &mut ServerGuard,
    needle: &str,
    status: usize,
    content: &str,
) -> Mock {
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex(regex_escape(needle)))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(content))
        .create_async()
        .await
}

#[allow(dead_code)]
fn regex_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
