//! Core configuration types
//!
//! Browser, analysis and batch settings are grouped so each component only
//! receives the part it consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{MonitorError, MonitorResult};
use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_PAGE_TIMEOUT_SECS, DEFAULT_POLITENESS_DELAY_MS,
    DEFAULT_READY_WAIT_SECS, DEFAULT_SCREENSHOT_SETTLE_MS, DEFAULT_SETTLE_DELAY_MS,
    MAX_ANALYSIS_TEXT_CHARS, MAX_SCREENSHOT_HEIGHT,
};

/// Settings for one headless browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// Upper bound for `page.goto()`. Exceeding it is non-fatal: extraction
    /// proceeds on whatever DOM is loaded.
    pub page_timeout_secs: u64,

    /// Upper bound for each in-page script evaluation
    pub script_timeout_secs: u64,

    /// Upper bound for the `document.body` readiness wait after navigation
    pub implicit_wait_secs: u64,

    /// Browser window size (width, height)
    pub window_size: (u32, u32),

    /// Block image loading to speed up text extraction
    pub disable_images: bool,

    pub user_agent: String,

    /// Best-effort suppression of automation-detection signals
    pub anti_automation_masking: bool,

    /// Fixed delay after the readiness wait so client-rendered content can populate
    pub settle_delay_ms: u64,

    /// Delay after resizing the viewport before a screenshot is captured
    pub screenshot_settle_ms: u64,

    /// Full-page screenshots never exceed this viewport height
    pub max_screenshot_height: u32,

    /// Explicit Chrome/Chromium binary. When unset, `CHROMIUM_PATH` and the
    /// platform install locations are searched.
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            script_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            implicit_wait_secs: DEFAULT_READY_WAIT_SECS,
            window_size: (1920, 1080),
            disable_images: true,
            user_agent: CHROME_USER_AGENT.to_string(),
            anti_automation_masking: true,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            screenshot_settle_ms: DEFAULT_SCREENSHOT_SETTLE_MS,
            max_screenshot_height: MAX_SCREENSHOT_HEIGHT,
            chrome_executable: None,
        }
    }
}

impl BrowserConfig {
    /// Reject timeout combinations the extractor cannot honour
    pub fn validate(&self) -> MonitorResult<()> {
        if self.page_timeout_secs == 0 {
            return Err(MonitorError::InvalidInput(
                "page_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.implicit_wait_secs >= self.page_timeout_secs {
            return Err(MonitorError::InvalidInput(format!(
                "implicit_wait_secs ({}) must be shorter than page_timeout_secs ({})",
                self.implicit_wait_secs, self.page_timeout_secs
            )));
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(MonitorError::InvalidInput(
                "window_size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the generative model endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API, without trailing `/chat/completions`
    pub api_base_url: String,

    /// Cost-optimized model used for text-mode analysis
    pub text_model: String,

    /// Vision-capable model used for screenshot analysis
    pub vision_model: String,

    pub max_tokens: u32,
    pub temperature: f32,

    /// Caller-side bound on one model round trip
    pub request_timeout_secs: u64,

    /// Text-mode input is truncated to this many characters
    pub max_text_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            text_model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o".to_string(),
            max_tokens: 3000,
            temperature: 0.7,
            request_timeout_secs: 120,
            max_text_chars: MAX_ANALYSIS_TEXT_CHARS,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_text_chars", &self.max_text_chars)
            .finish()
    }
}

/// Settings for batch orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause before every fetch except the first
    pub politeness_delay_ms: u64,

    /// Competitors processed at once. 1 keeps the run strictly sequential.
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            politeness_delay_ms: DEFAULT_POLITENESS_DELAY_MS,
            max_concurrency: 1,
        }
    }
}

/// Main configuration struct, passed explicitly into every component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub browser: BrowserConfig,
    pub analysis: AnalysisConfig,
    pub batch: BatchConfig,
    pub screenshots_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub history_dir: PathBuf,
}

impl MonitorConfig {
    /// Start a builder. The API key must be supplied before `build()` is available.
    #[must_use]
    pub fn builder() -> super::MonitorConfigBuilder<super::NeedsApiKey> {
        super::MonitorConfigBuilder::default()
    }

    /// Create the screenshot, report and history directories if missing
    pub async fn ensure_dirs(&self) -> MonitorResult<()> {
        for dir in [&self.screenshots_dir, &self.reports_dir, &self.history_dir] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_browser_config_is_valid() {
        assert!(BrowserConfig::default().validate().is_ok());
    }

    #[test]
    fn test_implicit_wait_must_be_shorter_than_page_timeout() {
        let config = BrowserConfig {
            page_timeout_secs: 5,
            implicit_wait_secs: 5,
            ..BrowserConfig::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_page_timeout_rejected() {
        let config = BrowserConfig {
            page_timeout_secs: 0,
            implicit_wait_secs: 0,
            ..BrowserConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analysis_config_debug_redacts_key() {
        let config = AnalysisConfig {
            api_key: "sk-secret".to_string(),
            ..AnalysisConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
