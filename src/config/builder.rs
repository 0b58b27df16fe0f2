//! Type-safe builder for `MonitorConfig` using the typestate pattern
//!
//! The analysis credential is the only required value, so `build()` exists only
//! once `api_key()` has been called.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::types::{AnalysisConfig, BatchConfig, BrowserConfig, MonitorConfig};
use crate::error::{MonitorError, MonitorResult};

// Type states for the builder
pub struct NeedsApiKey;
pub struct WithApiKey;

pub struct MonitorConfigBuilder<State = NeedsApiKey> {
    pub(crate) browser: BrowserConfig,
    pub(crate) analysis: AnalysisConfig,
    pub(crate) batch: BatchConfig,
    pub(crate) data_dir: PathBuf,
    pub(crate) screenshots_dir: Option<PathBuf>,
    pub(crate) reports_dir: Option<PathBuf>,
    pub(crate) history_dir: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for MonitorConfigBuilder<NeedsApiKey> {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            analysis: AnalysisConfig::default(),
            batch: BatchConfig::default(),
            data_dir: PathBuf::from("./data"),
            screenshots_dir: None,
            reports_dir: None,
            history_dir: None,
            _phantom: PhantomData,
        }
    }
}

impl MonitorConfigBuilder<NeedsApiKey> {
    /// Set the model API credential. Empty keys are rejected at `build()`.
    #[must_use]
    pub fn api_key(self, key: impl Into<String>) -> MonitorConfigBuilder<WithApiKey> {
        let mut analysis = self.analysis;
        analysis.api_key = key.into();
        MonitorConfigBuilder {
            browser: self.browser,
            analysis,
            batch: self.batch,
            data_dir: self.data_dir,
            screenshots_dir: self.screenshots_dir,
            reports_dir: self.reports_dir,
            history_dir: self.history_dir,
            _phantom: PhantomData,
        }
    }
}

impl<State> MonitorConfigBuilder<State> {
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    #[must_use]
    pub fn page_timeout_secs(mut self, secs: u64) -> Self {
        self.browser.page_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn script_timeout_secs(mut self, secs: u64) -> Self {
        self.browser.script_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn implicit_wait_secs(mut self, secs: u64) -> Self {
        self.browser.implicit_wait_secs = secs;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.browser.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.browser.window_size = (width, height);
        self
    }

    #[must_use]
    pub fn disable_images(mut self, disable: bool) -> Self {
        self.browser.disable_images = disable;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.browser.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn anti_automation_masking(mut self, enabled: bool) -> Self {
        self.browser.anti_automation_masking = enabled;
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl AsRef<Path>) -> Self {
        self.browser.chrome_executable = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.analysis.api_base_url = url.into();
        self
    }

    #[must_use]
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.analysis.text_model = model.into();
        self
    }

    #[must_use]
    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.analysis.vision_model = model.into();
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.analysis.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn politeness_delay_ms(mut self, ms: u64) -> Self {
        self.batch.politeness_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.batch.max_concurrency = limit;
        self
    }

    /// Root for the default `screenshots/`, `outputs/` and `history/` directories
    #[must_use]
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn screenshots_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.screenshots_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn reports_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.reports_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn history_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.history_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl MonitorConfigBuilder<WithApiKey> {
    /// Validate and produce the final configuration
    ///
    /// # Errors
    ///
    /// `MonitorError::Config` when the API key is blank,
    /// `MonitorError::InvalidInput` when browser timeouts are inconsistent or
    /// the concurrency bound is zero.
    pub fn build(self) -> MonitorResult<MonitorConfig> {
        if self.analysis.api_key.trim().is_empty() {
            return Err(MonitorError::Config(
                "model API key is empty; set OPENAI_API_KEY".to_string(),
            ));
        }
        if self.batch.max_concurrency == 0 {
            return Err(MonitorError::InvalidInput(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        self.browser.validate()?;

        let screenshots_dir = self
            .screenshots_dir
            .unwrap_or_else(|| self.data_dir.join("screenshots"));
        let reports_dir = self
            .reports_dir
            .unwrap_or_else(|| self.data_dir.join("outputs"));
        let history_dir = self
            .history_dir
            .unwrap_or_else(|| self.data_dir.join("history"));

        Ok(MonitorConfig {
            browser: self.browser,
            analysis: self.analysis,
            batch: self.batch,
            screenshots_dir,
            reports_dir,
            history_dir,
        })
    }
}
