//! Environment loader for `MonitorConfig`

use super::types::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_TEXT_MODEL: &str = "COMPETITOR_MONITOR_TEXT_MODEL";
pub const ENV_VISION_MODEL: &str = "COMPETITOR_MONITOR_VISION_MODEL";
pub const ENV_HEADLESS: &str = "COMPETITOR_MONITOR_HEADLESS";
pub const ENV_PAGE_TIMEOUT: &str = "COMPETITOR_MONITOR_PAGE_TIMEOUT";
pub const ENV_DATA_DIR: &str = "COMPETITOR_MONITOR_DATA_DIR";

impl MonitorConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// A missing or empty `OPENAI_API_KEY` is a fatal `MonitorError::Config`.
    pub fn from_env() -> MonitorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> MonitorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                MonitorError::Config(format!(
                    "{ENV_API_KEY} is not set; add it to the environment or a .env file"
                ))
            })?;

        let mut builder = Self::builder().api_key(api_key);

        if let Some(url) = lookup(ENV_BASE_URL) {
            builder = builder.api_base_url(url.trim_end_matches('/').to_string());
        }
        if let Some(model) = lookup(ENV_TEXT_MODEL) {
            builder = builder.text_model(model);
        }
        if let Some(model) = lookup(ENV_VISION_MODEL) {
            builder = builder.vision_model(model);
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            builder = builder.headless(parse_bool(ENV_HEADLESS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_PAGE_TIMEOUT) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                MonitorError::Config(format!("{ENV_PAGE_TIMEOUT}={raw:?} is not a number: {e}"))
            })?;
            builder = builder.page_timeout_secs(secs).script_timeout_secs(secs);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            builder = builder.data_dir(dir);
        }

        builder.build()
    }
}

fn parse_bool(name: &str, raw: &str) -> MonitorResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MonitorError::Config(format!(
            "{name}={other:?} is not a boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let result = MonitorConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_env_overrides_are_applied() -> MonitorResult<()> {
        let config = MonitorConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_BASE_URL, "http://localhost:9999/v1/"),
            (ENV_HEADLESS, "false"),
            (ENV_PAGE_TIMEOUT, "30"),
            (ENV_DATA_DIR, "/var/lib/monitor"),
        ]))?;

        assert_eq!(config.analysis.api_base_url, "http://localhost:9999/v1");
        assert!(!config.browser.headless);
        assert_eq!(config.browser.page_timeout_secs, 30);
        assert_eq!(config.reports_dir.to_string_lossy(), "/var/lib/monitor/outputs");
        Ok(())
    }

    #[test]
    fn test_bad_boolean_rejected() {
        let result = MonitorConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_HEADLESS, "maybe"),
        ]));
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }
}
