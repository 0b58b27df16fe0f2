//! Configuration module for the competitor monitor
//!
//! Provides `MonitorConfig`, an explicit value handed to each component at
//! construction, plus its type-safe builder and environment loader.

// Sub-modules
pub mod builder;
pub mod env;
pub mod types;

// Re-exports for public API
pub use builder::{MonitorConfigBuilder, NeedsApiKey, WithApiKey};
pub use types::{AnalysisConfig, BatchConfig, BrowserConfig, MonitorConfig};
