//! Model-backed competitor analysis.
//!
//! `client` talks to the chat-completions endpoint, `prompt` holds the fixed
//! instructions, `validator` turns whatever comes back into a complete
//! [`AnalysisRecord`].

pub mod client;
pub mod prompt;
pub mod schema;
pub mod validator;

pub use client::{AnalysisClient, mime_type_for};
pub use schema::{
    AnalysisRecord, CompanyInfo, CompetitiveAnalysis, Metric, MetricKey, PartialAnalysis,
    average_score, default_metrics,
};
pub use validator::{strip_code_fence, validate};
