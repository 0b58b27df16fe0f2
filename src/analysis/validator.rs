//! Turn raw model output into a guaranteed well-formed `AnalysisRecord`

use serde_json::Value;

use super::schema::{AnalysisRecord, PartialAnalysis};

const FENCE: &str = "```";

/// Remove an enclosing Markdown code fence and a leading `json` tag
///
/// Text that does not start with a fence is returned trimmed.
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return text;
    }

    // Opening line carries the fence and any language tag
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);
    let body = match body.trim_end().rsplit_once('\n') {
        Some((inner, last)) if last.trim() == FENCE => inner,
        None if body.trim() == FENCE => "",
        _ => body,
    };

    let body = body.trim();
    body.strip_prefix("json").map_or(body, str::trim_start)
}

/// Parse `raw` and back-fill missing sections
///
/// Never fails: anything that is not a JSON object after fence stripping
/// becomes a fallback record carrying the parse-failure marker.
#[must_use]
pub fn validate(raw: &str, competitor_name: &str) -> AnalysisRecord {
    let body = strip_code_fence(raw);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => {
            PartialAnalysis::from_object(&object).merge_with_defaults(competitor_name)
        }
        Ok(other) => {
            tracing::warn!(
                competitor = competitor_name,
                "Model reply is JSON but not an object ({}), using fallback record",
                json_kind(&other)
            );
            AnalysisRecord::fallback(competitor_name, body)
        }
        Err(e) => {
            tracing::warn!(
                competitor = competitor_name,
                error = %e,
                "Model reply is not valid JSON, using fallback record"
            );
            AnalysisRecord::fallback(competitor_name, body)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
