//! Analysis record schema
//!
//! `PartialAnalysis` is what could be read from a model reply: every top-level
//! section optional. [`PartialAnalysis::merge_with_defaults`] is the only place
//! missing sections are back-filled, so the defaulting rules live in one pure
//! function.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::utils::safe_truncate_chars;

/// Placeholder for profile fields the model did not determine
pub const NOT_DETERMINED: &str = "Not determined";
/// Description attached to back-filled metrics
pub const NOT_EVALUATED: &str = "not evaluated";
/// Score attached to back-filled metrics
pub const DEFAULT_METRIC_SCORE: u8 = 5;
/// Positioning summary used when the section is missing
pub const ANALYSIS_INCOMPLETE: &str = "Analysis not completed";
/// Positioning summary of a fallback record built from an empty reply
pub const NO_RESPONSE: &str = "No response received";
/// `error` marker of a fallback record
pub const PARSE_FAILURE_MARKER: &str = "Failed to parse JSON response";
/// Niche of a fallback record
pub const ANALYSIS_ERROR_NICHE: &str = "Analysis error";
/// Characters of raw output kept in a fallback record's summary
pub const FALLBACK_SUMMARY_CHARS: usize = 500;

/// The seven metrics every analysis is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    VisualDesign,
    Usability,
    ContentQuality,
    TrustSignals,
    CallToAction,
    MobileFriendliness,
    Innovation,
}

impl MetricKey {
    pub const ALL: [MetricKey; 7] = [
        MetricKey::VisualDesign,
        MetricKey::Usability,
        MetricKey::ContentQuality,
        MetricKey::TrustSignals,
        MetricKey::CallToAction,
        MetricKey::MobileFriendliness,
        MetricKey::Innovation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VisualDesign => "visual_design",
            Self::Usability => "usability",
            Self::ContentQuality => "content_quality",
            Self::TrustSignals => "trust_signals",
            Self::CallToAction => "call_to_action",
            Self::MobileFriendliness => "mobile_friendliness",
            Self::Innovation => "innovation",
        }
    }

    /// What the metric measures, as explained to the model
    #[must_use]
    pub const fn meaning(self) -> &'static str {
        match self {
            Self::VisualDesign => "overall visual quality, colour scheme, typography",
            Self::Usability => "clarity of the interface, navigation, information structure",
            Self::ContentQuality => "quality, clarity and correctness of the copy",
            Self::TrustSignals => "reviews, case studies, partners, certificates, guarantees",
            Self::CallToAction => "effectiveness of buttons and calls to action",
            Self::MobileFriendliness => "responsiveness, speed, convenience on mobile",
            Self::Innovation => "unique features, modern technology, creative solutions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub score: u8,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub tagline: String,
    pub niche: String,
    pub target_audience: String,
    pub main_offer: String,
    pub unique_selling_points: Vec<String>,
}

impl CompanyInfo {
    /// Profile used when the model omitted the section entirely
    #[must_use]
    pub fn undetermined(competitor_name: &str) -> Self {
        Self {
            name: competitor_name.to_string(),
            tagline: String::new(),
            niche: NOT_DETERMINED.to_string(),
            target_audience: NOT_DETERMINED.to_string(),
            main_offer: NOT_DETERMINED.to_string(),
            unique_selling_points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

/// Structured assessment of one competitor site
///
/// Every section is always present. `error` is set only on fallback records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub company_info: CompanyInfo,
    pub metrics: BTreeMap<String, Metric>,
    pub competitive_analysis: CompetitiveAnalysis,
    pub positioning_summary: String,
    pub recommendations_for_user: Vec<String>,
    pub key_takeaways: Vec<String>,
    pub average_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisRecord {
    /// Deterministic record substituted for an unparseable reply
    #[must_use]
    pub fn fallback(competitor_name: &str, raw_output: &str) -> Self {
        let raw = raw_output.trim();
        let positioning_summary = if raw.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            safe_truncate_chars(raw, FALLBACK_SUMMARY_CHARS).to_string()
        };

        Self {
            company_info: CompanyInfo {
                name: competitor_name.to_string(),
                niche: ANALYSIS_ERROR_NICHE.to_string(),
                ..CompanyInfo::default()
            },
            metrics: default_metrics(),
            competitive_analysis: CompetitiveAnalysis::default(),
            positioning_summary,
            recommendations_for_user: Vec::new(),
            key_takeaways: Vec::new(),
            average_score: 0.0,
            error: Some(PARSE_FAILURE_MARKER.to_string()),
        }
    }

    /// Whether this record was produced from an unparseable reply
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// All seven metrics at the neutral default score
#[must_use]
pub fn default_metrics() -> BTreeMap<String, Metric> {
    MetricKey::ALL
        .iter()
        .map(|key| {
            (
                key.as_str().to_string(),
                Metric {
                    score: DEFAULT_METRIC_SCORE,
                    description: NOT_EVALUATED.to_string(),
                },
            )
        })
        .collect()
}

/// Mean of the present metric scores rounded to one decimal, 0 when none
///
/// Ties round to even: four scores summing to 25 average 6.2, not 6.3.
#[must_use]
pub fn average_score(metrics: &BTreeMap<String, Metric>) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    let total: u32 = metrics.values().map(|m| u32::from(m.score)).sum();
    let mean = f64::from(total) / metrics.len() as f64;
    (mean * 10.0).round_ties_even() / 10.0
}

/// Sections read from a model reply; `None` means missing or unusable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialAnalysis {
    pub company_info: Option<CompanyInfo>,
    pub metrics: Option<BTreeMap<String, Metric>>,
    pub competitive_analysis: Option<CompetitiveAnalysis>,
    pub positioning_summary: Option<String>,
    pub recommendations_for_user: Option<Vec<String>>,
    pub key_takeaways: Option<Vec<String>>,
}

impl PartialAnalysis {
    /// Read the six sections from a parsed JSON object
    ///
    /// A section whose value has the wrong shape counts as missing. Inside a
    /// present section, a null or wrongly typed field takes that field's default.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            company_info: object
                .get("company_info")
                .and_then(Value::as_object)
                .map(parse_company_info),
            metrics: object
                .get("metrics")
                .and_then(Value::as_object)
                .map(parse_metrics),
            competitive_analysis: object
                .get("competitive_analysis")
                .and_then(Value::as_object)
                .map(parse_competitive_analysis),
            positioning_summary: object
                .get("positioning_summary")
                .and_then(Value::as_str)
                .map(str::to_string),
            recommendations_for_user: object
                .get("recommendations_for_user")
                .and_then(string_list),
            key_takeaways: object.get("key_takeaways").and_then(string_list),
        }
    }

    /// Back-fill missing sections and compute the average score
    #[must_use]
    pub fn merge_with_defaults(self, competitor_name: &str) -> AnalysisRecord {
        let metrics = self.metrics.unwrap_or_else(default_metrics);
        let average_score = average_score(&metrics);

        AnalysisRecord {
            company_info: self
                .company_info
                .unwrap_or_else(|| CompanyInfo::undetermined(competitor_name)),
            metrics,
            competitive_analysis: self.competitive_analysis.unwrap_or_default(),
            positioning_summary: self
                .positioning_summary
                .unwrap_or_else(|| ANALYSIS_INCOMPLETE.to_string()),
            recommendations_for_user: self.recommendations_for_user.unwrap_or_default(),
            key_takeaways: self.key_takeaways.unwrap_or_default(),
            average_score,
            error: None,
        }
    }
}

fn parse_company_info(object: &Map<String, Value>) -> CompanyInfo {
    CompanyInfo {
        name: string_field(object, "name"),
        tagline: string_field(object, "tagline"),
        niche: string_field(object, "niche"),
        target_audience: string_field(object, "target_audience"),
        main_offer: string_field(object, "main_offer"),
        unique_selling_points: list_field(object, "unique_selling_points"),
    }
}

fn parse_competitive_analysis(object: &Map<String, Value>) -> CompetitiveAnalysis {
    CompetitiveAnalysis {
        strengths: list_field(object, "strengths"),
        weaknesses: list_field(object, "weaknesses"),
        opportunities: list_field(object, "opportunities"),
        threats: list_field(object, "threats"),
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn list_field(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object.get(key).and_then(string_list).unwrap_or_default()
}

/// Metric entries with a usable score; anything else is dropped
fn parse_metrics(object: &Map<String, Value>) -> BTreeMap<String, Metric> {
    object
        .iter()
        .filter_map(|(key, value)| {
            let entry = value.as_object()?;
            let score = entry.get("score").and_then(parse_score)?;
            let description = entry
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some((key.clone(), Metric { score, description }))
        })
        .collect()
}

/// Accepts integers, floats and numeric strings; rounds and clamps to 0..=10
fn parse_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    Some(raw.round().clamp(0.0, 10.0) as u8)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metrics_of(scores: &[(&str, u8)]) -> BTreeMap<String, Metric> {
        scores
            .iter()
            .map(|(k, s)| {
                (
                    (*k).to_string(),
                    Metric {
                        score: *s,
                        description: String::new(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_average_of_present_scores() {
        let metrics = metrics_of(&[("a", 8), ("b", 6), ("c", 0)]);
        assert_eq!(average_score(&metrics), 4.7);
    }

    #[test]
    fn test_average_ties_round_to_even() {
        let metrics = metrics_of(&[("a", 7), ("b", 6), ("c", 6), ("d", 6)]);
        assert_eq!(average_score(&metrics), 6.2);

        let metrics = metrics_of(&[("a", 7), ("b", 7), ("c", 7), ("d", 6)]);
        assert_eq!(average_score(&metrics), 6.8);
    }

    #[test]
    fn test_average_without_scores_is_zero() {
        assert_eq!(average_score(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_default_metrics_cover_all_keys() {
        let metrics = default_metrics();
        assert_eq!(metrics.len(), 7);
        for key in MetricKey::ALL {
            let metric = &metrics[key.as_str()];
            assert_eq!(metric.score, 5);
            assert_eq!(metric.description, "not evaluated");
        }
        assert_eq!(average_score(&metrics), 5.0);
    }

    #[test]
    fn test_merge_fills_every_missing_section() {
        let record = PartialAnalysis::default().merge_with_defaults("Acme");

        assert_eq!(record.company_info, CompanyInfo::undetermined("Acme"));
        assert_eq!(record.metrics, default_metrics());
        assert_eq!(record.competitive_analysis, CompetitiveAnalysis::default());
        assert_eq!(record.positioning_summary, ANALYSIS_INCOMPLETE);
        assert!(record.recommendations_for_user.is_empty());
        assert!(record.key_takeaways.is_empty());
        assert_eq!(record.average_score, 5.0);
        assert!(record.error.is_none());
    }

    #[test]
    fn test_merge_keeps_present_sections() {
        let partial = PartialAnalysis {
            positioning_summary: Some("Premium player".to_string()),
            key_takeaways: Some(vec!["Strong brand".to_string()]),
            metrics: Some(metrics_of(&[("usability", 9)])),
            ..PartialAnalysis::default()
        };

        let record = partial.merge_with_defaults("Acme");
        assert_eq!(record.positioning_summary, "Premium player");
        assert_eq!(record.key_takeaways, vec!["Strong brand".to_string()]);
        assert_eq!(record.metrics.len(), 1);
        assert_eq!(record.average_score, 9.0);
    }

    #[test]
    fn test_wrongly_shaped_sections_count_as_missing() {
        let value = json!({
            "company_info": "Acme Inc",
            "metrics": [1, 2, 3],
            "positioning_summary": 42,
            "key_takeaways": "one big takeaway"
        });
        let partial = PartialAnalysis::from_object(value.as_object().unwrap_or(&Map::new()));
        assert_eq!(partial, PartialAnalysis::default());
    }

    #[test]
    fn test_null_and_mistyped_fields_keep_the_rest_of_the_section() {
        let value = json!({
            "company_info": {
                "name": "Acme Inc",
                "tagline": null,
                "niche": "B2B widgets",
                "target_audience": 7,
                "unique_selling_points": ["Fast", 3, null]
            },
            "competitive_analysis": {
                "strengths": ["Brand"],
                "weaknesses": "none worth noting",
                "threats": null
            }
        });
        let partial = PartialAnalysis::from_object(value.as_object().unwrap_or(&Map::new()));
        let record = partial.merge_with_defaults("Acme");

        assert_eq!(record.company_info.name, "Acme Inc");
        assert_eq!(record.company_info.niche, "B2B widgets");
        assert_eq!(record.company_info.tagline, "");
        assert_eq!(record.company_info.target_audience, "");
        assert_eq!(record.company_info.main_offer, "");
        assert_eq!(record.company_info.unique_selling_points, vec!["Fast".to_string()]);
        assert_eq!(record.competitive_analysis.strengths, vec!["Brand".to_string()]);
        assert!(record.competitive_analysis.weaknesses.is_empty());
        assert!(record.competitive_analysis.threats.is_empty());
    }

    #[test]
    fn test_scores_are_rounded_and_clamped() {
        let value = json!({
            "metrics": {
                "visual_design": { "score": 7.6, "description": "clean" },
                "usability": { "score": "8" },
                "innovation": { "score": 14 },
                "trust_signals": { "score": "n/a" },
                "content_quality": "great"
            }
        });
        let partial = PartialAnalysis::from_object(value.as_object().unwrap_or(&Map::new()));
        let metrics = partial.metrics.unwrap_or_default();

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics["visual_design"].score, 8);
        assert_eq!(metrics["visual_design"].description, "clean");
        assert_eq!(metrics["usability"].score, 8);
        assert_eq!(metrics["innovation"].score, 10);
    }

    #[test]
    fn test_fallback_record_shape() {
        let record = AnalysisRecord::fallback("Acme", "Sorry, I cannot help with that");
        assert_eq!(record.company_info.name, "Acme");
        assert_eq!(record.company_info.niche, ANALYSIS_ERROR_NICHE);
        assert_eq!(record.metrics, default_metrics());
        assert_eq!(record.positioning_summary, "Sorry, I cannot help with that");
        assert_eq!(record.average_score, 0.0);
        assert_eq!(record.error.as_deref(), Some(PARSE_FAILURE_MARKER));
        assert!(record.is_fallback());
    }

    #[test]
    fn test_fallback_summary_truncated_and_placeholder() {
        let long = "x".repeat(900);
        assert_eq!(
            AnalysisRecord::fallback("Acme", &long).positioning_summary.len(),
            500
        );
        assert_eq!(
            AnalysisRecord::fallback("Acme", "   ").positioning_summary,
            NO_RESPONSE
        );
    }
}
