use serde::{Deserialize, Serialize};

use crate::utils::{
    MAX_CTA_CHARS, MAX_CTA_LABELS, MAX_HEADINGS_PER_LEVEL, MAX_NAV_LINKS, MAX_PARAGRAPH_CHARS,
    MAX_PARAGRAPHS, MIN_PARAGRAPH_CHARS, char_len, safe_truncate_chars,
};

/// Heading texts grouped by level, in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHeadings {
    #[serde(default)]
    pub h1: Vec<String>,
    #[serde(default)]
    pub h2: Vec<String>,
    #[serde(default)]
    pub h3: Vec<String>,
}

/// Unfiltered DOM texts as returned by `CONTENT_SCRIPT`
///
/// All selection limits are applied in Rust by [`ExtractionResult::from_raw`]
/// so the heuristics can be tested without a browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPageContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub headings: RawHeadings,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    /// Buttons first, then anchors/elements carrying CTA markers
    #[serde(default)]
    pub cta_candidates: Vec<String>,
    /// Whether a `<nav>` landmark exists at all
    #[serde(default)]
    pub nav_found: bool,
    /// Link texts of the first `<nav>` landmark
    #[serde(default)]
    pub nav_links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Structured subset of a competitor page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub page_title: String,
    pub meta_description: String,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub cta_labels: Vec<String>,
    pub nav_links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_path: Option<String>,
}

impl ExtractionResult {
    /// Apply the extraction heuristics to raw DOM texts
    #[must_use]
    pub fn from_raw(raw: RawPageContent) -> Self {
        let mut headings = Vec::new();
        for (level, texts) in [(1u8, raw.headings.h1), (2, raw.headings.h2), (3, raw.headings.h3)] {
            // First N elements per level, empties dropped after the cut
            headings.extend(
                texts
                    .iter()
                    .take(MAX_HEADINGS_PER_LEVEL)
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .map(|t| Heading {
                        level,
                        text: t.to_string(),
                    }),
            );
        }

        let paragraphs = raw
            .paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| char_len(p) >= MIN_PARAGRAPH_CHARS)
            .take(MAX_PARAGRAPHS)
            .map(|p| safe_truncate_chars(p, MAX_PARAGRAPH_CHARS).to_string())
            .collect();

        let cta_labels = raw
            .cta_candidates
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty() && char_len(c) < MAX_CTA_CHARS)
            .take(MAX_CTA_LABELS)
            .map(str::to_string)
            .collect();

        let nav_links = if raw.nav_found {
            raw.nav_links
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .take(MAX_NAV_LINKS)
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };

        Self {
            page_title: raw.title,
            meta_description: raw.meta_description.unwrap_or_default(),
            headings,
            paragraphs,
            cta_labels,
            nav_links,
            screenshot_path: None,
        }
    }
}
