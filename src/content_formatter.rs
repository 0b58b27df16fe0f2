//! Render a fetch outcome as the text block sent to the model
//!
//! Section order and placeholders are fixed so every prompt has the same shape.

use std::fmt::Write;

use crate::pipeline::ParseOutcome;

const NOT_FOUND: &str = "not found";
const NONE: &str = "- none";

/// Normalized text for `outcome`; pure and deterministic
#[must_use]
pub fn format(outcome: &ParseOutcome) -> String {
    let data = &outcome.data;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "# {}", outcome.competitor.name());
    let _ = writeln!(out, "URL: {}", outcome.competitor.url());

    section(&mut out, "Page title");
    let _ = writeln!(out, "{}", or_not_found(&data.page_title));

    section(&mut out, "Meta description");
    let _ = writeln!(out, "{}", or_not_found(&data.meta_description));

    section(&mut out, "Headings");
    bullets(
        &mut out,
        data.headings.iter().map(|h| format!("[H{}] {}", h.level, h.text)),
    );

    section(&mut out, "Main texts");
    bullets(&mut out, data.paragraphs.iter().cloned());

    section(&mut out, "CTA buttons");
    bullets(&mut out, data.cta_labels.iter().cloned());

    section(&mut out, "Navigation");
    bullets(&mut out, data.nav_links.iter().cloned());

    out
}

fn section(out: &mut String, title: &str) {
    let _ = write!(out, "\n## {title}\n");
}

fn or_not_found(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() { NOT_FOUND } else { value }
}

fn bullets(out: &mut String, items: impl Iterator<Item = String>) {
    let mut any = false;
    for item in items {
        any = true;
        let _ = writeln!(out, "- {item}");
    }
    if !any {
        let _ = writeln!(out, "{NONE}");
    }
}
