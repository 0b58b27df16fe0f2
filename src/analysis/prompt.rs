//! Prompt texts sent with every analysis call

use super::schema::MetricKey;

const SCHEMA_HEAD: &str = r#"You are an expert in competitive analysis, marketing and UX.
You analyse competitor websites on behalf of the user, who runs their own product in the same market.

Reply with a single JSON object and nothing else: no Markdown, no code fences, no commentary.
The object must have exactly this structure:
{
  "company_info": {
    "name": "company name",
    "tagline": "slogan or tagline",
    "niche": "market niche",
    "target_audience": "who the product is for",
    "main_offer": "the main product or offer",
    "unique_selling_points": ["USP 1", "USP 2"]
  },
  "metrics": {
    "<metric>": { "score": <integer 0-10>, "description": "short justification" }
  },
  "competitive_analysis": {
    "strengths": ["..."],
    "weaknesses": ["..."],
    "opportunities": ["..."],
    "threats": ["..."]
  },
  "positioning_summary": "two or three sentences on how the competitor positions itself",
  "recommendations_for_user": ["..."],
  "key_takeaways": ["..."]
}
"#;

const SCHEMA_TAIL: &str = "\
`recommendations_for_user` are concrete actions for the USER's own product, \
learned from this competitor. Do not give advice to the competitor.
Scores are integers from 0 (absent or very poor) to 10 (excellent).";

/// System instruction shared by text and image analysis
#[must_use]
pub fn system_prompt() -> String {
    let mut prompt = String::from(SCHEMA_HEAD);
    prompt.push_str("\n`metrics` must contain these seven keys:\n");
    for key in MetricKey::ALL {
        prompt.push_str(&format!("- {}: {}\n", key.as_str(), key.meaning()));
    }
    prompt.push('\n');
    prompt.push_str(SCHEMA_TAIL);
    prompt
}

/// User message for text mode; `text` is already truncated
#[must_use]
pub fn text_prompt(text: &str, competitor_name: &str) -> String {
    format!(
        "Analyse the website content of the competitor \"{competitor_name}\".\n\n\
         ---\n{text}\n---\n\n\
         Return the analysis as JSON only."
    )
}

/// User message accompanying a screenshot in image mode
#[must_use]
pub fn image_prompt(competitor_name: &str) -> String {
    format!(
        "This is a full-page screenshot of the website of the competitor \"{competitor_name}\". \
         Assess its design, content and positioning.\n\n\
         Return the analysis as JSON only."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_every_metric() {
        let prompt = system_prompt();
        for key in MetricKey::ALL {
            assert!(prompt.contains(key.as_str()), "missing {}", key.as_str());
        }
        assert!(prompt.contains("recommendations_for_user"));
        assert!(prompt.contains("JSON"));
    }

    #[test]
    fn test_text_prompt_wraps_content() {
        let prompt = text_prompt("# Acme\nURL: https://acme.test", "Acme");
        assert!(prompt.contains("\"Acme\""));
        assert!(prompt.contains("---\n# Acme\nURL: https://acme.test\n---"));
    }
}
