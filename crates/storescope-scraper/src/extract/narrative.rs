//! Brand narrative extraction.
//!
//! Strategies in priority order: a locatable About/Our-Story section, then
//! the homepage's meta description plus its primary descriptive paragraphs.

use scraper::{Html, Selector};

use super::text::element_text;

type NarrativeStrategy = fn(&Html) -> Option<String>;

const STRATEGIES: &[(&str, NarrativeStrategy)] = &[
    ("about-section", from_about_section),
    ("descriptive-paragraphs", from_meta_and_paragraphs),
];

/// Paragraphs shorter than this many words are buttons/badges, not narrative.
const MIN_PARAGRAPH_WORDS: usize = 20;

/// Narrative below this length is a heading fragment, not a story.
const MIN_NARRATIVE_CHARS: usize = 80;

const MAX_NARRATIVE_CHARS: usize = 4000;

/// Extracts the brand narrative from the homepage, if locatable.
#[must_use]
pub fn extract_narrative(doc: &Html) -> Option<String> {
    for (name, strategy) in STRATEGIES {
        if let Some(text) = strategy(doc) {
            tracing::debug!(strategy = name, chars = text.len(), "narrative strategy matched");
            return Some(text);
        }
    }
    None
}

fn from_about_section(doc: &Html) -> Option<String> {
    let section_sel = Selector::parse(
        r#"[class*="about"], [id*="about"], [class*="our-story"], [id*="our-story"], [class*="brand-story"], [class*="mission"]"#,
    )
    .ok()?;
    let paragraph_sel = Selector::parse("p").ok()?;

    // Nested about-ish containers would otherwise contribute the same
    // paragraph once per matching ancestor.
    let mut seen = std::collections::HashSet::new();
    let mut paragraphs = Vec::new();
    for section in doc.select(&section_sel) {
        for p in section.select(&paragraph_sel) {
            let text = element_text(&p);
            if !text.is_empty() && seen.insert(text.clone()) {
                paragraphs.push(text);
            }
        }
    }
    build_narrative(None, paragraphs)
}

fn from_meta_and_paragraphs(doc: &Html) -> Option<String> {
    let meta_sel = Selector::parse(r#"meta[name="description"]"#).ok()?;
    let meta = doc
        .select(&meta_sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());

    let content_sel =
        Selector::parse(r#"main p, article p, section p, [class*="content"] p"#).ok()?;
    let fallback_sel = Selector::parse("p").ok()?;

    let mut paragraphs: Vec<String> = doc
        .select(&content_sel)
        .map(|el| element_text(&el))
        .filter(|text| text.split_whitespace().count() > MIN_PARAGRAPH_WORDS)
        .collect();
    if paragraphs.is_empty() {
        paragraphs = doc
            .select(&fallback_sel)
            .map(|el| element_text(&el))
            .filter(|text| text.split_whitespace().count() > MIN_PARAGRAPH_WORDS)
            .collect();
    }

    build_narrative(meta, paragraphs)
}

fn build_narrative(lead: Option<String>, paragraphs: Vec<String>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(lead) = lead {
        parts.push(lead);
    }
    parts.extend(paragraphs);
    if parts.is_empty() {
        return None;
    }

    let mut narrative = parts.join("\n\n");
    if narrative.len() > MAX_NARRATIVE_CHARS {
        let cut = (0..=MAX_NARRATIVE_CHARS)
            .rev()
            .find(|&i| narrative.is_char_boundary(i))
            .unwrap_or(0);
        narrative.truncate(cut);
    }
    (narrative.len() >= MIN_NARRATIVE_CHARS).then_some(narrative)
}
