//! Top-level navigation menu labels, in document order.

use std::collections::HashSet;

use scraper::{Html, Selector};

use super::text::element_text;

/// Labels longer than this are content links that ended up in a nav
/// container, not menu entries.
const MAX_LABEL_CHARS: usize = 40;

/// Collects `nav`/`header` anchor texts in document order, deduplicated
/// case-insensitively.
#[must_use]
pub fn extract_navigation(doc: &Html) -> Vec<String> {
    let Ok(anchor_sel) = Selector::parse("nav a, header a") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for anchor in doc.select(&anchor_sel) {
        let label = element_text(&anchor);
        if label.is_empty() || label.chars().count() > MAX_LABEL_CHARS {
            continue;
        }
        if seen.insert(label.to_lowercase()) {
            labels.push(label);
        }
    }
    labels
}
