//! Small text helpers shared by the sub-extractors.

use scraper::{ElementRef, Html};

/// Collects an element's text content, whitespace-normalized.
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts an HTML fragment (e.g. a catalog `body_html` description) to
/// whitespace-normalized plain text.
pub(crate) fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    element_text(&fragment.root_element())
}
