//! Policy document resolution.
//!
//! Policies resolve in two steps: anchors on the homepage whose path or text
//! matches a per-kind keyword set become candidate links; the collector then
//! spends its bounded follow-up fetch budget resolving candidates into text.
//! A policy section inlined on the homepage itself short-circuits the fetch.

use std::collections::BTreeMap;

use scraper::{Html, Selector};

use storescope_core::PolicyKind;

use super::text::element_text;
use crate::normalize::absolutize_same_host;

/// Keywords matched (lowercased) against both anchor text and href path.
const POLICY_KEYWORDS: &[(PolicyKind, &[&str])] = &[
    (PolicyKind::Privacy, &["privacy"]),
    (PolicyKind::Returns, &["return"]),
    (PolicyKind::Shipping, &["shipping", "delivery"]),
    (PolicyKind::Refund, &["refund"]),
];

/// Minimum plausible policy body length; shorter matches are link farms or
/// cookie banners, not the document.
const MIN_POLICY_CHARS: usize = 120;

/// First same-host candidate link per policy kind, in [`PolicyKind`] order.
#[must_use]
pub fn policy_links(doc: &Html, base_url: &str) -> Vec<(PolicyKind, String)> {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut found: BTreeMap<PolicyKind, String> = BTreeMap::new();
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = element_text(&anchor).to_lowercase();
        let href_lower = href.to_lowercase();

        for (kind, keywords) in POLICY_KEYWORDS {
            if found.contains_key(kind) {
                continue;
            }
            let matched = keywords
                .iter()
                .any(|kw| text.contains(kw) || href_lower.contains(kw));
            if !matched {
                continue;
            }
            if let Some(absolute) = absolutize_same_host(base_url, href) {
                found.insert(*kind, absolute);
            }
        }
    }
    found.into_iter().collect()
}

/// Policy text already present in the fetched homepage, keyed by kind.
///
/// Looks for sections whose class or id carries the policy keyword and holds
/// a document-sized body.
#[must_use]
pub fn inline_policy_texts(doc: &Html) -> BTreeMap<PolicyKind, String> {
    let mut texts = BTreeMap::new();
    for (kind, keywords) in POLICY_KEYWORDS {
        for kw in *keywords {
            let Ok(selector) =
                Selector::parse(&format!(r#"[class*="{kw}-policy"], [id*="{kw}-policy"]"#))
            else {
                continue;
            };
            if let Some(text) = doc
                .select(&selector)
                .next()
                .map(|el| element_text(&el))
                .filter(|t| t.len() >= MIN_POLICY_CHARS)
            {
                texts.insert(*kind, text);
                break;
            }
        }
    }
    texts
}

/// Extracts the policy body from a fetched policy page.
///
/// Content container fallback chain mirrors what storefront themes actually
/// ship: a rich-text div, a generic page container, then `article`/`main`,
/// then the whole body's paragraphs.
#[must_use]
pub fn extract_policy_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    const CONTAINERS: &[&str] = &[
        ".rte",
        ".policy-content",
        ".page-content",
        "article",
        "main",
        "body",
    ];
    let Ok(block_sel) = Selector::parse("p, h1, h2, h3, h4, h5, h6, li") else {
        return None;
    };

    for container in CONTAINERS {
        let Ok(selector) = Selector::parse(container) else {
            continue;
        };
        let Some(root) = doc.select(&selector).next() else {
            continue;
        };
        let text = root
            .select(&block_sel)
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.len() >= MIN_POLICY_CHARS {
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_resolved_per_kind_in_document() {
        let html = r#"<html><body><footer>
            <a href="/policies/privacy-policy">Privacy Policy</a>
            <a href="/policies/refund-policy">Refunds</a>
            <a href="/pages/shipping">Delivery info</a>
            <a href="https://elsewhere.example.net/returns">External returns</a>
        </footer></body></html>"#;
        let links = policy_links(&Html::parse_document(html), "https://shop.test");
        let kinds: Vec<_> = links.iter().map(|(k, _)| *k).collect();
        assert!(kinds.contains(&PolicyKind::Privacy));
        assert!(kinds.contains(&PolicyKind::Refund));
        assert!(kinds.contains(&PolicyKind::Shipping));
        // cross-host anchor must not satisfy the returns kind
        assert!(!kinds.contains(&PolicyKind::Returns));
        let privacy = links
            .iter()
            .find(|(k, _)| *k == PolicyKind::Privacy)
            .map(|(_, url)| url.as_str());
        assert_eq!(privacy, Some("https://shop.test/policies/privacy-policy"));
    }

    #[test]
    fn first_candidate_per_kind_wins() {
        let html = r#"<html><body>
            <a href="/policies/privacy-policy">Privacy</a>
            <a href="/pages/privacy-old">Old privacy</a>
        </body></html>"#;
        let links = policy_links(&Html::parse_document(html), "https://shop.test");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].1, "https://shop.test/policies/privacy-policy");
    }

    #[test]
    fn policy_page_text_prefers_rich_text_container() {
        let body = "We collect only what the order flow needs. ".repeat(8);
        let html = format!(
            r#"<html><body><nav><a href="/">Home</a></nav>
            <div class="rte"><h1>Privacy Policy</h1><p>{body}</p></div>
            </body></html>"#
        );
        let text = extract_policy_text(&html).expect("expected policy text");
        assert!(text.starts_with("Privacy Policy"));
        assert!(text.contains("order flow"));
    }

    #[test]
    fn short_pages_yield_no_policy_text() {
        assert!(extract_policy_text("<html><body><p>404</p></body></html>").is_none());
    }

    #[test]
    fn inline_policy_section_short_circuits() {
        let body = "All personal data is processed according to this notice. ".repeat(5);
        let html = format!(
            r#"<html><body><section class="privacy-policy-block"><p>{body}</p></section></body></html>"#
        );
        let texts = inline_policy_texts(&Html::parse_document(&html));
        assert!(texts.contains_key(&PolicyKind::Privacy));
    }
}
