//! Social platform link extraction.

use std::collections::BTreeMap;

use scraper::{Html, Selector};

use storescope_core::SocialHandle;

use crate::normalize::absolutize;

/// Known platform → host suffixes. First matching anchor per platform wins.
const SOCIAL_PLATFORMS: &[(&str, &[&str])] = &[
    ("facebook", &["facebook.com", "fb.me"]),
    ("instagram", &["instagram.com"]),
    ("twitter", &["twitter.com", "x.com"]),
    ("linkedin", &["linkedin.com"]),
    ("youtube", &["youtube.com"]),
    ("pinterest", &["pinterest.com"]),
    ("tiktok", &["tiktok.com"]),
];

/// Path segments that are platform features rather than account handles.
const NON_HANDLE_SEGMENTS: &[&str] = &[
    "sharer.php",
    "share",
    "intent",
    "embed",
    "watch",
    "channel",
    "hashtag",
    "pages",
    "company",
    "pin",
];

/// Scans anchors for known social platform hosts, keyed by platform name.
#[must_use]
pub fn extract_social_handles(doc: &Html, base_url: &str) -> BTreeMap<String, SocialHandle> {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return BTreeMap::new();
    };

    let mut handles: BTreeMap<String, SocialHandle> = BTreeMap::new();
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = absolutize(base_url, href) else {
            continue;
        };
        let Some(host) = url.host_str() else {
            continue;
        };
        let host = host.strip_prefix("www.").unwrap_or(host);

        let Some((platform, _)) = SOCIAL_PLATFORMS.iter().find(|(_, domains)| {
            domains
                .iter()
                .any(|d| host == *d || host.ends_with(&format!(".{d}")))
        }) else {
            continue;
        };

        if handles.contains_key(*platform) {
            continue;
        }

        let handle = url
            .path_segments()
            .and_then(|mut segments| segments.find(|s| !s.is_empty()))
            .map(|segment| segment.trim_start_matches('@').to_owned())
            .filter(|segment| {
                !segment.is_empty() && !NON_HANDLE_SEGMENTS.contains(&segment.as_str())
            });

        handles.insert(
            (*platform).to_owned(),
            SocialHandle {
                url: url.to_string(),
                handle,
            },
        );
    }
    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_links_keyed_and_handles_parsed() {
        let html = r#"<html><body><footer>
            <a href="https://www.instagram.com/acmegoods">Instagram</a>
            <a href="https://x.com/acmegoods">X</a>
            <a href="https://www.tiktok.com/@acmegoods">TikTok</a>
        </footer></body></html>"#;
        let handles = extract_social_handles(&Html::parse_document(html), "https://shop.test");
        assert_eq!(handles.len(), 3);
        assert_eq!(handles["instagram"].handle.as_deref(), Some("acmegoods"));
        assert_eq!(handles["twitter"].handle.as_deref(), Some("acmegoods"));
        assert_eq!(handles["tiktok"].handle.as_deref(), Some("acmegoods"));
    }

    #[test]
    fn share_links_carry_no_handle() {
        let html = r#"<html><body>
            <a href="https://www.facebook.com/sharer.php?u=https%3A%2F%2Fshop.test">Share</a>
        </body></html>"#;
        let handles = extract_social_handles(&Html::parse_document(html), "https://shop.test");
        assert_eq!(handles.len(), 1);
        assert!(handles["facebook"].handle.is_none());
    }

    #[test]
    fn first_link_per_platform_wins() {
        let html = r#"<html><body>
            <a href="https://instagram.com/first">one</a>
            <a href="https://instagram.com/second">two</a>
        </body></html>"#;
        let handles = extract_social_handles(&Html::parse_document(html), "https://shop.test");
        assert_eq!(handles["instagram"].handle.as_deref(), Some("first"));
    }

    #[test]
    fn non_social_links_ignored() {
        let html = r#"<html><body><a href="https://blog.example.net/post">Blog</a></body></html>"#;
        assert!(extract_social_handles(&Html::parse_document(html), "https://shop.test").is_empty());
    }
}
