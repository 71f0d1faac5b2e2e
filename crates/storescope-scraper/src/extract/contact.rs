//! Contact channel extraction: emails and phone-shaped tokens from the full
//! page text, plus a contact-form link by path heuristic.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use storescope_core::ContactChannels;

use crate::normalize::absolutize_same_host;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:\+?(\d{1,3}))?[-. (]*(\d{3})[-. )]*(\d{3})[-. ]*(\d{4})")
            .expect("phone regex")
    })
}

/// Asset-name false positives like `logo@2x.png` match the email pattern;
/// anything whose domain ends in a file extension is dropped.
const JUNK_EMAIL_SUFFIXES: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".css", ".js",
];

/// Extracts emails, phone numbers, and a contact-form URL from the document.
#[must_use]
pub fn extract_contact_channels(doc: &Html, base_url: &str) -> ContactChannels {
    let text = doc.root_element().text().collect::<String>();

    let mut seen = HashSet::new();
    let mut emails = Vec::new();
    for m in email_re().find_iter(&text) {
        let email = m.as_str().to_lowercase();
        if JUNK_EMAIL_SUFFIXES.iter().any(|ext| email.ends_with(ext)) {
            continue;
        }
        if seen.insert(email.clone()) {
            emails.push(email);
        }
    }

    let mut seen_phones = HashSet::new();
    let mut phones = Vec::new();
    for captures in phone_re().captures_iter(&text) {
        let whole = captures.get(0).map_or("", |m| m.as_str());
        // Require separator punctuation or an explicit country prefix so bare
        // digit runs (order numbers, product ids) don't read as phones.
        if !whole.contains(['-', '.', '(', ')', '+', ' ']) {
            continue;
        }
        let digits: String = (1..=4)
            .filter_map(|i| captures.get(i))
            .map(|g| g.as_str())
            .collect();
        if !(10..=13).contains(&digits.len()) {
            continue;
        }
        if seen_phones.insert(digits.clone()) {
            phones.push(digits);
        }
    }

    ContactChannels {
        emails,
        phones,
        contact_form_url: contact_form_link(doc, base_url),
    }
}

/// First same-host anchor whose path looks like a contact page.
fn contact_form_link(doc: &Html, base_url: &str) -> Option<String> {
    let anchor_sel = Selector::parse("a[href]").ok()?;
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.to_lowercase().contains("contact") {
            continue;
        }
        if let Some(absolute) = absolutize_same_host(base_url, href) {
            return Some(absolute);
        }
    }
    None
}
