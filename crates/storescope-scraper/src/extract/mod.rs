//! Best-effort extraction of a [`storescope_core::BrandProfile`] from
//! storefront markup.
//!
//! Every field resolves through an ordered list of strategies tried in
//! priority order — first non-empty result wins. A field that resolves
//! nothing leaves its slot empty and is reported upstream as a warning;
//! sub-extraction never aborts its siblings. Only a homepage body that is
//! not recognizable markup at all is a hard error
//! ([`crate::error::ScrapeError::UnsupportedContent`], raised by the
//! collector).
//!
//! The parsed `scraper::Html` document is not `Send`, so the whole pass is
//! synchronous: the collector fetches bodies first and calls
//! [`extract_homepage`] between awaits.

pub mod contact;
pub mod faqs;
pub mod narrative;
pub mod navigation;
pub mod policies;
pub mod products;
pub mod social;
pub(crate) mod text;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

use storescope_core::{ContactChannels, FaqEntry, PolicyKind, Product, SocialHandle};

/// Everything recoverable from the homepage in one synchronous pass.
///
/// Policy and FAQ links are candidates for the collector's bounded
/// follow-up fetches; all other fields are final.
#[derive(Debug, Default)]
pub struct HomeExtract {
    pub brand_name: Option<String>,
    pub products: Vec<Product>,
    pub policy_texts: BTreeMap<PolicyKind, String>,
    pub policy_links: Vec<(PolicyKind, String)>,
    pub faqs: Vec<FaqEntry>,
    pub faq_link: Option<String>,
    pub social_handles: BTreeMap<String, SocialHandle>,
    pub contact_channels: ContactChannels,
    pub navigation: Vec<String>,
    pub brand_text_context: Option<String>,
}

/// Runs every sub-extractor over the homepage markup.
///
/// `base_url` is the normalized site URL used to absolutize relative links.
#[must_use]
pub fn extract_homepage(html: &str, base_url: &str) -> HomeExtract {
    let doc = Html::parse_document(html);

    HomeExtract {
        brand_name: extract_brand_name(&doc),
        products: products::extract_products(&doc),
        policy_texts: policies::inline_policy_texts(&doc),
        policy_links: policies::policy_links(&doc, base_url),
        faqs: faqs::extract_faqs(&doc),
        faq_link: faqs::faq_link(&doc, base_url),
        social_handles: social::extract_social_handles(&doc, base_url),
        contact_channels: contact::extract_contact_channels(&doc, base_url),
        navigation: navigation::extract_navigation(&doc),
        brand_text_context: narrative::extract_narrative(&doc),
    }
}

/// Cheap check that a response body is markup the extractor can work with.
///
/// A body with no tag-like token (e.g. a JSON payload or binary junk served
/// for the homepage) is not extractable and surfaces as
/// `UnsupportedContent` rather than an empty profile.
#[must_use]
pub fn looks_like_markup(content: &str) -> bool {
    if content.trim().is_empty() {
        return false;
    }
    content.match_indices('<').any(|(i, _)| {
        content[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '!' || c == '/')
    })
}

/// Store title with hosting-platform suffixes stripped
/// (`"Acme Goods | Shopify"` → `"Acme Goods"`).
fn extract_brand_name(doc: &Html) -> Option<String> {
    static SUFFIX_RE: OnceLock<Regex> = OnceLock::new();
    let suffix_re = SUFFIX_RE.get_or_init(|| {
        Regex::new(r"(?i)\s*[|\-–—]\s*(shopify.*|powered by\s+.*)$").expect("suffix regex")
    });

    let selector = Selector::parse("title").ok()?;
    let title = doc
        .select(&selector)
        .next()
        .map(|el| text::element_text(&el))?;
    let stripped = suffix_re.replace(&title, "").trim().to_string();
    (!stripped.is_empty()).then_some(stripped)
}
