//! Normalized snapshot types for one storefront's extracted public content.
//!
//! ## Observed shape from live storefronts
//!
//! ### Prices
//! Heuristic DOM extraction cannot always recover a numeric price (bundle
//! cards, "from $X" ranges, sold-out placeholders), so `Product::price` is
//! `Option<f64>`. The catalog JSON fast-path always yields a price.
//!
//! ### Policies
//! Stores expose any subset of privacy/returns/shipping/refund pages, and
//! returns/refund frequently alias the same document. The map holds whatever
//! resolved; absent kinds are recorded in `BrandProfile::warnings` as
//! `policies.<kind>`.
//!
//! ### Warnings
//! A field that could not be resolved is a warning, never an error. An empty
//! profile (zero products, no narrative) is a valid extraction result; only
//! fetch/parse failure is an error.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The policy documents storescope knows how to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Privacy,
    Returns,
    Shipping,
    Refund,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 4] = [
        PolicyKind::Privacy,
        PolicyKind::Returns,
        PolicyKind::Shipping,
        PolicyKind::Refund,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Privacy => "privacy",
            PolicyKind::Returns => "returns",
            PolicyKind::Shipping => "shipping",
            PolicyKind::Refund => "refund",
        }
    }

    /// Warning label for an unresolved policy of this kind.
    #[must_use]
    pub fn warning_label(self) -> String {
        format!("policies.{}", self.as_str())
    }
}

/// A product extracted from a storefront catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Stable within one extracted catalog: the platform product id or URL
    /// handle when available, else a positional `pos-<n>` fallback.
    pub id: String,
    pub title: String,
    /// Currency-agnostic numeric price. `None` when no price-like token
    /// could be recovered for this product.
    pub price: Option<f64>,
    /// Plain-text description (HTML stripped at extraction time).
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One question/answer pair from a FAQ or help section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// A social platform presence discovered on the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialHandle {
    /// Absolute URL of the profile link as found in the markup.
    pub url: String,
    /// Account handle parsed from the first URL path segment, when the
    /// platform uses that convention.
    pub handle: Option<String>,
}

/// Contact channels recovered from the full page text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactChannels {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub contact_form_url: Option<String>,
}

impl ContactChannels {
    /// Returns `true` when no channel of any kind was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.contact_form_url.is_none()
    }
}

/// Owned snapshot of one storefront's extracted state.
///
/// Field order mirrors catalog/document presentation order wherever order is
/// meaningful (`product_catalog`, `faqs`, `navigation`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    /// Normalized site URL (scheme + host + path, no query/fragment). The
    /// cache identity key.
    pub website_url: String,
    /// Store title with hosting-platform suffixes stripped.
    pub brand_name: Option<String>,
    pub product_catalog: Vec<Product>,
    pub policies: BTreeMap<PolicyKind, String>,
    pub faqs: Vec<FaqEntry>,
    /// Keyed by platform name (`"instagram"`, `"tiktok"`, ...).
    pub social_handles: BTreeMap<String, SocialHandle>,
    pub contact_channels: ContactChannels,
    /// Top-level menu labels in document order, deduplicated.
    pub navigation: Vec<String>,
    /// Concatenated about/brand-story content.
    pub brand_text_context: Option<String>,
    /// Names of fields that could not be resolved during extraction.
    pub warnings: BTreeSet<String>,
    pub fetched_at: DateTime<Utc>,
}

impl BrandProfile {
    /// An empty but valid profile for `website_url`; extraction fills fields
    /// in and records warnings for the ones it could not resolve.
    #[must_use]
    pub fn empty(website_url: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            website_url: website_url.into(),
            brand_name: None,
            product_catalog: Vec::new(),
            policies: BTreeMap::new(),
            faqs: Vec::new(),
            social_handles: BTreeMap::new(),
            contact_channels: ContactChannels::default(),
            navigation: Vec::new(),
            brand_text_context: None,
            warnings: BTreeSet::new(),
            fetched_at,
        }
    }

    /// All recovered numeric prices, in catalog order.
    #[must_use]
    pub fn prices(&self) -> Vec<f64> {
        self.product_catalog
            .iter()
            .filter_map(|p| p.price)
            .collect()
    }

    #[must_use]
    pub fn has_policies(&self) -> bool {
        !self.policies.is_empty()
    }

    #[must_use]
    pub fn has_faqs(&self) -> bool {
        !self.faqs.is_empty()
    }

    #[must_use]
    pub fn has_social_presence(&self) -> bool {
        !self.social_handles.is_empty()
    }

    #[must_use]
    pub fn has_contact_channels(&self) -> bool {
        !self.contact_channels.is_empty()
    }

    /// Number of distinct analyzer input sources present on this profile.
    ///
    /// Counts narrative, catalog, policies, FAQs, social, and contact —
    /// the sentiment analyzer uses this to scale confidence down on sparse
    /// profiles.
    #[must_use]
    pub fn present_source_fields(&self) -> usize {
        usize::from(self.brand_text_context.is_some())
            + usize::from(!self.product_catalog.is_empty())
            + usize::from(self.has_policies())
            + usize::from(self.has_faqs())
            + usize::from(self.has_social_presence())
            + usize::from(self.has_contact_channels())
    }
}
