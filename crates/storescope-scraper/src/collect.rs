//! Profile collection: one fetch+extract pipeline run for a storefront.

use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;

use storescope_core::{BrandProfile, PolicyKind};

use crate::catalog_api::parse_catalog_json;
use crate::error::ScrapeError;
use crate::extract::{self, faqs, policies};
use crate::fetch::PageFetcher;
use crate::normalize::{normalize_site_url, site_origin};

/// Anything that can produce a fresh `BrandProfile` for a URL.
///
/// Implemented by [`ProfileCollector`] for production and by counting
/// doubles in cache tests.
pub trait ProfileLoader: Send + Sync {
    fn load(&self, url: &str) -> impl Future<Output = Result<BrandProfile, ScrapeError>> + Send;
}

/// Runs the extraction pipeline for one storefront URL.
///
/// Order of operations follows the pipeline contract: homepage fetch →
/// catalog JSON fast-path → synchronous markup extraction → bounded
/// follow-up fetches for policy and FAQ pages. Every absent field becomes a
/// warning on the resulting profile; only fetch failure or an unparseable
/// homepage is an error.
pub struct ProfileCollector {
    fetcher: PageFetcher,
    /// Shared budget of extra page fetches per collection run.
    max_followups: usize,
}

impl ProfileCollector {
    #[must_use]
    pub fn new(fetcher: PageFetcher, max_followups: usize) -> Self {
        Self {
            fetcher,
            max_followups,
        }
    }

    /// Fetches and extracts a complete `BrandProfile` for `url`.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::InvalidUrl`] — the target URL is malformed.
    /// - [`ScrapeError::UnsupportedContent`] — the homepage body is not markup.
    /// - Fetch-stage errors from [`PageFetcher::fetch_page`] after retries.
    pub async fn collect(&self, url: &str) -> Result<BrandProfile, ScrapeError> {
        let site = normalize_site_url(url)?;
        let origin = site_origin(&site);

        tracing::info!(site = %site, "fetching storefront homepage");
        let home_body = self.fetcher.fetch_page(&site).await?;
        if !extract::looks_like_markup(&home_body) {
            return Err(ScrapeError::UnsupportedContent { url: site });
        }

        // Catalog JSON fast-path; markup strategies cover stores without it.
        let catalog_url = format!("{origin}/products.json");
        let mut catalog = match self.fetcher.fetch_page(&catalog_url).await {
            Ok(body) => parse_catalog_json(&body).unwrap_or_default(),
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    "catalog endpoint unavailable — falling back to markup extraction"
                );
                Vec::new()
            }
        };

        tracing::info!(site = %site, "extracting homepage fields");
        let home = extract::extract_homepage(&home_body, &site);
        if catalog.is_empty() {
            catalog = home.products;
        }

        let mut policies_found = home.policy_texts;
        let mut budget = self.max_followups;
        // Returns and refund links frequently alias one document; memoize
        // follow-up bodies so aliases don't spend budget twice.
        let mut fetched_pages: HashMap<String, Option<String>> = HashMap::new();

        for (kind, link) in home.policy_links {
            if policies_found.contains_key(&kind) {
                continue;
            }
            let Some(body) = self
                .followup_page(&link, &mut budget, &mut fetched_pages)
                .await
            else {
                continue;
            };
            if let Some(text) = policies::extract_policy_text(&body) {
                policies_found.insert(kind, text);
            }
        }

        let mut faqs_found = home.faqs;
        if faqs_found.is_empty() {
            if let Some(link) = home.faq_link {
                if let Some(body) = self
                    .followup_page(&link, &mut budget, &mut fetched_pages)
                    .await
                {
                    faqs_found = faqs::extract_faq_page(&body);
                }
            }
        }

        let mut profile = BrandProfile::empty(site, Utc::now());
        profile.brand_name = home.brand_name;
        profile.product_catalog = catalog;
        profile.policies = policies_found;
        profile.faqs = faqs_found;
        profile.social_handles = home.social_handles;
        profile.contact_channels = home.contact_channels;
        profile.navigation = home.navigation;
        profile.brand_text_context = home.brand_text_context;
        record_warnings(&mut profile);

        tracing::info!(
            site = %profile.website_url,
            products = profile.product_catalog.len(),
            warnings = profile.warnings.len(),
            "profile collection complete"
        );
        Ok(profile)
    }

    /// Fetches a follow-up page within the shared budget, memoized per URL.
    async fn followup_page(
        &self,
        url: &str,
        budget: &mut usize,
        fetched: &mut HashMap<String, Option<String>>,
    ) -> Option<String> {
        if let Some(cached) = fetched.get(url) {
            return cached.clone();
        }
        if *budget == 0 {
            tracing::debug!(url, "follow-up budget exhausted");
            return None;
        }
        *budget -= 1;

        let body = match self.fetcher.fetch_page(url).await {
            Ok(body) => Some(body),
            Err(err) => {
                tracing::debug!(url, error = %err, "follow-up fetch failed");
                None
            }
        };
        fetched.insert(url.to_owned(), body.clone());
        body
    }
}

/// Records a warning for every field the extraction could not resolve.
fn record_warnings(profile: &mut BrandProfile) {
    if profile.product_catalog.is_empty() {
        profile.warnings.insert("product_catalog".to_owned());
    }
    for kind in PolicyKind::ALL {
        if !profile.policies.contains_key(&kind) {
            profile.warnings.insert(kind.warning_label());
        }
    }
    if profile.faqs.is_empty() {
        profile.warnings.insert("faqs".to_owned());
    }
    if profile.social_handles.is_empty() {
        profile.warnings.insert("social_handles".to_owned());
    }
    if profile.contact_channels.is_empty() {
        profile.warnings.insert("contact_channels".to_owned());
    }
    if profile.navigation.is_empty() {
        profile.warnings.insert("navigation".to_owned());
    }
    if profile.brand_text_context.is_none() {
        profile.warnings.insert("brand_text_context".to_owned());
    }
    if profile.brand_name.is_none() {
        profile.warnings.insert("brand_name".to_owned());
    }
}

impl ProfileLoader for ProfileCollector {
    fn load(&self, url: &str) -> impl Future<Output = Result<BrandProfile, ScrapeError>> + Send {
        self.collect(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_recorded_for_every_empty_field() {
        let mut profile = BrandProfile::empty("https://shop.test", Utc::now());
        record_warnings(&mut profile);
        for expected in [
            "product_catalog",
            "policies.privacy",
            "policies.returns",
            "policies.shipping",
            "policies.refund",
            "faqs",
            "social_handles",
            "contact_channels",
            "navigation",
            "brand_text_context",
            "brand_name",
        ] {
            assert!(
                profile.warnings.contains(expected),
                "missing warning {expected}"
            );
        }
    }

    #[test]
    fn populated_fields_do_not_warn() {
        let mut profile = BrandProfile::empty("https://shop.test", Utc::now());
        profile.brand_name = Some("Acme".to_owned());
        profile
            .policies
            .insert(PolicyKind::Privacy, "policy text".to_owned());
        record_warnings(&mut profile);
        assert!(!profile.warnings.contains("brand_name"));
        assert!(!profile.warnings.contains("policies.privacy"));
        assert!(profile.warnings.contains("policies.refund"));
    }
}
