//! Catalog JSON types for the public `/products.json` endpoint exposed by
//! hosted shop platforms.
//!
//! ## Observed shape from live storefronts
//!
//! - `variants[].price` is a numeric decimal **string** (e.g. `"30.00"`),
//!   never a JSON number. Some minimal themes omit variants entirely, so the
//!   whole array carries `#[serde(default)]`.
//! - `tags` is a JSON array of strings on current stores. Legacy themes
//!   returned a comma-separated string; both forms are accepted here.
//! - `body_html` is raw HTML and may be `null` or absent.
//! - `handle` is the URL slug and doubles as a stable product identifier
//!   when the numeric `id` is absent.
//!
//! This endpoint is the fastest extraction strategy when present; markup
//! strategies in [`crate::extract::products`] cover everything else.

use serde::Deserialize;

use storescope_core::Product;

use crate::extract::text::html_to_text;

/// Top-level response from `GET <origin>/products.json`.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    pub products: Vec<CatalogProduct>,
}

/// A single product from the platform catalog endpoint.
#[derive(Debug, Deserialize)]
pub struct CatalogProduct {
    /// Platform numeric product ID.
    #[serde(default)]
    pub id: Option<i64>,

    pub title: String,

    /// URL slug for the product page.
    #[serde(default)]
    pub handle: Option<String>,

    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    /// Tags as an array of strings, or a legacy comma-separated string.
    #[serde(default)]
    pub tags: Tags,

    /// All purchasable variants; the first variant's price represents the
    /// product for distribution analysis.
    #[serde(default)]
    pub variants: Vec<CatalogVariant>,
}

/// A purchasable variant of a [`CatalogProduct`].
#[derive(Debug, Deserialize)]
pub struct CatalogVariant {
    /// Current price as a decimal string (e.g., `"30.00"`).
    #[serde(default)]
    pub price: Option<String>,
}

/// Tag field tolerant of both observed encodings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    CommaSeparated(String),
}

impl Default for Tags {
    fn default() -> Self {
        Tags::List(Vec::new())
    }
}

impl Tags {
    fn into_vec(self) -> Vec<String> {
        match self {
            Tags::List(tags) => tags,
            Tags::CommaSeparated(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        }
    }
}

/// Parses a `/products.json` body into normalized products, preserving
/// catalog order.
///
/// Returns `None` when the body is not a catalog response or contains no
/// products, so callers can fall through to markup extraction strategies.
#[must_use]
pub fn parse_catalog_json(body: &str) -> Option<Vec<Product>> {
    let response = serde_json::from_str::<CatalogResponse>(body).ok()?;
    if response.products.is_empty() {
        return None;
    }

    let products = response
        .products
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let id = item
                .id
                .map(|n| n.to_string())
                .or(item.handle)
                .unwrap_or_else(|| format!("pos-{idx}"));
            let price = item
                .variants
                .first()
                .and_then(|v| v.price.as_deref())
                .and_then(|p| p.parse::<f64>().ok());
            let description = item
                .body_html
                .as_deref()
                .map(html_to_text)
                .filter(|text| !text.is_empty());
            Product {
                id,
                title: item.title,
                price,
                description,
                tags: item.tags.into_vec(),
            }
        })
        .collect();

    Some(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_with_variant_price_and_html_description() {
        let body = r#"{
            "products": [{
                "id": 123456789,
                "title": "Walnut Desk Organizer",
                "handle": "walnut-desk-organizer",
                "body_html": "<p>Hand-finished <strong>walnut</strong> tray.</p>",
                "tags": ["desk", "walnut"],
                "variants": [{"price": "64.00"}, {"price": "72.00"}]
            }]
        }"#;
        let products = parse_catalog_json(body).expect("expected catalog products");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "123456789");
        assert_eq!(products[0].price, Some(64.0));
        assert_eq!(
            products[0].description.as_deref(),
            Some("Hand-finished walnut tray.")
        );
        assert_eq!(products[0].tags, vec!["desk", "walnut"]);
    }

    #[test]
    fn preserves_catalog_order() {
        let body = r#"{
            "products": [
                {"id": 1, "title": "First", "variants": [{"price": "1.00"}]},
                {"id": 2, "title": "Second", "variants": [{"price": "2.00"}]},
                {"id": 3, "title": "Third", "variants": [{"price": "3.00"}]}
            ]
        }"#;
        let products = parse_catalog_json(body).expect("expected catalog products");
        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn legacy_comma_separated_tags_are_split() {
        let body = r#"{
            "products": [{
                "id": 1,
                "title": "Tagged",
                "tags": "new, sale ,  featured",
                "variants": [{"price": "5.00"}]
            }]
        }"#;
        let products = parse_catalog_json(body).expect("expected catalog products");
        assert_eq!(products[0].tags, vec!["new", "sale", "featured"]);
    }

    #[test]
    fn missing_id_falls_back_to_handle_then_position() {
        let body = r#"{
            "products": [
                {"title": "Has Handle", "handle": "has-handle", "variants": []},
                {"title": "Bare", "variants": []}
            ]
        }"#;
        let products = parse_catalog_json(body).expect("expected catalog products");
        assert_eq!(products[0].id, "has-handle");
        assert_eq!(products[1].id, "pos-1");
        assert_eq!(products[0].price, None);
    }

    #[test]
    fn non_catalog_body_returns_none() {
        assert!(parse_catalog_json("<!doctype html><html></html>").is_none());
        assert!(parse_catalog_json("{\"items\": []}").is_none());
    }

    #[test]
    fn empty_catalog_returns_none() {
        assert!(parse_catalog_json("{\"products\": []}").is_none());
    }
}
