//! Product catalog extraction strategies.
//!
//! Tried in priority order, first non-empty result wins:
//! 1. JSON-LD (`application/ld+json` blocks with schema.org `Product` nodes)
//! 2. Microdata (`itemtype="…schema.org/Product"` blocks)
//! 3. Repeated product-card-ish DOM blocks with a price-like token
//!
//! Document order is preserved end-to-end; duplicates collapse on the
//! `(title, price)` pair.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use storescope_core::Product;

use super::text::element_text;

type ProductStrategy = fn(&Html) -> Vec<Product>;

const STRATEGIES: &[(&str, ProductStrategy)] = &[
    ("json-ld", from_json_ld),
    ("microdata", from_microdata),
    ("repeated-blocks", from_repeated_blocks),
];

/// Extracts the product catalog from homepage markup.
///
/// Returns an empty vec when no strategy matches — the caller records the
/// `product_catalog` warning.
#[must_use]
pub fn extract_products(doc: &Html) -> Vec<Product> {
    for (name, strategy) in STRATEGIES {
        let found = strategy(doc);
        if !found.is_empty() {
            let products = finalize(found);
            tracing::debug!(
                strategy = name,
                count = products.len(),
                "product extraction strategy matched"
            );
            return products;
        }
    }
    Vec::new()
}

/// Parses a currency-symbol-prefixed price token out of arbitrary text
/// (`"From $1,299.00 CAD"` → `1299.0`).
#[must_use]
pub fn parse_price_token(text: &str) -> Option<f64> {
    static PRICE_RE: OnceLock<Regex> = OnceLock::new();
    let re = PRICE_RE.get_or_init(|| {
        Regex::new(r"[$£€₹]\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)").expect("price regex")
    });
    let captures = re.captures(text)?;
    captures[1].replace(',', "").parse::<f64>().ok()
}

/// Deduplicates on `(title, price)` keeping first occurrence, and assigns
/// positional ids where no stable id was recovered.
fn finalize(products: Vec<Product>) -> Vec<Product> {
    let mut seen: HashSet<(String, Option<u64>)> = HashSet::new();
    let mut out = Vec::new();
    for (idx, mut product) in products.into_iter().enumerate() {
        let key = (product.title.clone(), product.price.map(f64::to_bits));
        if !seen.insert(key) {
            continue;
        }
        if product.id.is_empty() {
            product.id = format!("pos-{idx}");
        }
        out.push(product);
    }
    out
}

// ---------------------------------------------------------------------------
// Strategy 1: JSON-LD
// ---------------------------------------------------------------------------

fn from_json_ld(doc: &Html) -> Vec<Product> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let mut products = Vec::new();
    for script in doc.select(&selector) {
        let raw = script.text().collect::<String>();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        let mut nodes = Vec::new();
        collect_product_nodes(&value, &mut nodes);
        products.extend(nodes.into_iter().filter_map(product_from_node));
    }
    products
}

/// Walks a JSON-LD value collecting schema.org `Product` nodes, including
/// ones nested in `@graph` and `ItemList`/`ListItem` wrappers.
fn collect_product_nodes<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_product_nodes(item, out);
            }
        }
        Value::Object(map) => {
            if is_product_type(map.get("@type")) {
                out.push(value);
            }
            for key in ["@graph", "itemListElement", "item"] {
                if let Some(nested) = map.get(key) {
                    collect_product_nodes(nested, out);
                }
            }
        }
        _ => {}
    }
}

fn is_product_type(type_field: Option<&Value>) -> bool {
    match type_field {
        Some(Value::String(s)) => s == "Product",
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some("Product")),
        _ => false,
    }
}

fn product_from_node(node: &Value) -> Option<Product> {
    let obj = node.as_object()?;
    let title = obj.get("name")?.as_str()?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    let id = ["productID", "sku"]
        .iter()
        .find_map(|key| obj.get(*key))
        .and_then(value_as_id)
        .unwrap_or_default();
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty());

    Some(Product {
        id,
        title,
        price: offer_price(obj.get("offers")),
        description,
        tags: Vec::new(),
    })
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads `offers.price` (or the aggregate `lowPrice`), accepting both string
/// and numeric encodings; arrays of offers use the first entry.
fn offer_price(offers: Option<&Value>) -> Option<f64> {
    let offers = offers?;
    match offers {
        Value::Array(items) => offer_price(items.first()),
        Value::Object(map) => ["price", "lowPrice"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(|price| match price {
                Value::String(s) => s.replace(',', "").parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Strategy 2: microdata
// ---------------------------------------------------------------------------

fn from_microdata(doc: &Html) -> Vec<Product> {
    let Ok(block_sel) = Selector::parse(r#"[itemtype*="schema.org/Product"]"#) else {
        return Vec::new();
    };
    let Ok(name_sel) = Selector::parse(r#"[itemprop="name"]"#) else {
        return Vec::new();
    };
    let Ok(price_sel) = Selector::parse(r#"[itemprop="price"]"#) else {
        return Vec::new();
    };
    let Ok(desc_sel) = Selector::parse(r#"[itemprop="description"]"#) else {
        return Vec::new();
    };

    let mut products = Vec::new();
    for block in doc.select(&block_sel) {
        let Some(title) = block
            .select(&name_sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
        else {
            continue;
        };

        let price = block.select(&price_sel).next().and_then(|el| {
            el.value()
                .attr("content")
                .and_then(|raw| raw.replace(',', "").parse::<f64>().ok())
                .or_else(|| parse_price_token(&element_text(&el)))
        });
        let description = block
            .select(&desc_sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|d| !d.is_empty());

        products.push(Product {
            id: first_link_slug(&block).unwrap_or_default(),
            title,
            price,
            description,
            tags: Vec::new(),
        });
    }
    products
}

// ---------------------------------------------------------------------------
// Strategy 3: repeated product-card blocks
// ---------------------------------------------------------------------------

fn card_class_re() -> &'static Regex {
    static CARD_RE: OnceLock<Regex> = OnceLock::new();
    CARD_RE.get_or_init(|| {
        Regex::new(r"(?i)product[-_](card|item|tile)|featured[-_]product|grid[-_]product")
            .expect("card class regex")
    })
}

fn from_repeated_blocks(doc: &Html) -> Vec<Product> {
    let Ok(classed_sel) = Selector::parse("[class]") else {
        return Vec::new();
    };
    let Ok(title_sel) = Selector::parse(r#"[class*="title"]"#) else {
        return Vec::new();
    };
    let Ok(heading_sel) = Selector::parse("h2, h3, h4, a") else {
        return Vec::new();
    };
    let Ok(price_sel) = Selector::parse(r#"[class*="price"]"#) else {
        return Vec::new();
    };

    let mut products = Vec::new();
    for card in doc.select(&classed_sel) {
        let classes = card.value().classes().collect::<Vec<_>>().join(" ");
        if !card_class_re().is_match(&classes) {
            continue;
        }

        let title = card
            .select(&title_sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
            .or_else(|| {
                card.select(&heading_sel)
                    .next()
                    .map(|el| element_text(&el))
                    .filter(|t| !t.is_empty())
            });
        let Some(title) = title else { continue };

        // A card without a price-like token is navigation chrome, not a product.
        let price = card
            .select(&price_sel)
            .next()
            .and_then(|el| parse_price_token(&element_text(&el)))
            .or_else(|| parse_price_token(&element_text(&card)));
        let Some(price) = price else { continue };

        products.push(Product {
            id: first_link_slug(&card).unwrap_or_default(),
            title,
            price: Some(price),
            description: None,
            tags: Vec::new(),
        });
    }
    products
}

/// Last non-empty path segment of the card's first link — the platform URL
/// handle, a stable id within one catalog.
fn first_link_slug(block: &ElementRef) -> Option<String> {
    let link_sel = Selector::parse("a[href]").ok()?;
    let href = block
        .select(&link_sel)
        .next()
        .and_then(|el| el.value().attr("href"))?;
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .filter(|slug| !slug.contains(':') && !slug.contains('.'))
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_ld_products_extracted_with_offer_price() {
        let html = r##"<html><head>
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "Product", "name": "Walnut Tray", "sku": "WT-1",
                 "description": "A walnut tray.",
                 "offers": {"@type": "Offer", "price": "64.00"}},
                {"@type": "Product", "name": "Oak Shelf",
                 "offers": [{"price": 120}]}
            ]}
            </script>
        </head><body></body></html>"##;
        let products = extract_products(&Html::parse_document(html));
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Walnut Tray");
        assert_eq!(products[0].id, "WT-1");
        assert_eq!(products[0].price, Some(64.0));
        assert_eq!(products[1].price, Some(120.0));
        assert_eq!(products[1].id, "pos-1");
    }

    #[test]
    fn json_ld_item_list_is_unwrapped() {
        let html = r##"<html><head><script type="application/ld+json">
            {"@type": "ItemList", "itemListElement": [
                {"@type": "ListItem", "position": 1,
                 "item": {"@type": "Product", "name": "First", "offers": {"price": "5.00"}}},
                {"@type": "ListItem", "position": 2,
                 "item": {"@type": "Product", "name": "Second", "offers": {"price": "6.00"}}}
            ]}
        </script></head><body></body></html>"##;
        let products = extract_products(&Html::parse_document(html));
        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn microdata_products_read_content_attr_price() {
        let html = r#"<html><body>
            <div itemscope itemtype="https://schema.org/Product">
                <a href="/products/walnut-tray"><span itemprop="name">Walnut Tray</span></a>
                <meta itemprop="price" content="64.00">
            </div>
        </body></html>"#;
        let products = extract_products(&Html::parse_document(html));
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Walnut Tray");
        assert_eq!(products[0].price, Some(64.0));
        assert_eq!(products[0].id, "walnut-tray");
    }

    #[test]
    fn repeated_blocks_preserve_document_order_and_dedup() {
        let html = r#"<html><body><div class="grid">
            <div class="product-card">
                <h3 class="product-card__title">Alpha Mug</h3>
                <span class="price">$12.00</span>
                <a href="/products/alpha-mug">view</a>
            </div>
            <div class="product-card">
                <h3 class="product-card__title">Beta Mug</h3>
                <span class="price">$14.50</span>
            </div>
            <div class="product-card">
                <h3 class="product-card__title">Alpha Mug</h3>
                <span class="price">$12.00</span>
            </div>
        </div></body></html>"#;
        let products = extract_products(&Html::parse_document(html));
        let titles: Vec<_> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha Mug", "Beta Mug"]);
        assert_eq!(products[0].id, "alpha-mug");
        assert_eq!(products[0].price, Some(12.0));
    }

    #[test]
    fn cards_without_price_tokens_are_skipped() {
        let html = r#"<html><body>
            <div class="product-card"><h3>Lookbook</h3></div>
        </body></html>"#;
        assert!(extract_products(&Html::parse_document(html)).is_empty());
    }

    #[test]
    fn price_token_parsing_handles_symbols_and_commas() {
        assert_eq!(parse_price_token("From $1,299.00 CAD"), Some(1299.0));
        assert_eq!(parse_price_token("£45"), Some(45.0));
        assert_eq!(parse_price_token("€ 12.50"), Some(12.5));
        assert_eq!(parse_price_token("sold out"), None);
    }
}
