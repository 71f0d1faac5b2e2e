//! Site URL normalization — the cache identity key.

use crate::error::ScrapeError;

/// Normalizes a storefront URL into its cache identity form:
/// scheme + lowercased host (+ non-default port) + path, with query and
/// fragment stripped and the trailing slash trimmed.
///
/// `https://Shop.Example.com/collections/all/?ref=x#top` →
/// `https://shop.example.com/collections/all`.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidUrl`] for unparseable input, non-http(s)
/// schemes, and URLs without a host.
pub fn normalize_site_url(raw: &str) -> Result<String, ScrapeError> {
    let trimmed = raw.trim();
    let url = reqwest::Url::parse(trimmed).map_err(|e| ScrapeError::InvalidUrl {
        url: trimmed.to_owned(),
        reason: e.to_string(),
    })?;

    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ScrapeError::InvalidUrl {
            url: trimmed.to_owned(),
            reason: format!("unsupported scheme \"{scheme}\""),
        });
    }

    let Some(host) = url.host_str() else {
        return Err(ScrapeError::InvalidUrl {
            url: trimmed.to_owned(),
            reason: "URL has no host".to_owned(),
        });
    };

    let mut normalized = format!("{scheme}://{}", host.to_lowercase());
    if let Some(port) = url.port() {
        normalized.push(':');
        normalized.push_str(&port.to_string());
    }
    let path = url.path().trim_end_matches('/');
    normalized.push_str(path);

    Ok(normalized)
}

/// Extracts the scheme+host origin from a normalized site URL.
///
/// Given `"https://shop.example.com/collections/all"`, returns
/// `"https://shop.example.com"`. The catalog JSON endpoint and root-relative
/// links always resolve against the origin, regardless of whether the
/// configured site URL includes a path.
#[must_use]
pub fn site_origin(site_url: &str) -> String {
    reqwest::Url::parse(site_url).map_or_else(
        |e| {
            tracing::warn!(
                site_url,
                error = %e,
                "could not parse site URL — falling back to string split for origin extraction"
            );
            // fallback: take "https://host" by splitting on '/' and taking first 3 parts
            site_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Resolves `href` against `base` into an absolute http(s) URL.
///
/// Returns `None` for pseudo-links (`javascript:`, `mailto:`, `tel:`, bare
/// fragments) and anything that fails to resolve.
pub(crate) fn absolutize(base: &str, href: &str) -> Option<reqwest::Url> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
    {
        return None;
    }
    let base_url = reqwest::Url::parse(base).ok()?;
    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

/// Like [`absolutize`], but only for links staying on `base`'s host.
///
/// Used for policy/FAQ/contact links: a follow-up fetch should never leave
/// the storefront being profiled.
pub(crate) fn absolutize_same_host(base: &str, href: &str) -> Option<String> {
    let base_host = reqwest::Url::parse(base).ok()?.host_str()?.to_lowercase();
    let absolute = absolutize(base, href)?;
    let host = absolute.host_str()?.to_lowercase();
    (host == base_host).then(|| absolute.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_fragment() {
        let normalized =
            normalize_site_url("https://shop.example.com/collections/all?ref=x#top").unwrap();
        assert_eq!(normalized, "https://shop.example.com/collections/all");
    }

    #[test]
    fn lowercases_host_but_not_path() {
        let normalized = normalize_site_url("https://Shop.Example.COM/Pages/About").unwrap();
        assert_eq!(normalized, "https://shop.example.com/Pages/About");
    }

    #[test]
    fn trims_trailing_slash() {
        let normalized = normalize_site_url("https://shop.example.com/").unwrap();
        assert_eq!(normalized, "https://shop.example.com");
    }

    #[test]
    fn keeps_explicit_port() {
        let normalized = normalize_site_url("http://127.0.0.1:8089/").unwrap();
        assert_eq!(normalized, "http://127.0.0.1:8089");
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = normalize_site_url("ftp://shop.example.com").unwrap_err();
        assert!(
            matches!(err, ScrapeError::InvalidUrl { ref reason, .. } if reason.contains("scheme")),
            "expected scheme rejection, got: {err:?}"
        );
    }

    #[test]
    fn rejects_relative_url() {
        let err = normalize_site_url("shop.example.com").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl { .. }));
    }

    #[test]
    fn site_origin_strips_path() {
        assert_eq!(
            site_origin("https://shop.example.com/collections/all"),
            "https://shop.example.com"
        );
    }

    #[test]
    fn site_origin_keeps_port() {
        assert_eq!(site_origin("http://127.0.0.1:8089"), "http://127.0.0.1:8089");
    }

    #[test]
    fn absolutize_resolves_relative_and_strips_fragment() {
        let url = absolutize("https://shop.example.com", "/pages/about#team").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/pages/about");
    }

    #[test]
    fn absolutize_rejects_pseudo_links() {
        assert!(absolutize("https://shop.example.com", "javascript:void(0)").is_none());
        assert!(absolutize("https://shop.example.com", "mailto:hi@example.com").is_none());
        assert!(absolutize("https://shop.example.com", "#top").is_none());
    }

    #[test]
    fn absolutize_same_host_filters_external_links() {
        assert_eq!(
            absolutize_same_host("https://shop.example.com", "/policies/privacy-policy"),
            Some("https://shop.example.com/policies/privacy-policy".to_string())
        );
        assert!(
            absolutize_same_host("https://shop.example.com", "https://other.example.net/privacy")
                .is_none()
        );
    }
}
