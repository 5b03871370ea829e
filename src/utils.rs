use url::Url;

/// Build the URL of one listing page
///
/// The base URL is expected to carry a query string already, so the page
/// number is always joined with `&`.
pub fn paginated_url(base_url: &str, page: u32) -> String {
    format!("{}&page={}", base_url, page)
}

/// Resolve a link target to an absolute URL
///
/// Absolute targets are returned as-is; relative ones are joined onto the
/// page they were found on. Returns `None` when neither works.
pub fn resolve_link(page_url: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    page_url
        .and_then(|base| base.join(href).ok())
        .map(|resolved| resolved.to_string())
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_url_always_uses_ampersand() {
        assert_eq!(
            paginated_url("https://site.example/search?q=x", 1),
            "https://site.example/search?q=x&page=1"
        );
        // No query string: still joined with '&'
        assert_eq!(
            paginated_url("https://site.example/search", 12),
            "https://site.example/search&page=12"
        );
    }

    #[test]
    fn test_resolve_absolute_link() {
        assert_eq!(
            resolve_link(None, "https://site.example/items/1-hat").as_deref(),
            Some("https://site.example/items/1-hat")
        );
    }

    #[test]
    fn test_resolve_relative_link() {
        let page = Url::parse("https://site.example/catalog?q=hat&page=2").unwrap();
        assert_eq!(
            resolve_link(Some(&page), "/items/1-hat?ref=grid").as_deref(),
            Some("https://site.example/items/1-hat?ref=grid")
        );
    }

    #[test]
    fn test_unresolvable_link() {
        assert_eq!(resolve_link(None, "/items/1-hat"), None);
        assert_eq!(resolve_link(None, "   "), None);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  12,50 \n €  "), "12,50 €");
        assert_eq!(normalize_whitespace(""), "");
    }
}
