//! Catalog HTML extraction.
//!
//! The catalog markup is simple enough that tag scanning with regular
//! expressions is sufficient: search pages tag each preview item as an
//! anchor with the `preview` class, and detail pages expose the image under
//! a single element with the `wallpaper` id. Attribute order within a tag is
//! not assumed.

use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<a\b[^>]*>"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<[a-z][a-z0-9]*\b[^>]*>"));
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?is)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#));
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?is)\bid\s*=\s*(?:"([^"]*)"|'([^']*)')"#));
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?is)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#));
static SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?is)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex pattern must compile")
}

/// Extracts the first quoted value of an attribute regex from a single tag.
fn attr_value(attr_re: &Regex, tag: &str) -> Option<String> {
    let caps = attr_re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Returns the `href` of every anchor carrying the `preview` class token,
/// in document order.
#[must_use]
pub fn preview_links(html: &str) -> Vec<String> {
    ANCHOR_RE
        .find_iter(html)
        .filter_map(|m| {
            let tag = m.as_str();
            let class = attr_value(&CLASS_RE, tag)?;
            if !class.split_whitespace().any(|token| token == "preview") {
                return None;
            }
            attr_value(&HREF_RE, tag)
        })
        .collect()
}

/// Returns the `src` of every element whose `id` is `wallpaper`.
///
/// A well-formed detail page has exactly one; zero (removed item) and
/// multiple matches are both representable.
#[must_use]
pub fn wallpaper_sources(html: &str) -> Vec<String> {
    TAG_RE
        .find_iter(html)
        .filter_map(|m| {
            let tag = m.as_str();
            if attr_value(&ID_RE, tag)? != "wallpaper" {
                return None;
            }
            attr_value(&SRC_RE, tag)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
        <ul>
          <li><a class="preview" href="https://wallhaven.cc/w/abc123"></a></li>
          <li><a href="https://wallhaven.cc/w/def456" class="preview"></a></li>
          <li><a class="tag" href="https://wallhaven.cc/tag/1"></a></li>
        </ul>
        </body></html>"#;

    #[test]
    fn test_preview_links_document_order() {
        assert_eq!(
            preview_links(SEARCH_PAGE),
            vec![
                "https://wallhaven.cc/w/abc123",
                "https://wallhaven.cc/w/def456",
            ]
        );
    }

    #[test]
    fn test_preview_links_ignores_other_classes() {
        let links = preview_links(SEARCH_PAGE);
        assert!(links.iter().all(|l| !l.contains("/tag/")));
    }

    #[test]
    fn test_preview_links_requires_exact_class_token() {
        let html = r#"<a class="preview-thumb" href="https://x/1"></a>"#;
        assert!(preview_links(html).is_empty());

        let html = r#"<a class="thumb preview" href="https://x/2"></a>"#;
        assert_eq!(preview_links(html), vec!["https://x/2"]);
    }

    #[test]
    fn test_preview_links_empty_page() {
        assert!(preview_links("<html><body>no results</body></html>").is_empty());
    }

    #[test]
    fn test_preview_links_single_quoted_attributes() {
        let html = "<a class='preview' href='https://x/3'></a>";
        assert_eq!(preview_links(html), vec!["https://x/3"]);
    }

    #[test]
    fn test_wallpaper_sources_single_match() {
        let html = r#"
            <img id="showcase" src="https://w.wallhaven.cc/thumb.jpg">
            <img id="wallpaper" src="https://w.wallhaven.cc/full/ab/wallhaven-abc123.png">
        "#;
        assert_eq!(
            wallpaper_sources(html),
            vec!["https://w.wallhaven.cc/full/ab/wallhaven-abc123.png"]
        );
    }

    #[test]
    fn test_wallpaper_sources_attribute_order_irrelevant() {
        let html = r#"<img src="https://w/x.png" id="wallpaper">"#;
        assert_eq!(wallpaper_sources(html), vec!["https://w/x.png"]);
    }

    #[test]
    fn test_wallpaper_sources_none_on_removed_item() {
        assert!(wallpaper_sources("<html><body>410 gone</body></html>").is_empty());
    }

    #[test]
    fn test_wallpaper_sources_multiple_matches_all_returned() {
        let html = r#"
            <img id="wallpaper" src="https://w/a.png">
            <img id="wallpaper" src="https://w/b.png">
        "#;
        assert_eq!(
            wallpaper_sources(html),
            vec!["https://w/a.png", "https://w/b.png"]
        );
    }
}
