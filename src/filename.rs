//! Filename derivation for persisted assets.
//!
//! A persisted file is named after the final path segment of its asset URL.
//! Two distinct URLs whose final segments collide therefore overwrite each
//! other, last writer wins; this is documented, accepted behavior.

use url::Url;

/// Derives a filesystem-safe filename from the final path segment of a URL.
///
/// Returns `None` when the URL does not parse or its path has no non-empty
/// final segment (e.g. `https://host/`).
#[must_use]
pub fn from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let sanitized = sanitize(last);
    (!sanitized.trim_matches('_').is_empty()).then_some(sanitized)
}

/// Replaces characters that are invalid on common filesystems with `_`.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_takes_final_segment() {
        assert_eq!(
            from_url("https://host/path/to/img-12345.png").unwrap(),
            "img-12345.png"
        );
    }

    #[test]
    fn test_from_url_single_segment() {
        assert_eq!(
            from_url("https://w.wallhaven.cc/wallhaven-abc.jpg").unwrap(),
            "wallhaven-abc.jpg"
        );
    }

    #[test]
    fn test_from_url_trailing_slash_yields_none() {
        assert!(from_url("https://host/path/").is_none());
        assert!(from_url("https://host/").is_none());
    }

    #[test]
    fn test_from_url_unparseable_yields_none() {
        assert!(from_url("not a url").is_none());
    }

    #[test]
    fn test_from_url_sanitizes_invalid_chars() {
        // A literal colon is legal in a URL path but not in a filename
        assert_eq!(from_url("https://host/a:b.png").unwrap(), "a_b.png");
    }

    #[test]
    fn test_from_url_ignores_query_and_fragment() {
        assert_eq!(
            from_url("https://host/dir/pic.jpg?token=1#top").unwrap(),
            "pic.jpg"
        );
    }

    #[test]
    fn test_identical_final_segments_collide() {
        let a = from_url("https://host/a/pic.png").unwrap();
        let b = from_url("https://host/b/pic.png").unwrap();
        assert_eq!(a, b);
    }
}
