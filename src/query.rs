//! Catalog search URL construction.
//!
//! [`search_url`] is a pure function of the filter: identical filters always
//! produce byte-identical URLs. The catalog weights multi-word queries by the
//! final term, which is why only the last term carries the category marker.

use url::Url;

use crate::filter::{SafetyTier, SearchFilter};

/// Default catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://wallhaven.cc";

/// Purity parameter for SFW-only results.
const PURITY_SFW: &str = "100";

/// Purity parameter for SFW plus sketchy results.
const PURITY_SKETCHY: &str = "110";

/// Builds the first-page search URL for a filter.
#[must_use]
pub fn search_url(base_url: &str, filter: &SearchFilter) -> String {
    let mut out = format!("{}/search?q=", base_url.trim_end_matches('/'));

    let last = filter.terms.len().saturating_sub(1);
    for (i, term) in filter.terms.iter().enumerate() {
        out.push_str(&urlencoding::encode(term));
        if i == last {
            out.push_str("&categories=111");
        } else {
            out.push('+');
        }
    }

    let purity = match filter.safety {
        SafetyTier::Sfw => PURITY_SFW,
        SafetyTier::Sketchy => PURITY_SKETCHY,
    };
    out.push_str("&purity=");
    out.push_str(purity);

    if let Some(resolution) = filter.resolution {
        if filter.exact {
            out.push_str("&resolutions=");
        } else {
            out.push_str("&atleast=");
        }
        out.push_str(&resolution.to_string());
    }

    out.push_str("&sorting=relevance&order=desc&page=1");
    out
}

/// Rewrites the `page=` query parameter of a search URL.
///
/// All other parameters are preserved in their original order. Returns the
/// input unchanged when it does not parse as a URL.
#[must_use]
pub fn with_page(url: &str, page: u32) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let mut rewritten = parsed.clone();
    {
        let mut pairs = rewritten.query_pairs_mut();
        pairs.clear();
        for (key, value) in parsed.query_pairs() {
            if key == "page" {
                pairs.append_pair("page", &page.to_string());
            } else {
                pairs.append_pair(&key, &value);
            }
        }
    }
    rewritten.to_string()
}
