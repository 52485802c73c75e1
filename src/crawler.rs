//! Pagination crawler for catalog search results.
//!
//! Walks the paginated search listing, collecting preview links in document
//! order until a page comes back empty or the configured limit is covered.
//! A fixed pause between consecutive page fetches keeps the crawler clear of
//! server-side rate-limiting; the first fetch is never delayed.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::filter::SearchFilter;
use crate::html;
use crate::http::{FetchError, HttpClient};
use crate::query;

/// Default pause between consecutive page fetches.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Why a crawl stopped. All three are normal terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// The very first page had no results.
    Empty,
    /// A later page came back with no results.
    Exhausted,
    /// The accumulated link count covered the configured limit.
    LimitReached,
}

/// The links discovered by a crawl, in discovery order, plus the reason the
/// crawl stopped.
#[derive(Debug)]
pub struct CrawlResult {
    /// Reference links to item detail pages, in document order across pages.
    pub links: Vec<String>,
    /// Terminal state of the crawl.
    pub outcome: CrawlOutcome,
}

impl CrawlResult {
    /// True when no results matched the filter at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcome == CrawlOutcome::Empty
    }
}

/// Crawls the paginated catalog search listing.
#[derive(Debug)]
pub struct Crawler {
    client: HttpClient,
    base_url: String,
    page_delay: Duration,
}

impl Crawler {
    /// Creates a crawler against the default catalog endpoint.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, query::DEFAULT_BASE_URL)
    }

    /// Creates a crawler against a custom endpoint (used by tests).
    #[must_use]
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Overrides the inter-page pause.
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Collects reference links for `filter`, page by page.
    ///
    /// The limit strictly bounds the returned links: pages are consumed
    /// whole, then the accumulated list is truncated, so the final page may
    /// be fetched for only part of its links.
    ///
    /// # Errors
    ///
    /// Propagates [`FetchError`] when any page fetch fails; the catalog
    /// being unreachable terminates the run rather than one item.
    #[instrument(skip(self, filter), fields(base_url = %self.base_url))]
    pub async fn crawl(&self, filter: &SearchFilter) -> Result<CrawlResult, FetchError> {
        let limit = filter.limit.unwrap_or(usize::MAX);
        let mut url = query::search_url(&self.base_url, filter);
        let mut links: Vec<String> = Vec::new();
        let mut page: u32 = 1;

        loop {
            info!(page, url = %url, "fetching catalog page");
            let body = self.client.fetch_html(&url).await?;
            let page_links = html::preview_links(&body);
            debug!(page, count = page_links.len(), "extracted preview links");

            if page_links.is_empty() {
                let outcome = if page == 1 {
                    CrawlOutcome::Empty
                } else {
                    CrawlOutcome::Exhausted
                };
                return Ok(CrawlResult { links, outcome });
            }

            links.extend(page_links);
            if links.len() >= limit {
                links.truncate(limit);
                return Ok(CrawlResult {
                    links,
                    outcome: CrawlOutcome::LimitReached,
                });
            }

            page += 1;
            url = query::with_page(&url, page);
            tokio::time::sleep(self.page_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_result_empty_flag() {
        let result = CrawlResult {
            links: Vec::new(),
            outcome: CrawlOutcome::Empty,
        };
        assert!(result.is_empty());

        let result = CrawlResult {
            links: vec!["https://x/w/1".to_string()],
            outcome: CrawlOutcome::LimitReached,
        };
        assert!(!result.is_empty());
    }

    #[test]
    fn test_default_page_delay_is_one_second() {
        assert_eq!(DEFAULT_PAGE_DELAY, Duration::from_secs(1));
    }
}
