//! Detail-page resolution: reference link to direct asset URLs.
//!
//! The detail view embeds the full-size image under the `wallpaper` element.
//! The catalog throttles detail fetches aggressively, so 429 responses are
//! absorbed by re-requesting the identical URL under a [`RetryPolicy`];
//! every other failure is scoped to the single link and reported by the
//! caller without aborting the batch.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::html;
use crate::http::{FetchError, HttpClient};
use crate::retry::RetryPolicy;

/// Error resolving one reference link. Always item-scoped.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The server kept rate-limiting past the retry ceiling.
    #[error("rate-limited fetching {url}: gave up after {attempts} attempts")]
    RetriesExhausted {
        /// The detail-page URL.
        url: String,
        /// Total attempts issued.
        attempts: u32,
    },

    /// A transport or HTTP failure other than 429.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Resolves reference links to direct asset URLs.
#[derive(Debug)]
pub struct AssetResolver {
    client: HttpClient,
    policy: RetryPolicy,
}

impl AssetResolver {
    /// Creates a resolver with the default backoff policy.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self::with_policy(client, RetryPolicy::default())
    }

    /// Creates a resolver with a custom backoff policy (used by tests).
    #[must_use]
    pub fn with_policy(client: HttpClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetches the detail page at `link` and extracts its asset URLs.
    ///
    /// Returns an empty vector for a well-formed response with no embedded
    /// asset (removed or malformed item); that is a reportable outcome, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::RetriesExhausted`] when 429 responses outlast
    /// the policy, or [`ResolveError::Fetch`] for any other failure. Both
    /// are single-item failures.
    #[instrument(skip(self))]
    pub async fn resolve(&self, link: &str) -> Result<Vec<String>, ResolveError> {
        let mut attempt: u32 = 0;

        let body = loop {
            attempt += 1;
            match self.client.fetch_html(link).await {
                Ok(body) => break body,
                Err(e) if e.is_rate_limited() => {
                    let Some(delay) = self.policy.next_delay(attempt) else {
                        return Err(ResolveError::RetriesExhausted {
                            url: link.to_string(),
                            attempts: attempt,
                        });
                    };
                    warn!(
                        url = %link,
                        attempt,
                        delay_ms = delay.as_millis(),
                        "rate-limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        };

        let sources = html::wallpaper_sources(&body);
        if sources.is_empty() {
            debug!(url = %link, "detail page exposed no asset");
        }
        for source in &sources {
            debug!(url = %link, asset = %source, "resolved asset");
        }
        Ok(sources)
    }
}

/// Resolves a batch of reference links sequentially, preserving discovery
/// order.
///
/// Failures are logged per link and skipped; a bad link never aborts the
/// batch. Links that resolve to nothing contribute no locators.
pub async fn resolve_all(resolver: &AssetResolver, links: &[String]) -> Vec<String> {
    let mut locators = Vec::with_capacity(links.len());
    for link in links {
        match resolver.resolve(link).await {
            Ok(sources) if sources.is_empty() => {
                warn!(url = %link, "no asset found on detail page, skipping");
            }
            Ok(sources) => locators.extend(sources),
            Err(e) => {
                warn!(url = %link, error = %e, "resolution failed, skipping");
            }
        }
    }
    locators
}
