//! Wallgrab Core Library
//!
//! Core pipeline for discovering wallpapers on a paginated catalog,
//! resolving each entry to a direct image URL, and persisting the images to
//! local storage.
//!
//! # Architecture
//!
//! Data flows strictly forward through three stages:
//! - [`crawler`] - paginated discovery of reference links
//! - [`resolver`] - per-item resolution to direct asset URLs
//! - [`engine`] - concurrent download and persistence
//!
//! Supporting modules: [`filter`] (search constraints), [`query`] (search
//! URL construction), [`html`] (markup extraction), [`http`] (shared HTTP
//! client), [`retry`] (rate-limit backoff), [`filename`] (asset naming).

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crawler;
pub mod engine;
pub mod filename;
pub mod filter;
pub mod html;
pub mod http;
pub mod query;
pub mod resolver;
pub mod retry;

// Re-export commonly used types
pub use crawler::{CrawlOutcome, CrawlResult, Crawler, DEFAULT_PAGE_DELAY};
pub use engine::{DEFAULT_POOL_SIZE, DownloadEngine, DownloadStats, EngineError};
pub use filter::{Resolution, SafetyTier, SearchFilter};
pub use http::{FetchError, HttpClient};
pub use resolver::{AssetResolver, ResolveError, resolve_all};
pub use retry::RetryPolicy;
