//! Search filter types shared across the pipeline.
//!
//! A [`SearchFilter`] is built once from validated CLI input and never
//! mutated afterwards; every downstream stage reads it by reference.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Content-safety tier for catalog results.
///
/// `Sketchy` widens the search to SFW *and* sketchy results; it does not
/// exclude SFW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SafetyTier {
    /// SFW results only (the default).
    #[default]
    Sfw,
    /// SFW and sketchy results.
    Sketchy,
}

/// A `WIDTHxHEIGHT` resolution pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error parsing a `WIDTHxHEIGHT` string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid resolution {input:?}: expected WIDTHxHEIGHT, e.g. 1920x1080")]
pub struct ResolutionParseError {
    /// The string that failed to parse.
    pub input: String,
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ResolutionParseError {
            input: s.to_string(),
        };
        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width: u32 = width.trim().parse().map_err(|_| err())?;
        let height: u32 = height.trim().parse().map_err(|_| err())?;
        if width == 0 || height == 0 {
            return Err(err());
        }
        Ok(Self { width, height })
    }
}

/// User-supplied search constraints, fixed for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct SearchFilter {
    /// Free-text query terms, in the order the user gave them.
    pub terms: Vec<String>,
    /// Optional resolution constraint.
    pub resolution: Option<Resolution>,
    /// When true, `resolution` is an exact match rather than a minimum.
    pub exact: bool,
    /// Content-safety tier.
    pub safety: SafetyTier,
    /// Maximum number of reference links to hand to resolution.
    /// `None` means unbounded.
    pub limit: Option<usize>,
}

impl SearchFilter {
    /// Builds a filter from a raw query string, splitting it on whitespace.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            terms: query.split_whitespace().map(str::to_string).collect(),
            resolution: None,
            exact: false,
            safety: SafetyTier::default(),
            limit: None,
        }
    }
}
