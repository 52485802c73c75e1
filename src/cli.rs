//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use wallgrab_core::{DEFAULT_POOL_SIZE, Resolution, SafetyTier};

/// Download wallpapers from wallhaven.cc, on the CLI.
#[derive(Parser, Debug)]
#[command(name = "wallgrab")]
#[command(author, version, about)]
#[command(after_help = "Examples:\n  \
    wallgrab -q 'the witcher' -d ~/pictures -r 1920x1080 -e -l 2000 -s sketchy -j 2\n  \
    wallgrab --query linux --directory /tmp")]
pub struct Args {
    /// Search query for the catalog
    #[arg(short, long)]
    pub query: String,

    /// Destination directory for downloaded wallpapers
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Only consider wallpapers at this resolution or above (WIDTHxHEIGHT)
    #[arg(short, long)]
    pub resolution: Option<Resolution>,

    /// Require the exact resolution given by --resolution
    #[arg(short, long, requires = "resolution")]
    pub exact: bool,

    /// Maximum number of wallpapers to fetch (omit for all available)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Content-safety tier
    #[arg(short, long, value_enum, default_value_t = SafetyTier::Sfw)]
    pub safety: SafetyTier,

    /// Number of parallel download workers
    #[arg(short = 'j', long, default_value_t = DEFAULT_POOL_SIZE as u64, value_parser = clap::value_parser!(u64).range(1..=64))]
    pub pool: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
