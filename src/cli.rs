//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use pipe_extractor::ChannelTab;

/// Extract channel metadata and listings from supported services.
///
/// Resolves the URL to its service, fetches the channel once, and prints its
/// metadata followed by up to `--pages` pages of each tab.
#[derive(Parser, Debug)]
#[command(name = "pipe-extract")]
#[command(author, version, about)]
pub struct Args {
    /// Channel or conference URL (YouTube /channel/UC..., media.ccc.de /c/...)
    pub url: String,

    /// Only list this tab (videos, playlists, events)
    #[arg(short, long)]
    pub tab: Option<ChannelTab>,

    /// Pages to fetch per tab, following continuation tokens (1-50)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=50))]
    pub pages: u8,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Config file (default: $XDG_CONFIG_HOME/pipe-extractor/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Content language requested from the service (e.g. "de")
    #[arg(long)]
    pub language: Option<String>,

    /// Content country requested from the service (e.g. "AT")
    #[arg(long)]
    pub country: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
