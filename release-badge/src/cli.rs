use clap::Parser;
use std::path::PathBuf;

use crate::presentation::OutputFormat;

#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "release-badge",
    version,
    about = "Show the latest installer release of a GitHub repository",
    long_about = None
)]
pub struct Args {
    /// Repository to query
    /// Format: owner/repo
    /// Falls back to [repository] in the config file when omitted
    #[clap(value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Product identifier used to recognise the installer asset
    #[clap(short, long)]
    pub product: Option<String>,

    /// Cache lifetime in seconds
    #[clap(long, value_name = "SECS")]
    pub ttl: Option<u64>,

    /// Directory holding the cached release
    #[clap(long, env = "RELEASE_BADGE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always fetch; keep nothing between runs
    #[clap(long)]
    pub no_cache: bool,

    /// Number of releases requested from GitHub (1-100)
    #[clap(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub per_page: Option<u8>,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Configuration file path
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the repository argument into owner and repo
    pub fn parse_repo(&self) -> crate::error::Result<Option<(String, String)>> {
        let Some(repo_str) = &self.repo else {
            return Ok(None);
        };

        let parts: Vec<&str> = repo_str.trim().split('/').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(crate::error::ReleaseBadgeError::InvalidRepo {
                input: repo_str.clone(),
            });
        }

        Ok(Some((parts[0].to_string(), parts[1].to_string())))
    }

    /// Config file given on the command line, else the per-user default
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }
}
