use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_badge::cache::{CacheStore, FileStore, MemoryStore, ReleaseCache};
use release_badge::cli::Args;
use release_badge::config::Config;
use release_badge::github::GitHubClient;
use release_badge::orchestrator::{ReleaseFetchOrchestrator, RunOutcome};
use release_badge::presentation::ConsolePresenter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(&args.config_path()).context("Failed to load configuration")?;
    config.merge_with_args(&args)?;

    let (owner, repo) = config.repository()?;

    let client = match &config.api.base_url {
        Some(base_url) => GitHubClient::with_base_url(owner, repo, base_url)?,
        None => GitHubClient::new(owner, repo)?,
    }
    .per_page(config.api.per_page);

    let mut presenter = ConsolePresenter::new(
        std::io::stdout(),
        args.format,
        config.asset_matcher(),
        config.link_targets(owner, repo),
    );

    let outcome = if args.no_cache {
        run(client, MemoryStore::new(), &config, &mut presenter).await
    } else {
        let dir = config.cache.dir.clone().unwrap_or_else(FileStore::default_dir);
        tracing::debug!("Using cache directory {}", dir.display());
        run(client, FileStore::new(dir), &config, &mut presenter).await
    };

    if outcome != RunOutcome::CacheHit && outcome != RunOutcome::Fetched {
        tracing::warn!("No release details available ({:?})", outcome);
    }

    Ok(())
}

async fn run<S: CacheStore>(
    client: GitHubClient,
    store: S,
    config: &Config,
    presenter: &mut ConsolePresenter<std::io::Stdout>,
) -> RunOutcome {
    let key = config.cache_key(client.owner(), client.repo());
    let cache = ReleaseCache::new(store, key, config.cache_ttl());
    ReleaseFetchOrchestrator::new(client, cache)
        .run(presenter)
        .await
}
