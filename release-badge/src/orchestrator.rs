use tracing::{info, warn};

use crate::cache::{CacheStore, ReleaseCache};
use crate::github::ReleaseSource;
use crate::presentation::Presenter;
use crate::release::select_best;

/// How a single run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A fresh cached release was presented
    CacheHit,
    /// Releases were fetched, one was presented and cached
    Fetched,
    /// The release list could not be fetched; nothing was presented
    FetchFailed,
    /// The release list held no usable release; nothing was presented
    NoRelease,
}

/// Cache check, then fetch and select on a miss, then present.
pub struct ReleaseFetchOrchestrator<R, S> {
    source: R,
    cache: ReleaseCache<S>,
}

impl<R: ReleaseSource, S: CacheStore> ReleaseFetchOrchestrator<R, S> {
    pub fn new(source: R, cache: ReleaseCache<S>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &ReleaseCache<S> {
        &self.cache
    }

    /// Run once. Never fails: every error is logged and reported through the outcome.
    pub async fn run<P: Presenter + ?Sized>(&self, presenter: &mut P) -> RunOutcome {
        if let Some(release) = self.cache.get() {
            info!("Using cached release {}", release.tag);
            presenter.present(&release);
            return RunOutcome::CacheHit;
        }

        let releases = match self.source.fetch_releases().await {
            Ok(releases) => releases,
            Err(e) => {
                warn!("Failed to fetch releases: {}", e);
                return RunOutcome::FetchFailed;
            }
        };

        let Some(best) = select_best(&releases) else {
            warn!("No usable release among {} fetched", releases.len());
            return RunOutcome::NoRelease;
        };

        info!("Selected release {}", best.tag);
        presenter.present(best);
        self.cache.put(best);
        RunOutcome::Fetched
    }
}
