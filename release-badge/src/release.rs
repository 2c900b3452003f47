use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::version::{self, Version};

/// A release as returned by the GitHub releases endpoint.
///
/// Field names follow the API payload so the same shape is used for the
/// wire format and the cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseRecord {
    #[serde(rename = "tag_name")]
    pub tag: String,

    #[serde(rename = "draft", default)]
    pub is_draft: bool,

    #[serde(rename = "prerelease", default)]
    pub is_prerelease: bool,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(rename = "html_url", default)]
    pub page_url: String,

    #[serde(default)]
    pub assets: Vec<AssetRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetRecord {
    pub name: String,

    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

impl ReleaseRecord {
    /// Parsed version of the tag, if it carries one
    pub fn version(&self) -> Option<Version> {
        version::parse(&self.tag)
    }

    /// Publish time in epoch milliseconds; a missing timestamp counts as the epoch.
    fn published_millis(&self) -> i64 {
        self.published_at
            .map(|at| at.timestamp_millis())
            .unwrap_or(0)
    }
}

/// Pick the release a download page should advertise.
///
/// Drafts are never returned. Stable releases win over prereleases
/// regardless of version; prereleases are only considered when no stable
/// release exists. Within the pool the highest version wins, ties go to the
/// later publish time, and if no tag parses the first candidate in input
/// order is returned.
pub fn select_best(releases: &[ReleaseRecord]) -> Option<&ReleaseRecord> {
    if releases.is_empty() {
        return None;
    }

    let published: Vec<&ReleaseRecord> = releases.iter().filter(|r| !r.is_draft).collect();
    let stable: Vec<&ReleaseRecord> = published
        .iter()
        .copied()
        .filter(|r| !r.is_prerelease)
        .collect();

    let pool = if stable.is_empty() { published } else { stable };

    let mut best: Option<(&ReleaseRecord, Version)> = None;
    for &candidate in &pool {
        let Some(candidate_version) = candidate.version() else {
            debug!("Skipping release '{}' with no parseable version", candidate.tag);
            continue;
        };

        let wins = match &best {
            None => true,
            Some((current, current_version)) => match version::compare(&candidate_version, current_version) {
                Ordering::Greater => true,
                Ordering::Equal => {
                    candidate.published_millis() > current.published_millis()
                }
                Ordering::Less => false,
            },
        };

        if wins {
            best = Some((candidate, candidate_version));
        }
    }

    match best {
        Some((release, _)) => Some(release),
        None => pool.first().copied(),
    }
}
