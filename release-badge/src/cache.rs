use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{ReleaseBadgeError, Result};
use crate::release::ReleaseRecord;

pub const DEFAULT_TTL_SECS: u64 = 6 * 60 * 60;

/// Cache key for one repository's release
pub fn repo_cache_key(owner: &str, repo: &str) -> String {
    format!("{owner}_{repo}_latest_release")
}

/// String key-value storage backing the release cache
pub trait CacheStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default cache directory for this tool
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "release-badge")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("release-badge"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CacheStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write to a sibling temp file first so readers never see a partial entry
        let mut temp_file = tempfile::NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(value.as_bytes())?;
        temp_file
            .persist(self.path_for(key))
            .map_err(|e| ReleaseBadgeError::CacheStorage {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// In-process storage, used when persistence is disabled
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| ReleaseBadgeError::CacheStorage {
            key: key.to_string(),
            message: "memory store lock poisoned".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| ReleaseBadgeError::CacheStorage {
            key: key.to_string(),
            message: "memory store lock poisoned".to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Epoch milliseconds at which the entry was stored
    timestamp: i64,
    release: ReleaseRecord,
}

/// Time-boxed single-slot cache for the selected release.
///
/// Every failure is reported by the `try_*` operations; `get` and `put`
/// swallow them so a broken store behaves like an always-empty cache.
pub struct ReleaseCache<S> {
    store: S,
    key: String,
    ttl: Duration,
}

impl<S: CacheStore> ReleaseCache<S> {
    pub fn new(store: S, key: impl Into<String>, ttl: std::time::Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    /// Slot keyed by repository, with the default lifetime
    pub fn for_repository(store: S, owner: &str, repo: &str) -> Self {
        Self::new(
            store,
            repo_cache_key(owner, repo),
            std::time::Duration::from_secs(DEFAULT_TTL_SECS),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Option<ReleaseRecord> {
        self.get_at(Utc::now())
    }

    pub fn put(&self, release: &ReleaseRecord) {
        self.put_at(Utc::now(), release)
    }

    pub fn get_at(&self, now: DateTime<Utc>) -> Option<ReleaseRecord> {
        match self.try_get_at(now) {
            Ok(release) => release,
            Err(e) => {
                debug!("Ignoring unreadable cache entry '{}': {}", self.key, e);
                None
            }
        }
    }

    pub fn put_at(&self, now: DateTime<Utc>, release: &ReleaseRecord) {
        if let Err(e) = self.try_put_at(now, release) {
            warn!("Failed to write cache entry '{}': {}", self.key, e);
        }
    }

    pub fn try_get(&self) -> Result<Option<ReleaseRecord>> {
        self.try_get_at(Utc::now())
    }

    pub fn try_put(&self, release: &ReleaseRecord) -> Result<()> {
        self.try_put_at(Utc::now(), release)
    }

    /// Read the entry, treating a missing or expired one as `None`
    pub fn try_get_at(&self, now: DateTime<Utc>) -> Result<Option<ReleaseRecord>> {
        let Some(raw) = self.store.read(&self.key)? else {
            return Ok(None);
        };

        let entry: CacheEntry = serde_json::from_str(&raw)?;
        let age = now.timestamp_millis().saturating_sub(entry.timestamp);
        if age >= self.ttl.num_milliseconds() {
            debug!("Cache entry '{}' expired ({} ms old)", self.key, age);
            return Ok(None);
        }

        debug!("Cache hit for '{}': {}", self.key, entry.release.tag);
        Ok(Some(entry.release))
    }

    pub fn try_put_at(&self, now: DateTime<Utc>, release: &ReleaseRecord) -> Result<()> {
        let entry = CacheEntry {
            timestamp: now.timestamp_millis(),
            release: release.clone(),
        };
        let encoded = serde_json::to_string(&entry)?;
        self.store.write(&self.key, &encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::AssetRecord;
    use tempfile::tempdir;

    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn read(&self, key: &str) -> Result<Option<String>> {
            Err(ReleaseBadgeError::CacheStorage {
                key: key.to_string(),
                message: "storage unavailable".to_string(),
            })
        }

        fn write(&self, key: &str, _value: &str) -> Result<()> {
            Err(ReleaseBadgeError::CacheStorage {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            })
        }
    }

    fn sample_release() -> ReleaseRecord {
        ReleaseRecord {
            tag: "v1.2.3".to_string(),
            is_draft: false,
            is_prerelease: false,
            published_at: Some(Utc::now()),
            page_url: "https://github.com/opendrop/opendrop/releases/tag/v1.2.3".to_string(),
            assets: vec![AssetRecord {
                name: "opendrop-setup.exe".to_string(),
                download_url: "https://example.com/opendrop-setup.exe".to_string(),
            }],
        }
    }

    #[test]
    fn test_round_trip() {
        let cache = ReleaseCache::for_repository(MemoryStore::new(), "opendrop", "opendrop");
        let release = sample_release();

        assert!(cache.get().is_none());
        cache.put(&release);
        assert_eq!(cache.get(), Some(release));
    }

    #[test]
    fn test_expires_at_ttl() {
        let cache = ReleaseCache::new(
            MemoryStore::new(),
            "k",
            std::time::Duration::from_secs(60),
        );
        let stored_at = Utc::now();
        cache.put_at(stored_at, &sample_release());

        assert!(cache.get_at(stored_at + Duration::seconds(59)).is_some());
        assert!(cache.get_at(stored_at + Duration::seconds(60)).is_none());
        assert!(cache.get_at(stored_at + Duration::hours(7)).is_none());
    }

    #[test]
    fn test_default_ttl_is_six_hours() {
        let cache = ReleaseCache::for_repository(MemoryStore::new(), "opendrop", "opendrop");
        let stored_at = Utc::now();
        cache.put_at(stored_at, &sample_release());

        assert!(cache.get_at(stored_at + Duration::hours(5)).is_some());
        assert!(cache.get_at(stored_at + Duration::hours(6)).is_none());
    }

    #[test]
    fn test_put_replaces_entry() {
        let cache = ReleaseCache::for_repository(MemoryStore::new(), "opendrop", "opendrop");
        let mut release = sample_release();
        cache.put(&release);

        release.tag = "v1.3.0".to_string();
        cache.put(&release);
        assert_eq!(cache.get().unwrap().tag, "v1.3.0");
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let store = MemoryStore::new();
        store.write("opendrop_opendrop_latest_release", "{not json").unwrap();
        let cache = ReleaseCache::for_repository(store, "opendrop", "opendrop");

        assert!(cache.get().is_none());
        assert!(matches!(cache.try_get(), Err(ReleaseBadgeError::Json(_))));
    }

    #[test]
    fn test_broken_store_degrades_to_miss() {
        let cache = ReleaseCache::for_repository(BrokenStore, "opendrop", "opendrop");
        cache.put(&sample_release());
        assert!(cache.get().is_none());
        assert!(cache.try_put(&sample_release()).is_err());
    }

    #[test]
    fn test_file_store_persists_between_instances() {
        let dir = tempdir().unwrap();
        let release = sample_release();

        let cache = ReleaseCache::for_repository(FileStore::new(dir.path()), "opendrop", "opendrop");
        cache.put(&release);
        assert!(dir.path().join("opendrop_opendrop_latest_release.json").exists());

        let reopened =
            ReleaseCache::for_repository(FileStore::new(dir.path()), "opendrop", "opendrop");
        assert_eq!(reopened.get(), Some(release));
    }

    #[test]
    fn test_repositories_sharing_a_directory_do_not_collide() {
        let dir = tempdir().unwrap();
        let mut other = sample_release();
        other.tag = "v0.4.0".to_string();
        other.page_url = "https://github.com/bob/tool/releases/tag/v0.4.0".to_string();

        let alice = ReleaseCache::for_repository(FileStore::new(dir.path()), "alice", "app");
        let bob = ReleaseCache::for_repository(FileStore::new(dir.path()), "bob", "tool");

        alice.put(&sample_release());
        assert!(bob.get().is_none());

        bob.put(&other);
        assert_eq!(alice.get().unwrap().tag, "v1.2.3");
        assert_eq!(bob.get().unwrap().tag, "v0.4.0");
    }

    #[test]
    fn test_file_store_missing_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("not-created-yet"));
        assert!(store.read("anything").unwrap().is_none());
    }

    #[test]
    fn test_entry_format() {
        let store = MemoryStore::new();
        let cache = ReleaseCache::new(store, "slot", std::time::Duration::from_secs(10));
        let now = Utc::now();
        cache.put_at(now, &sample_release());

        let raw = cache.store().read("slot").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamp"], now.timestamp_millis());
        assert_eq!(value["release"]["tag_name"], "v1.2.3");
    }
}
