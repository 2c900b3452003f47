use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::asset::AssetMatcher;
use crate::cache::{repo_cache_key, DEFAULT_TTL_SECS};
use crate::github::DEFAULT_PER_PAGE;
use crate::presentation::LinkTargets;

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub product: ProductConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub links: LinksConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RepositoryConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProductConfig {
    #[serde(default = "default_product")]
    pub name: String,

    #[serde(default = "default_installer_keywords")]
    pub installer_keywords: Vec<String>,

    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: default_product(),
            installer_keywords: default_installer_keywords(),
            extension: default_extension(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Explicit cache key; derived from the repository when unset
    pub key: Option<String>,

    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            key: None,
            dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LinksConfig {
    pub fallback_download: Option<String>,
    pub releases_page: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    pub base_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            base_url: None,
        }
    }
}

fn default_product() -> String {
    AssetMatcher::default().product
}

fn default_installer_keywords() -> Vec<String> {
    AssetMatcher::default().role_keywords
}

fn default_extension() -> String {
    AssetMatcher::default().extension
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

fn default_per_page() -> u8 {
    DEFAULT_PER_PAGE
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            crate::error::ReleaseBadgeError::Config {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("release-badge.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/release-badge.toml"))
    }

    /// Merge configuration with command line arguments
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) -> Result<()> {
        if let Some((owner, repo)) = args.parse_repo()? {
            self.repository.owner = Some(owner);
            self.repository.repo = Some(repo);
        }

        if let Some(product) = &args.product {
            self.product.name = product.clone();
        }

        if let Some(ttl) = args.ttl {
            self.cache.ttl_secs = ttl;
        }

        if args.cache_dir.is_some() {
            self.cache.dir = args.cache_dir.clone();
        }

        if let Some(per_page) = args.per_page {
            self.api.per_page = per_page;
        }

        Ok(())
    }

    /// Repository identity as (owner, repo)
    pub fn repository(&self) -> crate::error::Result<(&str, &str)> {
        match (&self.repository.owner, &self.repository.repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok((owner.as_str(), repo.as_str()))
            }
            _ => Err(crate::error::ReleaseBadgeError::MissingRepo),
        }
    }

    pub fn asset_matcher(&self) -> AssetMatcher {
        AssetMatcher {
            product: self.product.name.clone(),
            role_keywords: self.product.installer_keywords.clone(),
            extension: self.product.extension.clone(),
        }
    }

    pub fn link_targets(&self, owner: &str, repo: &str) -> LinkTargets {
        let mut links = LinkTargets::for_repo(owner, repo);
        if let Some(page) = &self.links.releases_page {
            links.releases_page = page.clone();
        }
        links.fallback_download = self.links.fallback_download.clone();
        links
    }

    /// Key of the cache slot for a repository
    pub fn cache_key(&self, owner: &str, repo: &str) -> String {
        match &self.cache.key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => repo_cache_key(owner, repo),
        }
    }

    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache.ttl_secs)
    }
}
