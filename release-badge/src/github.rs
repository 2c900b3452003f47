use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;

use crate::error::Result;
use crate::release::ReleaseRecord;

pub const DEFAULT_PER_PAGE: u8 = 30;
/// GitHub rejects larger pages
pub const MAX_PER_PAGE: u8 = 100;

/// Anything that can produce the upstream release list
#[async_trait]
pub trait ReleaseSource {
    async fn fetch_releases(&self) -> Result<Vec<ReleaseRecord>>;
}

#[derive(Serialize)]
struct ListParams {
    per_page: u8,
    page: u32,
}

pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
    per_page: u8,
}

impl GitHubClient {
    pub fn new(owner: &str, repo: &str) -> Result<Self> {
        Self::builder(owner, repo, None)
    }

    /// Create a client against a custom API root (GitHub Enterprise, test servers)
    pub fn with_base_url(owner: &str, repo: &str, base_url: &str) -> Result<Self> {
        Self::builder(owner, repo, Some(base_url))
    }

    fn builder(owner: &str, repo: &str, base_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            builder = builder.personal_token(token);
        }
        if let Some(base_url) = base_url {
            builder = builder.base_uri(base_url)?;
        }

        Ok(Self {
            octocrab: builder.build()?,
            owner: owner.to_string(),
            repo: repo.to_string(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    /// Fetch the first page of releases, newest first as GitHub returns them
    async fn fetch_releases(&self) -> Result<Vec<ReleaseRecord>> {
        let route = format!("/repos/{}/{}/releases", self.owner, self.repo);
        tracing::info!("Fetching releases for {}/{}", self.owner, self.repo);

        let releases: Vec<ReleaseRecord> = self
            .octocrab
            .get(
                &route,
                Some(&ListParams {
                    per_page: self.per_page,
                    page: 1,
                }),
            )
            .await?;

        tracing::debug!("Received {} releases", releases.len());
        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseBadgeError;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_fetch_releases() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/opendrop/opendrop/releases")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "30".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v1.1.0", "draft": false, "prerelease": true, "published_at": "2024-02-01T00:00:00Z", "html_url": "https://github.com/opendrop/opendrop/releases/tag/v1.1.0", "assets": []},
                    {"tag_name": "v1.0.0", "draft": false, "prerelease": false, "published_at": "2024-01-01T00:00:00Z", "html_url": "https://github.com/opendrop/opendrop/releases/tag/v1.0.0",
                     "assets": [{"name": "opendrop-setup.exe", "browser_download_url": "https://github.com/opendrop/opendrop/releases/download/v1.0.0/opendrop-setup.exe"}]}
                ]"#,
            )
            .create_async()
            .await;

        let client = GitHubClient::with_base_url("opendrop", "opendrop", &server.url()).unwrap();
        let releases = client.fetch_releases().await.unwrap();

        mock.assert_async().await;
        assert_eq!(releases.len(), 2);
        assert_eq!(releases[0].tag, "v1.1.0");
        assert!(releases[0].is_prerelease);
        assert_eq!(releases[1].assets[0].name, "opendrop-setup.exe");
    }

    #[tokio::test]
    async fn test_fetch_releases_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/opendrop/opendrop/releases")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Server Error", "documentation_url": "https://docs.github.com"}"#)
            .create_async()
            .await;

        let client = GitHubClient::with_base_url("opendrop", "opendrop", &server.url()).unwrap();
        let result = client.fetch_releases().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ReleaseBadgeError::GitHubApi(_))));
    }

    #[tokio::test]
    async fn test_custom_page_size() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/repo/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "5".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = GitHubClient::with_base_url("owner", "repo", &server.url())
            .unwrap()
            .per_page(5);
        let releases = client.fetch_releases().await.unwrap();

        mock.assert_async().await;
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_page_size_capped_at_api_limit() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/owner/repo/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "100".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = GitHubClient::with_base_url("owner", "repo", &server.url())
            .unwrap()
            .per_page(250);
        client.fetch_releases().await.unwrap();

        mock.assert_async().await;
    }
}
