use async_trait::async_trait;
use bytes::Bytes;
use obt_schema::{Release, RepoRef};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::Reporter;
use crate::io::download::{DownloadError, fetch_bytes};
use crate::resolver::ResolveError;

/// Public GitHub REST endpoint.
pub const GITHUB_API: &str = "https://api.github.com";

/// Somewhere releases can be looked up and their assets fetched.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch a release by tag, or the latest one when `tag` is `None`.
    async fn fetch_release(&self, repo: &RepoRef, tag: Option<&str>)
    -> Result<Release, ResolveError>;

    /// Download an asset body into memory.
    async fn download(
        &self,
        url: &str,
        label: &str,
        reporter: &dyn Reporter,
    ) -> Result<Bytes, DownloadError>;
}

/// [`ReleaseSource`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubSource {
    client: Client,
    api_base: String,
}

impl GithubSource {
    pub fn new(client: Client) -> Self {
        Self::with_api_base(client, GITHUB_API)
    }

    /// Point at a different API root (GitHub Enterprise, test servers).
    pub fn with_api_base(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { client, api_base }
    }

    /// Honors `OBT_GITHUB_API` when set.
    pub fn from_env(client: Client) -> Self {
        match std::env::var("OBT_GITHUB_API") {
            Ok(base) if !base.is_empty() => Self::with_api_base(client, base),
            _ => Self::new(client),
        }
    }

    fn release_url(&self, repo: &RepoRef, tag: Option<&str>) -> String {
        match tag {
            Some(tag) => format!(
                "{}/repos/{}/{}/releases/tags/{tag}",
                self.api_base, repo.owner, repo.repo
            ),
            None => format!(
                "{}/repos/{}/{}/releases/latest",
                self.api_base, repo.owner, repo.repo
            ),
        }
    }
}

#[async_trait]
impl ReleaseSource for GithubSource {
    async fn fetch_release(
        &self,
        repo: &RepoRef,
        tag: Option<&str>,
    ) -> Result<Release, ResolveError> {
        let url = self.release_url(repo, tag);
        debug!(%url, "fetching release");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(resp.json::<Release>().await?),
            StatusCode::NOT_FOUND => Err(ResolveError::ReleaseNotFound {
                repo: repo.to_string(),
                tag: tag.map(str::to_string),
            }),
            s => Err(ResolveError::Api {
                status: s.as_u16(),
                url,
            }),
        }
    }

    async fn download(
        &self,
        url: &str,
        label: &str,
        reporter: &dyn Reporter,
    ) -> Result<Bytes, DownloadError> {
        fetch_bytes(&self.client, url, label, reporter).await
    }
}
