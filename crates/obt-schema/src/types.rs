//! Core data types shared by the resolver, extractor and history store.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::ContainerFormat;

/// One attachment of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// File name as shown on the release page.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// A tagged release and its attachments, in listing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Tag the release was published under.
    pub tag_name: String,
    /// Attached files.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A concrete artifact picked for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// URL of the chosen asset.
    pub download_url: String,
    /// Name of the executable inside the asset (also the default file name).
    pub binary_name: String,
    /// How the executable is packaged.
    pub format: ContainerFormat,
    /// Tag of the release the asset belongs to.
    pub release_tag: String,
}

/// The persisted fact that a binary was installed from a source at a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    /// Repository URL (`https://github.com/owner/repo`).
    pub source_url: String,
    /// Release tag that is currently installed.
    pub release_tag: String,
    /// Absolute path of the installed executable. Unique key.
    pub install_path: PathBuf,
    /// Binary name used to pick assets and archive entries.
    pub binary_name: String,
}

impl InstallRecord {
    /// Key the record is stored under.
    pub fn key(&self) -> String {
        self.install_path.to_string_lossy().into_owned()
    }
}

/// Error returned when a repository reference cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid repository reference '{0}', expected owner/repo or a github.com URL")]
pub struct RepoRefError(pub String);

static GITHUB_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?github\.com/([^/\s]+)/([^/\s]+?)(?:\.git)?/?$").ok()
});

/// A GitHub `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Account or organization.
    pub owner: String,
    /// Repository short name.
    pub repo: String,
}

impl RepoRef {
    /// Build a reference from its parts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Canonical repository URL, as stored in install records.
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl std::str::FromStr for RepoRef {
    type Err = RepoRefError;

    /// Accepts `owner/repo`, `github.com/owner/repo` and full `https://` URLs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(caps) = GITHUB_URL.as_ref().and_then(|re| re.captures(s)) {
            return Ok(Self::new(&caps[1], &caps[2]));
        }

        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() && !owner.contains(':') => {
                Ok(Self::new(*owner, repo.trim_end_matches(".git")))
            }
            _ => Err(RepoRefError(s.to_string())),
        }
    }
}
