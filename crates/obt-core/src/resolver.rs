//! Release resolution
//!
//! Turns "repo + optional binary name + optional tag" into a single
//! downloadable asset for the current platform. The first accepted asset in
//! release listing order wins.

use obt_schema::asset::{self, classify, infer_binary_prefix, matches_platform};
use obt_schema::{Platform, Release, RepoRef, ResolvedTarget};
use thiserror::Error;
use tracing::{debug, info};

use crate::github::ReleaseSource;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {url}")]
    Api { status: u16, url: String },

    #[error("{}", release_not_found(.repo, .tag.as_deref()))]
    ReleaseNotFound { repo: String, tag: Option<String> },

    #[error("No asset of {repo} {tag} matches '{prefix}' for {platform}")]
    NoMatchingAsset {
        repo: String,
        tag: String,
        prefix: String,
        platform: Platform,
    },

    #[error("Only a package-manager format is published for this platform: {asset}")]
    UnsupportedFormat { asset: String },
}

fn release_not_found(repo: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("Release {tag} of {repo} not found"),
        None => format!("{repo} has no published release"),
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub repo: RepoRef,
    /// Explicit binary name. Inferred from the first asset when absent.
    pub binary_name: Option<String>,
    /// Release tag. Latest when absent.
    pub tag: Option<String>,
}

impl ResolveRequest {
    pub fn latest(repo: RepoRef) -> Self {
        Self {
            repo,
            binary_name: None,
            tag: None,
        }
    }
}

/// Fetch the requested release and pick the asset for `platform`.
pub async fn resolve(
    source: &dyn ReleaseSource,
    request: &ResolveRequest,
    platform: Platform,
) -> Result<ResolvedTarget, ResolveError> {
    let release = source
        .fetch_release(&request.repo, request.tag.as_deref())
        .await?;
    info!(repo = %request.repo, tag = %release.tag_name, assets = release.assets.len(), "fetched release");
    select_asset(&release, request, platform)
}

/// Asset selection over an already-fetched release.
pub fn select_asset(
    release: &Release,
    request: &ResolveRequest,
    platform: Platform,
) -> Result<ResolvedTarget, ResolveError> {
    let prefix = request.binary_name.clone().or_else(|| {
        release
            .assets
            .first()
            .map(|a| infer_binary_prefix(&a.name, &request.repo.repo))
    });
    let prefix = prefix.unwrap_or_else(|| request.repo.repo.clone());

    let mut package_only = None;
    for candidate in &release.assets {
        let c = classify(&candidate.name, &prefix, platform);
        debug!(asset = %candidate.name, accepted = c.accepted, "classified");

        if c.accepted {
            return Ok(ResolvedTarget {
                download_url: candidate.download_url.clone(),
                binary_name: prefix,
                format: c.format,
                release_tag: release.tag_name.clone(),
            });
        }
        if package_only.is_none()
            && asset::is_package(&candidate.name)
            && matches_platform(&candidate.name, &prefix, platform)
        {
            package_only = Some(candidate.name.clone());
        }
    }

    match package_only {
        Some(asset) => Err(ResolveError::UnsupportedFormat { asset }),
        None => Err(ResolveError::NoMatchingAsset {
            repo: request.repo.to_string(),
            tag: release.tag_name.clone(),
            prefix,
            platform,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reporter;
    use crate::io::download::DownloadError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use obt_schema::{Arch, ContainerFormat, Os, ReleaseAsset};

    const LINUX_AMD64: Platform = Platform {
        os: Os::Linux,
        arch: Arch::Amd64,
    };

    struct FixedSource(Release);

    #[async_trait]
    impl ReleaseSource for FixedSource {
        async fn fetch_release(
            &self,
            repo: &RepoRef,
            tag: Option<&str>,
        ) -> Result<Release, ResolveError> {
            match tag {
                Some(t) if t != self.0.tag_name => Err(ResolveError::ReleaseNotFound {
                    repo: repo.to_string(),
                    tag: Some(t.to_string()),
                }),
                _ => Ok(self.0.clone()),
            }
        }

        async fn download(
            &self,
            _url: &str,
            _label: &str,
            _reporter: &dyn Reporter,
        ) -> Result<Bytes, DownloadError> {
            Ok(Bytes::new())
        }
    }

    fn release(tag: &str, names: &[&str]) -> Release {
        Release {
            tag_name: tag.to_string(),
            assets: names
                .iter()
                .map(|n| ReleaseAsset {
                    name: (*n).to_string(),
                    download_url: format!("https://dl/{n}"),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_resolve_jpcal_linux() {
        let source = FixedSource(release(
            "v1.0.2",
            &[
                "jpcal_darwin_amd64.zip",
                "jpcal_linux_amd64.tar.gz",
                "jpcal_windows_amd64.zip",
            ],
        ));
        let req = ResolveRequest::latest(RepoRef::new("y-yagi", "jpcal"));
        let target = resolve(&source, &req, LINUX_AMD64).await.unwrap();

        assert_eq!(target.download_url, "https://dl/jpcal_linux_amd64.tar.gz");
        assert_eq!(target.binary_name, "jpcal");
        assert_eq!(target.format, ContainerFormat::TarGzip);
        assert_eq!(target.release_tag, "v1.0.2");
    }

    #[tokio::test]
    async fn test_resolve_unknown_tag() {
        let source = FixedSource(release("v1.0.2", &["jpcal_linux_amd64.tar.gz"]));
        let req = ResolveRequest {
            tag: Some("v9.9.9".into()),
            ..ResolveRequest::latest(RepoRef::new("y-yagi", "jpcal"))
        };
        let err = resolve(&source, &req, LINUX_AMD64).await.unwrap_err();
        assert!(matches!(err, ResolveError::ReleaseNotFound { .. }));
    }

    #[test]
    fn test_first_accepted_asset_wins() {
        let rel = release(
            "v2",
            &["tool_linux_amd64.tar.gz", "tool_linux_amd64.zip"],
        );
        let req = ResolveRequest::latest(RepoRef::new("o", "tool"));
        let target = select_asset(&rel, &req, LINUX_AMD64).unwrap();
        assert_eq!(target.format, ContainerFormat::TarGzip);
    }

    #[test]
    fn test_explicit_binary_name_overrides_inference() {
        let rel = release(
            "v1.55.2",
            &[
                "golangci-lint-1.55.2-linux-amd64.deb",
                "golangci-lint-1.55.2-linux-amd64.tar.gz",
            ],
        );
        let req = ResolveRequest {
            binary_name: Some("golangci-lint".into()),
            ..ResolveRequest::latest(RepoRef::new("golangci", "golangci-lint"))
        };
        let target = select_asset(&rel, &req, LINUX_AMD64).unwrap();
        assert_eq!(
            target.download_url,
            "https://dl/golangci-lint-1.55.2-linux-amd64.tar.gz"
        );
        assert_eq!(target.binary_name, "golangci-lint");
    }

    #[test]
    fn test_package_only_is_unsupported() {
        let rel = release(
            "v1",
            &["tool_1.0_linux_amd64.deb", "tool_1.0_darwin_amd64.tar.gz"],
        );
        let req = ResolveRequest::latest(RepoRef::new("o", "tool"));
        let err = select_asset(&rel, &req, LINUX_AMD64).unwrap_err();
        assert!(
            matches!(err, ResolveError::UnsupportedFormat { ref asset } if asset == "tool_1.0_linux_amd64.deb")
        );
    }

    #[test]
    fn test_no_asset_for_platform() {
        let rel = release("v1", &["tool_darwin_arm64.tar.gz"]);
        let req = ResolveRequest::latest(RepoRef::new("o", "tool"));
        let err = select_asset(&rel, &req, LINUX_AMD64).unwrap_err();
        assert!(
            matches!(err, ResolveError::NoMatchingAsset { ref prefix, .. } if prefix == "tool")
        );
    }

    #[test]
    fn test_empty_release_uses_repo_name() {
        let rel = release("v1", &[]);
        let req = ResolveRequest::latest(RepoRef::new("o", "tool"));
        let err = select_asset(&rel, &req, LINUX_AMD64).unwrap_err();
        assert!(err.to_string().contains("'tool'"));
    }

    #[test]
    fn test_sidecar_checksum_is_skipped() {
        let rel = release(
            "v1",
            &["tool_linux_amd64.tar.gz.sha256", "tool_linux_amd64.tar.gz"],
        );
        let req = ResolveRequest::latest(RepoRef::new("o", "tool"));
        let target = select_asset(&rel, &req, LINUX_AMD64).unwrap();
        assert_eq!(target.download_url, "https://dl/tool_linux_amd64.tar.gz");
    }
}
