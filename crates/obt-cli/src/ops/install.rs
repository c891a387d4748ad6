//! Single-binary install: resolve, download, extract, record.
//!
//! Split in two so the command can ask before overwriting: [`prepare`]
//! resolves the asset and settles the destination path, [`apply`] does the
//! writes.

use std::io;
use std::path::{Path, PathBuf};

use obt_core::io::extract::extract_bytes;
use obt_core::{ResolveRequest, resolve};
use obt_schema::{InstallRecord, Platform, RepoRef, ResolvedTarget};
use tracing::info;

use super::{Context, InstallError};

/// A resolved asset and the file it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInstall {
    pub repo: RepoRef,
    pub target: ResolvedTarget,
    pub dest: PathBuf,
}

pub async fn prepare(
    ctx: &Context,
    request: &ResolveRequest,
    location: &Path,
) -> Result<PreparedInstall, InstallError> {
    let target = resolve(ctx.source.as_ref(), request, ctx.platform).await?;
    let dest = install_path(location, &target.binary_name, ctx.platform)?;
    if dest.is_dir() {
        return Err(InstallError::context(
            "Install path is a directory",
            dest.display(),
        ));
    }

    Ok(PreparedInstall {
        repo: request.repo.clone(),
        target,
        dest,
    })
}

/// Download, extract over `prepared.dest` and record the install.
pub async fn apply(
    ctx: &Context,
    prepared: PreparedInstall,
) -> Result<InstallRecord, InstallError> {
    let PreparedInstall { repo, target, dest } = prepared;
    fetch_and_extract(ctx, &target, &dest).await?;

    let record = InstallRecord {
        source_url: repo.url(),
        release_tag: target.release_tag,
        install_path: dest,
        binary_name: target.binary_name,
    };
    ctx.history.upsert(record.clone()).await?;

    info!(repo = %repo, tag = %record.release_tag, path = %record.install_path.display(), "installed");
    ctx.reporter.installed(
        &record.binary_name,
        &record.release_tag,
        &record.install_path,
    );
    Ok(record)
}

/// Download the target asset and write its binary to `dest`.
pub async fn fetch_and_extract(
    ctx: &Context,
    target: &ResolvedTarget,
    dest: &Path,
) -> Result<(), InstallError> {
    let data = ctx
        .source
        .download(
            &target.download_url,
            &target.binary_name,
            ctx.reporter.as_ref(),
        )
        .await?;

    let entry = format!("{}{}", target.binary_name, ctx.platform.exe_suffix());
    extract_bytes(data, target.format, entry, dest.to_path_buf()).await?;
    Ok(())
}

/// An existing directory gets the binary name appended; anything else is
/// taken as the file path itself. The result is absolute.
pub fn install_path(location: &Path, binary_name: &str, platform: Platform) -> io::Result<PathBuf> {
    let location = std::path::absolute(location)?;
    if location.is_dir() {
        Ok(location.join(format!("{binary_name}{}", platform.exe_suffix())))
    } else {
        Ok(location)
    }
}
