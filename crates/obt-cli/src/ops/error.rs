//! Domain-specific errors for install and update operations

use obt_core::ResolveError;
use obt_core::io::download::DownloadError;
use obt_core::io::extract::ExtractError;
use obt_schema::RepoRefError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("History update failed: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Repo(#[from] RepoRefError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {message}")]
    Context {
        context: &'static str,
        message: String,
    },
}

impl InstallError {
    /// Create an error with context for better debugging.
    pub fn context(ctx: &'static str, msg: impl std::fmt::Display) -> Self {
        Self::Context {
            context: ctx,
            message: msg.to_string(),
        }
    }
}
