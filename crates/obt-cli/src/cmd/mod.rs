//! Command modules - one file per CLI command

pub mod completions;
pub mod config;
pub mod install;
pub mod list;
pub mod update;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use obt_core::history::InstallHistory;
use obt_core::{GithubSource, USER_AGENT};
use obt_schema::Platform;

use crate::HistoryHandle;
use crate::ops::Context;
use crate::ui::Output;

/// Wire up the history actor, the GitHub client and the UI for one run.
pub(crate) fn build_context(history: &Path, output: &Output) -> Result<Context> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(Context::new(
        HistoryHandle::spawn(InstallHistory::new(history)),
        Arc::new(GithubSource::from_env(client)),
        Arc::new(output.clone()),
        Platform::current(),
    ))
}
