//! Bulk update of every tracked binary.
//!
//! One task per record, all in flight at once unless a job limit is given.
//! Each task resolves the latest release for its record, and rewrites the
//! binary and its history entry only when the tag moved. A task's error ends
//! that task alone and surfaces as a [`RecordOutcome::Failed`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use obt_core::{ResolveRequest, resolve};
use obt_schema::{InstallRecord, RepoRef};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::install::fetch_and_extract;
use super::{Context, InstallError};
use crate::store::StoreError;

/// What happened to one tracked binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    UpToDate {
        path: PathBuf,
        tag: String,
    },
    Updated {
        path: PathBuf,
        from: String,
        to: String,
    },
    Failed {
        path: PathBuf,
        reason: String,
    },
}

impl RecordOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::UpToDate { path, .. } | Self::Updated { path, .. } | Self::Failed { path, .. } => {
                path
            }
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Update everything in the history. A missing history file is an error.
pub async fn update_all(
    ctx: &Context,
    jobs: Option<usize>,
) -> Result<Vec<RecordOutcome>, StoreError> {
    let start = Instant::now();
    ctx.reporter.section("Updating installed binaries");

    let records: Vec<InstallRecord> = ctx.history.load().await?.into_values().collect();
    let outcomes = run(ctx, records, jobs).await;

    let updated = outcomes.iter().filter(|o| o.is_updated()).count();
    let failed = outcomes.iter().filter(|o| o.is_failed()).count();
    if failed > 0 {
        ctx.reporter.warning(&format!(
            "{failed} of {} binaries failed to update",
            outcomes.len()
        ));
    }
    ctx.reporter
        .summary(updated, "update", start.elapsed().as_secs_f64());
    Ok(outcomes)
}

/// Update `records` concurrently and return one outcome per record, ordered
/// by install path.
pub async fn run(
    ctx: &Context,
    records: Vec<InstallRecord>,
    jobs: Option<usize>,
) -> Vec<RecordOutcome> {
    let limit = jobs.filter(|&n| n > 0).map(|n| Arc::new(Semaphore::new(n)));
    let paths: Vec<PathBuf> = records.iter().map(|r| r.install_path.clone()).collect();

    let mut set = JoinSet::new();
    for record in records {
        let ctx = ctx.clone();
        let limit = limit.clone();
        set.spawn(async move {
            let _permit = match limit {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            update_one(&ctx, record).await
        });
    }

    let mut outcomes = Vec::with_capacity(paths.len());
    while let Some(res) = set.join_next().await {
        match res {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!(error = %e, "update task aborted"),
        }
    }

    // An aborted task still owes its record an outcome.
    for path in paths {
        if !outcomes.iter().any(|o| o.path() == path) {
            let reason = "update task aborted".to_string();
            ctx.reporter.failed(&path.display().to_string(), &reason);
            outcomes.push(RecordOutcome::Failed { path, reason });
        }
    }

    outcomes.sort_by(|a, b| a.path().cmp(b.path()));
    outcomes
}

async fn update_one(ctx: &Context, record: InstallRecord) -> RecordOutcome {
    let path = record.install_path.clone();

    match try_update(ctx, record).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let reason = e.to_string();
            warn!(path = %path.display(), error = %reason, "update failed");
            ctx.reporter.failed(&path.display().to_string(), &reason);
            RecordOutcome::Failed { path, reason }
        }
    }
}

async fn try_update(ctx: &Context, record: InstallRecord) -> Result<RecordOutcome, InstallError> {
    let repo: RepoRef = record.source_url.parse()?;
    let request = ResolveRequest {
        repo,
        binary_name: Some(record.binary_name.clone()),
        tag: None,
    };
    let target = resolve(ctx.source.as_ref(), &request, ctx.platform).await?;

    if target.release_tag == record.release_tag {
        debug!(path = %record.install_path.display(), tag = %record.release_tag, "up to date");
        ctx.reporter
            .up_to_date(&record.install_path, &record.release_tag);
        return Ok(RecordOutcome::UpToDate {
            path: record.install_path,
            tag: record.release_tag,
        });
    }

    fetch_and_extract(ctx, &target, &record.install_path).await?;

    let from = record.release_tag.clone();
    let to = target.release_tag.clone();
    let updated = InstallRecord {
        source_url: request.repo.url(),
        release_tag: target.release_tag,
        ..record
    };
    let path = updated.install_path.clone();
    ctx.history.upsert(updated).await?;

    info!(path = %path.display(), %from, %to, "updated");
    ctx.reporter.updated(&path, &from, &to);
    Ok(RecordOutcome::Updated { path, from, to })
}
