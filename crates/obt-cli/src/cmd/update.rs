//! Update command

use std::path::Path;

use anyhow::Result;
use obt_core::HistoryError;

use super::build_context;
use crate::ops;
use crate::store::StoreError;
use crate::ui::Output;

/// Update every tracked binary to its latest release.
///
/// Individual failures are reported but do not fail the command.
pub async fn update(history: &Path, jobs: Option<usize>) -> Result<()> {
    let output = Output::new();
    let ctx = build_context(history, &output)?;

    let result = ops::update::update_all(&ctx, jobs).await;
    ctx.history.shutdown();

    let result = match result {
        Ok(_) => Ok(()),
        Err(StoreError::History(HistoryError::NotFound(_))) => {
            ctx.reporter
                .info("No binaries installed yet. Run 'obt install <owner/repo>' first.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    };
    output.wait_async().await;
    result
}
