//! List command

use std::path::Path;

use anyhow::{Context, Result};
use obt_core::history::InstallHistory;

use crate::ui::table::history_table;

/// Print every tracked binary as a table
pub fn list(history: &Path) -> Result<()> {
    let records = InstallHistory::new(history)
        .records()
        .with_context(|| format!("Failed to read history {}", history.display()))?;

    if records.is_empty() {
        println!("No binaries installed yet.");
        println!("Run 'obt install <owner/repo>' to get started.");
        return Ok(());
    }

    println!("{}", history_table(&records));
    Ok(())
}
