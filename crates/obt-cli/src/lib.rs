//! obt - install binaries from GitHub releases
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! Picks the release asset built for the current OS and architecture,
//! pulls the executable out of it and remembers where it went so that
//! `obt update` can refresh everything later.
//!
//! # Architecture
//!
//! - **Actor Pattern**: The history file is owned by a single thread behind
//!   `HistoryHandle`; terminal output is owned by the UI actor behind `Output`.
//! - **Reporter**: Operations report progress through `obt_core::Reporter` and
//!   never print directly.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.config/obt/
//! ├── config.toml   # default install path
//! └── history       # install records (postcard)
//! ```

pub mod cmd;
pub mod ops;
pub mod store;
pub mod ui;

pub use crate::store::HistoryHandle;
pub use obt_core::USER_AGENT;
pub use obt_core::paths::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "obt")]
#[command(author, version = env!("OBT_VERSION"), about = "obt - install binaries from GitHub releases")]
pub struct Cli {
    /// History file to read and update
    #[arg(long, global = true, env = "OBT_HISTORY")]
    pub history: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// History file, falling back to the one under the obt home.
    pub fn history_path(&self) -> PathBuf {
        self.history.clone().unwrap_or_else(history_path)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install a binary from the latest (or a tagged) release
    Install {
        /// Repository: owner/repo or https://github.com/owner/repo
        repo: String,
        /// Install directory or file path
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Binary name, when it differs from the asset prefix
        #[arg(short, long)]
        binary: Option<String>,
        /// Release tag to install instead of the latest
        #[arg(short, long)]
        tag: Option<String>,
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Update every installed binary to its latest release
    Update {
        /// Maximum number of binaries updated at once
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// List installed binaries
    List,
    /// Show or change configuration
    Config {
        /// Default install directory (absolute)
        #[arg(long)]
        default_path: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
