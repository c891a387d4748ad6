//! Install history access for the CLI.

pub mod actor;

pub use actor::{HistoryHandle, HistoryStore, StoreError};
