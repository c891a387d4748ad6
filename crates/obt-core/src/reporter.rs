//! Reporter trait for dependency injection
//!
//! Core logic reports progress and per-binary outcomes through this trait so
//! that it stays independent of the terminal UI.

use std::path::Path;

pub trait Reporter: Send + Sync {
    /// Indicates a new section or phase has started (e.g. "Checking", "Updating").
    fn section(&self, title: &str);

    /// Updates the progress of a download.
    fn downloading(&self, name: &str, current: u64, total: Option<u64>);

    /// A binary was written to `path` at `tag`.
    fn installed(&self, name: &str, tag: &str, path: &Path);

    /// An installed binary moved from one tag to another.
    fn updated(&self, path: &Path, from: &str, to: &str);

    /// An installed binary is already at the latest tag.
    fn up_to_date(&self, path: &Path, tag: &str);

    /// Marks an operation on `name` as failed with a specific reason.
    fn failed(&self, name: &str, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);

    /// Display a final summary of multiple operations.
    fn summary(&self, count: usize, action: &str, elapsed_secs: f64);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title)
    }
    fn downloading(&self, name: &str, current: u64, total: Option<u64>) {
        (**self).downloading(name, current, total)
    }
    fn installed(&self, name: &str, tag: &str, path: &Path) {
        (**self).installed(name, tag, path)
    }
    fn updated(&self, path: &Path, from: &str, to: &str) {
        (**self).updated(path, from, to)
    }
    fn up_to_date(&self, path: &Path, tag: &str) {
        (**self).up_to_date(path, tag)
    }
    fn failed(&self, name: &str, reason: &str) {
        (**self).failed(name, reason)
    }
    fn info(&self, msg: &str) {
        (**self).info(msg)
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg)
    }
    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        (**self).summary(count, action, elapsed_secs)
    }
}

/// A no-op reporter for silent operations (e.g. tests).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &str, _: u64, _: Option<u64>) {}
    fn installed(&self, _: &str, _: &str, _: &Path) {}
    fn updated(&self, _: &Path, _: &str, _: &str) {}
    fn up_to_date(&self, _: &Path, _: &str) {}
    fn failed(&self, _: &str, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
    fn summary(&self, _: usize, _: &str, _: f64) {}
}
