//! Unified UI output interface.
//!
//! Commands and operations hold an [`Output`] and never print directly. Every
//! call becomes an event for the UI actor.

use std::path::Path;
use std::sync::{OnceLock, mpsc};

use super::actor::{UiActor, UiEvent};

/// Singleton instance of the UI actor channel.
static UI_ACTOR: OnceLock<mpsc::Sender<UiEvent>> = OnceLock::new();

/// Lazily initializes the UI actor and returns a sender handle.
fn get_actor_sender() -> mpsc::Sender<UiEvent> {
    UI_ACTOR
        .get_or_init(|| {
            let actor = UiActor::spawn();
            let sender = actor.sender();

            // Keep actor alive for program duration
            std::mem::forget(actor);

            sender
        })
        .clone()
}

/// A cloneable handle for sending UI events to the terminal actor.
#[derive(Clone, Debug)]
pub struct Output {
    sender: mpsc::Sender<UiEvent>,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            sender: get_actor_sender(),
        }
    }

    fn send(&self, event: UiEvent) {
        let _ = self.sender.send(event);
    }

    pub fn section(&self, title: &str) {
        self.send(UiEvent::PrintHeader {
            title: title.to_string(),
        });
    }

    pub fn downloading(&self, name: &str, current: u64, total: Option<u64>) {
        self.send(UiEvent::Downloading {
            name: name.to_string(),
            current,
            total,
        });
    }

    pub fn installed(&self, name: &str, tag: &str, path: &Path) {
        self.send(UiEvent::Installed {
            name: name.to_string(),
            tag: tag.to_string(),
            path: path.to_path_buf(),
        });
    }

    pub fn updated(&self, path: &Path, from: &str, to: &str) {
        self.send(UiEvent::Updated {
            path: path.to_path_buf(),
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    pub fn up_to_date(&self, path: &Path, tag: &str) {
        self.send(UiEvent::UpToDate {
            path: path.to_path_buf(),
            tag: tag.to_string(),
        });
    }

    pub fn failed(&self, name: &str, reason: &str) {
        self.send(UiEvent::Failed {
            name: name.to_string(),
            reason: reason.to_string(),
        });
    }

    pub fn info(&self, msg: &str) {
        self.send(UiEvent::Info(msg.to_string()));
    }

    pub fn warning(&self, msg: &str) {
        self.send(UiEvent::Warning(msg.to_string()));
    }

    /// Prints a summary of operations including the total elapsed time.
    pub fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        self.send(UiEvent::Summary {
            count,
            action: action.to_string(),
            elapsed_secs,
        });
    }

    /// Wait until all pending UI events are printed.
    pub async fn wait_async(&self) {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.send(UiEvent::Sync(tx));
        let _ = rx.await;
    }
}

impl obt_core::Reporter for Output {
    fn section(&self, title: &str) {
        self.section(title);
    }

    fn downloading(&self, name: &str, current: u64, total: Option<u64>) {
        self.downloading(name, current, total);
    }

    fn installed(&self, name: &str, tag: &str, path: &Path) {
        self.installed(name, tag, path);
    }

    fn updated(&self, path: &Path, from: &str, to: &str) {
        self.updated(path, from, to);
    }

    fn up_to_date(&self, path: &Path, tag: &str) {
        self.up_to_date(path, tag);
    }

    fn failed(&self, name: &str, reason: &str) {
        self.failed(name, reason);
    }

    fn info(&self, msg: &str) {
        self.info(msg);
    }

    fn warning(&self, msg: &str) {
        self.warning(msg);
    }

    fn summary(&self, count: usize, action: &str, elapsed_secs: f64) {
        self.summary(count, action, elapsed_secs);
    }
}
