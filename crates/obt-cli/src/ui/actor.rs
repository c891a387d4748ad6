//! UI Actor - Single-threaded event processing
//!
//! Concurrent update tasks fire events at the actor and move on. The actor
//! thread owns stdout and prints each event as one whole line, which keeps
//! output from parallel tasks from interleaving mid-line.
//!
//! While downloads are running on a terminal, the actor also keeps a single
//! live status line at the bottom, redrawn on a timer and cleared before any
//! other line is printed.

use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};

use super::theme::{Theme, format_size};

/// Events that can be sent to the UI actor
#[derive(Debug)]
pub enum UiEvent {
    /// Print a section header
    PrintHeader { title: String },
    /// Download progress for one binary
    Downloading {
        name: String,
        current: u64,
        total: Option<u64>,
    },
    /// A binary was written to disk
    Installed {
        name: String,
        tag: String,
        path: PathBuf,
    },
    /// An installed binary moved to a newer tag
    Updated {
        path: PathBuf,
        from: String,
        to: String,
    },
    /// An installed binary is already current
    UpToDate { path: PathBuf, tag: String },
    /// An operation failed
    Failed { name: String, reason: String },
    /// Print info message
    Info(String),
    /// Print warning footer
    Warning(String),
    /// Print summary with timing
    Summary {
        count: usize,
        action: String,
        elapsed_secs: f64,
    },
    /// Reply once every earlier event has been printed
    Sync(tokio::sync::oneshot::Sender<()>),
    /// Shutdown the actor
    Shutdown,
}

/// Handle to the UI actor thread
#[derive(Debug)]
pub struct UiActor {
    sender: mpsc::Sender<UiEvent>,
    _handle: thread::JoinHandle<()>,
}

impl UiActor {
    /// Spawn a new UI actor thread
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            run_event_loop(receiver);
        });

        Self {
            sender,
            _handle: handle,
        }
    }

    /// Get a cloneable sender for this actor
    pub fn sender(&self) -> mpsc::Sender<UiEvent> {
        self.sender.clone()
    }
}

impl Drop for UiActor {
    fn drop(&mut self) {
        let _ = self.sender.send(UiEvent::Shutdown);
    }
}

/// Live download status, one entry per in-flight download.
#[derive(Debug, Default)]
struct ProgressLine {
    active: BTreeMap<String, (u64, Option<u64>)>,
    drawn: bool,
    enabled: bool,
}

impl ProgressLine {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    fn update(&mut self, name: String, current: u64, total: Option<u64>) {
        if total.is_some_and(|t| current >= t) {
            self.active.remove(&name);
        } else {
            self.active.insert(name, (current, total));
        }
    }

    fn finish(&mut self, name: &str) {
        self.active.remove(name);
    }

    fn text(&self, theme: &Theme) -> Option<String> {
        if self.active.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .active
            .iter()
            .map(|(name, (current, total))| match total {
                Some(t) => format!("{name} {}/{}", format_size(*current), format_size(*t)),
                None => format!("{name} {}", format_size(*current)),
            })
            .collect();
        Some(format!("  {} {}", theme.icons.active, parts.join("  ")))
    }

    fn clear(&mut self) {
        if self.drawn {
            let _ = execute!(std::io::stdout(), MoveToColumn(0), Clear(ClearType::CurrentLine));
            self.drawn = false;
        }
    }

    fn draw(&mut self, theme: &Theme) {
        if !self.enabled {
            return;
        }
        self.clear();
        if let Some(text) = self.text(theme) {
            let mut out = std::io::stdout();
            let _ = write!(out, "{}", text.dark_grey());
            let _ = out.flush();
            self.drawn = true;
        }
    }
}

pub(crate) fn installed_line(theme: &Theme, name: &str, tag: &str, path: &Path) -> String {
    format!(
        "  {} Installed '{name}' {tag} to '{}'",
        theme.icons.success.with(theme.colors.success),
        path.display()
    )
}

pub(crate) fn updated_line(theme: &Theme, path: &Path, from: &str, to: &str) -> String {
    format!(
        "  {} {} {from} {} {to}",
        theme.icons.success.with(theme.colors.success),
        path.display(),
        theme.icons.arrow
    )
}

pub(crate) fn up_to_date_line(theme: &Theme, path: &Path, tag: &str) -> String {
    format!(
        "  {} {} {tag} (up to date)",
        theme.icons.pending.with(theme.colors.secondary),
        path.display()
    )
}

pub(crate) fn failed_line(theme: &Theme, name: &str, reason: &str) -> String {
    format!(
        "  {} {name}: {reason}",
        theme.icons.error.with(theme.colors.error)
    )
}

/// Main event loop for the UI actor
///
/// This runs in a dedicated thread and processes all UI events sequentially.
fn run_event_loop(receiver: mpsc::Receiver<UiEvent>) {
    let theme = Theme::default();
    let mut progress = ProgressLine::new(std::io::stdout().is_terminal());

    loop {
        let event = match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                progress.draw(&theme);
                continue;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if !matches!(event, UiEvent::Downloading { .. }) {
            progress.clear();
        }
        match event {
            UiEvent::Downloading {
                name,
                current,
                total,
            } => {
                progress.update(name, current, total);
                continue;
            }
            UiEvent::PrintHeader { title } => {
                println!();
                println!("{}", title.bold());
            }
            UiEvent::Installed { name, tag, path } => {
                progress.finish(&name);
                println!("{}", installed_line(&theme, &name, &tag, &path));
            }
            UiEvent::Updated { path, from, to } => {
                println!("{}", updated_line(&theme, &path, &from, &to));
            }
            UiEvent::UpToDate { path, tag } => {
                println!("{}", up_to_date_line(&theme, &path, &tag));
            }
            UiEvent::Failed { name, reason } => {
                progress.finish(&name);
                println!("{}", failed_line(&theme, &name, &reason));
            }
            UiEvent::Info(msg) => {
                println!("  {} {msg}", theme.icons.info);
            }
            UiEvent::Warning(msg) => {
                println!("  {} {msg}", theme.icons.warning.with(theme.colors.warning));
            }
            UiEvent::Summary {
                count,
                action,
                elapsed_secs,
            } => {
                let operation = action.to_uppercase();
                let msg = format!("{operation} COMPLETE {count}, elapsed {elapsed_secs:.1}s");
                println!();
                println!("  {} {}", theme.icons.success.with(theme.colors.success), msg.bold());
            }
            UiEvent::Sync(tx) => {
                let _ = std::io::stdout().flush();
                let _ = tx.send(());
            }
            UiEvent::Shutdown => break,
        }
        progress.draw(&theme);
    }

    progress.clear();
}
