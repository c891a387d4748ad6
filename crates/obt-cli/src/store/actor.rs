//! History Actor - serialized access to the install history
//!
//! `InstallHistory::upsert` is a read-modify-write of the whole file. Two
//! concurrent upserts would each start from the same snapshot and the second
//! rename would drop the first record. The history is therefore owned by a
//! dedicated thread and every request is handled to completion before the
//! next one is read off the channel.

use std::fmt;
use std::sync::mpsc;
use std::thread;

use obt_core::history::{HistoryError, HistoryMap, InstallHistory};
use obt_schema::InstallRecord;
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("History actor stopped unexpectedly")]
    ActorDied,
}

/// Backing storage owned by the actor thread.
pub trait HistoryStore: Send + 'static {
    fn load(&self) -> Result<HistoryMap, HistoryError>;
    fn records(&self) -> Result<Vec<InstallRecord>, HistoryError>;
    fn upsert(&self, record: InstallRecord) -> Result<(), HistoryError>;
}

impl HistoryStore for InstallHistory {
    fn load(&self) -> Result<HistoryMap, HistoryError> {
        InstallHistory::load(self)
    }

    fn records(&self) -> Result<Vec<InstallRecord>, HistoryError> {
        InstallHistory::records(self)
    }

    fn upsert(&self, record: InstallRecord) -> Result<(), HistoryError> {
        InstallHistory::upsert(self, record)
    }
}

/// Events that can be sent to the history actor
pub enum HistoryEvent {
    /// Read the full map; a missing file is an error
    Load {
        resp: oneshot::Sender<Result<HistoryMap, HistoryError>>,
    },
    /// All records ordered by install path; a missing file is empty
    Records {
        resp: oneshot::Sender<Result<Vec<InstallRecord>, HistoryError>>,
    },
    /// Insert or replace one record
    Upsert {
        record: InstallRecord,
        resp: oneshot::Sender<Result<(), HistoryError>>,
    },
    /// Shutdown the actor
    Shutdown,
}

impl fmt::Debug for HistoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { .. } => f.debug_struct("Load").finish_non_exhaustive(),
            Self::Records { .. } => f.debug_struct("Records").finish_non_exhaustive(),
            Self::Upsert { record, .. } => f
                .debug_struct("Upsert")
                .field("path", &record.install_path)
                .field("tag", &record.release_tag)
                .finish_non_exhaustive(),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

/// A handle to the history actor that is Send + Sync and Clone.
#[derive(Clone)]
pub struct HistoryHandle {
    sender: mpsc::Sender<HistoryEvent>,
}

impl fmt::Debug for HistoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryHandle").finish_non_exhaustive()
    }
}

impl HistoryHandle {
    /// Spawn the actor thread. The file is not touched until the first request.
    pub fn spawn<S: HistoryStore>(history: S) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            run_history_event_loop(history, receiver);
        });

        Self { sender }
    }

    async fn request<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(oneshot::Sender<Result<T, HistoryError>>) -> HistoryEvent,
    {
        let (tx, rx) = oneshot::channel();
        self.sender.send(f(tx)).map_err(|_| StoreError::ActorDied)?;
        Ok(rx.await.map_err(|_| StoreError::ActorDied)??)
    }

    pub async fn load(&self) -> Result<HistoryMap, StoreError> {
        self.request(|resp| HistoryEvent::Load { resp }).await
    }

    pub async fn records(&self) -> Result<Vec<InstallRecord>, StoreError> {
        self.request(|resp| HistoryEvent::Records { resp }).await
    }

    pub async fn upsert(&self, record: InstallRecord) -> Result<(), StoreError> {
        self.request(|resp| HistoryEvent::Upsert { record, resp })
            .await
    }

    /// Stop the actor once queued requests are handled.
    pub fn shutdown(&self) {
        let _ = self.sender.send(HistoryEvent::Shutdown);
    }
}

// The history and receiver are moved in so this thread is the only owner.
#[allow(clippy::needless_pass_by_value)]
fn run_history_event_loop<S: HistoryStore>(history: S, receiver: mpsc::Receiver<HistoryEvent>) {
    while let Ok(event) = receiver.recv() {
        match event {
            HistoryEvent::Load { resp } => {
                let _ = resp.send(history.load());
            }
            HistoryEvent::Records { resp } => {
                let _ = resp.send(history.records());
            }
            HistoryEvent::Upsert { record, resp } => {
                let _ = resp.send(history.upsert(record));
            }
            HistoryEvent::Shutdown => break,
        }
    }
}
