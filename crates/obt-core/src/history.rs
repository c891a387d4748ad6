//! Install history
//!
//! A single postcard-encoded file holding a map from install path to
//! [`InstallRecord`]. Every write rewrites the whole map through a temp file
//! and a rename, so readers never observe a half-written history.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use obt_schema::InstallRecord;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Records keyed by install path.
pub type HistoryMap = BTreeMap<String, InstallRecord>;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History file {} doesn't exist", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("History file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: postcard::Error,
    },

    #[error("Failed to encode history: {0}")]
    Encode(postcard::Error),
}

/// Handle to the history file. Cheap to clone; holds no open file.
#[derive(Debug, Clone)]
pub struct InstallHistory {
    path: PathBuf,
}

impl InstallHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the whole map. A missing file is [`HistoryError::NotFound`].
    pub fn load(&self) -> Result<HistoryMap, HistoryError> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HistoryError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        postcard::from_bytes(&bytes).map_err(|source| HistoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Like [`load`](Self::load), but a missing file is an empty map.
    pub fn load_or_default(&self) -> Result<HistoryMap, HistoryError> {
        match self.load() {
            Err(HistoryError::NotFound(_)) => Ok(HistoryMap::new()),
            other => other,
        }
    }

    /// All records ordered by install path.
    pub fn records(&self) -> Result<Vec<InstallRecord>, HistoryError> {
        Ok(self.load_or_default()?.into_values().collect())
    }

    /// Insert or replace the record for `record.install_path`.
    ///
    /// Creates the file (and its directory) on first use.
    pub fn upsert(&self, record: InstallRecord) -> Result<(), HistoryError> {
        let mut map = self.load_or_default()?;
        debug!(path = %record.install_path.display(), tag = %record.release_tag, "upserting history record");
        map.insert(record.key(), record);
        self.save(&map)
    }

    fn save(&self, map: &HistoryMap) -> Result<(), HistoryError> {
        let bytes = postcard::to_allocvec(map).map_err(HistoryError::Encode)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
