//! In-memory release source for operation tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use obt_core::history::{HistoryError, HistoryMap, InstallHistory};
use obt_core::io::download::DownloadError;
use obt_core::{ReleaseSource, Reporter, ResolveError};
use obt_schema::{Arch, InstallRecord, Os, Platform, Release, ReleaseAsset, RepoRef};
use rand::Rng;

use crate::store::HistoryStore;

pub(crate) const LINUX_AMD64: Platform = Platform {
    os: Os::Linux,
    arch: Arch::Amd64,
};

#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    releases: HashMap<String, Release>,
    blobs: HashMap<String, Bytes>,
    max_latency_ms: u64,
    downloads: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn new(max_latency_ms: u64) -> Self {
        Self {
            max_latency_ms,
            ..Self::default()
        }
    }

    /// Publish `tag` of `repo` with one raw linux/amd64 asset for `binary`.
    pub(crate) fn publish(&mut self, repo: &RepoRef, tag: &str, binary: &str, content: &[u8]) {
        let name = format!("{binary}_linux_amd64");
        let url = format!("https://dl.test/{repo}/{tag}/{name}");
        self.blobs.insert(url.clone(), Bytes::copy_from_slice(content));
        self.releases.insert(
            repo.to_string(),
            Release {
                tag_name: tag.to_string(),
                assets: vec![
                    ReleaseAsset {
                        name: format!("{binary}_darwin_arm64"),
                        download_url: format!("https://dl.test/{repo}/{tag}/darwin"),
                    },
                    ReleaseAsset {
                        name,
                        download_url: url,
                    },
                ],
            },
        );
    }

    pub(crate) fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if self.max_latency_ms == 0 {
            return;
        }
        let ms = rand::rng().random_range(0..=self.max_latency_ms);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait]
impl ReleaseSource for FakeSource {
    async fn fetch_release(
        &self,
        repo: &RepoRef,
        tag: Option<&str>,
    ) -> Result<Release, ResolveError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.pause().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.releases
            .get(&repo.to_string())
            .filter(|r| tag.is_none_or(|t| t == r.tag_name))
            .cloned()
            .ok_or_else(|| ResolveError::ReleaseNotFound {
                repo: repo.to_string(),
                tag: tag.map(str::to_string),
            })
    }

    async fn download(
        &self,
        url: &str,
        label: &str,
        reporter: &dyn Reporter,
    ) -> Result<Bytes, DownloadError> {
        self.pause().await;
        self.downloads.lock().unwrap().push(url.to_string());
        let data = self.blobs.get(url).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no blob at {url}"))
        })?;
        reporter.downloading(label, data.len() as u64, Some(data.len() as u64));
        Ok(data)
    }
}

/// History file that also remembers the path of every upsert it served.
#[derive(Debug, Clone)]
pub(crate) struct CountingHistory {
    inner: InstallHistory,
    upserts: Arc<Mutex<Vec<PathBuf>>>,
}

impl CountingHistory {
    pub(crate) fn new(inner: InstallHistory) -> Self {
        Self {
            inner,
            upserts: Arc::default(),
        }
    }

    pub(crate) fn upserts(&self) -> Vec<PathBuf> {
        self.upserts.lock().unwrap().clone()
    }
}

impl HistoryStore for CountingHistory {
    fn load(&self) -> Result<HistoryMap, HistoryError> {
        self.inner.load()
    }

    fn records(&self) -> Result<Vec<InstallRecord>, HistoryError> {
        self.inner.records()
    }

    fn upsert(&self, record: InstallRecord) -> Result<(), HistoryError> {
        self.upserts.lock().unwrap().push(record.install_path.clone());
        self.inner.upsert(record)
    }
}

/// Reporter that keeps the failure lines and section titles it was given.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub(crate) sections: Mutex<Vec<String>>,
    pub(crate) failures: Mutex<Vec<String>>,
    pub(crate) warnings: Mutex<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn section(&self, title: &str) {
        self.sections.lock().unwrap().push(title.to_string());
    }
    fn downloading(&self, _: &str, _: u64, _: Option<u64>) {}
    fn installed(&self, _: &str, _: &str, _: &Path) {}
    fn updated(&self, _: &Path, _: &str, _: &str) {}
    fn up_to_date(&self, _: &Path, _: &str) {}
    fn failed(&self, name: &str, _: &str) {
        self.failures.lock().unwrap().push(name.to_string());
    }
    fn info(&self, _: &str) {}
    fn warning(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }
    fn summary(&self, _: usize, _: &str, _: f64) {}
}
