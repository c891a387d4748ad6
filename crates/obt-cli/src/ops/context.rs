//! Shared operation context.
//!
//! Groups the handles every operation needs so they are passed by clone
//! instead of living in globals.

use std::fmt;
use std::sync::Arc;

use obt_core::{ReleaseSource, Reporter};
use obt_schema::Platform;

use crate::HistoryHandle;

#[derive(Clone)]
pub struct Context {
    pub history: HistoryHandle,
    pub source: Arc<dyn ReleaseSource>,
    pub reporter: Arc<dyn Reporter>,
    /// Platform assets are matched against.
    pub platform: Platform,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("history", &self.history)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(
        history: HistoryHandle,
        source: Arc<dyn ReleaseSource>,
        reporter: Arc<dyn Reporter>,
        platform: Platform,
    ) -> Self {
        Self {
            history,
            source,
            reporter,
            platform,
        }
    }
}
