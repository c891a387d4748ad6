//! UI Module - terminal output
//!
//! Commands talk to [`Output`], which forwards events to a single actor
//! thread. Only that thread writes to stdout, so lines from concurrent
//! tasks never interleave.
//!
//! - [`theme`] - Colors and icons
//! - [`actor`] - Message-passing event loop
//! - [`output`] - Public API for commands
//! - [`table`] - `obt list` table

pub mod actor;
pub mod output;
pub mod table;
pub mod theme;

pub use output::Output;
pub use theme::Theme;
