//! Shared types and asset matching for obt.
//!
//! Everything in this crate is pure: no network, no filesystem. The I/O side
//! lives in `obt-core`.

pub mod asset;
pub mod platform;
pub mod types;

// Re-exports
pub use asset::{Classification, ContainerFormat, classify, infer_binary_prefix, matches_platform};
pub use platform::*;
pub use types::*;
