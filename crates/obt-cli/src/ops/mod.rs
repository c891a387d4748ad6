//! Operations shared by the commands: single install and bulk update.

pub mod context;
pub mod error;
pub mod install;
pub mod update;

#[cfg(test)]
pub(crate) mod testing;

pub use context::Context;
pub use error::InstallError;
