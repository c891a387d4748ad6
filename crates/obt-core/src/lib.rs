pub mod config;
pub mod github;
pub mod history;
pub mod io;
pub mod paths;
pub mod reporter;
pub mod resolver;

pub use config::{Config, ConfigError};
pub use github::{GithubSource, ReleaseSource};
pub use history::{HistoryError, InstallHistory};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};
pub use resolver::{ResolveError, ResolveRequest, resolve};

/// User Agent string sent with every GitHub request
pub const USER_AGENT: &str = concat!("obt/", env!("CARGO_PKG_VERSION"));
