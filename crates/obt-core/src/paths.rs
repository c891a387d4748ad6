use dirs::{config_dir, executable_dir};
use std::path::PathBuf;

/// Returns the obt configuration directory, or None if no config dir can be resolved.
pub fn try_obt_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("OBT_HOME") {
        return Some(PathBuf::from(val));
    }
    config_dir().map(|c| c.join("obt"))
}

/// Returns the obt home directory (`~/.config/obt` on Linux).
///
/// Falls back to `.obt` in the working directory when neither `OBT_HOME` is
/// set nor a config dir exists for the current user.
pub fn obt_home() -> PathBuf {
    try_obt_home().unwrap_or_else(|| PathBuf::from(".obt"))
}

/// Install history: <home>/history
pub fn history_path() -> PathBuf {
    obt_home().join("history")
}

/// User configuration: <home>/config.toml
pub fn config_path() -> PathBuf {
    obt_home().join("config.toml")
}

/// Directory binaries land in when neither `--path` nor a configured default is given.
pub fn default_bin_dir() -> PathBuf {
    executable_dir().unwrap_or_else(|| PathBuf::from("/usr/local/bin"))
}
