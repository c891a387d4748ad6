//! Config command

use std::path::PathBuf;

use anyhow::Result;
use obt_core::Config;
use obt_core::paths::config_path;

/// Set the default install path, or print the current settings
pub fn config(default_path: Option<PathBuf>) -> Result<()> {
    let path = config_path();
    let mut config = Config::load(&path)?;

    match default_path {
        Some(dir) => {
            config.set_default_path(dir)?;
            config.save(&path)?;
            if let Some(dir) = &config.default_path {
                println!("Default install path set to '{}'", dir.display());
            }
        }
        None => {
            let dir = config.install_dir(None);
            println!("default_path = {}", dir.display());
            println!("config file  = {}", path.display());
        }
    }

    Ok(())
}
