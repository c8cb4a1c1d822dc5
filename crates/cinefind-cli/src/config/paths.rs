//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the XDG config home.
const APP_DIR: &str = "cinefind";

/// Resolves the config file path.
///
/// - `{dir}/config.toml` when `dir` is given.
/// - `$XDG_CONFIG_HOME/cinefind/config.toml` when that variable is set.
/// - `~/.config/cinefind/config.toml` otherwise.
///
/// # Errors
///
/// Returns an error if no directory is given and neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    config_path_from(dir.map(PathBuf::as_path), xdg.as_deref(), home.as_deref())
}

/// Picks the config path from explicit inputs.
fn config_path_from(dir: Option<&Path>, xdg: Option<&Path>, home: Option<&Path>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(x) = xdg.filter(|x| x.is_absolute()) {
        return Ok(x.join(APP_DIR).join(CONFIG_FILE));
    }
    match home {
        Some(h) => Ok(h.join(".config").join(APP_DIR).join(CONFIG_FILE)),
        None => bail!("HOME environment variable is not set; pass --dir"),
    }
}
