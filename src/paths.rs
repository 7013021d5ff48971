use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable that relocates all lead desk state.
pub const HOME_ENV: &str = "LEADDESK_HOME";

/// Returns the lead desk configuration directory.
///
/// Resolution order:
/// 1. `LEADDESK_HOME` environment variable (if set and non-empty)
/// 2. The platform config directory (e.g. `~/.config/leaddesk`)
/// 3. `.leaddesk` in the current working directory
pub fn leaddesk_home() -> PathBuf {
    if let Ok(root) = std::env::var(HOME_ENV)
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }
    match ProjectDirs::from("", "", "leaddesk") {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => PathBuf::from(".leaddesk"),
    }
}

/// Returns the path to the config file.
pub fn config_file() -> PathBuf {
    leaddesk_home().join("config.yaml")
}
