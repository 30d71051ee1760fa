//! Configuration file location.
//!
//! - **Working directory**: a `config.yaml` in the current directory wins,
//!   which keeps `cargo run` pointed at the project's own file.
//! - **User config dir** (default): `~/.config/Limit/config.yaml` or the
//!   platform equivalent from [`dirs::config_dir`].

use std::path::{Path, PathBuf};
use tracing::debug;

/// Application name used for the per-user config directory
const APP_NAME: &str = "Limit";

/// File name looked up in every candidate directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the configuration file path.
///
/// The file need not exist; callers fall back to defaults.
pub fn default_config_path() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_path(&cwd, dirs::config_dir().as_deref())
}

fn resolve_config_path(cwd: &Path, user_config_dir: Option<&Path>) -> PathBuf {
    let cwd_config = cwd.join(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        debug!("Using config from working directory: {}", cwd_config.display());
        return cwd_config;
    }

    match user_config_dir {
        Some(dir) => dir.join(APP_NAME).join(CONFIG_FILE_NAME),
        None => {
            debug!("No user config directory on this platform, using working directory");
            cwd_config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_directory_wins() {
        let cwd = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        std::fs::write(cwd.path().join(CONFIG_FILE_NAME), "").unwrap();

        let path = resolve_config_path(cwd.path(), Some(user.path()));
        assert_eq!(path, cwd.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_user_config_dir_fallback() {
        let cwd = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();

        let path = resolve_config_path(cwd.path(), Some(user.path()));
        assert_eq!(path, user.path().join("Limit").join(CONFIG_FILE_NAME));

        let path = resolve_config_path(cwd.path(), None);
        assert_eq!(path, cwd.path().join(CONFIG_FILE_NAME));
    }
}
