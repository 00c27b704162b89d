//! Where the editor keeps its settings file and session logs.
//!
//! Debug builds and `cargo run` use the working directory so a checkout
//! stays self-contained. Other builds use the per-user directories from
//! the `dirs` crate, under a `questforge` subdirectory.

use std::io;
use std::path::PathBuf;

const APP_DIR: &str = "questforge";
const CONFIG_FILE_NAME: &str = "config.json";
const LOGS_DIR_NAME: &str = "logs";

fn local_only() -> bool {
    cfg!(debug_assertions) || std::env::var_os("CARGO").is_some()
}

/// Settings root, or `None` when the platform reports no such directory
fn settings_root() -> Option<PathBuf> {
    if local_only() {
        Some(PathBuf::new())
    } else {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }
}

/// Root for logs and other generated files
fn state_root() -> Option<PathBuf> {
    if local_only() {
        Some(PathBuf::new())
    } else {
        dirs::data_local_dir().map(|dir| dir.join(APP_DIR))
    }
}

/// The JSON settings file read by the config plugin
pub fn config_file() -> PathBuf {
    settings_root().unwrap_or_default().join(CONFIG_FILE_NAME)
}

/// Directory receiving the session log file
pub fn logs_dir() -> PathBuf {
    state_root().unwrap_or_default().join(LOGS_DIR_NAME)
}

/// Creates the settings and log roots when installed
pub fn ensure_directories() -> io::Result<()> {
    if local_only() {
        return Ok(());
    }
    for root in [settings_root(), state_root()].into_iter().flatten() {
        std::fs::create_dir_all(root)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_builds_stay_in_working_directory() {
        assert!(local_only());
        assert_eq!(config_file(), PathBuf::from(CONFIG_FILE_NAME));
        assert_eq!(logs_dir(), PathBuf::from(LOGS_DIR_NAME));
        assert!(ensure_directories().is_ok());
    }
}
