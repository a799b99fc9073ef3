//! Centralized configuration paths for doc-touch
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/doc-touch/`
//! - Windows: `%APPDATA%\doc-touch\`

use std::path::PathBuf;

const APP_DIR: &str = "doc-touch";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/doc-touch`
///   - Else: `~/.config/doc-touch`
///
/// Windows:
///   - `%APPDATA%\doc-touch`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/doc-touch/gestures.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("gestures.yaml"))
}

/// `~/.config/doc-touch/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory")
    })?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
