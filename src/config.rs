//! Gesture timing and distance configuration
//!
//! Stored in `~/.config/doc-touch/gestures.yaml`. Every field has a default,
//! so a partial file only overrides what it names.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Thresholds used to classify pointer input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How long a pointer must stay down without moving to become a long-press
    pub long_press_timeout_ms: u64,
    /// Maximum gap between taps for them to count as one multi-tap
    pub double_tap_timeout_ms: u64,
    /// Distance a pointer may travel before a press becomes a drag
    pub touch_slop: f64,
    /// Maximum distance between taps for them to count as one multi-tap
    pub double_tap_slop: f64,
    /// Delay before a collapsed handle hides itself
    pub collapsed_handle_auto_hide_ms: u64,
    /// When false, every tap is a single tap and long-press is never recognized
    pub multi_tap_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_timeout_ms: 500,
            double_tap_timeout_ms: 300,
            touch_slop: 18.0,
            double_tap_slop: 100.0,
            collapsed_handle_auto_hide_ms: 5000,
            multi_tap_enabled: true,
        }
    }
}

impl GestureConfig {
    pub fn long_press_timeout(&self) -> Duration {
        Duration::from_millis(self.long_press_timeout_ms)
    }

    pub fn double_tap_timeout(&self) -> Duration {
        Duration::from_millis(self.double_tap_timeout_ms)
    }

    pub fn collapsed_handle_auto_hide(&self) -> Duration {
        Duration::from_millis(self.collapsed_handle_auto_hide_ms)
    }

    /// Load config from the default location, or return defaults if missing
    /// or unreadable
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded gesture config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved gesture config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: GestureConfig = serde_yaml::from_str("long_press_timeout_ms: 650\n").unwrap();
        assert_eq!(config.long_press_timeout(), Duration::from_millis(650));
        assert_eq!(config.touch_slop, 18.0);
        assert!(config.multi_tap_enabled);
    }

    #[test]
    fn test_default_auto_hide_is_five_seconds() {
        assert_eq!(
            GestureConfig::default().collapsed_handle_auto_hide(),
            Duration::from_secs(5)
        );
    }
}
