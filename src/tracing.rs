//! Debug tracing for gesture diagnostics
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - phase changes, session start/end, control flips
//! - `RUST_LOG=doc_touch::interactor=trace` - every pointer move
//!
//! Logs are also written to `~/.config/doc-touch/logs/doc-touch.log` with
//! daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::controls::ControlsController;

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "doc-touch.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of control visibility for diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsSnapshot {
    pub caret_blink: bool,
    pub collapsed_handle: bool,
    pub expanded_handles: bool,
    pub magnifier: bool,
    pub toolbar: bool,
}

impl ControlsSnapshot {
    pub fn from_controls(controls: &ControlsController) -> Self {
        Self {
            caret_blink: controls.should_caret_blink(),
            collapsed_handle: controls.is_collapsed_handle_visible(),
            expanded_handles: controls.are_expanded_handles_visible(),
            magnifier: controls.is_magnifier_visible(),
            toolbar: controls.is_toolbar_visible(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &ControlsSnapshot) -> Option<String> {
        let fields = [
            ("blink", self.caret_blink, other.caret_blink),
            ("collapsed", self.collapsed_handle, other.collapsed_handle),
            ("expanded", self.expanded_handles, other.expanded_handles),
            ("magnifier", self.magnifier, other.magnifier),
            ("toolbar", self.toolbar, other.toolbar),
        ];

        let changes: Vec<String> = fields
            .iter()
            .filter(|(_, before, after)| before != after)
            .map(|(name, _, after)| format!("{} {}", name, if *after { "on" } else { "off" }))
            .collect();

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
