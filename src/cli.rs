//! Command-line argument parsing for the replay tool
//!
//! Supports:
//! - Replaying a gesture script over a plain-text document
//! - Overriding the gesture config file
//! - Printing the effective config

use clap::Parser;
use std::path::PathBuf;

/// Replay touch gestures over a document and print what they select
#[derive(Parser, Debug)]
#[command(name = "doc-touch", version, about = "Replay touch gestures over a document")]
pub struct CliArgs {
    /// Plain-text document, one node per line
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,

    /// YAML gesture script
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Gesture config file (defaults to the user config)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective gesture config as YAML and exit
    #[arg(long)]
    pub print_config: bool,
}

/// What the tool was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    PrintConfig,
    Replay { document: PathBuf, script: PathBuf },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: RunMode,
    pub config_path: Option<PathBuf>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        let mode = if self.print_config {
            RunMode::PrintConfig
        } else {
            match (self.document, self.script) {
                (Some(document), Some(script)) => RunMode::Replay { document, script },
                (Some(_), None) => return Err("missing SCRIPT argument".to_string()),
                _ => return Err("missing DOCUMENT and SCRIPT arguments".to_string()),
            }
        };

        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(format!("config file not found: {}", path.display()));
            }
        }

        Ok(RunConfig {
            mode,
            config_path: self.config,
        })
    }
}
