//! doc-touch: replay touch gestures over a document from the command line

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use doc_touch::cli::{CliArgs, RunMode};
use doc_touch::config::GestureConfig;
use doc_touch::headless::MonospaceDocument;
use doc_touch::replay::{Replay, Script};

fn main() -> Result<()> {
    doc_touch::tracing::init();

    let run = CliArgs::parse().into_config().map_err(|e| anyhow!(e))?;

    let config = match &run.config_path {
        Some(path) => GestureConfig::load_from(path)?,
        None => GestureConfig::load(),
    };

    match run.mode {
        RunMode::PrintConfig => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        RunMode::Replay { document, script } => {
            let text = std::fs::read_to_string(&document)
                .with_context(|| format!("failed to read {}", document.display()))?;
            let script = Script::load(&script)?;

            let mut replay = Replay::for_script(MonospaceDocument::from_text(&text), config, &script);
            let reports = replay.run(&script);
            for report in &reports {
                println!("{}", report);
            }

            let rejected = reports.iter().filter(|r| r.error.is_some()).count();
            if rejected > 0 {
                tracing::warn!("{} of {} steps rejected", rejected, reports.len());
            }
        }
    }

    Ok(())
}
