use std::{fs::File, path::Path, sync::Mutex};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use self::play::PlayArg;

mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    play: PlayArg,
    /// Write log events to this file (the terminal is owned by the game)
    #[clap(long)]
    log_file: Option<std::path::PathBuf>,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    play::run(&args.play)
}

/// Sends `tracing` events to `path`, filtered by `RUST_LOG` (default `info`).
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file: {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
