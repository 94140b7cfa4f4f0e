use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use blockfall_engine::{
    Engine, GameConfig, PieceSeed, PieceSource, RandomPieceSource, SequencePieceSource,
};
use blockfall_runtime::Runtime;

use self::app::PlayApp;
use crate::util;

mod app;

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct PlayArg {
    /// Milliseconds between gravity steps
    #[clap(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub(super) drop_interval_ms: u64,
    /// Seed for the random piece generator (32 hex digits)
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Cycle through these pieces instead of drawing randomly (e.g. "IOTSZJL")
    #[clap(long, conflicts_with = "seed")]
    pub(super) sequence: Option<SequencePieceSource>,
    /// Game configuration file (JSON)
    #[clap(long)]
    pub(super) config: Option<PathBuf>,
    /// Board width, overriding the configuration file
    #[clap(long)]
    pub(super) width: Option<usize>,
    /// Board height, overriding the configuration file
    #[clap(long)]
    pub(super) height: Option<usize>,
    /// Write the final game state to this file on exit (JSON)
    #[clap(long)]
    pub(super) save_snapshot: Option<PathBuf>,
}

impl PlayArg {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("game config", path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        Ok(config)
    }

    fn piece_source(&self) -> Box<dyn PieceSource> {
        match (&self.sequence, self.seed) {
            (Some(sequence), _) => Box::new(sequence.clone()),
            (None, Some(seed)) => Box::new(RandomPieceSource::with_seed(seed)),
            (None, None) => Box::new(RandomPieceSource::new()),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.game_config()?;
    let engine = Engine::new(config, arg.piece_source()).context("Invalid game config")?;
    tracing::info!(?config, drop_interval_ms = arg.drop_interval_ms, "starting");

    let mut app = PlayApp::new(engine, Duration::from_millis(arg.drop_interval_ms));
    Runtime::new().run(&mut app)?;

    if let Some(path) = &arg.save_snapshot {
        util::write_json_file("snapshot", path, app.state())?;
        tracing::info!(path = %path.display(), "snapshot saved");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use blockfall_engine::PieceKind;
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Wrapper {
        #[clap(flatten)]
        play: PlayArg,
    }

    fn parse(args: &[&str]) -> Result<PlayArg, clap::Error> {
        Wrapper::try_parse_from(std::iter::once("blockfall").chain(args.iter().copied()))
            .map(|w| w.play)
    }

    #[test]
    fn test_parse_sources() {
        let arg = parse(&["--sequence", "iot"]).unwrap();
        let mut source = arg.piece_source();
        assert_eq!(source.next_kind(), PieceKind::I);
        assert_eq!(source.next_kind(), PieceKind::O);

        let arg = parse(&["--seed", "000102030405060708090a0b0c0d0e0f"]).unwrap();
        assert!(arg.seed.is_some());

        assert!(parse(&["--seed", "123"]).is_err());
        assert!(parse(&["--sequence", "IX"]).is_err());
        assert!(parse(&["--sequence", "I", "--seed", "000102030405060708090a0b0c0d0e0f"]).is_err());
        assert!(parse(&["--drop-interval-ms", "0"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("blockfall-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "width": 12, "height": 24 }"#).unwrap();

        let arg = parse(&["--config", path.to_str().unwrap(), "--height", "16"]).unwrap();
        let config = arg.game_config().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.width, 12);
        assert_eq!(config.height, 16);
        assert_eq!(config.line_clear_score, GameConfig::DEFAULT_LINE_CLEAR_SCORE);
    }

    #[test]
    fn test_missing_config_file() {
        let arg = parse(&["--config", "/nonexistent/blockfall.json"]).unwrap();
        let err = arg.game_config().unwrap_err();
        assert!(err.to_string().contains("game config"));
    }
}
