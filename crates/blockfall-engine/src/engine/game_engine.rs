use crate::{
    ConfigError, GameConfig,
    core::{block_board::BlockBoard, piece::Piece},
};

use super::{Command, GameState, PieceSource, RandomPieceSource};

/// Applies commands to game snapshots.
///
/// The engine holds no game state of its own; the host keeps the current
/// [`GameState`] and replaces it with whatever the engine returns. The only
/// thing the engine owns is the [`PieceSource`], because generating pieces is
/// the one transition input that does not come from the caller.
///
/// All transitions are total: an illegal move returns the input snapshot
/// unchanged.
#[derive(Debug, Clone)]
pub struct Engine<S> {
    config: GameConfig,
    source: S,
}

impl Engine<RandomPieceSource> {
    /// Creates an engine with the default configuration and random pieces.
    #[must_use]
    pub fn random() -> Self {
        Self {
            config: GameConfig::default(),
            source: RandomPieceSource::new(),
        }
    }
}

impl<S> Engine<S>
where
    S: PieceSource,
{
    pub fn new(config: GameConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, source })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Snapshot before the first reset.
    #[must_use]
    pub fn idle(&self) -> GameState {
        GameState::idle(&self.config)
    }

    /// Starts a new game: empty board, fresh current and next piece, score 0.
    pub fn reset(&mut self) -> GameState {
        let current = self.source.next_kind();
        let next = self.source.next_kind();
        tracing::debug!(?current, ?next, "new game");
        GameState::started(
            BlockBoard::empty(self.config.width, self.config.height),
            current,
            next,
        )
    }

    /// Timer-driven gravity step; same as [`Command::SoftDrop`].
    pub fn tick(&mut self, state: &GameState) -> GameState {
        self.apply_command(state, Command::SoftDrop)
    }

    pub fn apply_command(&mut self, state: &GameState, command: Command) -> GameState {
        if command == Command::TogglePause {
            return state.with_pause_toggled();
        }

        let Some(piece) = state.controllable_piece().copied() else {
            return state.clone();
        };

        let keep = || state.clone();
        match command {
            Command::MoveLeft => state.with_piece(piece.moved(-1, 0)).unwrap_or_else(keep),
            Command::MoveRight => state.with_piece(piece.moved(1, 0)).unwrap_or_else(keep),
            Command::Rotate => state.with_piece(piece.rotated()).unwrap_or_else(keep),
            Command::SoftDrop => state
                .with_piece(piece.moved(0, 1))
                .unwrap_or_else(|| self.lock(state, piece)),
            Command::HardDrop => self.lock(state, state.drop_position(&piece)),
            Command::TogglePause => state.with_pause_toggled(),
        }
    }

    fn lock(&mut self, state: &GameState, resting: Piece) -> GameState {
        let promoted = state
            .next_piece()
            .unwrap_or_else(|| self.source.next_kind());
        let next = self.source.next_kind();
        let (locked, cleared_lines) =
            state.locked(&resting, promoted, next, self.config.line_clear_score);

        tracing::debug!(
            kind = ?resting.kind(),
            cleared_lines,
            score = locked.score(),
            "piece locked"
        );
        if locked.is_game_over() {
            tracing::info!(score = locked.score(), "game over");
        }
        locked
    }
}
