//! Game state and the transitions that advance it.
//!
//! This module builds the playable game on top of the [core](crate::core)
//! primitives:
//!
//! - [`GameState`] - Immutable snapshot: board, current/next piece, score, flags
//! - [`Command`] - Discrete player or timer requests
//! - [`Engine`] - Applies commands to snapshots, owns the [`PieceSource`]
//! - [`GameConfig`] - Board dimensions and scoring
//!
//! # Game Flow
//!
//! 1. [`Engine::reset`] produces the starting snapshot with a current and a next piece
//! 2. The host feeds commands ([`Engine::apply_command`]) and timer ticks ([`Engine::tick`])
//! 3. A piece that can no longer descend locks, full rows clear, the next piece spawns
//! 4. When the spawned piece collides immediately, the game is over
//!
//! Every transition returns a new snapshot and leaves its input untouched.
//! Illegal moves are not errors; they return the input unchanged.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Command, Engine, GameConfig, SequencePieceSource};
//!
//! let source = "TO".parse::<SequencePieceSource>().unwrap();
//! let mut engine = Engine::new(GameConfig::default(), source).unwrap();
//!
//! let state = engine.reset();
//! let state = engine.apply_command(&state, Command::MoveLeft);
//! let state = engine.apply_command(&state, Command::HardDrop);
//!
//! assert_eq!(state.board().occupied_count(), 4);
//! assert!(!state.is_game_over());
//! ```

pub use self::{command::*, config::*, game_engine::*, game_state::*, piece_source::*};

mod command;
mod config;
mod game_engine;
mod game_state;
mod piece_source;
