use serde::{Deserialize, Serialize};

/// A discrete request delivered to the engine.
///
/// The timer delivers [`Command::SoftDrop`]; everything else comes from the
/// player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
}

impl Command {
    pub const ALL: [Self; 6] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::Rotate,
        Command::HardDrop,
        Command::TogglePause,
    ];
}
