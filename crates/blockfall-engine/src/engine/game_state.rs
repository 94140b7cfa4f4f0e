use serde::{Deserialize, Serialize};

use crate::{
    GameConfig,
    core::{
        block_board::{Block, BlockBoard},
        piece::{Piece, PieceKind},
    },
};

/// One immutable snapshot of a game.
///
/// Snapshots are produced by [`Engine`](crate::Engine); nothing mutates a
/// snapshot in place. The current piece is overlaid on the board only for
/// rendering and collision; it is written into the board when it locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: BlockBoard,
    current_piece: Option<Piece>,
    next_piece: Option<PieceKind>,
    score: u64,
    is_game_over: bool,
    is_paused: bool,
}

impl GameState {
    /// Snapshot before the first reset: empty board, no pieces.
    ///
    /// Player and timer commands are no-ops until the engine resets.
    #[must_use]
    pub fn idle(config: &GameConfig) -> Self {
        Self::from_parts(BlockBoard::empty(config.width, config.height), None, None, 0)
    }

    /// Assembles an unpaused, running snapshot from its parts.
    ///
    /// Useful for starting from a prepared board (puzzles, tests). The
    /// current piece is taken as given, including its position.
    #[must_use]
    pub fn from_parts(
        board: BlockBoard,
        current_piece: Option<Piece>,
        next_piece: Option<PieceKind>,
        score: u64,
    ) -> Self {
        Self {
            board,
            current_piece,
            next_piece,
            score,
            is_game_over: false,
            is_paused: false,
        }
    }

    pub(crate) fn started(board: BlockBoard, current: PieceKind, next: PieceKind) -> Self {
        let current = Piece::new(current, board.spawn_position());
        Self::from_parts(board, Some(current), Some(next), 0)
    }

    /// Locked cells, without the current piece.
    #[must_use]
    pub fn board(&self) -> &BlockBoard {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    /// The piece that will spawn after the current one locks.
    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next_piece
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Whether a drop timer should be running for this snapshot.
    #[must_use]
    pub fn accepts_ticks(&self) -> bool {
        !self.is_paused && !self.is_game_over
    }

    /// The board with the current piece composited on top.
    ///
    /// Sub-cells of the piece that fall outside the visible grid are left out.
    #[must_use]
    pub fn render_board(&self) -> BlockBoard {
        match &self.current_piece {
            Some(piece) => self.board.merged(piece),
            None => self.board.clone(),
        }
    }

    /// The current piece, if player and timer commands may move it.
    pub(crate) fn controllable_piece(&self) -> Option<&Piece> {
        if self.is_game_over || self.is_paused {
            return None;
        }
        self.current_piece.as_ref()
    }

    /// Returns a snapshot with the current piece replaced, if it fits.
    pub(crate) fn with_piece(&self, piece: Piece) -> Option<Self> {
        if self.board.collides(&piece, (0, 0)) {
            return None;
        }
        Some(Self {
            current_piece: Some(piece),
            ..self.clone()
        })
    }

    #[must_use]
    pub(crate) fn with_pause_toggled(&self) -> Self {
        Self {
            is_paused: !self.is_paused,
            ..self.clone()
        }
    }

    /// Lowest position `piece` can reach by falling straight down.
    pub(crate) fn drop_position(&self, piece: &Piece) -> Piece {
        let mut dropped = *piece;
        while !self.board.collides(&dropped, (0, 1)) {
            dropped = dropped.moved(0, 1);
        }
        dropped
    }

    /// Fuses `resting` into the board, clears lines, scores them and spawns
    /// `promoted`, with `next` as the new preview.
    ///
    /// The spawned piece is kept even when it collides, so the final board
    /// stays visible; the snapshot is then game over.
    pub(crate) fn locked(
        &self,
        resting: &Piece,
        promoted: PieceKind,
        next: PieceKind,
        line_clear_score: u64,
    ) -> (Self, usize) {
        let mut board = self.board.merged(resting);
        let cleared_lines = board.clear_lines();
        let gained = line_clear_score.saturating_mul(cleared_lines as u64);
        let score = self.score.saturating_add(gained);

        let current = Piece::new(promoted, board.spawn_position());
        let is_game_over = board.collides(&current, (0, 0));

        let state = Self {
            board,
            current_piece: Some(current),
            next_piece: Some(next),
            score,
            is_game_over,
            is_paused: self.is_paused,
        };
        (state, cleared_lines)
    }

    /// Cells of the composited board that hold a piece, as `(x, y, kind)`.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, PieceKind)> {
        self.render_board()
            .rows()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(x, block)| match block {
                        Block::Empty => None,
                        Block::Piece(kind) => Some((x, y, *kind)),
                    })
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::PiecePosition;

    use super::*;

    fn board(rows: &[&str]) -> BlockBoard {
        BlockBoard::parse(rows.iter().copied()).unwrap()
    }

    #[test]
    fn test_idle_has_no_pieces() {
        let state = GameState::idle(&GameConfig::default());
        assert!(state.current_piece().is_none());
        assert!(state.next_piece().is_none());
        assert_eq!(state.board(), &BlockBoard::empty(10, 20));
        assert_eq!(state.score(), 0);
        assert!(state.accepts_ticks());
        assert!(state.controllable_piece().is_none());
    }

    #[test]
    fn test_started_spawns_at_center() {
        let state = GameState::started(BlockBoard::empty(10, 20), PieceKind::T, PieceKind::I);
        let piece = state.current_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::T);
        assert_eq!(piece.position(), PiecePosition::new(4, 0));
        assert_eq!(state.next_piece(), Some(PieceKind::I));
    }

    #[test]
    fn test_render_board_overlays_current_piece() {
        let state = GameState::from_parts(
            board(&["....", "....", "Z..."]),
            Some(Piece::new(PieceKind::O, PiecePosition::new(2, -1))),
            None,
            0,
        );
        assert_eq!(state.render_board(), board(&["..OO", "....", "Z..."]));
        // the locked board is untouched
        assert_eq!(state.board(), &board(&["....", "....", "Z..."]));

        let cells: Vec<_> = state.occupied_cells().collect();
        assert_eq!(
            cells,
            [(2, 0, PieceKind::O), (3, 0, PieceKind::O), (0, 2, PieceKind::Z)]
        );
    }

    #[test]
    fn test_with_piece_rejects_collisions() {
        let state = GameState::from_parts(board(&["....", "...."]), None, None, 0);
        assert!(
            state
                .with_piece(Piece::new(PieceKind::O, PiecePosition::new(2, 0)))
                .is_some()
        );
        assert!(
            state
                .with_piece(Piece::new(PieceKind::O, PiecePosition::new(3, 0)))
                .is_none()
        );
    }

    #[test]
    fn test_drop_position() {
        let state = GameState::from_parts(board(&["....", "....", "....", "..S."]), None, None, 0);
        let piece = Piece::new(PieceKind::O, PiecePosition::new(1, -1));
        assert_eq!(
            state.drop_position(&piece).position(),
            PiecePosition::new(1, 1)
        );
        let piece = Piece::new(PieceKind::O, PiecePosition::new(0, 0));
        assert_eq!(
            state.drop_position(&piece).position(),
            PiecePosition::new(0, 2)
        );
    }

    #[test]
    fn test_locked_clears_and_scores() {
        let state = GameState::from_parts(
            board(&["....", "....", "....", "....", "II.."]),
            None,
            Some(PieceKind::T),
            300,
        );
        let resting = Piece::new(PieceKind::O, PiecePosition::new(2, 3));
        let (locked, cleared) = state.locked(&resting, PieceKind::T, PieceKind::S, 100);

        assert_eq!(cleared, 1);
        assert_eq!(locked.score(), 400);
        assert_eq!(
            locked.board(),
            &board(&["....", "....", "....", "....", "..OO"])
        );
        let current = locked.current_piece().unwrap();
        assert_eq!(current.kind(), PieceKind::T);
        assert_eq!(current.position(), PiecePosition::new(1, 0));
        assert_eq!(locked.next_piece(), Some(PieceKind::S));
        assert!(!locked.is_game_over());
    }

    #[test]
    fn test_locked_sets_game_over_on_blocked_spawn() {
        let state = GameState::from_parts(
            board(&["....", "J...", "...."]),
            None,
            Some(PieceKind::T),
            0,
        );
        let resting = Piece::new(PieceKind::O, PiecePosition::new(2, 1));
        let (locked, cleared) = state.locked(&resting, PieceKind::T, PieceKind::O, 100);

        assert_eq!(cleared, 0);
        assert!(locked.is_game_over());
        // the colliding piece is still there for the final render
        assert_eq!(locked.current_piece().unwrap().kind(), PieceKind::T);
        assert!(locked.controllable_piece().is_none());
        assert!(!locked.accepts_ticks());
    }
}
