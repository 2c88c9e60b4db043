use crate::core::{board::Board, piece::Piece};

/// Read-only view of a [`Well`](super::Well) for rendering and observers.
///
/// Borrowing the board keeps a snapshot cheap; callers that need to keep it
/// past the next tick clone the board themselves.
#[derive(Debug, Clone, Copy)]
pub struct WellSnapshot<'a> {
    pub board: &'a Board,
    pub falling_piece: Piece,
    pub score: u64,
    pub cleared_lines: u64,
    pub lifetime: u64,
    pub holes: usize,
    pub min_height: usize,
    pub max_height: usize,
    pub height_delta: usize,
    pub game_over: bool,
}

impl WellSnapshot<'_> {
    /// Returns whether the falling piece covers the given cell.
    #[must_use]
    pub fn is_falling_piece_at(&self, x: i32, y: i32) -> bool {
        !self.game_over && self.falling_piece.occupied_positions().any(|pos| pos == (x, y))
    }
}
