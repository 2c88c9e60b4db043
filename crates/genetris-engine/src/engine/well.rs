use crate::core::{
    board::Board,
    piece::{Piece, PieceKind, PiecePosition, PieceRotation},
};

use super::{game_stats::GameStats, piece_buffer::PieceBuffer, snapshot::WellSnapshot};

/// Lifecycle of a [`Well`].
///
/// Spawning and locking happen inside a single [`Well::step_down`] call, so
/// between calls a well is either falling or over. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum WellState {
    Falling,
    GameOver,
}

/// Result of advancing the falling piece by one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The piece moved down one row.
    Fell,
    /// The piece could not move, was locked, and the next piece spawned
    /// (or the game ended).
    Locked { cleared_lines: usize },
    /// The game is already over; nothing happened.
    Halted,
}

/// A single game: the board, the falling piece, its bag, and statistics.
///
/// `Well` implements the board engine state machine. Every movement is
/// checked with [`Well::collides`]; illegal moves and rotations are silently
/// ignored.
///
/// # Example
///
/// ```
/// use genetris_engine::Well;
///
/// let mut well = Well::from_seed(42);
/// assert!(well.take_spawned_piece());
///
/// well.try_rotate(1);
/// well.try_move(-1);
/// while !well.is_game_over() && well.stats().lifetime() < 100 {
///     well.tick();
/// }
/// assert!(well.stats().completed_pieces() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Well {
    board: Board,
    falling_piece: Piece,
    piece_buffer: PieceBuffer,
    stats: GameStats,
    state: WellState,
    piece_spawned: bool,
}

impl Well {
    /// Creates an empty well and spawns its first piece.
    #[must_use]
    pub fn new(piece_buffer: PieceBuffer) -> Self {
        Self::with_board(Board::INITIAL, piece_buffer)
    }

    /// Creates an empty well whose bag is seeded with `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(PieceBuffer::from_seed(seed))
    }

    /// Creates a well starting from an arbitrary board and spawns the first
    /// piece.
    #[must_use]
    pub fn with_board(board: Board, piece_buffer: PieceBuffer) -> Self {
        let mut this = Self {
            board,
            falling_piece: Piece::new(PieceKind::I),
            piece_buffer,
            stats: GameStats::new(),
            state: WellState::Falling,
            piece_spawned: false,
        };
        this.spawn_piece();
        this
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> WellState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.next_pieces()
    }

    /// Fitness of this game: `score + 0.1 * lifetime`.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.stats.fitness()
    }

    /// Returns whether the falling piece would collide at the given origin and
    /// rotation.
    #[must_use]
    pub fn collides(&self, x: i32, y: i32, rotation: PieceRotation) -> bool {
        let piece = Piece::at(
            self.falling_piece.kind(),
            PiecePosition::new(x, y),
            rotation,
        );
        self.board.is_colliding(piece)
    }

    /// Reports whether a new piece spawned since the last call, and clears
    /// the signal.
    pub fn take_spawned_piece(&mut self) -> bool {
        std::mem::take(&mut self.piece_spawned)
    }

    /// Draws the next piece from the bag and places it at the spawn point.
    ///
    /// If the spawn position is already blocked the game is over.
    pub fn spawn_piece(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.falling_piece = Piece::new(self.piece_buffer.pop_next());
        if self.board.is_colliding(self.falling_piece) {
            self.state = WellState::GameOver;
            return;
        }
        self.piece_spawned = true;
    }

    /// Replaces the falling piece if it fits; returns whether it was replaced.
    pub fn set_falling_piece(&mut self, piece: Piece) -> bool {
        if self.is_game_over() || self.board.is_colliding(piece) {
            return false;
        }
        self.falling_piece = piece;
        true
    }

    /// Shifts the falling piece by `dx` columns if the target is free.
    pub fn try_move(&mut self, dx: i32) -> bool {
        self.set_falling_piece(self.falling_piece.shifted(dx))
    }

    /// Rotates the falling piece by `delta` quarter turns if the target is free.
    pub fn try_rotate(&mut self, delta: i32) -> bool {
        self.set_falling_piece(self.falling_piece.rotated(delta))
    }

    /// Moves the falling piece down one row, or locks it if it cannot move.
    pub fn step_down(&mut self) -> StepOutcome {
        if self.is_game_over() {
            return StepOutcome::Halted;
        }
        if self.set_falling_piece(self.falling_piece.down()) {
            return StepOutcome::Fell;
        }
        let cleared_lines = self.lock_piece();
        StepOutcome::Locked { cleared_lines }
    }

    /// Drops the falling piece as far as it goes and locks it.
    pub fn hard_drop(&mut self) -> StepOutcome {
        loop {
            let outcome = self.step_down();
            if !outcome.is_fell() {
                return outcome;
            }
        }
    }

    /// Advances gravity by one tick and counts it towards the lifetime.
    pub fn tick(&mut self) -> StepOutcome {
        let outcome = self.step_down();
        self.stats.tick();
        outcome
    }

    fn lock_piece(&mut self) -> usize {
        self.board.fill_piece(self.falling_piece);
        let cleared_lines = self.board.clear_rows();
        self.stats.complete_piece_drop(cleared_lines);
        self.spawn_piece();
        cleared_lines
    }

    /// Returns a read-only view of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> WellSnapshot<'_> {
        let (min_height, max_height) = self.board.heights();
        WellSnapshot {
            board: &self.board,
            falling_piece: self.falling_piece,
            score: self.stats.score(),
            cleared_lines: self.stats.total_cleared_lines(),
            lifetime: self.stats.lifetime(),
            holes: self.board.count_holes(),
            min_height,
            max_height,
            height_delta: self.board.total_height_delta(),
            game_over: self.is_game_over(),
        }
    }
}
