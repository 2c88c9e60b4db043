//! Game engine logic and state management.
//!
//! This module drives a single game of falling pieces on top of the core data
//! structures:
//!
//! - [`Well`] - The board, the falling piece, and its lifecycle
//! - [`GameStats`] - Score, cleared lines, and survival time
//! - [`PieceBuffer`] - 7-bag piece generation system
//! - [`WellSnapshot`] - Read-only view for rendering
//!
//! # Game Flow
//!
//! 1. Create a [`Well`]; the first piece spawns immediately
//! 2. A controller moves and rotates the falling piece
//! 3. Each [`Well::tick`] moves the piece down or locks it
//! 4. Locking clears filled rows, scores them, and spawns the next piece
//! 5. The game is over once a new piece collides at its spawn point
//!
//! # Example
//!
//! ```
//! use genetris_engine::{StepOutcome, Well};
//!
//! let mut well = Well::from_seed(7);
//! well.try_move(-2);
//! let outcome = well.hard_drop();
//!
//! assert_eq!(outcome, StepOutcome::Locked { cleared_lines: 0 });
//! assert_eq!(well.stats().completed_pieces(), 1);
//! ```

pub use self::{game_stats::*, piece_buffer::*, snapshot::*, well::*};

mod game_stats;
mod piece_buffer;
mod snapshot;
mod well;
