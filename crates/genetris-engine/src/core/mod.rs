pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Number of columns in the well.
const PLAYABLE_WIDTH: usize = 10;
/// Number of rows in the well.
const PLAYABLE_HEIGHT: usize = 20;
