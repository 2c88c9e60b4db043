use std::iter;

use super::{
    PLAYABLE_HEIGHT, PLAYABLE_WIDTH,
    piece::{Piece, PieceKind},
};

/// A single cell of the well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Locked cell tagged with the kind of piece that filled it.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }
}

/// A single row of the well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRow {
    cells: [Block; PLAYABLE_WIDTH],
}

impl BlockRow {
    const EMPTY: Self = Self {
        cells: [Block::Empty; PLAYABLE_WIDTH],
    };

    fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }

    /// Returns the cells of this row from left to right.
    #[must_use]
    pub fn cells(&self) -> &[Block; PLAYABLE_WIDTH] {
        &self.cells
    }
}

/// Cell-by-cell representation of the well (10×20).
///
/// Row 0 is the top of the well; rows grow downward. The grid dimensions
/// never change; every cell is either empty or tagged with a piece kind.
///
/// `Board` is the single source of truth for movement legality through
/// [`Board::is_colliding`]. Cloning it yields an independent grid, which is
/// what the placement search uses to try out hypothetical drops.
///
/// # Example
///
/// ```
/// use genetris_engine::{Board, Piece, PieceKind};
///
/// let mut board = Board::INITIAL;
/// let mut piece = Piece::new(PieceKind::I);
/// while !board.is_colliding(piece.down()) {
///     piece = piece.down();
/// }
/// board.fill_piece(piece);
///
/// assert_eq!(board.heights(), (0, 1));
/// assert_eq!(board.count_holes(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BlockRow; PLAYABLE_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Board {
    pub const WIDTH: usize = PLAYABLE_WIDTH;
    pub const HEIGHT: usize = PLAYABLE_HEIGHT;

    pub const INITIAL: Self = Self {
        rows: [BlockRow::EMPTY; PLAYABLE_HEIGHT],
    };

    /// Returns an iterator over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BlockRow> {
        self.rows.iter()
    }

    /// Returns the cell at the given column and row.
    ///
    /// Coordinates outside the well yield `None`.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Block> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Checks whether the piece overlaps a wall, the floor, or a locked cell.
    ///
    /// Only the side walls and the floor bound the well; cells above row 0
    /// never collide.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        piece.occupied_positions().any(|(x, y)| {
            let Ok(col) = usize::try_from(x) else {
                return true;
            };
            if col >= Self::WIDTH {
                return true;
            }
            let Ok(row) = usize::try_from(y) else {
                return false;
            };
            row >= Self::HEIGHT || !self.rows[row].cells[col].is_empty()
        })
    }

    /// Locks the piece's cells into the grid, tagged with its kind.
    ///
    /// Cells outside the well are discarded.
    pub fn fill_piece(&mut self, piece: Piece) {
        for (x, y) in piece.occupied_positions() {
            self.fill_block_at(x, y, Block::Piece(piece.kind()));
        }
    }

    /// Sets a single cell; out-of-range coordinates are ignored.
    pub fn fill_block_at(&mut self, x: i32, y: i32, block: Block) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.cells.get_mut(x)) {
            *cell = block;
        }
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// Rows are scanned bottom-up. Every filled row is removed, the rows
    /// above it shift down by one, and an empty row enters at the top.
    pub fn clear_rows(&mut self) -> usize {
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(BlockRow::EMPTY);
        count
    }

    /// Returns the height of every column.
    ///
    /// A column's height is measured from the floor to its topmost occupied
    /// cell, so an empty column has height 0 and a hole does not lower it.
    #[must_use]
    pub fn column_heights(&self) -> [usize; PLAYABLE_WIDTH] {
        let mut heights = [0; PLAYABLE_WIDTH];
        for (x, h) in heights.iter_mut().enumerate() {
            *h = self
                .rows
                .iter()
                .position(|row| !row.cells[x].is_empty())
                .map_or(0, |top| Self::HEIGHT - top);
        }
        heights
    }

    /// Returns `(min, max)` over all column heights.
    #[must_use]
    pub fn heights(&self) -> (usize, usize) {
        let heights = self.column_heights();
        let min = heights.iter().copied().min().unwrap_or(0);
        let max = heights.iter().copied().max().unwrap_or(0);
        (min, max)
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn total_height_delta(&self) -> usize {
        let heights = self.column_heights();
        iter::zip(&heights, &heights[1..])
            .map(|(a, b)| a.abs_diff(*b))
            .sum()
    }

    /// Counts empty cells that have at least one occupied cell above them in
    /// the same column.
    #[must_use]
    pub fn count_holes(&self) -> usize {
        (0..Self::WIDTH)
            .map(|x| {
                self.rows
                    .iter()
                    .skip_while(|row| row.cells[x].is_empty())
                    .filter(|row| row.cells[x].is_empty())
                    .count()
            })
            .sum()
    }

    /// Creates a `Board` from ASCII art for testing.
    ///
    /// `#` is an occupied cell and `.` an empty one. Rows are listed top to
    /// bottom and aligned to the floor, so fewer than 20 rows describe the
    /// bottom of the well.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::INITIAL;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(lines.len() <= Self::HEIGHT, "too many rows: {}", lines.len());
        let top = Self::HEIGHT - lines.len();

        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                Self::WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                Self::WIDTH,
                chars.len(),
                i
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[top + i].cells[x] = Block::Piece(PieceKind::I);
                }
            }
        }
        board
    }
}
