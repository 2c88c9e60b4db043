//! Analysis of board state after a hypothetical piece placement.
//!
//! [`PlacementAnalysis`] hard-drops a candidate piece on a disposable copy of
//! the board, locks it, clears rows, and records the resulting
//! [`PlacementFeatures`]. The input board is never touched.
//!
//! ```rust,ignore
//! let analysis = PlacementAnalysis::from_board(&board, candidate);
//! let inputs = analysis.features().to_inputs();
//! ```

use genetris_engine::{Board, Piece};

/// Unscaled board metrics fed to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementFeatures {
    /// Empty cells with an occupied cell above them.
    pub holes: usize,
    /// Height of the lowest column.
    pub min_height: usize,
    /// Height of the highest column.
    pub max_height: usize,
    /// Sum of absolute height differences between adjacent columns.
    pub height_delta: usize,
    /// Rows cleared by this placement.
    pub cleared_lines: usize,
}

impl PlacementFeatures {
    /// Number of values produced by [`PlacementFeatures::to_inputs`].
    pub const COUNT: usize = 5;

    #[must_use]
    pub fn from_board(board: &Board, cleared_lines: usize) -> Self {
        let (min_height, max_height) = board.heights();
        Self {
            holes: board.count_holes(),
            min_height,
            max_height,
            height_delta: board.total_height_delta(),
            cleared_lines,
        }
    }

    /// Returns the network inputs in the order
    /// `[holes, min_height, max_height, height_delta, cleared_lines]`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_inputs(&self) -> [f32; Self::COUNT] {
        [
            self.holes as f32,
            self.min_height as f32,
            self.max_height as f32,
            self.height_delta as f32,
            self.cleared_lines as f32,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct PlacementAnalysis {
    placement: Piece,
    cleared_lines: usize,
    features: PlacementFeatures,
}

impl PlacementAnalysis {
    /// Drops `candidate` straight down on a copy of `board` and analyzes the
    /// result.
    #[must_use]
    pub fn from_board(board: &Board, candidate: Piece) -> Self {
        let mut board = board.clone();
        let mut placement = candidate;
        while !board.is_colliding(placement.down()) {
            placement = placement.down();
        }
        board.fill_piece(placement);
        let cleared_lines = board.clear_rows();

        Self {
            placement,
            cleared_lines,
            features: PlacementFeatures::from_board(&board, cleared_lines),
        }
    }

    /// Returns the piece at its landing position.
    #[must_use]
    pub fn placement(&self) -> &Piece {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn features(&self) -> &PlacementFeatures {
        &self.features
    }
}

#[cfg(test)]
mod tests {
    use genetris_engine::{PieceKind, PiecePosition, PieceRotation};

    use super::*;

    #[test]
    fn test_analysis_drops_to_the_floor() {
        let board = Board::INITIAL;
        let analysis = PlacementAnalysis::from_board(&board, Piece::new(PieceKind::O));
        assert_eq!(analysis.placement().position(), PiecePosition::new(4, 18));
        assert_eq!(analysis.cleared_lines(), 0);
        assert_eq!(
            *analysis.features(),
            PlacementFeatures {
                holes: 0,
                min_height: 0,
                max_height: 2,
                height_delta: 4,
                cleared_lines: 0,
            }
        );
        assert_eq!(board, Board::INITIAL);
    }

    #[test]
    fn test_analysis_counts_cleared_lines() {
        let board = Board::from_ascii(
            "
            ######.###
            ######.###
            ",
        );
        let candidate = Piece::at(
            PieceKind::I,
            PiecePosition::new(5, 2),
            PieceRotation::new(1),
        );
        let analysis = PlacementAnalysis::from_board(&board, candidate);
        assert_eq!(analysis.cleared_lines(), 2);
        assert_eq!(analysis.features().cleared_lines, 2);
        // Two cells of the vertical I remain in column 6
        assert_eq!(analysis.features().max_height, 2);
        assert_eq!(analysis.features().min_height, 0);
        assert_eq!(analysis.features().holes, 0);
    }

    #[test]
    fn test_analysis_detects_new_holes() {
        let board = Board::from_ascii(
            "
            #.........
            ",
        );
        // Horizontal I resting on column 0 covers the empty cells of columns 1..4
        let candidate = Piece::at(PieceKind::I, PiecePosition::new(0, 2), PieceRotation::SPAWN);
        let analysis = PlacementAnalysis::from_board(&board, candidate);
        assert_eq!(analysis.features().holes, 3);
        assert_eq!(analysis.features().max_height, 2);
    }

    #[test]
    fn test_inputs_order() {
        let features = PlacementFeatures {
            holes: 1,
            min_height: 2,
            max_height: 3,
            height_delta: 4,
            cleared_lines: 5,
        };
        assert_eq!(features.to_inputs(), [1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
