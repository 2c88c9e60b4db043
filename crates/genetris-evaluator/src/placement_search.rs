//! Placement search: turning placement scores into a move list.
//!
//! # How It Works
//!
//! 1. **Enumerate Candidates** - Every column `x ∈ [0, 10)` and rotation
//!    `r ∈ 0..4` whose piece does not collide at the spawn row
//! 2. **Score Each Candidate** - Hard-drop it on a board copy, extract
//!    [`PlacementFeatures`](crate::placement_analysis::PlacementFeatures), and
//!    ask the [`PlacementEvaluator`]
//! 3. **Select Best** - Highest score wins; among equal scores the shorter
//!    move list wins, and the first candidate wins among equal lengths
//! 4. **Plan Moves** - All rotations first, then the horizontal moves
//!
//! Rotating before translating keeps the piece away from the walls while it
//! turns, so a rotation never fails because the piece was already shifted
//! next to the edge.
//!
//! # Design: Greedy One-Step Lookahead
//!
//! Only the current piece is considered; the next pieces in the bag are not.
//!
//! # Usage
//!
//! ```
//! use genetris_engine::{Board, PieceKind};
//! use genetris_evaluator::{
//!     neural_network::{NetworkTopology, NeuralNetwork},
//!     placement_search::PlacementSearch,
//! };
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64Mcg;
//!
//! let network = NeuralNetwork::random(NetworkTopology::default(), &mut Pcg64Mcg::seed_from_u64(3))?;
//! let search = PlacementSearch::new(&network);
//!
//! let plan = search.select_best_placement(&Board::INITIAL, PieceKind::T).unwrap();
//! assert!(plan.moves().len() <= 8);
//! # Ok::<(), genetris_evaluator::neural_network::TopologyError>(())
//! ```

use std::cmp::Ordering;

use arrayvec::ArrayVec;
use genetris_engine::{Board, Piece, PieceKind, PiecePosition, PieceRotation};

use crate::{placement_analysis::PlacementAnalysis, placement_evaluator::PlacementEvaluator};

/// Upper bound on the length of a move list: three rotations and five
/// horizontal steps.
pub const MAX_MOVES: usize = 8;

/// A single command applied to the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Move {
    /// Rotate by one quarter turn clockwise.
    #[display("rotate")]
    Rotate,
    /// Shift one column to the left.
    #[display("left")]
    Left,
    /// Shift one column to the right.
    #[display("right")]
    Right,
}

/// The chosen placement and how to reach it from the spawn point.
#[derive(Debug, Clone)]
pub struct PlacementPlan {
    target: Piece,
    analysis: PlacementAnalysis,
    score: f32,
    moves: ArrayVec<Move, MAX_MOVES>,
}

impl PlacementPlan {
    fn new(target: Piece, analysis: PlacementAnalysis, score: f32) -> Self {
        let spawn_x = PiecePosition::SPAWN_POSITION.x();
        let target_x = target.position().x();
        let horizontal = if target_x < spawn_x {
            Move::Left
        } else {
            Move::Right
        };

        let mut moves = ArrayVec::new();
        for _ in 0..target.rotation().as_u8() {
            moves.push(Move::Rotate);
        }
        for _ in 0..target_x.abs_diff(spawn_x) {
            moves.push(horizontal);
        }

        Self {
            target,
            analysis,
            score,
            moves,
        }
    }

    /// Returns the candidate at the spawn row: target column and rotation.
    #[must_use]
    pub fn target(&self) -> Piece {
        self.target
    }

    /// Returns the analysis of the placement after the hard drop.
    #[must_use]
    pub fn analysis(&self) -> &PlacementAnalysis {
        &self.analysis
    }

    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the commands leading from the spawn point to the target,
    /// rotations first.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Consumes the plan, returning its move list.
    #[must_use]
    pub fn into_moves(self) -> ArrayVec<Move, MAX_MOVES> {
        self.moves
    }
}

/// Selects the best placement for the current piece.
#[derive(Debug, Clone, Copy)]
pub struct PlacementSearch<'a> {
    placement_evaluator: &'a dyn PlacementEvaluator,
}

impl<'a> PlacementSearch<'a> {
    #[must_use]
    pub fn new(placement_evaluator: &'a dyn PlacementEvaluator) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Evaluates every valid candidate and returns the best plan.
    ///
    /// Returns `None` when no candidate is valid; the piece then falls
    /// without any adjustment.
    #[must_use]
    pub fn select_best_placement(&self, board: &Board, kind: PieceKind) -> Option<PlacementPlan> {
        let mut best: Option<PlacementPlan> = None;

        for candidate in available_candidates(board, kind) {
            let analysis = PlacementAnalysis::from_board(board, candidate);
            let score = self.placement_evaluator.evaluate_placement(&analysis);
            let plan = PlacementPlan::new(candidate, analysis, score);
            let replace = match &best {
                None => true,
                Some(current) => match score.total_cmp(&current.score) {
                    Ordering::Greater => true,
                    Ordering::Equal => plan.moves.len() < current.moves.len(),
                    Ordering::Less => false,
                },
            };
            if replace {
                best = Some(plan);
            }
        }

        if let Some(plan) = &best {
            log::trace!(
                "best placement for {}: x={} rotation={} score={} moves={:?}",
                kind.as_char(),
                plan.target.position().x(),
                plan.target.rotation().as_u8(),
                plan.score,
                plan.moves,
            );
        }
        best
    }
}

/// Enumerates candidates at the spawn row, column-major then by rotation.
fn available_candidates(board: &Board, kind: PieceKind) -> impl Iterator<Item = Piece> + '_ {
    let spawn_y = PiecePosition::SPAWN_POSITION.y();
    (0..Board::WIDTH)
        .filter_map(|x| i32::try_from(x).ok())
        .flat_map(move |x| {
            PieceRotation::all()
                .map(move |rotation| Piece::at(kind, PiecePosition::new(x, spawn_y), rotation))
        })
        .filter(|piece| !board.is_colliding(*piece))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scores placements with a fixed closure.
    struct FnEvaluator<F>(F);

    impl<F> std::fmt::Debug for FnEvaluator<F> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("FnEvaluator")
        }
    }

    impl<F> PlacementEvaluator for FnEvaluator<F>
    where
        F: Fn(&PlacementAnalysis) -> f32 + Send + Sync,
    {
        fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
            (self.0)(analysis)
        }
    }

    #[test]
    fn test_prefers_highest_score() {
        // Reward the column of the landing position
        #[expect(clippy::cast_precision_loss)]
        let evaluator = FnEvaluator(|a: &PlacementAnalysis| a.placement().position().x() as f32);
        let search = PlacementSearch::new(&evaluator);
        let plan = search
            .select_best_placement(&Board::INITIAL, PieceKind::O)
            .unwrap();
        // O spans columns x..x+2, so x = 8 is the rightmost candidate
        assert_eq!(plan.target().position().x(), 8);
        assert_eq!(plan.target().rotation(), PieceRotation::SPAWN);
        assert_eq!(plan.moves(), &[Move::Right; 4]);
    }

    #[test]
    fn test_ties_prefer_shorter_move_list() {
        let evaluator = FnEvaluator(|_: &PlacementAnalysis| 1.0_f32);
        let search = PlacementSearch::new(&evaluator);
        let plan = search
            .select_best_placement(&Board::INITIAL, PieceKind::T)
            .unwrap();
        assert_eq!(plan.target().position(), PiecePosition::SPAWN_POSITION);
        assert_eq!(plan.target().rotation(), PieceRotation::SPAWN);
        assert!(plan.moves().is_empty());
    }

    #[test]
    fn test_equal_length_ties_keep_first_candidate() {
        // Only x = 3 (one left) and x = 5 (one right) score; both need one move
        let evaluator = FnEvaluator(|a: &PlacementAnalysis| {
            let x = a.placement().position().x();
            let r = a.placement().rotation();
            if (x == 3 || x == 5) && r == PieceRotation::SPAWN {
                1.0_f32
            } else {
                0.0
            }
        });
        let search = PlacementSearch::new(&evaluator);
        let plan = search
            .select_best_placement(&Board::INITIAL, PieceKind::S)
            .unwrap();
        assert_eq!(plan.target().position().x(), 3);
        assert_eq!(plan.moves(), &[Move::Left]);
    }

    #[test]
    fn test_rotations_precede_translations() {
        let evaluator = FnEvaluator(|a: &PlacementAnalysis| {
            let p = a.placement();
            if p.position().x() == 0 && p.rotation() == PieceRotation::new(3) {
                1.0_f32
            } else {
                0.0
            }
        });
        let search = PlacementSearch::new(&evaluator);
        let plan = search
            .select_best_placement(&Board::INITIAL, PieceKind::L)
            .unwrap();
        assert_eq!(
            plan.moves(),
            &[
                Move::Rotate,
                Move::Rotate,
                Move::Rotate,
                Move::Left,
                Move::Left,
                Move::Left,
                Move::Left,
            ]
        );
    }

    #[test]
    fn test_single_legal_column() {
        // Only column 0 is open at the spawn rows; a vertical I would need
        // origin x = -1, which is never a candidate
        let mut board = Board::INITIAL;
        for x in 1..10 {
            for y in 0..8 {
                board.fill_block_at(x, y, genetris_engine::Block::Piece(PieceKind::Z));
            }
        }
        let evaluator = FnEvaluator(|_: &PlacementAnalysis| 0.0_f32);
        let search = PlacementSearch::new(&evaluator);
        assert!(search.select_best_placement(&board, PieceKind::I).is_none());

        let mut board = Board::INITIAL;
        for x in 0..10 {
            if x == 6 {
                continue;
            }
            for y in 0..8 {
                board.fill_block_at(x, y, genetris_engine::Block::Piece(PieceKind::Z));
            }
        }
        let plan = search.select_best_placement(&board, PieceKind::I).unwrap();
        // Vertical I at origin x = 5 occupies column 6
        assert_eq!(plan.target().position().x(), 5);
        assert_eq!(plan.target().rotation(), PieceRotation::new(1));
        assert_eq!(plan.moves(), &[Move::Rotate, Move::Right]);
    }

    #[test]
    fn test_search_does_not_modify_board() {
        let board = Board::from_ascii(
            "
            ####.#####
            ",
        );
        let before = board.clone();
        let evaluator =
            FnEvaluator(|a: &PlacementAnalysis| f32::from(u8::try_from(a.cleared_lines()).unwrap()));
        let search = PlacementSearch::new(&evaluator);
        let plan = search.select_best_placement(&board, PieceKind::I).unwrap();
        assert_eq!(plan.analysis().cleared_lines(), 1);
        assert_eq!(board, before);
    }
}
