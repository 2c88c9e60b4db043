//! Evaluator system for choosing piece placements.
//!
//! This crate implements a two-level evaluation architecture:
//!
//! 1. **Placement Evaluation** ([`placement_evaluator`]) - Scores a single hypothetical
//!    placement from its board features. The production evaluator is a
//!    [`NeuralNetwork`](neural_network::NeuralNetwork).
//!
//! 2. **Placement Search** ([`placement_search`]) - Enumerates every valid placement for the
//!    current piece, scores each one, and turns the best into a move list.
//!
//! # Architecture
//!
//! ```text
//! Placement Search (select best placement, plan moves)
//!     ↓ uses
//! Placement Evaluation (score single placement)
//!     ↓ reads
//! Placement Analysis (hard drop on a board copy, extract features)
//! ```
//!
//! # Supporting Modules
//!
//! - [`neural_network`] - Feed-forward network with ReLU hidden layers and a linear output,
//!   plus the crossover and mutation operators used by training
//! - [`placement_analysis`] - Board state and [`PlacementFeatures`] after a hard drop
//!
//! # Features
//!
//! Five unscaled values describe a placement, in this order:
//!
//! | Input | Meaning |
//! |-------|---------|
//! | holes | empty cells covered by an occupied cell |
//! | min height | lowest column height |
//! | max height | highest column height |
//! | height delta | sum of adjacent column height differences |
//! | cleared lines | rows cleared by the placement |
//!
//! [`PlacementFeatures`]: placement_analysis::PlacementFeatures

pub mod neural_network;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod placement_search;
