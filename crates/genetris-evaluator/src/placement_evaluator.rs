//! Placement evaluation: scoring individual piece placements.
//!
//! A [`PlacementEvaluator`] turns the [`PlacementFeatures`] of a hypothetical
//! placement into a single score. Higher is better.
//!
//! The production evaluator is [`NeuralNetwork`]: the five unscaled features
//! are fed to the network as-is and the first output is the score.
//!
//! [`PlacementFeatures`]: crate::placement_analysis::PlacementFeatures

use std::fmt;

use crate::{neural_network::NeuralNetwork, placement_analysis::PlacementAnalysis};

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a placement and returns a score (higher is better).
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

impl PlacementEvaluator for NeuralNetwork {
    /// # Panics
    ///
    /// Panics if the network does not take exactly
    /// [`PlacementFeatures::COUNT`](crate::placement_analysis::PlacementFeatures::COUNT)
    /// inputs.
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        let outputs = self.forward(&analysis.features().to_inputs());
        outputs.first().copied().unwrap_or(f32::NEG_INFINITY)
    }
}
