//! Feed-forward neural network evolved by the genetic algorithm.
//!
//! The network has one or more hidden layers with ReLU activation and a
//! linear output layer. Every layer is a [`WeightMatrix`] whose last column
//! holds the bias weight, so a layer with `n` inputs has `n + 1` columns.
//!
//! ```text
//! inputs ─┬─ [1.0] ─▶ hidden₀ ─ ReLU ─┬─ [1.0] ─▶ … ─▶ output (linear)
//! ```
//!
//! Networks are never trained by gradient descent. They start from uniform
//! random weights in `[-1, 1]` and change only through
//! [`NeuralNetwork::crossover`] and [`NeuralNetwork::mutate`].
//!
//! # Weight Range
//!
//! Mutation clamps every touched weight into `[0, 1]` while initialization
//! draws from `[-1, 1]`. Over many generations the weights therefore drift
//! toward the non-negative range.

use std::iter;

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Standard deviation of the Gaussian noise added by mutation.
const MUTATION_SIGMA: f32 = 0.25;

/// Value appended to every layer input as the bias term.
const BIAS_INPUT: f32 = 1.0;

/// Shape of a [`NeuralNetwork`].
///
/// # Example
///
/// ```
/// use genetris_evaluator::neural_network::NetworkTopology;
///
/// let topology = NetworkTopology::default();
/// assert_eq!(topology.inputs, 5);
/// assert!(topology.validate().is_ok());
///
/// let broken = NetworkTopology { hidden_layers: 0, ..topology };
/// assert!(broken.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkTopology {
    /// Number of input values.
    pub inputs: usize,
    /// Number of neurons in every hidden layer.
    pub hidden: usize,
    /// Number of output values.
    pub outputs: usize,
    /// Number of hidden layers.
    pub hidden_layers: usize,
}

impl Default for NetworkTopology {
    fn default() -> Self {
        Self {
            inputs: 5,
            hidden: 4,
            outputs: 1,
            hidden_layers: 1,
        }
    }
}

impl NetworkTopology {
    /// Checks that every layer has at least one neuron.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.inputs == 0 {
            return Err(TopologyError::NoInputs);
        }
        if self.hidden == 0 {
            return Err(TopologyError::NoHiddenNeurons);
        }
        if self.outputs == 0 {
            return Err(TopologyError::NoOutputs);
        }
        if self.hidden_layers == 0 {
            return Err(TopologyError::NoHiddenLayers);
        }
        Ok(())
    }

    /// Returns the `(rows, cols)` shape of every layer, hidden layers first.
    fn layer_shapes(&self) -> impl Iterator<Item = (usize, usize)> {
        let first = (self.hidden, self.inputs + 1);
        let rest = (self.hidden, self.hidden + 1);
        let output = (self.outputs, self.hidden + 1);
        iter::once(first)
            .chain(iter::repeat_n(rest, self.hidden_layers - 1))
            .chain(iter::once(output))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TopologyError {
    #[display("network topology must have at least one input")]
    NoInputs,
    #[display("network topology must have at least one neuron per hidden layer")]
    NoHiddenNeurons,
    #[display("network topology must have at least one output")]
    NoOutputs,
    #[display("network topology must have at least one hidden layer")]
    NoHiddenLayers,
    #[display("layer shapes do not form a valid network")]
    LayerShapeMismatch,
}

/// Row-major weight matrix of a single layer.
///
/// Rows correspond to the layer's neurons, columns to its inputs plus the
/// trailing bias column. The shape never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl WeightMatrix {
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Creates a matrix from row-major values.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != rows * cols`.
    #[must_use]
    pub fn from_values(rows: usize, cols: usize, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), rows * cols, "matrix shape mismatch");
        Self { rows, cols, values }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the weights in row-major order.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.cols + col]
    }

    /// Overwrites every weight with a uniform draw from `[-1, 1]`.
    pub fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for w in &mut self.values {
            *w = rng.random_range(-1.0..=1.0);
        }
    }

    /// Computes the matrix-vector product `self · input`.
    ///
    /// # Panics
    ///
    /// Panics if `input.len() != self.cols()`.
    #[must_use]
    pub fn dot(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.cols, "input length mismatch");
        self.values
            .chunks_exact(self.cols)
            .map(|row| iter::zip(row, input).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// Combines two matrices at an explicit cut point.
    ///
    /// Cell `(i, j)` of the result comes from `self` when
    /// `i < cut_row || (i == cut_row && j <= cut_col)`, and from `other`
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if the matrices have different shapes.
    #[must_use]
    pub fn crossover_at(&self, other: &Self, cut_row: usize, cut_col: usize) -> Self {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "crossover between differently shaped matrices"
        );
        let values = iter::zip(&self.values, &other.values)
            .enumerate()
            .map(|(index, (&mine, &theirs))| {
                let (i, j) = (index / self.cols, index % self.cols);
                if i < cut_row || (i == cut_row && j <= cut_col) {
                    mine
                } else {
                    theirs
                }
            })
            .collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            values,
        }
    }

    /// One-point crossover at a uniformly drawn cut row and cut column.
    ///
    /// # Panics
    ///
    /// Panics if the matrices have different shapes.
    #[must_use]
    pub fn one_point_crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let cut_row = rng.random_range(0..self.rows);
        let cut_col = rng.random_range(0..self.cols);
        self.crossover_at(other, cut_row, cut_col)
    }

    /// With probability `rate` per weight, adds `N(0, 0.25)` noise and clamps
    /// the result into `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not in `[0, 1]`.
    pub fn mutate<R>(&mut self, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let normal = Normal::new(0.0, MUTATION_SIGMA).expect("mutation sigma is a valid deviation");
        for w in &mut self.values {
            if rng.random_bool(rate) {
                *w = (*w + rng.sample(normal)).clamp(0.0, 1.0);
            }
        }
    }
}

/// A feed-forward network: ReLU hidden layers and a linear output layer.
///
/// # Example
///
/// ```
/// use genetris_evaluator::neural_network::{NetworkTopology, NeuralNetwork};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg64Mcg;
///
/// let mut rng = Pcg64Mcg::seed_from_u64(1);
/// let topology = NetworkTopology::default();
/// let a = NeuralNetwork::random(topology, &mut rng)?;
/// let b = NeuralNetwork::random(topology, &mut rng)?;
///
/// let mut child = a.crossover(&b, &mut rng);
/// child.mutate(0.05, &mut rng);
/// assert_eq!(child.forward(&[0.0, 0.0, 3.0, 2.0, 0.0]).len(), 1);
/// # Ok::<(), genetris_evaluator::neural_network::TopologyError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    topology: NetworkTopology,
    hidden_layers: Vec<WeightMatrix>,
    output_layer: WeightMatrix,
}

impl NeuralNetwork {
    /// Allocates a network with every weight set to zero.
    pub fn new(topology: NetworkTopology) -> Result<Self, TopologyError> {
        topology.validate()?;
        let mut layers: Vec<_> = topology
            .layer_shapes()
            .map(|(rows, cols)| WeightMatrix::zeros(rows, cols))
            .collect();
        let output_layer = layers.pop().ok_or(TopologyError::NoOutputs)?;
        Ok(Self {
            topology,
            hidden_layers: layers,
            output_layer,
        })
    }

    /// Assembles a network from explicit layers, inferring its topology.
    pub fn from_layers(
        hidden_layers: Vec<WeightMatrix>,
        output_layer: WeightMatrix,
    ) -> Result<Self, TopologyError> {
        let first = hidden_layers.first().ok_or(TopologyError::NoHiddenLayers)?;
        let topology = NetworkTopology {
            inputs: first.cols().saturating_sub(1),
            hidden: first.rows(),
            outputs: output_layer.rows(),
            hidden_layers: hidden_layers.len(),
        };
        topology.validate()?;
        let shapes = hidden_layers
            .iter()
            .chain(iter::once(&output_layer))
            .map(|m| (m.rows(), m.cols()));
        if !topology.layer_shapes().eq(shapes) {
            return Err(TopologyError::LayerShapeMismatch);
        }
        Ok(Self {
            topology,
            hidden_layers,
            output_layer,
        })
    }

    /// Allocates a network with uniformly random weights in `[-1, 1]`.
    pub fn random<R>(topology: NetworkTopology, rng: &mut R) -> Result<Self, TopologyError>
    where
        R: Rng + ?Sized,
    {
        let mut network = Self::new(topology)?;
        network.randomize_all(rng);
        Ok(network)
    }

    #[must_use]
    pub fn topology(&self) -> &NetworkTopology {
        &self.topology
    }

    /// Iterates over all layers, hidden layers first and the output layer last.
    pub fn layers(&self) -> impl Iterator<Item = &WeightMatrix> {
        self.hidden_layers.iter().chain(iter::once(&self.output_layer))
    }

    fn layers_mut(&mut self) -> impl Iterator<Item = &mut WeightMatrix> {
        self.hidden_layers
            .iter_mut()
            .chain(iter::once(&mut self.output_layer))
    }

    pub fn randomize_all<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for layer in self.layers_mut() {
            layer.randomize(rng);
        }
    }

    /// Runs the network on `inputs`.
    ///
    /// # Panics
    ///
    /// Panics if `inputs.len()` differs from the topology's input count.
    #[must_use]
    pub fn forward(&self, inputs: &[f32]) -> Vec<f32> {
        let mut activations = with_bias(inputs.iter().copied());
        for layer in &self.hidden_layers {
            let next = layer.dot(&activations);
            activations = with_bias(next.into_iter().map(|v| v.max(0.0)));
        }
        self.output_layer.dot(&activations)
    }

    /// Mutates every layer; see [`WeightMatrix::mutate`].
    pub fn mutate<R>(&mut self, rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for layer in self.layers_mut() {
            layer.mutate(rate, rng);
        }
    }

    /// Builds a child by one-point crossover of every layer, each with its
    /// own cut point.
    ///
    /// # Panics
    ///
    /// Panics if the networks have different topologies.
    #[must_use]
    pub fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert_eq!(
            self.topology, other.topology,
            "crossover between different topologies"
        );
        let mut layers: Vec<_> = iter::zip(self.layers(), other.layers())
            .map(|(mine, theirs)| mine.one_point_crossover(theirs, rng))
            .collect();
        let output_layer = layers.pop().unwrap_or_else(|| self.output_layer.clone());
        Self {
            topology: self.topology,
            hidden_layers: layers,
            output_layer,
        }
    }
}

fn with_bias<I>(values: I) -> Vec<f32>
where
    I: IntoIterator<Item = f32>,
{
    values.into_iter().chain(iter::once(BIAS_INPUT)).collect()
}
