use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    ShapeMismatchError, TopologyError,
    activation::{Activation, LayerActivations},
    matrix::Matrix,
};

/// Layer widths and activations shared by every network of a run.
///
/// # Example
///
/// ```
/// use evoluvine_network::Topology;
///
/// let topology = Topology::new(vec![4, 6, 3]).unwrap();
/// assert_eq!(topology.input_len(), 4);
/// assert_eq!(topology.output_len(), 3);
/// assert_eq!(topology.parameter_count(), 4 * 6 + 6 + 6 * 3 + 3);
///
/// assert!(Topology::new(vec![4]).is_err());
/// assert!(Topology::new(vec![4, 0, 3]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topology {
    widths: Vec<usize>,
    activations: LayerActivations,
}

impl Topology {
    /// Creates a topology with sigmoid activations everywhere.
    pub fn new(widths: Vec<usize>) -> Result<Self, TopologyError> {
        if widths.len() < 2 {
            return Err(TopologyError::TooFewLayers {
                count: widths.len(),
            });
        }
        if let Some(index) = widths.iter().position(|w| *w == 0) {
            return Err(TopologyError::ZeroWidth { index });
        }
        Ok(Self {
            widths,
            activations: LayerActivations::default(),
        })
    }

    #[must_use]
    pub fn with_activations(mut self, activations: LayerActivations) -> Self {
        self.activations = activations;
        self
    }

    /// Layer widths `[l0, …, lk]`.
    #[must_use]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    #[must_use]
    pub fn activations(&self) -> LayerActivations {
        self.activations
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.widths[0]
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.widths[self.widths.len() - 1]
    }

    /// Number of weight matrices (`k`).
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.widths.len() - 1
    }

    /// Activation applied after weight matrix `layer`.
    #[must_use]
    pub fn activation(&self, layer: usize) -> Activation {
        if layer + 1 == self.layer_count() {
            self.activations.output
        } else {
            self.activations.hidden
        }
    }

    /// Total number of weights and biases.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.widths
            .windows(2)
            .map(|w| w[1] * w[0] + w[1])
            .sum()
    }

    /// Networks are compatible iff their layer widths are equal.
    #[must_use]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.widths == other.widths
    }
}

/// Random initialization scheme for fresh networks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightInit {
    /// Every weight and bias drawn from `U[-limit, limit]`.
    Uniform { limit: f32 },
    /// Variance-preserving range `±√(6 / (fan_in + fan_out))`, per layer,
    /// for both weights and biases.
    #[default]
    Xavier,
}

impl WeightInit {
    /// Sampling bound for the layer mapping `fan_in` inputs to `fan_out` outputs.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn limit(self, fan_in: usize, fan_out: usize) -> f32 {
        match self {
            Self::Uniform { limit } => limit.abs(),
            Self::Xavier => (6.0 / (fan_in + fan_out) as f32).sqrt(),
        }
    }
}

/// Identifies one parameter inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Weight { row: usize, col: usize },
    Bias { row: usize },
}

/// One fully connected layer: `weights` is `out × in`, `biases` has length `out`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    weights: Matrix,
    biases: Vec<f32>,
}

impl DenseLayer {
    #[must_use]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[must_use]
    pub fn biases(&self) -> &[f32] {
        &self.biases
    }

    fn params(&self) -> impl Iterator<Item = f32> + '_ {
        self.weights
            .as_slice()
            .iter()
            .chain(&self.biases)
            .copied()
    }

    fn params_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        self.weights
            .as_mut_slice()
            .iter_mut()
            .chain(&mut self.biases)
    }
}

/// A feedforward network (one genome).
///
/// Cloning produces an independent deep copy of every matrix and vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    topology: Topology,
    layers: Vec<DenseLayer>,
}

impl Network {
    /// Builds a network by evaluating `f(layer, param)` for every parameter.
    pub fn from_fn<F>(topology: Topology, mut f: F) -> Self
    where
        F: FnMut(usize, Param) -> f32,
    {
        let layers = topology
            .widths
            .windows(2)
            .enumerate()
            .map(|(layer, w)| {
                let (fan_in, fan_out) = (w[0], w[1]);
                let weights = Matrix::from_fn(fan_out, fan_in, |row, col| {
                    f(layer, Param::Weight { row, col })
                });
                let biases = (0..fan_out)
                    .map(|row| f(layer, Param::Bias { row }))
                    .collect();
                DenseLayer { weights, biases }
            })
            .collect();
        Self { topology, layers }
    }

    /// Creates a network with random parameters drawn according to `init`.
    pub fn random<R>(topology: Topology, init: WeightInit, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let limits = topology
            .widths
            .windows(2)
            .map(|w| init.limit(w[0], w[1]))
            .collect::<Vec<_>>();
        Self::from_fn(topology, |layer, _| {
            let limit = limits[layer];
            rng.random_range(-limit..=limit)
        })
    }

    /// Assembles a network from layers whose shapes were already checked
    /// against `topology`.
    pub(crate) fn from_layers(topology: Topology, layers: Vec<(Matrix, Vec<f32>)>) -> Self {
        debug_assert_eq!(layers.len(), topology.layer_count());
        let layers = layers
            .into_iter()
            .map(|(weights, biases)| DenseLayer { weights, biases })
            .collect();
        Self { topology, layers }
    }

    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[must_use]
    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.topology.parameter_count()
    }

    /// Evaluates the network on `input`.
    ///
    /// Pure and deterministic: the same network and input always produce
    /// bit-identical output.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from the input layer width.
    #[must_use]
    pub fn feedforward(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(
            input.len(),
            self.topology.input_len(),
            "input length must match the input layer width"
        );
        let mut activations = input.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            let activation = self.topology.activation(i);
            activations = layer
                .weights
                .affine(&activations, &layer.biases)
                .into_iter()
                .map(|z| activation.apply(z))
                .collect();
        }
        activations
    }

    /// Every weight and bias, layer by layer (weights row-major, then biases).
    pub fn params(&self) -> impl Iterator<Item = f32> + '_ {
        self.layers.iter().flat_map(DenseLayer::params)
    }

    /// Mutable access to every parameter, in the order of [`Self::params`].
    pub fn params_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        self.layers.iter_mut().flat_map(DenseLayer::params_mut)
    }

    pub fn check_compatible(&self, other: &Self) -> Result<(), ShapeMismatchError> {
        if self.topology.is_compatible(&other.topology) {
            Ok(())
        } else {
            Err(ShapeMismatchError {
                expected: self.topology.widths.clone(),
                actual: other.topology.widths.clone(),
            })
        }
    }

    /// Builds a new network whose parameters are `f(self_param, other_param)`.
    ///
    /// The result has this network's topology. Neither input is modified.
    pub fn zip_with<F>(&self, other: &Self, mut f: F) -> Result<Self, ShapeMismatchError>
    where
        F: FnMut(f32, f32) -> f32,
    {
        self.check_compatible(other)?;
        let mut child = self.clone();
        for (c, o) in child.params_mut().zip(other.params()) {
            *c = f(*c, o);
        }
        Ok(child)
    }

    #[must_use]
    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            layers: self.topology.widths.clone(),
            total_parameters: self.parameter_count(),
            weight_shapes: self.layers.iter().map(|l| l.weights.shape()).collect(),
            bias_shapes: self.layers.iter().map(|l| l.biases.len()).collect(),
        }
    }
}

/// Shape overview of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub layers: Vec<usize>,
    pub total_parameters: usize,
    pub weight_shapes: Vec<(usize, usize)>,
    pub bias_shapes: Vec<usize>,
}
