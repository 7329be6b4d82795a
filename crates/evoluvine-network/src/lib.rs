//! Fixed-topology feedforward networks evolved by the genetic algorithm.
//!
//! A [`Network`] is a stack of fully connected layers described by a
//! [`Topology`]: the layer widths `[l0, l1, …, lk]` plus one activation for
//! the hidden layers and one for the output layer. Layer `i` owns an
//! `l[i+1] × l[i]` weight [`Matrix`] and an `l[i+1]` bias vector.
//!
//! Shapes are fixed when a network is built. Genetic operators only replace
//! element values, and every operator that combines two networks checks that
//! their topologies are compatible first (see [`ShapeMismatchError`]).
//!
//! # Modules
//!
//! - [`matrix`] - row-major dense matrices and the affine map `W·a + b`
//! - [`activation`] - sigmoid, ReLU and identity activations
//! - [`network`] - [`Topology`], [`Network`], initialization and evaluation
//! - [`model`] - the persisted `{ layers, weights, biases }` shape
//!
//! # Example
//!
//! ```
//! use evoluvine_network::{Network, Topology, WeightInit};
//! use rand::SeedableRng as _;
//!
//! let topology = Topology::new(vec![4, 6, 3]).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let network = Network::random(topology, WeightInit::Xavier, &mut rng);
//!
//! let output = network.feedforward(&[0.0, 0.0, 0.0, 0.0]);
//! assert_eq!(output.len(), 3);
//! assert_eq!(output, network.feedforward(&[0.0, 0.0, 0.0, 0.0]));
//! ```

pub use self::{activation::*, matrix::*, model::*, network::*};

pub mod activation;
pub mod matrix;
pub mod model;
pub mod network;

/// Two networks whose layer widths differ were combined element-wise.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("incompatible network shapes: expected layers {expected:?}, got {actual:?}")]
pub struct ShapeMismatchError {
    pub expected: Vec<usize>,
    pub actual: Vec<usize>,
}

/// Layer widths that cannot describe a network.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TopologyError {
    #[display("a network needs at least 2 layers, got {count}")]
    TooFewLayers { count: usize },
    #[display("layer {index} has zero width")]
    ZeroWidth { index: usize },
}

/// A persisted model does not match the layer list it declares.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display("invalid layer list: {_0}")]
    Topology(TopologyError),
    #[display("expected {expected} weight matrices, got {actual}")]
    WeightCount { expected: usize, actual: usize },
    #[display("expected {expected} bias vectors, got {actual}")]
    BiasCount { expected: usize, actual: usize },
    #[display("weight matrix {layer}: expected {expected} rows, got {actual}")]
    WeightRows {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    #[display("weight matrix {layer}, row {row}: expected {expected} columns, got {actual}")]
    WeightColumns {
        layer: usize,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("bias vector {layer}: expected length {expected}, got {actual}")]
    BiasLength {
        layer: usize,
        expected: usize,
        actual: usize,
    },
}
