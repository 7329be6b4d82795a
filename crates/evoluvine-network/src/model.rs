//! Persisted network shape.
//!
//! A saved network is `{ layers, weights, biases }` where `weights[i]` is a
//! list of `layers[i+1]` rows of `layers[i]` values and `biases[i]` holds
//! `layers[i+1]` values. An optional `activations` entry records non-default
//! activations; payloads without it load as all-sigmoid networks.
//!
//! Loading never coerces: any count or shape that disagrees with the declared
//! layer list is reported as a [`ModelError`].
//!
//! ```
//! use evoluvine_network::{Network, NetworkModel};
//!
//! let json = r#"{
//!     "layers": [2, 1],
//!     "weights": [[[0.5, -0.5]]],
//!     "biases": [[0.0]]
//! }"#;
//! let model: NetworkModel = serde_json::from_str(json).unwrap();
//! let network = Network::try_from(model).unwrap();
//! assert_eq!(network.feedforward(&[1.0, 1.0]), vec![0.5]);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    ModelError,
    activation::LayerActivations,
    matrix::Matrix,
    network::{Network, Topology},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    pub layers: Vec<usize>,
    pub weights: Vec<Vec<Vec<f32>>>,
    pub biases: Vec<Vec<f32>>,
    #[serde(default)]
    pub activations: LayerActivations,
}

impl From<&Network> for NetworkModel {
    fn from(network: &Network) -> Self {
        Self {
            layers: network.topology().widths().to_vec(),
            weights: network
                .layers()
                .iter()
                .map(|l| l.weights().to_rows())
                .collect(),
            biases: network
                .layers()
                .iter()
                .map(|l| l.biases().to_vec())
                .collect(),
            activations: network.topology().activations(),
        }
    }
}

impl TryFrom<NetworkModel> for Network {
    type Error = ModelError;

    fn try_from(model: NetworkModel) -> Result<Self, Self::Error> {
        let NetworkModel {
            layers,
            weights,
            biases,
            activations,
        } = model;
        let topology = Topology::new(layers)
            .map_err(ModelError::Topology)?
            .with_activations(activations);

        let expected = topology.layer_count();
        if weights.len() != expected {
            return Err(ModelError::WeightCount {
                expected,
                actual: weights.len(),
            });
        }
        if biases.len() != expected {
            return Err(ModelError::BiasCount {
                expected,
                actual: biases.len(),
            });
        }

        let mut dense = Vec::with_capacity(expected);
        for (layer, (rows, bias)) in weights.into_iter().zip(biases).enumerate() {
            let fan_in = topology.widths()[layer];
            let fan_out = topology.widths()[layer + 1];
            if rows.len() != fan_out {
                return Err(ModelError::WeightRows {
                    layer,
                    expected: fan_out,
                    actual: rows.len(),
                });
            }
            if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != fan_in) {
                return Err(ModelError::WeightColumns {
                    layer,
                    row,
                    expected: fan_in,
                    actual: values.len(),
                });
            }
            if bias.len() != fan_out {
                return Err(ModelError::BiasLength {
                    layer,
                    expected: fan_out,
                    actual: bias.len(),
                });
            }
            let matrix = Matrix::from_fn(fan_out, fan_in, |r, c| rows[r][c]);
            dense.push((matrix, bias));
        }

        Ok(Network::from_layers(topology, dense))
    }
}
