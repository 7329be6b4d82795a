use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use evoluvine_agent::{ActionScheme, AgentConfigError, AgentScheme, SensingScheme};
use evoluvine_network::{Network, NetworkModel};
use serde::{Deserialize, Serialize};

/// A saved network plus optional metadata.
///
/// The network payload is stored flat, so a bare
/// `{ "layers": ..., "weights": ..., "biases": ... }` file is a valid model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_fitness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensing: Option<SensingScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionScheme>,
    #[serde(flatten)]
    pub network: NetworkModel,
}

/// A model whose network has been validated against its scheme.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model: AiModel,
    pub network: Network,
    pub scheme: AgentScheme,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadModelError {
    #[display("model file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[display("failed to read model file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to parse model file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("invalid model file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: InvalidModelError,
    },
}

impl LoadModelError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidModelError {
    #[display("{_0}")]
    Network(evoluvine_network::ModelError),
    #[display("{_0}")]
    Scheme(AgentConfigError),
    #[display("no known scheme has {input} inputs and {output} outputs")]
    UnknownWidths { input: usize, output: usize },
}

impl AiModel {
    #[must_use]
    pub fn new(network: &Network, scheme: AgentScheme) -> Self {
        Self {
            name: None,
            trained_at: None,
            final_fitness: None,
            generation: None,
            sensing: Some(scheme.sensing),
            action: Some(scheme.action),
            network: NetworkModel::from(network),
        }
    }

    pub fn open<P>(path: P) -> Result<LoadedModel, LoadModelError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadModelError::NotFound {
                path: path.to_owned(),
            },
            _ => LoadModelError::Io {
                path: path.to_owned(),
                source,
            },
        })?;

        let reader = BufReader::new(file);
        let model: Self =
            serde_json::from_reader(reader).map_err(|source| LoadModelError::Parse {
                path: path.to_owned(),
                source,
            })?;

        model.validate().map_err(|source| LoadModelError::Invalid {
            path: path.to_owned(),
            source,
        })
    }

    /// Builds the network and resolves the scheme.
    ///
    /// A scheme half missing from the metadata is taken from the one that
    /// matches the network's input and output widths.
    pub fn validate(self) -> Result<LoadedModel, InvalidModelError> {
        let network =
            Network::try_from(self.network.clone()).map_err(InvalidModelError::Network)?;
        let topology = network.topology();

        let scheme = match (self.sensing, self.action) {
            (Some(sensing), Some(action)) => AgentScheme { sensing, action },
            (sensing, action) => {
                let (input, output) = (topology.input_len(), topology.output_len());
                let inferred = AgentScheme::from_widths(input, output)
                    .ok_or(InvalidModelError::UnknownWidths { input, output })?;
                AgentScheme {
                    sensing: sensing.unwrap_or(inferred.sensing),
                    action: action.unwrap_or(inferred.action),
                }
            }
        };
        scheme.check(topology).map_err(InvalidModelError::Scheme)?;

        Ok(LoadedModel {
            model: self,
            network,
            scheme,
        })
    }
}
