use evoluvine_agent::{AgentConfig, AgentScheme, ShapingParams};
use evoluvine_engine::Grid;
use evoluvine_network::{LayerActivations, Topology, TopologyError, WeightInit};
use evoluvine_training::{genetic::PopulationEvolver, simulation::SimulationParams};
use serde::{Deserialize, Serialize};

/// Everything a training run needs, loadable from JSON.
///
/// Missing fields take their defaults, so a config file only has to name
/// what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Random when absent; the chosen seed is written to the summary.
    pub seed: Option<u64>,
    pub scheme: AgentScheme,
    pub hidden_layers: Vec<usize>,
    pub activations: LayerActivations,
    pub weight_init: WeightInit,
    pub grid: Grid,
    pub simulation: SimulationParams,
    pub evolver: PopulationEvolver,
    pub shaping: ShapingParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 600,
            generations: 100,
            seed: None,
            scheme: AgentScheme::RELATIVE,
            hidden_layers: vec![10],
            activations: LayerActivations::default(),
            weight_init: WeightInit::Xavier,
            grid: Grid::DEFAULT,
            simulation: SimulationParams::default(),
            evolver: PopulationEvolver::default(),
            shaping: ShapingParams::default(),
        }
    }
}

impl TrainingConfig {
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            shaping: self.shaping,
            ..AgentConfig::new(self.grid, self.scheme)
        }
    }

    pub fn topology(&self) -> Result<Topology, TopologyError> {
        Ok(self
            .scheme
            .topology(&self.hidden_layers)?
            .with_activations(self.activations))
    }
}
