use chrono::{DateTime, Utc};
use evoluvine_agent::{AgentScheme, DeathCause};
use serde::Serialize;

/// Informational record written next to the best model after each generation.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub best_fitness: f32,
    pub generation: usize,
    pub population_size: usize,
    pub food_eaten: usize,
    pub steps: usize,
    pub death: Option<DeathCause>,
    pub scheme: AgentScheme,
    pub seed: u64,
    pub trained_at: DateTime<Utc>,
}
