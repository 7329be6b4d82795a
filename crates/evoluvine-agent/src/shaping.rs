use serde::{Deserialize, Serialize};

/// Every tuned magnitude of the fitness shaping.
///
/// Defaults reproduce the reference tuning. Partial JSON documents are
/// accepted; missing fields keep their defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapingParams {
    pub step: StepRewards,
    pub repetition: RepetitionPenalties,
    pub outcome: OutcomeBonuses,
}

/// Terms added on every scored tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepRewards {
    pub survival: f32,
    /// Multiplies `1 - normalized_distance` on the first tick.
    pub initial_distance_scale: f32,
    /// Per cell of distance gained towards the food.
    pub approach: f32,
    /// Per cell of distance lost.
    pub retreat: f32,
    /// Subtracted when the distance did not change.
    pub stall: f32,
    /// Entering a zone not visited before in this episode.
    pub exploration: f32,
    /// Zone edge length in cells.
    pub zone_cells: i32,
    pub direction_variety: f32,
    pub direction_variety_min_steps: usize,
    pub direction_variety_window: usize,
    /// Multiplies `1 - normalized_distance` on every tick.
    pub proximity: f32,
    pub idle_grace_steps: usize,
    pub idle_penalty_min_steps: usize,
    pub idle_penalty_rate: f32,
    pub max_idle_steps: usize,
    pub idle_death_penalty: f32,
}

impl Default for StepRewards {
    fn default() -> Self {
        Self {
            survival: 0.1,
            initial_distance_scale: 3.0,
            approach: 8.0,
            retreat: 1.5,
            stall: 0.05,
            exploration: 5.0,
            zone_cells: 3,
            direction_variety: 1.0,
            direction_variety_min_steps: 10,
            direction_variety_window: 3,
            proximity: 0.15,
            idle_grace_steps: 30,
            idle_penalty_min_steps: 50,
            idle_penalty_rate: 0.05,
            max_idle_steps: 150,
            idle_death_penalty: 30.0,
        }
    }
}

/// Penalties for circling, oscillating and revisiting cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionPenalties {
    /// Minimum steps between two penalized cycle or oscillation detections.
    pub debounce_steps: usize,
    pub revisit_threshold: u32,
    pub revisit_scale: f32,
    pub same_heading_window: usize,
    pub same_heading: f32,
    pub cycle: f32,
    pub back_and_forth: f32,
    pub back_and_forth_min_headings: usize,
    pub back_and_forth_min_pairs: usize,
    pub bounded_window: usize,
    /// Box edge length in cells.
    pub bounded_cells: i32,
    pub bounded: f32,
    /// Visits of one cell that kill the agent.
    pub max_revisits: u32,
    pub stuck: f32,
}

impl Default for RepetitionPenalties {
    fn default() -> Self {
        Self {
            debounce_steps: 5,
            revisit_threshold: 5,
            revisit_scale: 2.0,
            same_heading_window: 20,
            same_heading: 8.0,
            cycle: 15.0,
            back_and_forth: 10.0,
            back_and_forth_min_headings: 6,
            back_and_forth_min_pairs: 3,
            bounded_window: 15,
            bounded_cells: 4,
            bounded: 5.0,
            max_revisits: 8,
            stuck: 25.0,
        }
    }
}

/// Terms of the end-of-episode fitness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeBonuses {
    pub food: f32,
    pub step: f32,
    pub length: f32,
    pub improvement: f32,
    pub death: f32,
    pub excess_revisit: f32,
}

impl Default for OutcomeBonuses {
    fn default() -> Self {
        Self {
            food: 100.0,
            step: 0.05,
            length: 20.0,
            improvement: 3.0,
            death: 25.0,
            excess_revisit: 0.5,
        }
    }
}
