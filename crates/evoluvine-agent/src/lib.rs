//! Neural-network-controlled snakes and their fitness shaping.
//!
//! An [`Agent`] owns one [`Network`](evoluvine_network::Network) (its
//! genome), a body on a [`Grid`](evoluvine_engine::Grid), and all the
//! bookkeeping needed to turn a stream of simulation ticks into one scalar
//! fitness value.
//!
//! # Tick Pipeline
//!
//! Every call to [`Agent::update`] runs, in order:
//!
//! 1. **Sense** - derive the input vector from the [`Surroundings`]
//!    ([`SensingScheme`])
//! 2. **Decide** - arg-max of the network output picks a heading
//!    ([`ActionScheme`])
//! 3. **Move** - advance one cell; walls and the body are fatal
//! 4. **Score** - add the incremental fitness terms and subtract the
//!    repetition penalty
//!
//! A tick on which the move killed the agent is not scored. Once the
//! generation is over, [`Agent::evaluate_final_fitness`] folds the episode
//! totals (food, steps, length, ...) into the final fitness.
//!
//! # Harness Contract
//!
//! The agent never places or consumes food by itself. After each update the
//! harness checks the head against the environment and calls
//! [`Agent::grow`] or [`Agent::kill`]. Before simulating a generation the
//! harness must call [`Agent::reset`] on every agent, elites included,
//! otherwise counters and histories from the previous run leak into the new
//! one.
//!
//! # Fitness Shaping
//!
//! All magnitudes are named fields of [`ShapingParams`]. They were tuned
//! empirically and have no derivation; keep their relative weighting when
//! changing them.

use evoluvine_engine::{Cell, Environment};

pub use self::{agent::*, scheme::*, sensing::*, shaping::*, tracker::*};

mod agent;
mod scheme;
mod sensing;
mod shaping;
mod tracker;

/// The network widths do not fit the configured sensing/action scheme.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("network layers {actual:?} need {expected_input} inputs and {expected_output} outputs")]
pub struct AgentConfigError {
    pub expected_input: usize,
    pub expected_output: usize,
    pub actual: Vec<usize>,
}

/// What an agent can observe about its environment on a tick.
pub trait Surroundings {
    /// Current food position.
    fn food(&self) -> Cell;

    /// Current hazard position, if the environment has one.
    fn hazard(&self) -> Option<Cell> {
        None
    }
}

impl Surroundings for Environment {
    fn food(&self) -> Cell {
        Environment::food(self)
    }

    fn hazard(&self) -> Option<Cell> {
        Environment::hazard(self)
    }
}

/// Fixed food and hazard positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stimulus {
    pub food: Cell,
    pub hazard: Option<Cell>,
}

impl Surroundings for Stimulus {
    fn food(&self) -> Cell {
        self.food
    }

    fn hazard(&self) -> Option<Cell> {
        self.hazard
    }
}
