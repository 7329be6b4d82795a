use std::collections::HashSet;

use evoluvine_engine::{Body, Cell, Grid, Heading};
use evoluvine_network::{Network, argmax};
use rand::Rng;
use serde::Serialize;

use crate::{
    AgentConfigError, AgentScheme, LoopStats, MovementTracker, SelfView, SensorInputs,
    ShapingParams, Surroundings,
};

/// Everything an agent needs besides its network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentConfig {
    pub grid: Grid,
    /// Cell the body starts on after every reset.
    pub start: Cell,
    pub scheme: AgentScheme,
    pub shaping: ShapingParams,
}

impl AgentConfig {
    /// Starts at the grid center with the default shaping.
    #[must_use]
    pub fn new(grid: Grid, scheme: AgentScheme) -> Self {
        Self {
            grid,
            start: grid.center(),
            scheme,
            shaping: ShapingParams::default(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    #[display("wall collision")]
    Wall,
    #[display("self collision")]
    SelfCollision,
    #[display("hazard")]
    Hazard,
    #[display("idle timeout")]
    IdleTimeout,
    #[display("stuck in loop")]
    StuckInLoop,
}

/// Result of one [`Agent::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    Moved { head: Cell },
    Died(DeathCause),
    /// The agent was already dead.
    Inactive,
}

/// A snake driven by a neural network.
#[derive(Debug, Clone)]
pub struct Agent {
    network: Network,
    config: AgentConfig,
    body: Body,
    heading: Heading,
    grow_pending: bool,
    death: Option<DeathCause>,
    fitness: f32,
    food_eaten: usize,
    steps: usize,
    idle_steps: usize,
    last_food_distance: Option<i32>,
    distance_improvements: usize,
    explored_zones: HashSet<(i32, i32)>,
    last_heading_change: usize,
    last_loop_penalty_step: usize,
    tracker: MovementTracker,
}

impl Agent {
    /// Creates an agent in its reset state.
    ///
    /// Fails if the network widths do not match `config.scheme`.
    pub fn new<R>(
        network: Network,
        config: AgentConfig,
        rng: &mut R,
    ) -> Result<Self, AgentConfigError>
    where
        R: Rng + ?Sized,
    {
        config.scheme.check(network.topology())?;
        let mut agent = Self {
            network,
            config,
            body: Body::new(config.start),
            heading: Heading::Right,
            grow_pending: false,
            death: None,
            fitness: 0.0,
            food_eaten: 0,
            steps: 0,
            idle_steps: 0,
            last_food_distance: None,
            distance_improvements: 0,
            explored_zones: HashSet::new(),
            last_heading_change: 0,
            last_loop_penalty_step: 0,
            tracker: MovementTracker::new(),
        };
        agent.reset(rng);
        Ok(agent)
    }

    /// Restores the construction state, keeping the network.
    ///
    /// Must be called before every simulated generation.
    pub fn reset<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.body = Body::new(self.config.start);
        self.heading = rng.random();
        self.grow_pending = false;
        self.death = None;
        self.fitness = 0.0;
        self.food_eaten = 0;
        self.steps = 0;
        self.idle_steps = 0;
        self.last_food_distance = None;
        self.distance_improvements = 0;
        self.explored_zones.clear();
        self.last_heading_change = 0;
        self.last_loop_penalty_step = 0;
        self.tracker.clear();
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    #[must_use]
    pub fn into_network(self) -> Network {
        self.network
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn head(&self) -> Cell {
        self.body.head()
    }

    #[must_use]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    #[must_use]
    pub fn death_cause(&self) -> Option<DeathCause> {
        self.death
    }

    /// Running fitness, or the final fitness once it has been evaluated.
    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    #[must_use]
    pub fn food_eaten(&self) -> usize {
        self.food_eaten
    }

    /// Successful moves since the last reset.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[must_use]
    pub fn idle_steps(&self) -> usize {
        self.idle_steps
    }

    #[must_use]
    pub fn distance_improvements(&self) -> usize {
        self.distance_improvements
    }

    #[must_use]
    pub fn is_head_at(&self, cell: Cell) -> bool {
        self.body.head() == cell
    }

    /// Runs one tick: sense, decide, move, score.
    pub fn update<S>(&mut self, surroundings: &S)
    where
        S: Surroundings + ?Sized,
    {
        if !self.is_alive() {
            return;
        }
        let inputs = self.sense(surroundings);
        self.decide(&inputs);
        if self.advance().is_moved() {
            self.score(surroundings);
        }
    }

    #[must_use]
    pub fn sense<S>(&self, surroundings: &S) -> SensorInputs
    where
        S: Surroundings + ?Sized,
    {
        let view = SelfView {
            grid: &self.config.grid,
            body: &self.body,
            heading: self.heading,
        };
        self.config.scheme.sensing.sense(&view, surroundings)
    }

    fn decide(&mut self, inputs: &[f32]) {
        let output = self.network.feedforward(inputs);
        let chosen = argmax(&output)
            .and_then(|i| {
                self.config
                    .scheme
                    .action
                    .resolve(i, self.heading, self.body.len())
            })
            .unwrap_or(self.heading);
        if chosen != self.heading {
            self.last_heading_change = self.steps;
        }
        self.heading = chosen;
        self.tracker.record_heading(chosen);
    }

    /// Moves the head one cell along the current heading.
    ///
    /// Leaving the grid or running into the body kills the agent and leaves
    /// the body unchanged. Otherwise the tail follows unless growth is
    /// pending.
    pub fn advance(&mut self) -> MoveOutcome {
        if !self.is_alive() {
            return MoveOutcome::Inactive;
        }
        let head = self
            .body
            .head()
            .offset(self.heading.offset(self.config.grid.cell_size()));
        if !self.config.grid.contains(head) {
            self.kill(DeathCause::Wall);
            return MoveOutcome::Died(DeathCause::Wall);
        }
        if self.body.contains(head) {
            self.kill(DeathCause::SelfCollision);
            return MoveOutcome::Died(DeathCause::SelfCollision);
        }

        self.tracker.record_position(head);
        self.body.push_head(head);
        if self.grow_pending {
            self.grow_pending = false;
        } else {
            self.body.pop_tail();
        }
        self.steps += 1;
        MoveOutcome::Moved { head }
    }

    /// Marks the food as eaten; the next move keeps the tail.
    pub fn grow(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.grow_pending = true;
        self.food_eaten += 1;
        self.idle_steps = 0;
        self.tracker.forgive_on_growth();
    }

    /// Kills the agent. The first cause sticks.
    pub fn kill(&mut self, cause: DeathCause) {
        if self.is_alive() {
            self.death = Some(cause);
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn score<S>(&mut self, surroundings: &S)
    where
        S: Surroundings + ?Sized,
    {
        let params = self.config.shaping.step;
        let grid = self.config.grid;
        let head = self.body.head();
        let distance = head.manhattan_distance(surroundings.food());
        let closeness = 1.0 - (distance as f32 / grid.max_distance()).min(1.0);

        self.fitness += params.survival;
        self.fitness += match self.last_food_distance {
            None => closeness * params.initial_distance_scale,
            Some(last) => {
                let change = (last - distance) as f32 / grid.cell_size() as f32;
                if change > 0.0 {
                    change * params.approach
                } else if change < 0.0 {
                    change * params.retreat
                } else {
                    -params.stall
                }
            }
        };
        self.fitness -= self.repetition_penalty();

        if self.explored_zones.insert(grid.zone_of(head, params.zone_cells)) {
            self.fitness += params.exploration;
        }

        let window = params.direction_variety_window;
        if self.steps > params.direction_variety_min_steps
            && self.steps - self.last_heading_change < window
            && self.tracker.headings_vary(window)
        {
            self.fitness += params.direction_variety;
        }

        if self.last_food_distance.is_none_or(|last| distance < last) {
            self.distance_improvements += 1;
            self.idle_steps = 0;
        } else {
            self.idle_steps += 1;
        }
        self.last_food_distance = Some(distance);

        self.fitness += closeness * params.proximity;

        if self.idle_steps > params.idle_grace_steps && self.steps > params.idle_penalty_min_steps {
            let overdue = self.idle_steps - params.idle_grace_steps;
            self.fitness -= overdue as f32 * params.idle_penalty_rate;
        }
        if self.idle_steps > params.max_idle_steps {
            self.fitness -= params.idle_death_penalty;
            self.kill(DeathCause::IdleTimeout);
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn repetition_penalty(&mut self) -> f32 {
        let params = self.config.shaping.repetition;
        if self.steps - self.last_loop_penalty_step < params.debounce_steps {
            return 0.0;
        }

        let mut penalty = 0.0;
        let visits = self.tracker.visits(self.body.head());
        if visits >= params.revisit_threshold {
            let excess = (visits - params.revisit_threshold + 1) as f32;
            penalty += excess * excess * params.revisit_scale;
        }
        if self.tracker.same_heading_run(params.same_heading_window) {
            penalty += params.same_heading;
        }
        if self.tracker.has_cycle() {
            penalty += params.cycle;
            self.last_loop_penalty_step = self.steps;
        }
        if self
            .tracker
            .has_back_and_forth(params.back_and_forth_min_headings, params.back_and_forth_min_pairs)
        {
            penalty += params.back_and_forth;
            self.last_loop_penalty_step = self.steps;
        }
        let span = self.config.grid.cell_size() * params.bounded_cells;
        if self.tracker.is_boxed_in(params.bounded_window, span) {
            penalty += params.bounded;
        }
        if visits >= params.max_revisits {
            penalty += params.stuck;
            self.kill(DeathCause::StuckInLoop);
        }
        penalty
    }

    /// Folds the episode totals into the fitness and returns it.
    ///
    /// The result is never negative and replaces the running fitness.
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate_final_fitness(&mut self) -> f32 {
        let params = self.config.shaping.outcome;
        let death = if self.is_alive() { 0.0 } else { params.death };
        let total = self.fitness
            + self.food_eaten as f32 * params.food
            + self.steps as f32 * params.step
            + self.body.len() as f32 * params.length
            + self.distance_improvements as f32 * params.improvement
            - death
            - self.tracker.excess_revisits() as f32 * params.excess_revisit;
        self.fitness = total.max(0.0);
        self.fitness
    }

    #[must_use]
    pub fn loop_stats(&self) -> LoopStats {
        let params = self.config.shaping.repetition;
        self.tracker.stats((
            params.back_and_forth_min_headings,
            params.back_and_forth_min_pairs,
        ))
    }
}
