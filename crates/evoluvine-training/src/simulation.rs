//! Headless episodes: one agent, one environment, a bounded number of ticks.
//!
//! Per tick the agent updates against the environment, then the harness
//! resolves what the agent ran into:
//!
//! 1. head on the food: the agent grows and the food respawns away from the
//!    body
//! 2. head on the hazard: the agent is killed
//! 3. every `hazard_relocate_interval` ticks the hazard moves away from the
//!    food and the body
//!
//! The episode ends when the agent dies or `max_ticks` is reached, and the
//! final fitness is evaluated.

use evoluvine_agent::{Agent, DeathCause};
use evoluvine_engine::Environment;
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub max_ticks: usize,
    /// Ticks between hazard relocations. Ignored without a hazard.
    pub hazard_relocate_interval: Option<usize>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            max_ticks: 1000,
            hazard_relocate_interval: Some(300),
        }
    }
}

/// Outcome of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpisodeReport {
    pub ticks: usize,
    pub steps: usize,
    pub food_eaten: usize,
    pub length: usize,
    pub fitness: f32,
    pub death: Option<DeathCause>,
}

/// Resets `agent`, plays one episode and evaluates its final fitness.
///
/// The environment gets a hazard only if the agent's sensing scheme can see
/// one. All randomness (initial heading, food, hazard) comes from `rng`.
pub fn run_episode<R>(agent: &mut Agent, params: &SimulationParams, rng: &mut R) -> EpisodeReport
where
    R: Rng + ?Sized,
{
    agent.reset(rng);
    let config = *agent.config();
    let mut environment = Environment::with_rng(
        config.grid,
        config.scheme.sensing.senses_hazard(),
        Pcg32::seed_from_u64(rng.random()),
    );

    let mut ticks = 0;
    while ticks < params.max_ticks && agent.is_alive() {
        ticks += 1;
        agent.update(&environment);
        if !agent.is_alive() {
            break;
        }
        if environment.is_food_at(agent.head()) {
            agent.grow();
            environment.respawn_food(agent.body());
        }
        if environment.is_hazard_at(agent.head()) {
            agent.kill(DeathCause::Hazard);
            break;
        }
        if let Some(interval) = params.hazard_relocate_interval
            && interval > 0
            && ticks % interval == 0
        {
            environment.relocate_hazard(agent.body());
        }
    }

    let fitness = agent.evaluate_final_fitness();
    EpisodeReport {
        ticks,
        steps: agent.steps(),
        food_eaten: agent.food_eaten(),
        length: agent.body().len(),
        fitness,
        death: agent.death_cause(),
    }
}

#[cfg(test)]
mod tests {
    use evoluvine_agent::{AgentConfig, AgentScheme};
    use evoluvine_engine::Grid;
    use evoluvine_network::{Network, WeightInit};

    use super::*;

    fn random_agent(scheme: AgentScheme, seed: u64) -> Agent {
        let mut rng = Pcg32::seed_from_u64(seed);
        let network = Network::random(
            scheme.topology(&[10]).unwrap(),
            WeightInit::Xavier,
            &mut rng,
        );
        Agent::new(network, AgentConfig::new(Grid::DEFAULT, scheme), &mut rng).unwrap()
    }

    #[test]
    fn test_episode_is_deterministic() {
        let params = SimulationParams::default();
        let mut a = random_agent(AgentScheme::ABSOLUTE, 1);
        let mut b = a.clone();
        let ra = run_episode(&mut a, &params, &mut Pcg32::seed_from_u64(42));
        let rb = run_episode(&mut b, &params, &mut Pcg32::seed_from_u64(42));
        assert_eq!(ra, rb);
        assert_eq!(a.head(), b.head());
    }

    #[test]
    fn test_episode_bounds() {
        let params = SimulationParams {
            max_ticks: 25,
            hazard_relocate_interval: None,
        };
        for seed in 0..10 {
            let mut agent = random_agent(AgentScheme::RELATIVE, seed);
            let report = run_episode(&mut agent, &params, &mut Pcg32::seed_from_u64(seed));
            assert!(report.ticks <= 25);
            assert!(report.steps <= report.ticks);
            assert!(report.fitness >= 0.0);
            assert_eq!(report.fitness, agent.fitness());
            assert_eq!(report.death.is_none(), agent.is_alive());
        }
    }

    #[test]
    fn test_episode_resets_first() {
        let params = SimulationParams {
            max_ticks: 10,
            hazard_relocate_interval: None,
        };
        let mut agent = random_agent(AgentScheme::RELATIVE, 3);
        agent.kill(DeathCause::Hazard);
        let first = run_episode(&mut agent, &params, &mut Pcg32::seed_from_u64(8));
        let second = run_episode(&mut agent, &params, &mut Pcg32::seed_from_u64(8));
        assert_eq!(first, second);
        assert!(first.ticks > 0);
    }

    #[test]
    fn test_params_from_json() {
        let params: SimulationParams = serde_json::from_str(r#"{ "max_ticks": 50 }"#).unwrap();
        assert_eq!(params.max_ticks, 50);
        assert_eq!(params.hazard_relocate_interval, Some(300));
    }
}
