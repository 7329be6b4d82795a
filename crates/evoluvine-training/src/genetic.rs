//! Generational genetic algorithm over network-controlled agents.
//!
//! # Algorithm Overview
//!
//! One generation runs:
//!
//! 1. **Evaluate** - [`Population::evaluate`] resets every agent and plays one
//!    episode per agent in parallel; agents end up sorted by final fitness
//!    (best first)
//! 2. **Elitism** - the top `⌊N × elitism_rate⌋` agents by raw fitness are
//!    carried over unchanged
//! 3. **Sharing** - optionally, fitness is divided among genetically close
//!    agents ([`sharing`](crate::sharing))
//! 4. **Selection** - parent pairs are drawn by roulette wheel over shared (or
//!    raw) fitness ([`selection`](crate::selection))
//! 5. **Crossover** - arithmetic blend of the two parents
//! 6. **Mutation** - Bernoulli-masked replacement or Gaussian noise
//!
//! Steps 2 to 6 are [`PopulationEvolver::evolve`]. The generation counter
//! grows by one per evolution.
//!
//! # Reset Contract
//!
//! Elites are cloned with whatever episode state they finished with.
//! Evaluation always resets every agent before simulating it, so stale
//! counters and histories never reach a new run. Code that simulates agents
//! by other means must call [`Agent::reset`] itself.
//!
//! # Parallelization
//!
//! Agents are split into one chunk per available core and simulated on
//! scoped threads. Each agent draws from its own `Pcg32` stream selected by
//! `(seed, index)`, so results do not depend on scheduling.
//!
//! # Example
//!
//! ```
//! use evoluvine_agent::{AgentConfig, AgentScheme};
//! use evoluvine_engine::Grid;
//! use evoluvine_network::WeightInit;
//! use evoluvine_training::{
//!     genetic::{Population, PopulationEvolver},
//!     simulation::SimulationParams,
//! };
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let config = AgentConfig::new(Grid::DEFAULT, AgentScheme::RELATIVE);
//! let topology = AgentScheme::RELATIVE.topology(&[10]).unwrap();
//! let mut population =
//!     Population::random(config, &topology, 10, WeightInit::Xavier, &mut rng).unwrap();
//!
//! let params = SimulationParams { max_ticks: 50, ..Default::default() };
//! population.evaluate(&params, 1);
//! let next = PopulationEvolver::default().evolve(&population, &mut rng).unwrap();
//! assert_eq!(next.len(), 10);
//! assert_eq!(next.generation(), 1);
//! ```

use std::{num::NonZero, thread};

use evoluvine_agent::{Agent, AgentConfig, AgentConfigError};
use evoluvine_network::{Network, ShapeMismatchError, Topology, WeightInit};
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    operators::{Mutation, crossover},
    selection::RouletteWheel,
    sharing::shared_fitness,
    simulation::{EpisodeReport, SimulationParams, run_episode},
    stats::FitnessStats,
};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("incompatible genomes: {_0}")]
    Shape(ShapeMismatchError),
    #[display("offspring does not fit the population: {_0}")]
    Config(AgentConfigError),
}

/// Agents sharing one [`AgentConfig`], plus the generation counter.
#[derive(Debug, Clone)]
pub struct Population {
    config: AgentConfig,
    agents: Vec<Agent>,
    generation: usize,
}

impl Population {
    /// Creates `count` agents with fresh random networks.
    pub fn random<R>(
        config: AgentConfig,
        topology: &Topology,
        count: usize,
        init: WeightInit,
        rng: &mut R,
    ) -> Result<Self, AgentConfigError>
    where
        R: Rng + ?Sized,
    {
        let networks = (0..count)
            .map(|_| Network::random(topology.clone(), init, rng))
            .collect::<Vec<_>>();
        Self::from_networks(config, networks, rng)
    }

    /// Creates a population whose first agent carries `network` unchanged
    /// and whose other agents carry mutated copies of it.
    pub fn seeded<R>(
        config: AgentConfig,
        network: &Network,
        count: usize,
        mutation: &Mutation,
        rng: &mut R,
    ) -> Result<Self, AgentConfigError>
    where
        R: Rng + ?Sized,
    {
        let networks = (0..count)
            .map(|i| {
                let mut copy = network.clone();
                if i > 0 {
                    mutation.apply(&mut copy, rng);
                }
                copy
            })
            .collect::<Vec<_>>();
        Self::from_networks(config, networks, rng)
    }

    /// Wraps existing networks into agents.
    ///
    /// Fails if any network does not fit `config.scheme`.
    pub fn from_networks<I, R>(
        config: AgentConfig,
        networks: I,
        rng: &mut R,
    ) -> Result<Self, AgentConfigError>
    where
        I: IntoIterator<Item = Network>,
        R: Rng + ?Sized,
    {
        let agents = networks
            .into_iter()
            .map(|network| Agent::new(network, config, rng))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            config,
            agents,
            generation: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of evolutions this population descends from.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Agent with the highest fitness; the earliest one on ties.
    #[must_use]
    pub fn best_agent(&self) -> Option<&Agent> {
        self.agents.iter().reduce(|best, a| {
            if a.fitness().total_cmp(&best.fitness()).is_gt() {
                a
            } else {
                best
            }
        })
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    #[must_use]
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.agents.iter().map(Agent::fitness))
    }

    /// Resets and simulates every agent, then sorts agents by final fitness,
    /// best first.
    ///
    /// Returns the episode reports in the new agent order.
    pub fn evaluate(&mut self, params: &SimulationParams, seed: u64) -> Vec<EpisodeReport> {
        let workers = thread::available_parallelism().map_or(1, NonZero::get);
        let chunk = self.agents.len().div_ceil(workers).max(1);

        let mut reports = vec![None; self.agents.len()];
        thread::scope(|s| {
            for (c, (agents, slots)) in self
                .agents
                .chunks_mut(chunk)
                .zip(reports.chunks_mut(chunk))
                .enumerate()
            {
                s.spawn(move || {
                    for (i, (agent, slot)) in agents.iter_mut().zip(slots).enumerate() {
                        let index = (c * chunk + i) as u64;
                        let mut rng = Pcg32::new(seed, index);
                        *slot = Some(run_episode(agent, params, &mut rng));
                    }
                });
            }
        });

        let mut ranked = self
            .agents
            .drain(..)
            .zip(reports.into_iter().flatten())
            .collect::<Vec<_>>();
        ranked.sort_by(|(a, _), (b, _)| b.fitness().total_cmp(&a.fitness()));
        let (agents, reports) = ranked.into_iter().unzip();
        self.agents = agents;
        reports
    }
}

/// Evolution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationEvolver {
    /// Fraction of the population carried over unchanged.
    pub elitism_rate: f32,
    /// Weight of the first parent in arithmetic crossover.
    pub crossover_alpha: f32,
    pub mutation: Mutation,
    /// Fitness sharing radius; `None` selects on raw fitness.
    pub niche_radius: Option<f32>,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            elitism_rate: 0.1,
            crossover_alpha: 0.5,
            mutation: Mutation::default(),
            niche_radius: Some(1.0),
        }
    }
}

impl PopulationEvolver {
    /// Number of elites for a population of `size`.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn elite_count(&self, size: usize) -> usize {
        ((size as f32 * self.elitism_rate.clamp(0.0, 1.0)).floor() as usize).min(size)
    }

    /// Builds the next generation, of the same size as `population`.
    ///
    /// Elites are the best agents by raw fitness, whatever order the
    /// population is in. Children are fresh agents in their reset state.
    pub fn evolve<R>(
        &self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Population, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let agents = &population.agents;
        let mut ranked = agents.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

        let mut next = Vec::with_capacity(agents.len());
        next.extend(ranked.into_iter().take(self.elite_count(agents.len())).cloned());

        let raw = agents.iter().map(Agent::fitness).collect::<Vec<_>>();
        let fitness = match self.niche_radius {
            Some(radius) => {
                let networks = agents.iter().map(Agent::network).collect::<Vec<_>>();
                shared_fitness(&networks, &raw, radius)?
            }
            None => raw,
        };
        let wheel = RouletteWheel::new(&fitness);

        while next.len() < agents.len() {
            let Some((i, j)) = wheel.spin_pair(rng) else {
                break;
            };
            let mut child =
                crossover(agents[i].network(), agents[j].network(), self.crossover_alpha)?;
            self.mutation.apply(&mut child, rng);
            next.push(Agent::new(child, population.config, rng)?);
        }

        Ok(Population {
            config: population.config,
            agents: next,
            generation: population.generation + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use evoluvine_agent::AgentScheme;
    use evoluvine_engine::Grid;
    use rand::SeedableRng as _;

    use super::*;

    fn population(count: usize, seed: u64) -> Population {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = AgentConfig::new(Grid::DEFAULT, AgentScheme::RELATIVE);
        let topology = AgentScheme::RELATIVE.topology(&[10]).unwrap();
        Population::random(config, &topology, count, WeightInit::Xavier, &mut rng).unwrap()
    }

    /// Gives agent `i` the final fitness `20 + 100·i` without simulating:
    /// `i` meals plus the length bonus of a one-cell body.
    fn assign_distinct_fitness(population: &mut Population) {
        let mut rng = Pcg32::seed_from_u64(0);
        for (i, agent) in population.agents.iter_mut().enumerate() {
            agent.reset(&mut rng);
            for _ in 0..i {
                agent.grow();
            }
            agent.evaluate_final_fitness();
        }
    }

    fn short_episodes() -> SimulationParams {
        SimulationParams {
            max_ticks: 40,
            hazard_relocate_interval: None,
        }
    }

    mod population {
        use super::*;

        #[test]
        fn test_random_population() {
            let population = population(12, 0);
            assert_eq!(population.len(), 12);
            assert_eq!(population.generation(), 0);
            assert!(
                population
                    .agents()
                    .iter()
                    .all(|a| a.network().topology().widths() == [4, 10, 3])
            );
        }

        #[test]
        fn test_rejects_mismatched_networks() {
            let mut rng = Pcg32::seed_from_u64(0);
            let config = AgentConfig::new(Grid::DEFAULT, AgentScheme::ABSOLUTE);
            let topology = AgentScheme::RELATIVE.topology(&[10]).unwrap();
            assert!(
                Population::random(config, &topology, 3, WeightInit::Xavier, &mut rng).is_err()
            );
        }

        #[test]
        fn test_seeded_population() {
            let mut rng = Pcg32::seed_from_u64(0);
            let source = population(1, 4).agents()[0].network().clone();
            let config = AgentConfig::new(Grid::DEFAULT, AgentScheme::RELATIVE);
            let seeded =
                Population::seeded(config, &source, 5, &Mutation::Replace { rate: 0.5 }, &mut rng)
                    .unwrap();
            assert_eq!(seeded.len(), 5);
            assert_eq!(seeded.agents()[0].network(), &source);
            assert!(seeded.agents()[1..].iter().all(|a| a.network() != &source));
        }

        #[test]
        fn test_evaluate_sorts_and_reports() {
            let mut population = population(16, 1);
            let reports = population.evaluate(&short_episodes(), 7);
            assert_eq!(reports.len(), 16);
            assert!(
                population
                    .agents()
                    .is_sorted_by(|a, b| a.fitness() >= b.fitness())
            );
            for (agent, report) in population.agents().iter().zip(&reports) {
                assert_eq!(agent.fitness(), report.fitness);
                assert!(report.fitness >= 0.0);
            }
            let best = population.best_agent().unwrap();
            assert_eq!(best.fitness(), population.fitness_stats().unwrap().max);
        }

        #[test]
        fn test_evaluate_is_deterministic() {
            let mut a = population(16, 1);
            let mut b = population(16, 1);
            let ra = a.evaluate(&short_episodes(), 7);
            let rb = b.evaluate(&short_episodes(), 7);
            assert_eq!(ra, rb);
        }

        #[test]
        fn test_evaluate_resets_stale_agents() {
            let mut stale = population(8, 2);
            let params = short_episodes();
            stale.evaluate(&params, 3);

            // same networks in the same order, never simulated
            let networks = stale.agents().iter().map(|a| a.network().clone());
            let mut fresh =
                Population::from_networks(*stale.config(), networks, &mut Pcg32::seed_from_u64(99))
                    .unwrap();
            assert_eq!(stale.evaluate(&params, 3), fresh.evaluate(&params, 3));
        }
    }

    mod evolution {
        use super::*;

        #[test]
        fn test_population_size_is_preserved() {
            let mut rng = Pcg32::seed_from_u64(0);
            for size in [1, 2, 7, 20] {
                let mut population = population(size, 3);
                population.evaluate(&short_episodes(), 0);
                let next = PopulationEvolver::default()
                    .evolve(&population, &mut rng)
                    .unwrap();
                assert_eq!(next.len(), size);
                assert_eq!(next.generation(), 1);
            }
        }

        #[test]
        fn test_distinct_fitness_helper() {
            let mut population = population(4, 5);
            assign_distinct_fitness(&mut population);
            let fitness = population
                .agents()
                .iter()
                .map(Agent::fitness)
                .collect::<Vec<_>>();
            assert_eq!(fitness, vec![20.0, 120.0, 220.0, 320.0]);
        }

        #[test]
        fn test_single_elite_of_ten() {
            let mut rng = Pcg32::seed_from_u64(0);
            let mut population = population(10, 5);
            assign_distinct_fitness(&mut population);
            let evolver = PopulationEvolver {
                elitism_rate: 0.1,
                mutation: Mutation::Replace { rate: 0.3 },
                ..PopulationEvolver::default()
            };
            assert_eq!(evolver.elite_count(10), 1);

            let next = evolver.evolve(&population, &mut rng).unwrap();
            let best = &population.agents()[9];
            assert_eq!(population.best_agent().unwrap().fitness(), 920.0);
            assert_eq!(next.agents()[0].network(), best.network());
            assert_eq!(next.agents()[0].fitness(), 920.0);
            let carried = next
                .agents()
                .iter()
                .filter(|a| population.agents().iter().any(|p| p.network() == a.network()))
                .count();
            assert_eq!(carried, 1);
            assert!(next.agents()[1..].iter().all(|a| a.fitness() == 0.0));
        }

        #[test]
        fn test_elites_ranked_by_raw_fitness_regardless_of_order() {
            let mut population = population(10, 6);
            assign_distinct_fitness(&mut population);
            let top_two = [
                population.agents()[9].network().clone(),
                population.agents()[8].network().clone(),
            ];
            let evolver = PopulationEvolver {
                elitism_rate: 0.2,
                ..PopulationEvolver::default()
            };

            // worst first, then best first, then shuffled
            let mut orders = vec![population.agents.clone()];
            population.agents.reverse();
            orders.push(population.agents.clone());
            population.agents.swap(0, 5);
            population.agents.swap(1, 7);
            orders.push(population.agents.clone());

            for agents in orders {
                population.agents = agents;
                let next = evolver
                    .evolve(&population, &mut Pcg32::seed_from_u64(0))
                    .unwrap();
                assert_eq!(next.agents()[0].network(), &top_two[0]);
                assert_eq!(next.agents()[1].network(), &top_two[1]);
                assert_eq!(next.agents()[0].fitness(), 920.0);
                assert_eq!(next.agents()[1].fitness(), 820.0);
            }
        }

        #[test]
        fn test_children_keep_topology() {
            let mut rng = Pcg32::seed_from_u64(0);
            let mut population = population(10, 7);
            population.evaluate(&short_episodes(), 0);
            let evolver = PopulationEvolver {
                niche_radius: None,
                mutation: Mutation::Gaussian {
                    rate: 0.1,
                    strength: 0.2,
                },
                ..PopulationEvolver::default()
            };
            let next = evolver.evolve(&population, &mut rng).unwrap();
            assert!(
                next.agents()
                    .iter()
                    .all(|a| a.network().topology() == population.agents()[0].network().topology())
            );
        }

        #[test]
        fn test_elite_count() {
            let evolver = PopulationEvolver::default();
            assert_eq!(evolver.elite_count(600), 60);
            assert_eq!(evolver.elite_count(9), 0);
            let all = PopulationEvolver {
                elitism_rate: 1.0,
                ..evolver
            };
            assert_eq!(all.elite_count(5), 5);
        }

        #[test]
        fn test_evolver_from_json() {
            let evolver: PopulationEvolver =
                serde_json::from_str(r#"{ "elitism_rate": 0.2, "niche_radius": null }"#).unwrap();
            assert_eq!(evolver.elitism_rate, 0.2);
            assert_eq!(evolver.niche_radius, None);
            assert_eq!(evolver.crossover_alpha, 0.5);
        }
    }
}
