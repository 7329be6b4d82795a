//! Neuroevolution of snake agents with a generational genetic algorithm.
//!
//! Each individual is an [`Agent`](evoluvine_agent::Agent) whose network is
//! its genome. Training repeats one cycle per generation:
//!
//! 1. **Simulation** - every agent plays one headless episode in its own
//!    environment ([`simulation`])
//! 2. **Fitness** - the agent's shaped fitness, finalized at the end of the
//!    episode
//! 3. **Selection** - elites survive; parents for the rest are drawn by
//!    roulette wheel, optionally over shared fitness ([`selection`],
//!    [`sharing`])
//! 4. **Reproduction** - arithmetic crossover and mutation of whole networks
//!    ([`operators`])
//!
//! # Architecture
//!
//! ```text
//! Population (genetic)
//!     ↓ evaluate, in parallel
//! run_episode (simulation) ── Environment (evoluvine-engine)
//!     ↓ final fitness
//! shared_fitness (sharing) → RouletteWheel (selection)
//!     ↓ parent pairs
//! crossover + Mutation (operators)
//!     ↓
//! next Population
//! ```
//!
//! # Determinism
//!
//! No function here touches a global random source. Operators take an
//! explicit `&mut impl Rng`, and evaluation derives one `Pcg32` stream per
//! agent from a caller-supplied seed. A run is reproducible from its seeds.
//!
//! # Modules
//!
//! - [`genetic`] - [`Population`](genetic::Population) and
//!   [`PopulationEvolver`](genetic::PopulationEvolver)
//! - [`operators`] - crossover, mutation and genetic distance
//! - [`selection`] - selection probabilities and the roulette wheel
//! - [`sharing`] - niche-based fitness sharing
//! - [`simulation`] - episode parameters and the per-agent episode loop
//! - [`stats`] - fitness distribution summaries

pub mod genetic;
pub mod operators;
pub mod selection;
pub mod sharing;
pub mod simulation;
pub mod stats;
