use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use evoluvine_agent::AgentScheme;
use evoluvine_training::genetic::Population;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    config::TrainingConfig,
    model::{ai_model::AiModel, summary::TrainingSummary},
    util::{self, Output},
};

const BEST_MODEL_FILE: &str = "best_model.json";
const SUMMARY_FILE: &str = "summary.json";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum SchemeKind {
    /// Danger and food-angle inputs, forward/left/right outputs
    #[default]
    Relative,
    /// Displacement inputs, up/down/left/right outputs
    Absolute,
}

impl SchemeKind {
    fn scheme(self) -> AgentScheme {
        match self {
            Self::Relative => AgentScheme::RELATIVE,
            Self::Absolute => AgentScheme::ABSOLUTE,
        }
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of agents per generation
    #[arg(long)]
    pub(crate) population: Option<usize>,
    /// Number of generations to run
    #[arg(long)]
    generations: Option<usize>,
    /// Tick limit of each episode
    #[arg(long)]
    ticks: Option<usize>,
    /// Seed of the run; random if omitted
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Sensing and action scheme
    #[arg(long)]
    scheme: Option<SchemeKind>,
    /// Model to seed the population from
    #[arg(long)]
    init_model: Option<PathBuf>,
    /// Directory receiving the best model and the summary
    #[arg(long, default_value = "models")]
    output_dir: PathBuf,
}

impl TrainArg {
    fn load_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("training config", path)?,
            None => TrainingConfig::default(),
        };
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(ticks) = self.ticks {
            config.simulation.max_ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(scheme) = self.scheme {
            config.scheme = scheme.scheme();
        }
        Ok(config)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut config = arg.load_config()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);

    let mut population = initial_population(arg, &mut config, &mut rng)?;
    let best_model_path = arg.output_dir.join(BEST_MODEL_FILE);
    let summary_path = arg.output_dir.join(SUMMARY_FILE);

    eprintln!(
        "Training {} agents for {} generations (seed {seed})",
        population.len(),
        config.generations
    );

    for generation in 0..config.generations {
        let reports = population.evaluate(&config.simulation, rng.random());
        let (Some(best), Some(stats)) = (population.best_agent(), population.fitness_stats())
        else {
            anyhow::bail!("population is empty");
        };
        let best_report = reports[0];
        let best_food = reports.iter().map(|r| r.food_eaten).max().unwrap_or(0);

        eprintln!("Generation #{generation}:");
        eprintln!("  Fitness Stats:");
        eprintln!("    Best:   {:.3}", stats.max);
        eprintln!("    Mean:   {:.3}", stats.mean);
        eprintln!("    Median: {:.3}", stats.median);
        eprintln!("    Worst:  {:.3}", stats.min);
        eprintln!("    Std:    {:.3}", stats.std_dev);
        eprintln!("  Alive: {}/{}", population.alive_count(), population.len());
        eprintln!("  Best food eaten: {best_food}");

        let trained_at = Utc::now();
        let model = AiModel {
            name: Some(format!("generation-{generation}")),
            trained_at: Some(trained_at),
            final_fitness: Some(best.fitness()),
            generation: Some(generation),
            ..AiModel::new(best.network(), config.scheme)
        };
        Output::save_json(&model, Some(best_model_path.clone()))?;

        let summary = TrainingSummary {
            best_fitness: best.fitness(),
            generation,
            population_size: population.len(),
            food_eaten: best.food_eaten(),
            steps: best.steps(),
            death: best_report.death,
            scheme: config.scheme,
            seed,
            trained_at,
        };
        Output::save_json(&summary, Some(summary_path.clone()))?;

        if generation + 1 < config.generations {
            population = config
                .evolver
                .evolve(&population, &mut rng)
                .with_context(|| format!("Failed to evolve generation #{generation}"))?;
        }
    }

    eprintln!();
    eprintln!("Training completed");
    eprintln!("  Best model: {}", best_model_path.display());
    eprintln!("  Summary: {}", summary_path.display());

    Ok(())
}

/// Seeds the population from `--init-model` when it exists.
///
/// A missing model file falls back to random networks. A model with a
/// different scheme overrides the configured one.
fn initial_population(
    arg: &TrainArg,
    config: &mut TrainingConfig,
    rng: &mut Pcg32,
) -> anyhow::Result<Population> {
    if let Some(path) = &arg.init_model {
        match AiModel::open(path) {
            Ok(loaded) => {
                if loaded.scheme != config.scheme {
                    eprintln!(
                        "Using the scheme of {} ({:?}) instead of the configured one",
                        path.display(),
                        loaded.scheme
                    );
                    config.scheme = loaded.scheme;
                }
                eprintln!("Seeding the population from {}", path.display());
                let population = Population::seeded(
                    config.agent_config(),
                    &loaded.network,
                    config.population_size,
                    &config.evolver.mutation,
                    rng,
                )?;
                return Ok(population);
            }
            Err(e) if e.is_not_found() => {
                eprintln!("{e}; starting from random networks");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let topology = config
        .topology()
        .context("Invalid hidden layer configuration")?;
    let population = Population::random(
        config.agent_config(),
        &topology,
        config.population_size,
        config.weight_init,
        rng,
    )?;
    Ok(population)
}
