use std::path::PathBuf;

use anyhow::Context as _;
use evoluvine_agent::Agent;
use evoluvine_training::simulation::{EpisodeReport, run_episode};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    config::TrainingConfig,
    model::ai_model::AiModel,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Model file to replay
    #[arg(long)]
    model: PathBuf,
    /// Number of episodes to play
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    /// Tick limit of each episode; taken from the config if omitted
    #[arg(long)]
    ticks: Option<usize>,
    /// Seed of the first episode; random if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Training configuration providing the grid, shaping and simulation
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path for the episode reports (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct ReplayReport {
    model: PathBuf,
    seed: u64,
    episodes: Vec<EpisodeReport>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        model,
        episodes,
        ticks,
        seed,
        config,
        output,
    } = arg;

    let loaded = AiModel::open(model)?;
    let mut config = match config {
        Some(path) => util::read_json_file::<TrainingConfig, _>("training config", path)?,
        None => TrainingConfig::default(),
    };
    config.scheme = loaded.scheme;
    if let Some(ticks) = ticks {
        config.simulation.max_ticks = *ticks;
    }
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    let mut agent = Agent::new(
        loaded.network,
        config.agent_config(),
        &mut Pcg32::seed_from_u64(seed),
    )
    .with_context(|| format!("Model does not fit its scheme: {}", model.display()))?;

    eprintln!("Replaying {} ({:?})", model.display(), loaded.scheme);
    let reports = (0..*episodes as u64)
        .map(|episode| {
            let mut rng = Pcg32::new(seed, episode);
            let report = run_episode(&mut agent, &config.simulation, &mut rng);
            eprintln!(
                "  Episode #{episode}: food {} / steps {} / fitness {:.3}{}",
                report.food_eaten,
                report.steps,
                report.fitness,
                report
                    .death
                    .map(|cause| format!(" / died: {cause}"))
                    .unwrap_or_default(),
            );
            report
        })
        .collect::<Vec<_>>();

    let report = ReplayReport {
        model: model.clone(),
        seed,
        episodes: reports,
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use evoluvine_agent::AgentScheme;
    use evoluvine_network::{Network, WeightInit};

    use super::*;

    #[test]
    fn test_replay_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.json");
        let network = Network::random(
            AgentScheme::ABSOLUTE.topology(&[8]).unwrap(),
            WeightInit::Xavier,
            &mut Pcg32::seed_from_u64(1),
        );
        Output::save_json(
            &AiModel::new(&network, AgentScheme::ABSOLUTE),
            Some(model_path.clone()),
        )
        .unwrap();

        let output = dir.path().join("replay.json");
        let arg = ReplayArg {
            model: model_path,
            episodes: 3,
            ticks: Some(40),
            seed: Some(2),
            config: None,
            output: Some(output.clone()),
        };
        run(&arg).unwrap();

        let written: serde_json::Value = util::read_json_file("replay", &output).unwrap();
        let episodes = written["episodes"].as_array().unwrap();
        assert_eq!(episodes.len(), 3);
        assert!(episodes.iter().all(|e| e["ticks"].as_u64().unwrap() <= 40));
    }

    #[test]
    fn test_missing_model_reported() {
        let dir = tempfile::tempdir().unwrap();
        let arg = ReplayArg {
            model: dir.path().join("missing.json"),
            episodes: 1,
            ticks: None,
            seed: Some(0),
            config: None,
            output: None,
        };
        let err = run(&arg).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
