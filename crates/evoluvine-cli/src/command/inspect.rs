use std::path::PathBuf;

use chrono::{DateTime, Utc};
use evoluvine_agent::AgentScheme;
use evoluvine_network::{LayerActivations, NetworkSummary};
use serde::Serialize;

use crate::{model::ai_model::AiModel, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Model file to inspect
    #[arg(long)]
    model: PathBuf,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct ModelReport {
    name: Option<String>,
    trained_at: Option<DateTime<Utc>>,
    final_fitness: Option<f32>,
    generation: Option<usize>,
    scheme: AgentScheme,
    activations: LayerActivations,
    network: NetworkSummary,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { model, output } = arg;
    let loaded = AiModel::open(model)?;

    let report = ModelReport {
        name: loaded.model.name,
        trained_at: loaded.model.trained_at,
        final_fitness: loaded.model.final_fitness,
        generation: loaded.model.generation,
        scheme: loaded.scheme,
        activations: loaded.network.topology().activations(),
        network: loaded.network.summary(),
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}
