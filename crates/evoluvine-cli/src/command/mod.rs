use clap::{Parser, Subcommand};

use self::{inspect::InspectArg, replay::ReplayArg, train::TrainArg};

mod inspect;
mod replay;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population of snake agents
    Train(#[clap(flatten)] TrainArg),
    /// Play headless episodes with a saved model
    Replay(#[clap(flatten)] ReplayArg),
    /// Print the metadata and network shape of a saved model
    Inspect(#[clap(flatten)] InspectArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
    }
    Ok(())
}
