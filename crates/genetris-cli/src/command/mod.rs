use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, train::TrainArg};

mod default_config;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve placement networks with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Print the default training configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Train(TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
