use std::path::PathBuf;

use anyhow::Context as _;
use genetris_training::{
    config::TrainingConfig,
    genetic::GenerationReport,
    leaderboard::LeaderboardEntry,
    trainer::Trainer,
};
use serde::Serialize;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration JSON file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    population_size: Option<usize>,
    #[arg(long)]
    generations: Option<usize>,
    /// Per-weight mutation probability in `[0, 1]`
    #[arg(long)]
    mutation_rate: Option<f64>,
    /// Ticks after which a game is stopped
    #[arg(long)]
    max_lifetime: Option<u64>,
    /// Seed of the population random stream
    #[arg(long)]
    seed: Option<u64>,
    /// Play the individuals of a generation on separate threads
    #[arg(long)]
    parallel: bool,
    /// Pace every tick for a human viewer
    #[arg(long)]
    reasonable_speed: bool,
    /// Pace ticks once a game has survived long enough to be interesting
    #[arg(long)]
    spectator_mode: bool,
    /// Playback delay per paced tick, in milliseconds
    #[arg(long)]
    tick_delay_ms: Option<u64>,
    /// Write the generation reports and leaderboard as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

impl TrainArg {
    fn load_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("training config", path)?,
            None => TrainingConfig::default(),
        };
        if let Some(n) = self.population_size {
            config.population_size = n;
        }
        if let Some(n) = self.generations {
            config.generations = n;
        }
        if let Some(rate) = self.mutation_rate {
            config.mutation_rate = rate;
        }
        if let Some(n) = self.max_lifetime {
            config.max_lifetime = n;
        }
        if let Some(ms) = self.tick_delay_ms {
            config.tick_delay_ms = ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.parallel |= self.parallel;
        config.reasonable_speed |= self.reasonable_speed;
        config.spectator_mode |= self.spectator_mode;
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct TrainingReport<'a> {
    config: &'a TrainingConfig,
    generations: &'a [GenerationReport],
    leaderboard: Vec<LeaderboardEntry>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.load_config()?;
    log::info!(
        "training {} individuals for {} generations (mutation rate {}, max lifetime {})",
        config.population_size,
        config.generations,
        config.mutation_rate,
        config.max_lifetime,
    );

    let mut trainer = Trainer::new(config).context("Failed to start training")?;
    let generations = trainer.run().context("Training stopped")?;
    log::info!("training completed");

    if let Some(path) = &arg.report {
        let report = TrainingReport {
            config: trainer.config(),
            generations: &generations,
            leaderboard: trainer.leaderboard().ranked(),
        };
        util::save_json(&report, Some(path.as_path()))?;
        log::info!("report saved to {}", path.display());
    }
    Ok(())
}
