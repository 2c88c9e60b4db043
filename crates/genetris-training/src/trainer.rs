//! The training loop.

use std::sync::{Arc, atomic::AtomicBool};

use genetris_evaluator::neural_network::TopologyError;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use crate::{
    config::{ConfigError, TrainingConfig},
    genetic::{GenerationReport, Population},
    leaderboard::{Leaderboard, LeaderboardEntry},
    observer::{ObserverError, PlaybackPacer, TickObserver},
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("training aborted: {_0}")]
    Observer(ObserverError),
}

impl From<TopologyError> for TrainingError {
    fn from(err: TopologyError) -> Self {
        Self::Config(ConfigError::Topology(err))
    }
}

/// Runs the genetic algorithm for the configured number of generations.
///
/// # Example
///
/// ```
/// use genetris_training::{config::TrainingConfig, trainer::Trainer};
///
/// let config = TrainingConfig {
///     population_size: 4,
///     generations: 2,
///     max_lifetime: 200,
///     seed: Some(1),
///     ..TrainingConfig::default()
/// };
/// let mut trainer = Trainer::new(config)?;
/// let reports = trainer.run()?;
///
/// assert_eq!(reports.len(), 2);
/// assert_eq!(trainer.population().generation(), 2);
/// # Ok::<(), genetris_training::trainer::TrainingError>(())
/// ```
pub struct Trainer {
    config: TrainingConfig,
    rng: Pcg64Mcg,
    population: Population,
    leaderboard: Leaderboard,
    observer: Box<dyn TickObserver>,
    interrupt_flag: Option<Arc<AtomicBool>>,
}

impl Trainer {
    /// Validates `config` and creates generation 1.
    ///
    /// Playback is paced by a [`PlaybackPacer`] built from the configuration;
    /// its interrupt flag is available through [`Trainer::interrupt_flag`].
    pub fn new(config: TrainingConfig) -> Result<Self, TrainingError> {
        let pacer = PlaybackPacer::from_config(&config);
        let interrupt_flag = pacer.interrupt_flag();
        let mut trainer = Self::with_observer(config, Box::new(pacer))?;
        trainer.interrupt_flag = Some(interrupt_flag);
        Ok(trainer)
    }

    /// Validates `config` and creates generation 1 with a custom tick observer.
    pub fn with_observer(
        config: TrainingConfig,
        observer: Box<dyn TickObserver>,
    ) -> Result<Self, TrainingError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_os_rng(),
        };
        let population = Population::random(config.population_size, config.topology, &mut rng)?;
        Ok(Self {
            config,
            rng,
            population,
            leaderboard: Leaderboard::default(),
            observer,
            interrupt_flag: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Returns the flag that stops the run at the next tick when set.
    ///
    /// `None` when the trainer was built with a custom observer.
    #[must_use]
    pub fn interrupt_flag(&self) -> Option<Arc<AtomicBool>> {
        self.interrupt_flag.clone()
    }

    /// Returns the best individuals seen during the whole run.
    #[must_use]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Plays every generation and returns one report per generation.
    ///
    /// The population is not evolved after the last generation, so
    /// [`Trainer::population`] still holds the individuals that were played.
    pub fn run(&mut self) -> Result<Vec<GenerationReport>, TrainingError> {
        let mut reports = Vec::with_capacity(self.config.generations);
        for i in 0..self.config.generations {
            if i > 0 {
                self.population.evolve(self.config.mutation_rate, &mut self.rng);
            }
            let report = self.run_generation()?;
            reports.push(report);
        }

        for (rank, entry) in self.leaderboard.ranked().iter().enumerate() {
            log::info!(
                "leaderboard #{}: individual {} (generation {}) fitness {:.1}",
                rank + 1,
                entry.individual_id,
                entry.generation,
                entry.fitness,
            );
        }
        Ok(reports)
    }

    fn run_generation(&mut self) -> Result<GenerationReport, TrainingError> {
        let report = self.population.play_all(
            self.config.max_lifetime,
            self.config.parallel,
            self.observer.as_ref(),
        )?;

        for ind in self.population.individuals() {
            self.leaderboard.submit(LeaderboardEntry {
                fitness: ind.fitness(),
                individual_id: ind.id(),
                generation: ind.generation(),
            });
        }

        log::info!(
            "generation {}: best fitness {:.1} (individual {}), average fitness {:.1}, deaths {} natural / {} timed",
            report.generation,
            report.best_fitness,
            report.best_id,
            report.average_fitness,
            report.natural_deaths,
            report.timed_deaths,
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use genetris_evaluator::neural_network::NetworkTopology;

    use super::*;
    use crate::observer::{NoopObserver, TickSnapshot};

    fn small_config(seed: u64) -> TrainingConfig {
        TrainingConfig {
            population_size: 5,
            generations: 3,
            max_lifetime: 300,
            seed: Some(seed),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_fails_before_training() {
        let config = TrainingConfig {
            population_size: 0,
            ..TrainingConfig::default()
        };
        let err = Trainer::new(config).err().unwrap();
        assert!(matches!(err, TrainingError::Config(ConfigError::EmptyPopulation)));

        let config = TrainingConfig {
            topology: NetworkTopology {
                hidden: 0,
                ..NetworkTopology::default()
            },
            ..TrainingConfig::default()
        };
        assert!(matches!(
            Trainer::new(config),
            Err(TrainingError::Config(ConfigError::Topology(_)))
        ));
    }

    #[test_log::test]
    fn test_run_produces_one_report_per_generation() {
        let mut trainer = Trainer::with_observer(small_config(11), Box::new(NoopObserver)).unwrap();
        let reports = trainer.run().unwrap();

        let generations: Vec<_> = reports.iter().map(|r| r.generation).collect();
        assert_eq!(generations, [1, 2, 3]);
        for report in &reports {
            assert_eq!(report.natural_deaths + report.timed_deaths, 5);
        }
        assert_eq!(trainer.population().generation(), 3);
        assert_eq!(trainer.leaderboard().len(), 5);

        let best_seen = reports
            .iter()
            .map(|r| r.best_fitness)
            .fold(0.0, f64::max);
        assert_eq!(trainer.leaderboard().ranked()[0].fitness, best_seen);
    }

    #[test]
    fn test_elite_weights_survive_generations() {
        let mut trainer = Trainer::with_observer(small_config(12), Box::new(NoopObserver)).unwrap();
        trainer.run_generation().unwrap();
        let elite = trainer.population().best().network().clone();
        let elite_id = trainer.population().best().id();

        trainer.population.evolve(trainer.config.mutation_rate, &mut trainer.rng);
        let slot0 = &trainer.population().individuals()[0];
        assert_eq!(slot0.network(), &elite);
        assert_eq!(slot0.id(), elite_id);
    }

    #[test]
    fn test_same_seed_same_reports() {
        let mut a = Trainer::with_observer(small_config(13), Box::new(NoopObserver)).unwrap();
        let mut b = Trainer::with_observer(
            TrainingConfig {
                parallel: true,
                ..small_config(13)
            },
            Box::new(NoopObserver),
        )
        .unwrap();
        assert_eq!(a.run().unwrap(), b.run().unwrap());
    }

    #[test]
    fn test_interrupt_flag_stops_run() {
        let config = TrainingConfig {
            reasonable_speed: false,
            ..small_config(15)
        };
        let mut trainer = Trainer::new(config).unwrap();
        let flag = trainer.interrupt_flag().unwrap();
        flag.store(true, Ordering::Relaxed);

        let err = trainer.run().unwrap_err();
        assert!(matches!(err, TrainingError::Observer(ref e) if e.reason() == "playback interrupted"));
        assert!(trainer.leaderboard().is_empty());

        let custom = Trainer::with_observer(small_config(15), Box::new(NoopObserver)).unwrap();
        assert!(custom.interrupt_flag().is_none());
    }

    #[test]
    fn test_observer_error_aborts_run() {
        struct CloseAfterFirstTick;
        impl TickObserver for CloseAfterFirstTick {
            fn on_tick(&self, snapshot: &TickSnapshot<'_>) -> Result<(), ObserverError> {
                if snapshot.well.lifetime > 1 {
                    return Err(ObserverError::new("window closed"));
                }
                Ok(())
            }
        }

        let mut trainer =
            Trainer::with_observer(small_config(14), Box::new(CloseAfterFirstTick)).unwrap();
        let err = trainer.run().unwrap_err();
        assert!(matches!(err, TrainingError::Observer(_)));
        assert_eq!(err.to_string(), "training aborted: tick observer aborted the run: window closed");
    }
}
