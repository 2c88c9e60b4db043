//! Genetic algorithm evolving the placement networks.
//!
//! The genetic algorithm follows this cycle:
//!
//! 1. **Play** - Every individual plays one game with its own network and bag
//! 2. **Evaluate Fitness** - `score + 0.1 * lifetime` of that game
//! 3. **Elitism** - The best individual moves unchanged into slot 0
//! 4. **Roulette Selection** - Parents are drawn proportionally to fitness
//! 5. **Crossover** - Layer-wise one-point crossover of both parents' networks
//! 6. **Mutation** - Gaussian noise on a fraction of the child's weights
//!
//! # Identity
//!
//! In the first generation an individual's id is its slot index. A child
//! placed in slot `i` gets the id of the previous occupant of slot `i` plus
//! the population size; the elite keeps its id.
//!
//! # Random Streams
//!
//! Selection, crossover and mutation consume the population stream passed to
//! [`Population::evolve`]. Each individual additionally gets a bag seed drawn
//! from that stream when it is created or carried over, so the games
//! themselves never touch a shared generator. Sequential and parallel play
//! produce identical results.
//!
//! # Parallelization
//!
//! With `parallel` set, each individual of a generation plays on its own
//! scoped thread.

use std::{panic, thread};

use genetris_engine::GameStats;
use genetris_evaluator::neural_network::{NetworkTopology, NeuralNetwork, TopologyError};
use rand::Rng;
use serde::Serialize;

use crate::{
    individual::Individual,
    observer::{ObserverError, TickObserver},
};

/// Summary of one played generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_id: u64,
    pub best_fitness: f64,
    /// Game statistics of the best individual's playthrough.
    pub best_stats: GameStats,
    pub average_fitness: f64,
    pub min_fitness: f64,
    pub natural_deaths: usize,
    pub timed_deaths: usize,
}

/// The individuals of the current generation.
#[derive(Debug)]
pub struct Population {
    generation: usize,
    individuals: Vec<Individual>,
    best_index: usize,
}

impl Population {
    /// Creates generation 1 with random networks.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn random<R>(
        size: usize,
        topology: NetworkTopology,
        rng: &mut R,
    ) -> Result<Self, TopologyError>
    where
        R: Rng + ?Sized,
    {
        assert!(size > 0, "population must not be empty");
        let individuals = (0..size as u64)
            .map(|id| {
                let network = NeuralNetwork::random(topology, rng)?;
                Ok(Individual::new(id, 1, network, rng.random()))
            })
            .collect::<Result<_, TopologyError>>()?;
        Ok(Self {
            generation: 1,
            individuals,
            best_index: 0,
        })
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Returns the best individual of the last played generation.
    #[must_use]
    pub fn best(&self) -> &Individual {
        &self.individuals[self.best_index]
    }

    /// Plays every individual's game and summarizes the generation.
    ///
    /// Returns the first observer error if any playthrough was aborted.
    pub fn play_all(
        &mut self,
        max_lifetime: u64,
        parallel: bool,
        observer: &dyn TickObserver,
    ) -> Result<GenerationReport, ObserverError> {
        if parallel {
            thread::scope(|s| {
                let handles: Vec<_> = self
                    .individuals
                    .iter_mut()
                    .map(|ind| s.spawn(move || ind.play(max_lifetime, observer)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                    .collect::<Result<Vec<_>, _>>()
            })?;
        } else {
            for ind in &mut self.individuals {
                ind.play(max_lifetime, observer)?;
            }
        }
        Ok(self.summarize())
    }

    fn summarize(&mut self) -> GenerationReport {
        let fitness: Vec<f64> = self.individuals.iter().map(Individual::fitness).collect();

        // First individual to reach a fitness value keeps priority on ties
        let mut best_index = 0;
        for (i, &f) in fitness.iter().enumerate() {
            if f > fitness[best_index] {
                best_index = i;
            }
        }
        self.best_index = best_index;

        let total: f64 = fitness.iter().sum();
        let min_fitness = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let natural_deaths = self
            .individuals
            .iter()
            .filter(|ind| ind.death().is_some_and(|d| d.is_natural()))
            .count();
        let timed_deaths = self
            .individuals
            .iter()
            .filter(|ind| ind.death().is_some_and(|d| d.is_timed()))
            .count();

        #[expect(clippy::cast_precision_loss)]
        let average_fitness = total / fitness.len() as f64;
        GenerationReport {
            generation: self.generation,
            best_id: self.individuals[best_index].id(),
            best_fitness: fitness[best_index],
            best_stats: self.individuals[best_index].well().stats().clone(),
            average_fitness,
            min_fitness,
            natural_deaths,
            timed_deaths,
        }
    }

    /// Replaces the population with the next generation.
    ///
    /// Slot 0 receives the best individual, moved rather than copied. Every
    /// other slot receives a mutated child of two roulette-selected parents.
    pub fn evolve<R>(&mut self, mutation_rate: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let size = self.individuals.len();
        let next_generation = self.generation + 1;
        let fitness: Vec<f64> = self.individuals.iter().map(Individual::fitness).collect();

        let mut next = Vec::with_capacity(size);
        next.extend((1..size).map(|slot| {
            let p1 = &self.individuals[roulette_select(&fitness, rng)];
            let p2 = &self.individuals[roulette_select(&fitness, rng)];
            let mut network = p1.network().crossover(p2.network(), rng);
            network.mutate(mutation_rate, rng);
            let id = self.individuals[slot].id() + size as u64;
            Individual::new(id, next_generation, network, rng.random())
        }));

        let mut elite = self.individuals.swap_remove(self.best_index);
        elite.carry_over(next_generation, rng.random());
        next.insert(0, elite);

        self.individuals = next;
        self.generation = next_generation;
        self.best_index = 0;
    }
}

/// Fitness-proportional selection.
///
/// Draws a value in `[0, total)` and returns the first index whose cumulative
/// fitness reaches it. Falls back to a uniform draw when the total is not
/// positive.
fn roulette_select<R>(fitness: &[f64], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let total: f64 = fitness.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return rng.random_range(0..fitness.len());
    }
    select_by_draw(fitness, rng.random_range(0.0..total))
}

/// Returns the first index whose cumulative fitness reaches `draw`.
fn select_by_draw(fitness: &[f64], draw: f64) -> usize {
    let mut cumulative = 0.0;
    fitness
        .iter()
        .position(|&f| {
            cumulative += f;
            cumulative >= draw
        })
        .unwrap_or(fitness.len() - 1)
}
