use std::collections::VecDeque;

use genetris_engine::Well;
use genetris_evaluator::{
    neural_network::NeuralNetwork,
    placement_search::{Move, PlacementSearch},
};
use serde::Serialize;

use crate::observer::{ObserverError, TickObserver, TickSnapshot};

/// How an individual's game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum DeathCause {
    /// A new piece collided at its spawn point.
    Natural,
    /// The game reached the lifetime limit.
    Timed,
}

/// A network together with the game it plays.
///
/// Every individual owns its well and the well's piece bag, so playthroughs
/// are independent of each other and of the order they run in.
#[derive(Debug)]
pub struct Individual {
    id: u64,
    generation: usize,
    network: NeuralNetwork,
    well: Well,
    pending_moves: VecDeque<Move>,
    death: Option<DeathCause>,
}

impl Individual {
    /// Creates an individual whose bag is seeded with `bag_seed`.
    #[must_use]
    pub fn new(id: u64, generation: usize, network: NeuralNetwork, bag_seed: u64) -> Self {
        Self {
            id,
            generation,
            network,
            well: Well::from_seed(bag_seed),
            pending_moves: VecDeque::new(),
            death: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    #[must_use]
    pub fn well(&self) -> &Well {
        &self.well
    }

    /// Returns how the game ended, or `None` if it has not been played.
    #[must_use]
    pub fn death(&self) -> Option<DeathCause> {
        self.death
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.well.fitness()
    }

    /// Moves this individual into `generation` with a fresh game.
    ///
    /// Id and network are kept unchanged.
    pub fn carry_over(&mut self, generation: usize, bag_seed: u64) {
        self.generation = generation;
        self.well = Well::from_seed(bag_seed);
        self.pending_moves.clear();
        self.death = None;
    }

    /// Plays the game until it is over or `max_lifetime` ticks have passed.
    ///
    /// After every tick the observer receives a snapshot; its error ends the
    /// game immediately and is returned.
    pub fn play(
        &mut self,
        max_lifetime: u64,
        observer: &dyn TickObserver,
    ) -> Result<DeathCause, ObserverError> {
        let search = PlacementSearch::new(&self.network);

        while !self.well.is_game_over() && self.well.stats().lifetime() < max_lifetime {
            if self.well.take_spawned_piece() {
                let kind = self.well.falling_piece().kind();
                self.pending_moves.clear();
                if let Some(plan) = search.select_best_placement(self.well.board(), kind) {
                    self.pending_moves.extend(plan.into_moves());
                }
            }

            if let Some(mv) = self.pending_moves.pop_front() {
                match mv {
                    Move::Rotate => self.well.try_rotate(1),
                    Move::Left => self.well.try_move(-1),
                    Move::Right => self.well.try_move(1),
                };
            }

            self.well.tick();
            observer.on_tick(&TickSnapshot {
                generation: self.generation,
                individual_id: self.id,
                well: self.well.snapshot(),
            })?;
        }

        let death = if self.well.is_game_over() {
            DeathCause::Natural
        } else {
            DeathCause::Timed
        };
        self.death = Some(death);

        let stats = self.well.stats();
        log::debug!(
            "generation {} individual {}: fitness {:.1}, score {}, lines {}, lifetime {}, {:?} death",
            self.generation,
            self.id,
            self.fitness(),
            stats.score(),
            stats.total_cleared_lines(),
            stats.lifetime(),
            death,
        );
        Ok(death)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use genetris_evaluator::neural_network::NetworkTopology;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::observer::NoopObserver;

    fn network(seed: u64) -> NeuralNetwork {
        NeuralNetwork::random(NetworkTopology::default(), &mut Pcg64Mcg::seed_from_u64(seed))
            .unwrap()
    }

    #[derive(Debug, Default)]
    struct CountingObserver {
        ticks: AtomicU64,
        abort_after: Option<u64>,
    }

    impl TickObserver for CountingObserver {
        fn on_tick(&self, snapshot: &TickSnapshot<'_>) -> Result<(), ObserverError> {
            let ticks = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            assert_eq!(snapshot.well.lifetime, ticks);
            match self.abort_after {
                Some(limit) if ticks >= limit => Err(ObserverError::new("stop")),
                _ => Ok(()),
            }
        }
    }

    #[test_log::test]
    fn test_play_until_timeout() {
        let mut individual = Individual::new(0, 1, network(1), 42);
        let observer = CountingObserver::default();
        let death = individual.play(50, &observer).unwrap();

        assert_eq!(death, DeathCause::Timed);
        assert_eq!(individual.death(), Some(DeathCause::Timed));
        assert_eq!(individual.well().stats().lifetime(), 50);
        assert_eq!(observer.ticks.load(Ordering::Relaxed), 50);
        assert!(individual.fitness() > 4.9);
    }

    #[test_log::test]
    fn test_play_until_game_over() {
        // A zero network scores every placement equally, so every piece is
        // dropped at the spawn column and the stack tops out
        let zero = NeuralNetwork::new(NetworkTopology::default()).unwrap();
        let mut individual = Individual::new(3, 1, zero, 7);
        let death = individual.play(100_000, &NoopObserver).unwrap();
        assert!(death.is_natural());
        assert!(individual.well().is_game_over());
        assert!(individual.well().stats().completed_pieces() > 0);
    }

    #[test]
    fn test_observer_error_aborts_play() {
        let mut individual = Individual::new(0, 1, network(3), 1);
        let observer = CountingObserver {
            abort_after: Some(3),
            ..CountingObserver::default()
        };
        let err = individual.play(100, &observer).unwrap_err();
        assert_eq!(err.reason(), "stop");
        assert_eq!(individual.well().stats().lifetime(), 3);
        assert_eq!(individual.death(), None);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = Individual::new(0, 1, network(4), 99);
        let mut b = Individual::new(1, 1, network(4), 99);
        a.play(2_000, &NoopObserver).unwrap();
        b.play(2_000, &NoopObserver).unwrap();
        assert_eq!(a.well().board(), b.well().board());
        assert_eq!(a.well().stats(), b.well().stats());
    }

    #[test]
    fn test_carry_over_keeps_network_and_id() {
        let mut individual = Individual::new(5, 1, network(5), 1);
        individual.play(100, &NoopObserver).unwrap();
        let weights = individual.network().clone();

        individual.carry_over(2, 2);
        assert_eq!(individual.id(), 5);
        assert_eq!(individual.generation(), 2);
        assert_eq!(individual.network(), &weights);
        assert_eq!(individual.death(), None);
        assert_eq!(individual.well().stats().lifetime(), 0);
    }
}
