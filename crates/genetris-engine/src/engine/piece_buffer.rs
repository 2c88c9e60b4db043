use std::collections::VecDeque;

use rand::{SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg64Mcg;

use crate::PieceKind;

/// Supplies pieces using the 7-bag system.
///
/// The bag holds one occurrence of every piece kind. It is refilled and
/// reshuffled only once it is empty, so no kind repeats between two
/// consecutive refills.
///
/// Each buffer owns its random stream; two buffers created from the same
/// seed produce the same sequence.
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg64Mcg,
    bag: VecDeque<PieceKind>,
}

impl PieceBuffer {
    /// Creates a buffer drawing from the given random stream.
    ///
    /// The bag starts empty and is filled on the first draw.
    #[must_use]
    pub fn new(rng: Pcg64Mcg) -> Self {
        Self {
            rng,
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    /// Creates a buffer whose random stream is seeded with `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(Pcg64Mcg::seed_from_u64(seed))
    }

    fn fill_bag(&mut self) {
        let mut new_bag = PieceKind::ALL;
        new_bag.shuffle(&mut self.rng);
        self.bag.extend(new_bag);
    }

    /// Pops the next piece, refilling the bag first if it is empty.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty after refilling (should never happen).
    pub fn pop_next(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.fill_bag();
        }
        self.bag
            .pop_front()
            .expect("Piece bag should never be empty after refill")
    }

    /// Returns the pieces remaining in the current bag.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_each_bag_contains_every_kind_once() {
        let mut buffer = PieceBuffer::from_seed(42);
        for _ in 0..20 {
            let drawn: HashSet<_> = (0..PieceKind::LEN).map(|_| buffer.pop_next()).collect();
            assert_eq!(drawn.len(), PieceKind::LEN);
            assert_eq!(buffer.next_pieces().count(), 0);
        }
    }

    #[test]
    fn test_bag_is_refilled_only_when_empty() {
        let mut buffer = PieceBuffer::from_seed(7);
        let first = buffer.pop_next();
        let remaining: Vec<_> = buffer.next_pieces().collect();
        assert_eq!(remaining.len(), PieceKind::LEN - 1);
        assert!(!remaining.contains(&first));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBuffer::from_seed(1234);
        let mut b = PieceBuffer::from_seed(1234);
        let seq_a: Vec<_> = (0..50).map(|_| a.pop_next()).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.pop_next()).collect();
        assert_eq!(seq_a, seq_b);
    }
}
