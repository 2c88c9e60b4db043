use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use serde::Serialize;

/// Number of entries kept by a default [`Leaderboard`].
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// A single leaderboard record.
///
/// Entries are ordered by fitness and then by individual id, so two
/// individuals with the same fitness are still distinct entries.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LeaderboardEntry {
    pub fitness: f64,
    pub individual_id: u64,
    pub generation: usize,
}

impl LeaderboardEntry {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.fitness
            .total_cmp(&other.fitness)
            .then(self.individual_id.cmp(&other.individual_id))
    }
}

impl PartialEq for LeaderboardEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other).is_eq()
    }
}

impl Eq for LeaderboardEntry {}

impl PartialOrd for LeaderboardEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LeaderboardEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

/// Bounded collection of the best entries seen during a run.
///
/// Backed by a min-heap: once full, a new entry replaces the current minimum
/// only if it ranks higher.
///
/// # Example
///
/// ```
/// use genetris_training::leaderboard::{Leaderboard, LeaderboardEntry};
///
/// let mut board = Leaderboard::new(2);
/// for (id, fitness) in [(0, 10.0), (1, 30.0), (2, 20.0)] {
///     board.submit(LeaderboardEntry { fitness, individual_id: id, generation: 1 });
/// }
/// let ids: Vec<_> = board.ranked().iter().map(|e| e.individual_id).collect();
/// assert_eq!(ids, [1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Leaderboard {
    capacity: usize,
    entries: BinaryHeap<Reverse<LeaderboardEntry>>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_LEADERBOARD_SIZE)
    }
}

impl Leaderboard {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offers an entry; returns whether it was admitted.
    pub fn submit(&mut self, entry: LeaderboardEntry) -> bool {
        if self.capacity == 0 || self.entries.iter().any(|Reverse(e)| *e == entry) {
            return false;
        }
        if self.entries.len() < self.capacity {
            self.entries.push(Reverse(entry));
            return true;
        }
        match self.entries.peek() {
            Some(Reverse(min)) if entry > *min => {
                self.entries.pop();
                self.entries.push(Reverse(entry));
                true
            }
            _ => false,
        }
    }

    /// Returns the entries from best to worst.
    #[must_use]
    pub fn ranked(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<_> = self.entries.iter().map(|Reverse(e)| *e).collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(individual_id: u64, fitness: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            fitness,
            individual_id,
            generation: 1,
        }
    }

    #[test]
    fn test_keeps_top_entries() {
        let mut board = Leaderboard::default();
        for (id, fitness) in [(0, 5.0), (1, 1.0), (2, 9.0), (3, 3.0), (4, 7.0), (5, 2.0), (6, 8.0)] {
            board.submit(entry(id, fitness));
        }
        let fitness: Vec<_> = board.ranked().iter().map(|e| e.fitness).collect();
        assert_eq!(fitness, [9.0, 8.0, 7.0, 5.0, 3.0]);
    }

    #[test]
    fn test_ties_do_not_collide() {
        let mut board = Leaderboard::new(3);
        assert!(board.submit(entry(0, 4.0)));
        assert!(board.submit(entry(1, 4.0)));
        assert!(board.submit(entry(2, 4.0)));
        assert_eq!(board.len(), 3);
        // Same key as an existing entry
        assert!(!board.submit(entry(1, 4.0)));
        // Ties with the minimum but ranks higher by id
        assert!(board.submit(entry(3, 4.0)));
        let ids: Vec<_> = board.ranked().iter().map(|e| e.individual_id).collect();
        assert_eq!(ids, [3, 2, 1]);
    }

    #[test]
    fn test_rejects_entries_below_minimum() {
        let mut board = Leaderboard::new(2);
        board.submit(entry(0, 10.0));
        board.submit(entry(1, 20.0));
        assert!(!board.submit(entry(2, 5.0)));
        assert_eq!(board.ranked().last().map(|e| e.individual_id), Some(0));
    }

    #[test]
    fn test_zero_capacity() {
        let mut board = Leaderboard::new(0);
        assert!(!board.submit(entry(0, 1.0)));
        assert!(board.is_empty());
    }
}
