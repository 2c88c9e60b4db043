use serde::Serialize;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared by a single lock:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 200 points
/// - 3 lines: 400 points
/// - 4 lines: 800 points
///
/// Any other count scores nothing.
const SCORE_TABLE: [u64; 5] = [0, 100, 200, 400, 800];

/// Weight of a single tick of survival in the fitness value.
const LIFETIME_FITNESS_WEIGHT: f64 = 0.1;

/// Game statistics tracking score, cleared lines, and survival time.
///
/// # Scoring
///
/// Scoring has no combo, back-to-back, or T-spin bonuses; each lock event is
/// scored on its own: 100, 200, 400 and 800 points for one to four lines.
///
/// # Example
///
/// ```
/// use genetris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
/// stats.tick();
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// assert!((stats.fitness() - 800.1).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    completed_pieces: u64,
    total_cleared_lines: u64,
    lifetime: u64,
    line_cleared_counter: [u64; 5],
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            lifetime: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score (sum of all line clear points).
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    /// Returns the total number of lines cleared across all locks.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> u64 {
        self.total_cleared_lines
    }

    /// Returns the number of gravity ticks survived.
    #[must_use]
    pub const fn lifetime(&self) -> u64 {
        self.lifetime
    }

    /// Returns a histogram of lock events by number of cleared lines (0-4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u64; 5] {
        &self.line_cleared_counter
    }

    /// Fitness of the game so far: `score + 0.1 * lifetime`.
    ///
    /// Strictly increasing in both score and lifetime.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn fitness(&self) -> f64 {
        self.score as f64 + LIFETIME_FITNESS_WEIGHT * self.lifetime as f64
    }

    /// Updates statistics after a piece is locked.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines as u64;
        if let Some(counter) = self.line_cleared_counter.get_mut(cleared_lines) {
            *counter += 1;
        }
        self.score += SCORE_TABLE.get(cleared_lines).copied().unwrap_or(0);
    }

    /// Records one gravity tick of survival.
    pub fn tick(&mut self) {
        self.lifetime += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        for (lines, expected) in [(0, 0), (1, 100), (2, 200), (3, 400), (4, 800), (5, 0)] {
            let mut stats = GameStats::new();
            stats.complete_piece_drop(lines);
            assert_eq!(stats.score(), expected, "{lines} lines");
            assert_eq!(stats.total_cleared_lines(), lines as u64);
            assert_eq!(stats.completed_pieces(), 1);
        }
    }

    #[test]
    fn test_scores_do_not_stack_across_locks() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(1);
        assert_eq!(stats.score(), 200);
        assert_eq!(stats.line_cleared_counter(), &[0, 2, 0, 0, 0]);
    }

    #[test]
    fn test_fitness_is_monotonic() {
        let mut base = GameStats::new();
        base.complete_piece_drop(1);
        for _ in 0..10 {
            base.tick();
        }

        let mut longer = base.clone();
        longer.tick();
        assert!(longer.fitness() > base.fitness());

        let mut higher = base.clone();
        higher.complete_piece_drop(1);
        assert!(higher.fitness() > base.fitness());
    }

    #[test]
    fn test_serialize() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);
        stats.tick();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["score"], 200);
        assert_eq!(json["lifetime"], 1);
        assert_eq!(json["line_cleared_counter"][2], 1);
    }
}
