use std::time::Duration;

/// Score values for line clears.
///
/// Index corresponds to number of rows cleared by one lock:
/// - 0 rows: 0 points
/// - 1 row: 100 points
/// - 2 rows: 300 points
/// - 3 rows: 500 points
/// - 4 rows: 800 points
pub const SCORE_TABLE: [u32; 5] = [0, 100, 300, 500, 800];

/// Highest reachable level.
pub const MAX_LEVEL: u8 = 10;

/// Points needed per level.
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Gravity interval in milliseconds for levels 1 through [`MAX_LEVEL`].
const GRAVITY_MILLIS: [u64; MAX_LEVEL as usize] = [600, 450, 350, 300, 250, 200, 170, 140, 120, 100];

/// Returns the points awarded for clearing `rows` rows with a single lock.
///
/// More than four rows cannot be cleared by one tetromino and score nothing.
#[must_use]
pub fn score_for_rows(rows: usize) -> u32 {
    SCORE_TABLE.get(rows).copied().unwrap_or(0)
}

/// Returns the level reached at `score`: one level per 1000 points, starting
/// at 1 and capped at [`MAX_LEVEL`].
///
/// # Example
///
/// ```
/// use blockfall_engine::level_for_score;
///
/// assert_eq!(level_for_score(0), 1);
/// assert_eq!(level_for_score(999), 1);
/// assert_eq!(level_for_score(1000), 2);
/// assert_eq!(level_for_score(1_000_000), 10);
/// ```
#[must_use]
pub fn level_for_score(score: u32) -> u8 {
    let level = score / POINTS_PER_LEVEL + 1;
    u8::try_from(level).map_or(MAX_LEVEL, |level| level.min(MAX_LEVEL))
}

/// Returns how many garbage rows a versus lock sends for `rows` cleared rows.
///
/// - 4 or more rows: 4
/// - 3 rows: 2
/// - 2 rows: 1
/// - 0 or 1 row: nothing
#[must_use]
pub fn garbage_for_rows(rows: usize) -> u8 {
    match rows {
        0 | 1 => 0,
        2 => 1,
        3 => 2,
        _ => 4,
    }
}

/// Returns the gravity interval at `level`.
///
/// Levels outside `1..=MAX_LEVEL` are clamped into range.
#[must_use]
pub fn gravity_interval(level: u8) -> Duration {
    let index = usize::from(level.clamp(1, MAX_LEVEL) - 1);
    Duration::from_millis(GRAVITY_MILLIS[index])
}

/// Score, level and line-clear statistics of one board.
///
/// Tracks various metrics during a game:
///
/// - **Score**: points earned from line clears, never decreasing
/// - **Level**: derived from the score, see [`level_for_score`]
/// - **Pieces**: total number of locked pieces
/// - **Line clear distribution**: count of locks by number of rows cleared
/// - **Garbage**: rows sent to and received from the opponent in a match
///
/// # Example
///
/// ```
/// use blockfall_engine::ScoreState;
///
/// let mut stats = ScoreState::new();
/// let delta = stats.record_lock(4);
///
/// assert_eq!(delta, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.line_clear_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreState {
    score: u32,
    level: u8,
    pieces: usize,
    lines: usize,
    line_clear_counter: [usize; 5],
    garbage_sent: usize,
    garbage_received: usize,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreState {
    /// Creates a tracker at level 1 with every counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            pieces: 0,
            lines: 0,
            line_clear_counter: [0; 5],
            garbage_sent: 0,
            garbage_received: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Returns the number of locked pieces.
    #[must_use]
    pub const fn pieces(&self) -> usize {
        self.pieces
    }

    /// Returns the total number of cleared rows.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Returns how many locks cleared 0, 1, 2, 3 and 4 rows.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[usize; 5] {
        &self.line_clear_counter
    }

    #[must_use]
    pub const fn garbage_sent(&self) -> usize {
        self.garbage_sent
    }

    #[must_use]
    pub const fn garbage_received(&self) -> usize {
        self.garbage_received
    }

    /// Records a lock that cleared `rows` rows and returns the score delta.
    ///
    /// The level is recomputed from the new score.
    pub fn record_lock(&mut self, rows: usize) -> u32 {
        let delta = score_for_rows(rows);
        self.pieces += 1;
        self.lines += rows;
        self.line_clear_counter[rows.min(4)] += 1;
        self.score = self.score.saturating_add(delta);
        self.level = level_for_score(self.score);
        delta
    }

    pub(crate) fn record_garbage_sent(&mut self, rows: u8) {
        self.garbage_sent += usize::from(rows);
    }

    pub(crate) fn record_garbage_received(&mut self, rows: u8) {
        self.garbage_received += usize::from(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(score_for_rows(0), 0);
        assert_eq!(score_for_rows(1), 100);
        assert_eq!(score_for_rows(2), 300);
        assert_eq!(score_for_rows(3), 500);
        assert_eq!(score_for_rows(4), 800);
        assert_eq!(score_for_rows(5), 0);
    }

    #[test]
    fn test_garbage_table() {
        assert_eq!(garbage_for_rows(0), 0);
        assert_eq!(garbage_for_rows(1), 0);
        assert_eq!(garbage_for_rows(2), 1);
        assert_eq!(garbage_for_rows(3), 2);
        assert_eq!(garbage_for_rows(4), 4);
        assert_eq!(garbage_for_rows(7), 4);
    }

    #[test]
    fn test_level_boundaries() {
        for level in 1..=MAX_LEVEL {
            let start = (u32::from(level) - 1) * POINTS_PER_LEVEL;
            assert_eq!(level_for_score(start), level);
            if level < MAX_LEVEL {
                assert_eq!(level_for_score(start + POINTS_PER_LEVEL - 1), level);
            }
        }
        assert_eq!(level_for_score(u32::MAX), MAX_LEVEL);
    }

    #[test]
    fn test_gravity_interval_decreases_with_level() {
        assert_eq!(gravity_interval(1), Duration::from_millis(600));
        assert_eq!(gravity_interval(MAX_LEVEL), Duration::from_millis(100));
        for level in 1..MAX_LEVEL {
            assert!(gravity_interval(level + 1) < gravity_interval(level));
        }
        assert_eq!(gravity_interval(0), gravity_interval(1));
        assert_eq!(gravity_interval(200), gravity_interval(MAX_LEVEL));
    }

    #[test]
    fn test_record_lock_accumulates() {
        let mut stats = ScoreState::new();
        assert_eq!(stats.record_lock(0), 0);
        assert_eq!(stats.record_lock(2), 300);
        assert_eq!(stats.record_lock(3), 500);
        assert_eq!(stats.record_lock(4), 800);
        assert_eq!(stats.score(), 1600);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.pieces(), 4);
        assert_eq!(stats.lines(), 9);
        assert_eq!(stats.line_clear_counter(), &[1, 0, 1, 1, 1]);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut stats = ScoreState::new();
        let mut previous = 0;
        for rows in [1, 0, 4, 0, 0, 2, 3, 0] {
            stats.record_lock(rows);
            assert!(stats.score() >= previous);
            previous = stats.score();
        }
    }
}
