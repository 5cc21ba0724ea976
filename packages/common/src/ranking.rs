//! Leaderboard ordering with shared ranks.

use std::cmp::Ordering;

/// An entry that can be placed on a leaderboard.
pub trait Ranked {
    fn total_score(&self) -> i64;
    /// Lexicographic tie-breaker; smaller sorts first.
    fn tie_break_name(&self) -> &str;
    fn set_rank(&mut self, rank: u32);
}

fn leaderboard_order<T: Ranked>(a: &T, b: &T) -> Ordering {
    b.total_score()
        .cmp(&a.total_score())
        .then_with(|| a.tie_break_name().cmp(b.tie_break_name()))
}

/// Sort by total score descending then name ascending, and assign 1-based
/// ranks shared across ties: rank = 1 + number of entries with a strictly
/// greater total.
pub fn assign_ranks<T: Ranked>(entries: &mut [T]) {
    entries.sort_by(leaderboard_order);

    let mut rank = 1u32;
    let mut previous: Option<i64> = None;
    for (index, entry) in entries.iter_mut().enumerate() {
        let score = entry.total_score();
        if previous != Some(score) {
            rank = index as u32 + 1;
            previous = Some(score);
        }
        entry.set_rank(rank);
    }
}
