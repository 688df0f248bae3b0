use serde::Serialize;

use super::round2;
use crate::features::AugmentedBallEvent;

/// Empirical per-ball event frequencies, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EventProbabilities {
    pub boundary: f64,
    pub wicket: f64,
    pub dot_ball: f64,
}

/// Frequencies over the whole processed window. An empty window is all zero.
pub fn estimate_probabilities(table: &[AugmentedBallEvent]) -> EventProbabilities {
    if table.is_empty() {
        return EventProbabilities::default();
    }
    let n = table.len() as f64;
    let share = |pred: fn(&AugmentedBallEvent) -> bool| {
        round2(table.iter().filter(|row| pred(row)).count() as f64 / n)
    };
    EventProbabilities {
        boundary: share(|row| row.event.is_boundary()),
        wicket: share(|row| row.event.wicket),
        dot_ball: share(|row| row.event.is_dot()),
    }
}
