use serde::Serialize;

use super::cumulative::CumulativeFeatures;
use crate::events::{BallEvent, Innings};

/// Overs remaining used once the allotted balls are used up, so the
/// required rate stays defined (and large) instead of dividing by zero.
const MIN_OVERS_REMAINING: f64 = 0.1;

/// Run-chase state for one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChaseContext {
    NotChasing,
    Chasing {
        target: u32,
        /// Negative once the innings has run past its allotment
        balls_remaining: i64,
        required_run_rate: f64,
        chase_differential: f64,
    },
}

impl ChaseContext {
    /// Chase metrics for a second-innings delivery with a known target;
    /// every other delivery is `NotChasing`.
    pub fn for_ball(event: &BallEvent, cumulative: &CumulativeFeatures, total_balls: u32) -> Self {
        let target = match (event.innings, event.target_score) {
            (Innings::Second, Some(target)) => target,
            _ => return ChaseContext::NotChasing,
        };

        let balls_remaining = i64::from(total_balls) - i64::from(cumulative.balls_bowled);
        let overs_remaining = if balls_remaining > 0 {
            balls_remaining as f64 / 6.0
        } else {
            MIN_OVERS_REMAINING
        };
        let required_run_rate =
            (f64::from(target) - f64::from(cumulative.cumulative_runs)) / overs_remaining;

        ChaseContext::Chasing {
            target,
            balls_remaining,
            required_run_rate,
            chase_differential: cumulative.current_run_rate - required_run_rate,
        }
    }

    pub fn is_chasing(&self) -> bool {
        matches!(self, ChaseContext::Chasing { .. })
    }

    pub fn required_run_rate(&self) -> f64 {
        match self {
            ChaseContext::Chasing {
                required_run_rate, ..
            } => *required_run_rate,
            ChaseContext::NotChasing => 0.0,
        }
    }

    pub fn chase_differential(&self) -> f64 {
        match self {
            ChaseContext::Chasing {
                chase_differential, ..
            } => *chase_differential,
            ChaseContext::NotChasing => 0.0,
        }
    }
}
