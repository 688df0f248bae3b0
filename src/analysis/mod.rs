pub mod partnership;
pub mod players;
pub mod probability;

pub use partnership::{fall_of_wickets, segment_partnerships, FallOfWicket, Partnership};
pub use players::{batter_lines, bowler_lines, BatterLine, BowlerLine, HistoricalStats};
pub use probability::{estimate_probabilities, EventProbabilities};

/// Round half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
