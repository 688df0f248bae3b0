pub mod normalize;

pub use normalize::{load_history, parse_events};

/// Which batting period a delivery belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Innings {
    /// Setting a total. Also the value used when the data carries no innings column.
    #[default]
    First,
    /// Chasing the target set in the first innings.
    Second,
}

impl Innings {
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Innings::First),
            2 => Some(Innings::Second),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Innings::First => 1,
            Innings::Second => 2,
        }
    }
}

/// Optional per-ball numeric context. Absent columns read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContextFeatures {
    pub batter_historical_avg: f64,
    pub bowler_historical_economy: f64,
    pub batter_vs_bowler_avg: f64,
    pub powerplay_performance: f64,
    pub match_phase: f64,
}

/// One delivery as read from the ball-by-ball log
#[derive(Debug, Clone, PartialEq)]
pub struct BallEvent {
    pub innings: Innings,
    pub over: u32,
    /// Ball number within the over
    pub ball: u32,
    /// Batter on strike
    pub batter: String,
    pub bowler: String,
    /// Runs off the bat only
    pub batter_runs: u32,
    /// Everything scored off the delivery, extras included
    pub runs_from_ball: u32,
    pub wicket: bool,
    pub venue: String,
    /// Only meaningful in the second innings
    pub target_score: Option<u32>,
    pub context: ContextFeatures,
}

impl BallEvent {
    /// Canonical ordering key: (innings, over, ball).
    pub fn key(&self) -> (Innings, u32, u32) {
        (self.innings, self.over, self.ball)
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self.batter_runs, 4 | 6)
    }

    pub fn is_dot(&self) -> bool {
        self.runs_from_ball == 0
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A first-innings delivery with the given position and outcome.
    pub fn ball(over: u32, ball: u32, batter: &str, runs: u32, wicket: bool) -> BallEvent {
        BallEvent {
            innings: Innings::First,
            over,
            ball,
            batter: batter.to_string(),
            bowler: "Bumrah".to_string(),
            batter_runs: runs,
            runs_from_ball: runs,
            wicket,
            venue: "Wankhede Stadium".to_string(),
            target_score: None,
            context: ContextFeatures::default(),
        }
    }

    /// `n` consecutive first-innings singles starting at over 0, ball 1.
    pub fn singles(n: usize) -> Vec<BallEvent> {
        (0..n)
            .map(|i| ball((i / 6) as u32, (i % 6) as u32 + 1, "Rohit", 1, false))
            .collect()
    }
}
