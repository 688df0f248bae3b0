//! Per-ball feature table.
//!
//! A single forward pass over the normalized events carries the running
//! totals and attaches chase context to every delivery. Nothing here looks
//! ahead: the features of ball `i` depend only on balls `0..=i`.

pub mod chase;
pub mod cumulative;

pub use chase::ChaseContext;
pub use cumulative::{cumulative_features, CumulativeFeatures};

use crate::events::normalize as col;
use crate::events::BallEvent;

pub const CUMULATIVE_RUNS: &str = "Cumulative Runs";
pub const CUMULATIVE_WICKETS: &str = "Cumulative Wickets";
pub const BALLS_BOWLED: &str = "Balls Bowled";
pub const OVERS_COMPLETED: &str = "Overs Completed";
pub const CURRENT_RUN_RATE: &str = "Current Run Rate";
pub const IS_CHASING: &str = "Is_Chasing";
pub const REQUIRED_RUN_RATE: &str = "Required Run Rate";
pub const CHASE_DIFFERENTIAL: &str = "Chase Differential";

/// A delivery plus everything derived from it and the deliveries before it.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedBallEvent {
    pub event: BallEvent,
    pub cumulative: CumulativeFeatures,
    pub chase: ChaseContext,
}

/// Build the augmented table for an ordered event sequence.
///
/// `total_balls` is the innings allotment (120 for twenty overs).
pub fn augment(events: Vec<BallEvent>, total_balls: u32) -> Vec<AugmentedBallEvent> {
    let cumulative = cumulative_features(&events);
    events
        .into_iter()
        .zip(cumulative)
        .map(|(event, cumulative)| {
            let chase = ChaseContext::for_ball(&event, &cumulative, total_balls);
            AugmentedBallEvent {
                event,
                cumulative,
                chase,
            }
        })
        .collect()
}

/// A named numeric column of the augmented table, as referenced by the
/// momentum model's feature lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureColumn {
    Innings,
    Over,
    Ball,
    BatterRuns,
    RunsFromBall,
    Wicket,
    TargetScore,
    CumulativeRuns,
    CumulativeWickets,
    BallsBowled,
    OversCompleted,
    CurrentRunRate,
    IsChasing,
    RequiredRunRate,
    ChaseDifferential,
    BatterHistoricalAvg,
    BowlerHistoricalEconomy,
    BatterVsBowlerAvg,
    TeamPowerplayPerformance,
    MatchPhase,
}

impl FeatureColumn {
    pub fn from_name(name: &str) -> Option<Self> {
        let column = match name {
            col::INNINGS => FeatureColumn::Innings,
            col::OVER => FeatureColumn::Over,
            col::BALL => FeatureColumn::Ball,
            col::BATTER_RUNS => FeatureColumn::BatterRuns,
            col::RUNS_FROM_BALL => FeatureColumn::RunsFromBall,
            col::WICKET => FeatureColumn::Wicket,
            col::TARGET_SCORE => FeatureColumn::TargetScore,
            CUMULATIVE_RUNS => FeatureColumn::CumulativeRuns,
            CUMULATIVE_WICKETS => FeatureColumn::CumulativeWickets,
            BALLS_BOWLED => FeatureColumn::BallsBowled,
            OVERS_COMPLETED => FeatureColumn::OversCompleted,
            CURRENT_RUN_RATE => FeatureColumn::CurrentRunRate,
            IS_CHASING => FeatureColumn::IsChasing,
            REQUIRED_RUN_RATE => FeatureColumn::RequiredRunRate,
            CHASE_DIFFERENTIAL => FeatureColumn::ChaseDifferential,
            col::BATTER_HISTORICAL_AVG => FeatureColumn::BatterHistoricalAvg,
            col::BOWLER_HISTORICAL_ECONOMY => FeatureColumn::BowlerHistoricalEconomy,
            col::BATTER_VS_BOWLER_AVG => FeatureColumn::BatterVsBowlerAvg,
            col::TEAM_POWERPLAY_PERFORMANCE => FeatureColumn::TeamPowerplayPerformance,
            col::MATCH_PHASE => FeatureColumn::MatchPhase,
            _ => return None,
        };
        Some(column)
    }

    pub fn value(self, row: &AugmentedBallEvent) -> f64 {
        let ev = &row.event;
        let cum = &row.cumulative;
        match self {
            FeatureColumn::Innings => f64::from(ev.innings.number()),
            FeatureColumn::Over => f64::from(ev.over),
            FeatureColumn::Ball => f64::from(ev.ball),
            FeatureColumn::BatterRuns => f64::from(ev.batter_runs),
            FeatureColumn::RunsFromBall => f64::from(ev.runs_from_ball),
            FeatureColumn::Wicket => f64::from(u8::from(ev.wicket)),
            FeatureColumn::TargetScore => ev.target_score.map(f64::from).unwrap_or(0.0),
            FeatureColumn::CumulativeRuns => f64::from(cum.cumulative_runs),
            FeatureColumn::CumulativeWickets => f64::from(cum.cumulative_wickets),
            FeatureColumn::BallsBowled => f64::from(cum.balls_bowled),
            FeatureColumn::OversCompleted => cum.overs_completed,
            FeatureColumn::CurrentRunRate => cum.current_run_rate,
            FeatureColumn::IsChasing => f64::from(u8::from(row.chase.is_chasing())),
            FeatureColumn::RequiredRunRate => row.chase.required_run_rate(),
            FeatureColumn::ChaseDifferential => row.chase.chase_differential(),
            FeatureColumn::BatterHistoricalAvg => ev.context.batter_historical_avg,
            FeatureColumn::BowlerHistoricalEconomy => ev.context.bowler_historical_economy,
            FeatureColumn::BatterVsBowlerAvg => ev.context.batter_vs_bowler_avg,
            FeatureColumn::TeamPowerplayPerformance => ev.context.powerplay_performance,
            FeatureColumn::MatchPhase => ev.context.match_phase,
        }
    }
}
