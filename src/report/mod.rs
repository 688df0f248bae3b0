//! Match-state report: every computed section in fixed order.

pub mod engine;
mod render;

pub use engine::ReportEngine;

use serde::Serialize;

use crate::analysis::{
    batter_lines, bowler_lines, estimate_probabilities, fall_of_wickets, round2,
    segment_partnerships, BatterLine, BowlerLine, EventProbabilities, FallOfWicket,
    HistoricalStats, Partnership,
};
use crate::features::{AugmentedBallEvent, ChaseContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattingInsight {
    Underperforming,
    AtOrAboveNorms,
}

impl BattingInsight {
    /// Strictly below the historical strike rate is underperforming.
    pub fn compare(live: &BatterLine, historical: &BatterLine) -> Self {
        if live.strike_rate < historical.strike_rate {
            BattingInsight::Underperforming
        } else {
            BattingInsight::AtOrAboveNorms
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BowlingInsight {
    AboveHistoricalEconomy,
    WithinNorms,
}

impl BowlingInsight {
    /// Strictly above the historical economy is flagged.
    pub fn compare(live: &BowlerLine, historical: &BowlerLine) -> Self {
        if live.economy > historical.economy {
            BowlingInsight::AboveHistoricalEconomy
        } else {
            BowlingInsight::WithinNorms
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterReport {
    pub live: BatterLine,
    /// `None` when the player has no historical record
    pub historical: Option<BatterLine>,
    pub insight: Option<BattingInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerReport {
    pub live: BowlerLine,
    pub historical: Option<BowlerLine>,
    pub insight: Option<BowlingInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total_runs: u32,
    pub total_wickets: u32,
    pub total_balls: usize,
    /// Balls / 6, two decimals
    pub overs: f64,
    pub run_rate: f64,
    /// Chase state as of the latest delivery
    pub chase: ChaseContext,
}

impl MatchSummary {
    fn from_table(table: &[AugmentedBallEvent]) -> Self {
        let Some(last) = table.last() else {
            return MatchSummary {
                total_runs: 0,
                total_wickets: 0,
                total_balls: 0,
                overs: 0.0,
                run_rate: 0.0,
                chase: ChaseContext::NotChasing,
            };
        };
        MatchSummary {
            total_runs: last.cumulative.cumulative_runs,
            total_wickets: last.cumulative.cumulative_wickets,
            total_balls: table.len(),
            overs: round2(last.cumulative.overs_completed),
            run_rate: round2(last.cumulative.current_run_rate),
            chase: last.chase,
        }
    }
}

/// Qualitative advice, each line tied to the signal that triggers it.
pub const ADVICE_BATTERS: &str =
    "Batters underperforming relative to historical averages may need to adjust shot selection.";
pub const ADVICE_BOWLERS: &str =
    "Bowlers with higher live economy than historical figures should consider altering their length/line.";
pub const ADVICE_PARTNERSHIPS: &str =
    "Partnership breakdowns may suggest reordering the batting lineup.";
pub const ADVICE_PRESSURE: &str =
    "Probabilistic trends indicate pressure points, and tactical adjustments are recommended accordingly.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub summary: MatchSummary,
    pub batters: Vec<BatterReport>,
    pub bowlers: Vec<BowlerReport>,
    pub partnerships: Vec<Partnership>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub probabilities: EventProbabilities,
    /// 0-100
    pub momentum: f64,
    pub recommendations: Vec<&'static str>,
}

impl MatchReport {
    /// Compose the report from the augmented table, historical tables and
    /// an already-obtained momentum score.
    pub fn assemble(
        table: &[AugmentedBallEvent],
        historical: &HistoricalStats,
        momentum: f64,
    ) -> Self {
        let events = table.iter().map(|row| &row.event);

        let batters: Vec<BatterReport> = batter_lines(events.clone())
            .into_iter()
            .map(|live| {
                let historical = historical.batter(&live.name).cloned();
                let insight = historical
                    .as_ref()
                    .map(|hist| BattingInsight::compare(&live, hist));
                BatterReport {
                    live,
                    historical,
                    insight,
                }
            })
            .collect();

        let bowlers: Vec<BowlerReport> = bowler_lines(events)
            .into_iter()
            .map(|live| {
                let historical = historical.bowler(&live.name).cloned();
                let insight = historical
                    .as_ref()
                    .map(|hist| BowlingInsight::compare(&live, hist));
                BowlerReport {
                    live,
                    historical,
                    insight,
                }
            })
            .collect();

        let partnerships = segment_partnerships(table);

        let mut recommendations = Vec::new();
        if batters
            .iter()
            .any(|b| b.insight == Some(BattingInsight::Underperforming))
        {
            recommendations.push(ADVICE_BATTERS);
        }
        if bowlers
            .iter()
            .any(|b| b.insight == Some(BowlingInsight::AboveHistoricalEconomy))
        {
            recommendations.push(ADVICE_BOWLERS);
        }
        if partnerships.len() > 1 {
            recommendations.push(ADVICE_PARTNERSHIPS);
        }
        recommendations.push(ADVICE_PRESSURE);

        MatchReport {
            summary: MatchSummary::from_table(table),
            batters,
            bowlers,
            partnerships,
            fall_of_wickets: fall_of_wickets(table),
            probabilities: estimate_probabilities(table),
            momentum,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::fixtures::ball;
    use crate::events::BallEvent;
    use crate::features::augment;

    fn by(mut ev: BallEvent, bowler: &str) -> BallEvent {
        ev.bowler = bowler.to_string();
        ev
    }

    fn history() -> HistoricalStats {
        // Rohit: 150 SR; Kohli: 75 SR; Bumrah: economy 6.0
        HistoricalStats::from_events(&[
            ball(0, 1, "Rohit", 2, false),
            ball(0, 2, "Rohit", 1, false),
            ball(0, 3, "Kohli", 1, false),
            ball(0, 4, "Kohli", 1, false),
            ball(0, 5, "Kohli", 1, false),
            ball(0, 6, "Kohli", 0, false),
        ])
    }

    fn live() -> Vec<AugmentedBallEvent> {
        augment(
            vec![
                by(ball(0, 1, "Rohit", 1, false), "Bumrah"),
                by(ball(0, 2, "Rohit", 0, true), "Bumrah"),
                by(ball(0, 3, "Kohli", 4, false), "Bumrah"),
                by(ball(0, 4, "Kohli", 0, false), "Bumrah"),
                by(ball(0, 5, "Kohli", 6, false), "Siraj"),
                by(ball(0, 6, "Gill", 1, false), "Siraj"),
            ],
            120,
        )
    }

    #[test]
    fn players_keep_first_appearance_order_and_join_history() {
        let report = MatchReport::assemble(&live(), &history(), 55.0);
        let names: Vec<_> = report.batters.iter().map(|b| b.live.name.as_str()).collect();
        assert_eq!(names, vec!["Rohit", "Kohli", "Gill"]);

        // Rohit 50 SR vs 150 historical
        assert_eq!(report.batters[0].insight, Some(BattingInsight::Underperforming));
        // Kohli 333.33 vs 75
        assert_eq!(report.batters[1].insight, Some(BattingInsight::AtOrAboveNorms));
        // Gill has no history: comparison omitted for him only
        assert!(report.batters[2].historical.is_none());
        assert!(report.batters[2].insight.is_none());

        let bowlers: Vec<_> = report.bowlers.iter().map(|b| b.live.name.as_str()).collect();
        assert_eq!(bowlers, vec!["Bumrah", "Siraj"]);
        // Bumrah 5 off 4 = 7.5 vs 6.0
        assert_eq!(
            report.bowlers[0].insight,
            Some(BowlingInsight::AboveHistoricalEconomy)
        );
        assert!(report.bowlers[1].insight.is_none());
    }

    #[test]
    fn equal_strike_rate_is_not_underperforming() {
        let report = MatchReport::assemble(
            &augment(vec![ball(0, 1, "Rohit", 2, false), ball(0, 2, "Rohit", 1, false)], 120),
            &history(),
            50.0,
        );
        assert_eq!(report.batters[0].insight, Some(BattingInsight::AtOrAboveNorms));
    }

    #[test]
    fn summary_and_sections() {
        let report = MatchReport::assemble(&live(), &history(), 55.0);
        assert_eq!(report.summary.total_runs, 12);
        assert_eq!(report.summary.total_wickets, 1);
        assert_eq!(report.summary.total_balls, 6);
        assert_eq!(report.summary.overs, 1.0);
        assert_eq!(report.summary.run_rate, 12.0);
        assert_eq!(report.partnerships.len(), 2);
        assert_eq!(report.fall_of_wickets.len(), 1);
        assert_eq!(report.probabilities.boundary, 0.33);
        assert_eq!(report.momentum, 55.0);
    }

    #[test]
    fn recommendations_follow_signals() {
        let report = MatchReport::assemble(&live(), &history(), 55.0);
        assert_eq!(
            report.recommendations,
            vec![ADVICE_BATTERS, ADVICE_BOWLERS, ADVICE_PARTNERSHIPS, ADVICE_PRESSURE]
        );

        let quiet = MatchReport::assemble(
            &augment(vec![ball(0, 1, "Kohli", 4, false)], 120),
            &HistoricalStats::default(),
            40.0,
        );
        assert_eq!(quiet.recommendations, vec![ADVICE_PRESSURE]);
    }

    #[test]
    fn empty_table_gives_a_zero_summary() {
        let report = MatchReport::assemble(&[], &HistoricalStats::default(), 0.0);
        assert_eq!(report.summary.total_balls, 0);
        assert_eq!(report.summary.run_rate, 0.0);
        assert!(report.batters.is_empty());
        assert!(report.partnerships.is_empty());
        assert_eq!(report.probabilities, EventProbabilities::default());
    }
}
