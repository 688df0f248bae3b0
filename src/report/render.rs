use std::fmt::{self, Display, Formatter};

use super::{BattingInsight, BowlingInsight, MatchReport, MatchSummary};
use crate::features::ChaseContext;

impl Display for BattingInsight {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BattingInsight::Underperforming => "Underperforming relative to historical average.",
            BattingInsight::AtOrAboveNorms => "Performing at or above historical norms.",
        })
    }
}

impl Display for BowlingInsight {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BowlingInsight::AboveHistoricalEconomy => {
                "Bowling economy is higher than historical average."
            }
            BowlingInsight::WithinNorms => "Bowling is within historical norms.",
        })
    }
}

fn write_chase(f: &mut Formatter<'_>, summary: &MatchSummary) -> fmt::Result {
    let ChaseContext::Chasing {
        target,
        balls_remaining,
        required_run_rate,
        ..
    } = summary.chase
    else {
        return Ok(());
    };
    let needed = i64::from(target) - i64::from(summary.total_runs);
    if needed <= 0 {
        writeln!(f, "Chase: target of {} reached", target)
    } else if balls_remaining <= 0 {
        writeln!(f, "Chase: {} short of {} with no balls remaining", needed, target)
    } else {
        writeln!(
            f,
            "Chase: {} needed off {} balls to reach {} (Required Run Rate: {:.2})",
            needed, balls_remaining, target, required_run_rate
        )
    }
}

impl Display for MatchReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "=== Live Match Summary ===")?;
        writeln!(f, "Total Runs: {}", s.total_runs)?;
        writeln!(f, "Total Wickets: {}", s.total_wickets)?;
        writeln!(f, "Total Balls: {}", s.total_balls)?;
        writeln!(f, "Overs: {:.2}", s.overs)?;
        writeln!(f, "Current Run Rate: {:.2}", s.run_rate)?;
        write_chase(f, s)?;
        writeln!(f)?;

        writeln!(f, "=== Live Batter Analysis ===")?;
        for b in &self.batters {
            let live = &b.live;
            writeln!(f, "Batter: {}", live.name)?;
            writeln!(
                f,
                "  Live - Runs: {}, Balls: {}, Strike Rate: {:.2}, Boundaries: {} ({} fours, {} sixes)",
                live.runs,
                live.balls,
                live.strike_rate,
                live.boundaries(),
                live.fours,
                live.sixes
            )?;
            match (&b.historical, b.insight) {
                (Some(hist), Some(insight)) => {
                    writeln!(
                        f,
                        "  Historical - Runs: {}, Strike Rate: {:.2}",
                        hist.runs, hist.strike_rate
                    )?;
                    writeln!(f, "  Insight: {}", insight)?;
                }
                _ => writeln!(f, "  Historical data not available.")?,
            }
            writeln!(f)?;
        }

        writeln!(f, "=== Live Bowler Analysis ===")?;
        for b in &self.bowlers {
            let live = &b.live;
            writeln!(f, "Bowler: {}", live.name)?;
            writeln!(
                f,
                "  Live - Runs: {}, Overs: {:.1}, Economy: {:.2}, Wickets: {}",
                live.runs_conceded,
                live.overs(),
                live.economy,
                live.wickets
            )?;
            match (&b.historical, b.insight) {
                (Some(hist), Some(insight)) => {
                    writeln!(
                        f,
                        "  Historical - Economy: {:.2}, Wickets: {}",
                        hist.economy, hist.wickets
                    )?;
                    writeln!(f, "  Insight: {}", insight)?;
                }
                _ => writeln!(f, "  Historical data not available.")?,
            }
            writeln!(f)?;
        }

        writeln!(f, "=== Partnership Analysis ===")?;
        if self.partnerships.is_empty() {
            writeln!(f, "No partnerships recorded.")?;
        }
        for p in &self.partnerships {
            let names: Vec<&str> = p.batters.iter().map(String::as_str).collect();
            writeln!(
                f,
                "Partnership between {}: {} runs off {} balls (Avg: {:.2})",
                names.join(", "),
                p.runs,
                p.balls,
                p.average()
            )?;
        }
        writeln!(f)?;

        writeln!(f, "=== Fall of Wickets ===")?;
        if self.fall_of_wickets.is_empty() {
            writeln!(f, "No wickets have fallen.")?;
        } else {
            let entries: Vec<String> = self
                .fall_of_wickets
                .iter()
                .map(|w| format!("{}-{} ({}, {}.{})", w.runs, w.wickets, w.batter, w.over, w.ball))
                .collect();
            writeln!(f, "{}", entries.join(" · "))?;
        }
        writeln!(f)?;

        let p = &self.probabilities;
        writeln!(f, "=== Event Probability Calculations ===")?;
        writeln!(f, "Probability of Boundary: {:.2}", p.boundary)?;
        writeln!(f, "Probability of Wicket: {:.2}", p.wicket)?;
        writeln!(f, "Probability of Dot Ball: {:.2}", p.dot_ball)?;
        writeln!(f)?;

        writeln!(f, "=== Model-Based Momentum Prediction ===")?;
        writeln!(f, "Predicted Momentum: {:.2} / 100", self.momentum)?;
        writeln!(f)?;

        writeln!(f, "=== Recommendations and Insights ===")?;
        for (i, line) in self.recommendations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "• {}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::analysis::HistoricalStats;
    use crate::events::fixtures::ball;
    use crate::events::Innings;
    use crate::features::augment;
    use crate::report::MatchReport;

    #[test]
    fn renders_sections_in_fixed_order() {
        let events = vec![
            ball(0, 1, "Rohit", 4, false),
            ball(0, 2, "Rohit", 0, true),
            ball(0, 3, "Kohli", 6, false),
        ];
        let hist = HistoricalStats::from_events(&[ball(0, 1, "Rohit", 1, false)]);
        let text = MatchReport::assemble(&augment(events, 120), &hist, 61.237).to_string();

        let headings = [
            "=== Live Match Summary ===",
            "=== Live Batter Analysis ===",
            "=== Live Bowler Analysis ===",
            "=== Partnership Analysis ===",
            "=== Fall of Wickets ===",
            "=== Event Probability Calculations ===",
            "=== Model-Based Momentum Prediction ===",
            "=== Recommendations and Insights ===",
        ];
        let positions: Vec<usize> = headings.iter().map(|h| text.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(text.contains("Total Runs: 10\n"));
        assert!(text.contains("Partnership between Rohit: 4 runs off 2 balls (Avg: 2.00)"));
        assert!(text.contains("Partnership between Kohli: 6 runs off 1 balls (Avg: 6.00)"));
        assert!(text.contains("4-1 (Rohit, 0.2)"));
        assert!(text.contains("Predicted Momentum: 61.24 / 100"));
        assert!(text.contains("Insight: Performing at or above historical norms."));
        // Kohli has no history
        assert!(text.contains("Batter: Kohli\n  Live - Runs: 6, Balls: 1, Strike Rate: 600.00, Boundaries: 1 (0 fours, 1 sixes)\n  Historical data not available."));
        assert!(!text.contains("Chase:"));
    }

    #[test]
    fn chase_line_appears_when_chasing() {
        let events: Vec<_> = (1..=6)
            .map(|b| {
                let mut ev = ball(0, b, "Gill", 1, false);
                ev.innings = Innings::Second;
                ev.target_score = Some(160);
                ev
            })
            .collect();
        let text = MatchReport::assemble(
            &augment(events, 120),
            &HistoricalStats::default(),
            50.0,
        )
        .to_string();
        // 154 needed off 114 balls = 8.11 per over
        assert!(text.contains("Chase: 154 needed off 114 balls to reach 160 (Required Run Rate: 8.11)"));
    }

    #[test]
    fn empty_sections_say_so() {
        let text = MatchReport::assemble(&[], &HistoricalStats::default(), 0.0).to_string();
        assert!(text.contains("No partnerships recorded."));
        assert!(text.contains("No wickets have fallen."));
        assert!(text.contains("Probability of Dot Ball: 0.00"));
    }
}
