use crate::events::BallEvent;

/// Running scoring aggregates as of (and including) one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CumulativeFeatures {
    pub cumulative_runs: u32,
    pub cumulative_wickets: u32,
    pub balls_bowled: u32,
    pub overs_completed: f64,
    pub current_run_rate: f64,
}

/// Fold state carried from one delivery to the next.
#[derive(Debug, Default)]
struct RunningTotals {
    runs: u32,
    wickets: u32,
    balls: u32,
}

impl RunningTotals {
    fn advance(&mut self, event: &BallEvent) -> CumulativeFeatures {
        self.runs += event.runs_from_ball;
        self.wickets += u32::from(event.wicket);
        self.balls += 1;

        // balls >= 1 here, so overs is never zero.
        let overs = self.balls as f64 / 6.0;
        CumulativeFeatures {
            cumulative_runs: self.runs,
            cumulative_wickets: self.wickets,
            balls_bowled: self.balls,
            overs_completed: overs,
            current_run_rate: self.runs as f64 / overs,
        }
    }
}

/// Prefix aggregates for every event of an ordered sequence.
pub fn cumulative_features(events: &[BallEvent]) -> Vec<CumulativeFeatures> {
    events
        .iter()
        .scan(RunningTotals::default(), |totals, event| {
            Some(totals.advance(event))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::fixtures::ball;
    use approx::assert_relative_eq;

    #[test]
    fn prefix_sums_over_the_sequence() {
        let events = vec![
            ball(0, 1, "A", 4, false),
            ball(0, 2, "A", 0, true),
            ball(0, 3, "B", 6, false),
        ];
        let feats = cumulative_features(&events);
        let runs: Vec<u32> = feats.iter().map(|f| f.cumulative_runs).collect();
        let wickets: Vec<u32> = feats.iter().map(|f| f.cumulative_wickets).collect();
        let balls: Vec<u32> = feats.iter().map(|f| f.balls_bowled).collect();
        assert_eq!(runs, vec![4, 4, 10]);
        assert_eq!(wickets, vec![0, 1, 1]);
        assert_eq!(balls, vec![1, 2, 3]);
    }

    #[test]
    fn run_rate_is_runs_over_balls_in_sixths() {
        let events: Vec<_> = (1..=9).map(|b| ball(b / 6, b % 6, "A", b % 3, false)).collect();
        for (i, f) in cumulative_features(&events).iter().enumerate() {
            let overs = (i + 1) as f64 / 6.0;
            assert_relative_eq!(f.overs_completed, overs, epsilon = 1e-12);
            assert_relative_eq!(
                f.current_run_rate,
                f.cumulative_runs as f64 / overs,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn aggregates_never_decrease() {
        let events: Vec<_> = (0..30)
            .map(|i| ball(i / 6, i % 6 + 1, "A", i % 5, i % 7 == 0))
            .collect();
        let feats = cumulative_features(&events);
        for pair in feats.windows(2) {
            assert!(pair[1].cumulative_runs >= pair[0].cumulative_runs);
            assert!(pair[1].cumulative_wickets >= pair[0].cumulative_wickets);
        }
    }

    #[test]
    fn empty_sequence_yields_nothing() {
        assert!(cumulative_features(&[]).is_empty());
    }
}
