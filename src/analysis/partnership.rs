use serde::Serialize;
use std::collections::BTreeSet;

use crate::features::AugmentedBallEvent;

/// Batting span between two dismissals (or a dismissal and either end of
/// the data).
///
/// Only the striker is recorded per ball, so a partner who never faced a
/// delivery in the span does not appear in `batters`. Ball-level data
/// carries no explicit pairing to do better.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Partnership {
    /// Sorted, so rendering is reproducible
    pub batters: BTreeSet<String>,
    pub runs: u32,
    pub balls: u32,
}

impl Partnership {
    /// Runs per ball.
    pub fn average(&self) -> f64 {
        if self.balls == 0 {
            return 0.0;
        }
        self.runs as f64 / self.balls as f64
    }
}

/// Split the augmented table into partnerships, closing one on every wicket.
pub fn segment_partnerships(table: &[AugmentedBallEvent]) -> Vec<Partnership> {
    let mut closed = Vec::new();
    let mut open = Partnership::default();

    for row in table {
        let ev = &row.event;
        open.batters.insert(ev.batter.clone());
        open.runs += ev.runs_from_ball;
        open.balls += 1;
        if ev.wicket {
            closed.push(std::mem::take(&mut open));
        }
    }
    if open.balls > 0 {
        closed.push(open);
    }
    closed
}

/// Score at the moment a wicket fell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallOfWicket {
    pub runs: u32,
    pub wickets: u32,
    pub batter: String,
    pub over: u32,
    pub ball: u32,
}

pub fn fall_of_wickets(table: &[AugmentedBallEvent]) -> Vec<FallOfWicket> {
    table
        .iter()
        .filter(|row| row.event.wicket)
        .map(|row| FallOfWicket {
            runs: row.cumulative.cumulative_runs,
            wickets: row.cumulative.cumulative_wickets,
            batter: row.event.batter.clone(),
            over: row.event.over,
            ball: row.event.ball,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::fixtures::ball;
    use crate::features::augment;

    #[test]
    fn single_wicket_splits_into_two() {
        let events = vec![
            ball(0, 1, "Rohit", 1, false),
            ball(0, 2, "Gill", 4, false),
            ball(0, 3, "Gill", 0, true),
            ball(0, 4, "Kohli", 2, false),
            ball(0, 5, "Rohit", 0, false),
            ball(0, 6, "Kohli", 6, false),
            ball(1, 1, "Kohli", 1, false),
        ];
        let parts = segment_partnerships(&augment(events, 120));
        assert_eq!(parts.len(), 2);

        assert_eq!(parts[0].balls, 3);
        assert_eq!(parts[0].runs, 5);
        let first: Vec<_> = parts[0].batters.iter().cloned().collect();
        assert_eq!(first, vec!["Gill", "Rohit"]);

        assert_eq!(parts[1].balls, 4);
        assert_eq!(parts[1].runs, 9);
        let second: Vec<_> = parts[1].batters.iter().cloned().collect();
        assert_eq!(second, vec!["Kohli", "Rohit"]);
    }

    #[test]
    fn totals_match_the_processed_window() {
        let events: Vec<_> = (0..40u32)
            .map(|i| ball(i / 6, i % 6 + 1, if i % 2 == 0 { "A" } else { "B" }, i % 4, i % 9 == 4))
            .collect();
        let table = augment(events, 120);
        let parts = segment_partnerships(&table);
        let runs: u32 = parts.iter().map(|p| p.runs).sum();
        let balls: u32 = parts.iter().map(|p| p.balls).sum();
        assert_eq!(runs, table.last().unwrap().cumulative.cumulative_runs);
        assert_eq!(balls as usize, table.len());
    }

    #[test]
    fn first_ball_dismissal_is_a_one_ball_partnership() {
        let parts = segment_partnerships(&augment(vec![ball(0, 1, "A", 0, true)], 120));
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].balls, 1);
        assert_eq!(parts[0].runs, 0);
    }

    #[test]
    fn wicket_on_last_ball_leaves_no_empty_partnership() {
        let events = vec![ball(0, 1, "A", 1, false), ball(0, 2, "A", 0, true)];
        let parts = segment_partnerships(&augment(events, 120));
        assert_eq!(parts.len(), 1);
        assert!(segment_partnerships(&[]).is_empty());
    }

    #[test]
    fn average_is_runs_per_ball() {
        let p = Partnership {
            batters: BTreeSet::new(),
            runs: 9,
            balls: 4,
        };
        assert_eq!(p.average(), 2.25);
        assert_eq!(Partnership::default().average(), 0.0);
    }

    #[test]
    fn fall_of_wickets_records_score_at_dismissal() {
        let events = vec![
            ball(0, 1, "A", 4, false),
            ball(0, 2, "A", 0, true),
            ball(0, 3, "B", 6, false),
            ball(0, 4, "B", 1, true),
        ];
        let fow = fall_of_wickets(&augment(events, 120));
        assert_eq!(fow.len(), 2);
        assert_eq!((fow[0].runs, fow[0].wickets, fow[0].ball), (4, 1, 2));
        assert_eq!((fow[1].runs, fow[1].wickets), (11, 2));
        assert_eq!(fow[1].batter, "B");
    }
}
