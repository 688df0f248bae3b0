use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::round2;
use crate::events::{load_history, BallEvent};

/// Batting aggregate for one player over a window of deliveries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterLine {
    pub name: String,
    /// Runs off the bat
    pub runs: u32,
    pub balls: u32,
    /// Everything scored while on strike, extras included
    pub runs_contributed: u32,
    pub fours: u32,
    pub sixes: u32,
    /// Runs per 100 balls, two decimals
    pub strike_rate: f64,
}

impl BatterLine {
    fn new(name: &str) -> Self {
        BatterLine {
            name: name.to_string(),
            runs: 0,
            balls: 0,
            runs_contributed: 0,
            fours: 0,
            sixes: 0,
            strike_rate: 0.0,
        }
    }

    fn add(&mut self, ev: &BallEvent) {
        self.runs += ev.batter_runs;
        self.balls += 1;
        self.runs_contributed += ev.runs_from_ball;
        match ev.batter_runs {
            4 => self.fours += 1,
            6 => self.sixes += 1,
            _ => {}
        }
    }

    fn finish(&mut self) {
        self.strike_rate = round2(self.runs as f64 / self.balls as f64 * 100.0);
    }

    pub fn boundaries(&self) -> u32 {
        self.fours + self.sixes
    }
}

/// Bowling aggregate for one player over a window of deliveries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlerLine {
    pub name: String,
    pub runs_conceded: u32,
    pub balls: u32,
    pub wickets: u32,
    /// Runs per over, two decimals
    pub economy: f64,
}

impl BowlerLine {
    fn new(name: &str) -> Self {
        BowlerLine {
            name: name.to_string(),
            runs_conceded: 0,
            balls: 0,
            wickets: 0,
            economy: 0.0,
        }
    }

    fn add(&mut self, ev: &BallEvent) {
        self.runs_conceded += ev.runs_from_ball;
        self.balls += 1;
        self.wickets += u32::from(ev.wicket);
    }

    fn finish(&mut self) {
        self.economy = round2(self.runs_conceded as f64 / self.overs());
    }

    pub fn overs(&self) -> f64 {
        self.balls as f64 / 6.0
    }
}

/// Group rows by player name, keeping first-appearance order.
fn tally<'a, T>(
    events: impl IntoIterator<Item = &'a BallEvent>,
    name_of: impl Fn(&BallEvent) -> &str,
    new: impl Fn(&str) -> T,
    add: impl Fn(&mut T, &BallEvent),
) -> Vec<T> {
    let mut lines: Vec<T> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for ev in events {
        let name = name_of(ev);
        let slot = match index.get(name) {
            Some(&i) => i,
            None => {
                index.insert(name.to_string(), lines.len());
                lines.push(new(name));
                lines.len() - 1
            }
        };
        add(&mut lines[slot], ev);
    }
    lines
}

/// Per-batter lines in order of first appearance.
pub fn batter_lines<'a>(events: impl IntoIterator<Item = &'a BallEvent>) -> Vec<BatterLine> {
    let mut lines = tally(events, |ev| ev.batter.as_str(), BatterLine::new, BatterLine::add);
    lines.iter_mut().for_each(BatterLine::finish);
    lines
}

/// Per-bowler lines in order of first appearance.
pub fn bowler_lines<'a>(events: impl IntoIterator<Item = &'a BallEvent>) -> Vec<BowlerLine> {
    let mut lines = tally(events, |ev| ev.bowler.as_str(), BowlerLine::new, BowlerLine::add);
    lines.iter_mut().for_each(BowlerLine::finish);
    lines
}

/// Career aggregates computed once from a historical ball-by-ball log.
///
/// Read-only after construction; shared by every request.
#[derive(Debug, Clone, Default)]
pub struct HistoricalStats {
    batters: HashMap<String, BatterLine>,
    bowlers: HashMap<String, BowlerLine>,
}

impl HistoricalStats {
    pub fn from_events(events: &[BallEvent]) -> Self {
        HistoricalStats {
            batters: batter_lines(events)
                .into_iter()
                .map(|line| (line.name.clone(), line))
                .collect(),
            bowlers: bowler_lines(events)
                .into_iter()
                .map(|line| (line.name.clone(), line))
                .collect(),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let events = load_history(path)?;
        let stats = Self::from_events(&events);
        info!(
            "Historical stats loaded from {}: {} deliveries, {} batters, {} bowlers",
            path.display(),
            events.len(),
            stats.batters.len(),
            stats.bowlers.len()
        );
        Ok(stats)
    }

    pub fn batter(&self, name: &str) -> Option<&BatterLine> {
        self.batters.get(name)
    }

    pub fn bowler(&self, name: &str) -> Option<&BowlerLine> {
        self.bowlers.get(name)
    }
}
