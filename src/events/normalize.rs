use anyhow::Context;
use std::path::Path;
use tracing::debug;

use super::{BallEvent, ContextFeatures, Innings};
use crate::error::ReportError;

pub const INNINGS: &str = "Innings";
pub const OVER: &str = "Over";
pub const BALL: &str = "Ball";
pub const BATTER: &str = "Batter";
pub const BOWLER: &str = "Bowler";
pub const BATTER_RUNS: &str = "Batter Runs";
pub const RUNS_FROM_BALL: &str = "Runs From Ball";
pub const WICKET: &str = "Wicket";
pub const VENUE: &str = "Venue";
pub const TARGET_SCORE: &str = "Target Score";

pub const BATTER_HISTORICAL_AVG: &str = "Batter_Historical_Avg";
pub const BOWLER_HISTORICAL_ECONOMY: &str = "Bowler_Historical_Economy";
pub const BATTER_VS_BOWLER_AVG: &str = "Batter_vs_Bowler_Avg";
pub const TEAM_POWERPLAY_PERFORMANCE: &str = "Team_Powerplay_Performance";
pub const MATCH_PHASE: &str = "Match_Phase";

/// Most runs accepted for a single delivery; anything above is a bad cell.
pub const MAX_RUNS_PER_BALL: u32 = 20;

const REQUIRED_COLUMNS: [&str; 8] = [
    OVER,
    BALL,
    BATTER,
    BOWLER,
    BATTER_RUNS,
    RUNS_FROM_BALL,
    WICKET,
    VENUE,
];

/// How strictly a log is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    /// One live match: delivery keys are unique and a chase needs its target.
    Live,
    /// Many matches concatenated: keys repeat and the target is optional.
    Historical,
}

/// Header positions of every column we know about.
struct ColumnMap {
    innings: Option<usize>,
    over: usize,
    ball: usize,
    batter: usize,
    bowler: usize,
    batter_runs: usize,
    runs_from_ball: usize,
    wicket: usize,
    venue: usize,
    target_score: Option<usize>,
    context: [Option<usize>; 5],
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, ReportError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| find(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ReportError::Schema { missing });
        }

        // Required columns were all found above.
        let required = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnMap {
            innings: find(INNINGS),
            over: required(OVER),
            ball: required(BALL),
            batter: required(BATTER),
            bowler: required(BOWLER),
            batter_runs: required(BATTER_RUNS),
            runs_from_ball: required(RUNS_FROM_BALL),
            wicket: required(WICKET),
            venue: required(VENUE),
            target_score: find(TARGET_SCORE),
            context: [
                find(BATTER_HISTORICAL_AVG),
                find(BOWLER_HISTORICAL_ECONOMY),
                find(BATTER_VS_BOWLER_AVG),
                find(TEAM_POWERPLAY_PERFORMANCE),
                find(MATCH_PHASE),
            ],
        })
    }

    fn read_event(
        &self,
        record: &csv::StringRecord,
        row: usize,
        mode: ParseMode,
    ) -> Result<BallEvent, ReportError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let malformed = |column: &str, value: &str| ReportError::MalformedRow {
            row,
            column: column.to_string(),
            value: value.to_string(),
        };
        let count = |idx: usize, column: &str| {
            let raw = cell(idx);
            parse_count(raw).ok_or_else(|| malformed(column, raw))
        };
        let runs = |idx: usize, column: &str| {
            let raw = cell(idx);
            parse_count(raw)
                .filter(|&n| n <= MAX_RUNS_PER_BALL)
                .ok_or_else(|| malformed(column, raw))
        };

        let innings = match self.innings.map(cell) {
            None | Some("") => Innings::First,
            Some(raw) => parse_count(raw)
                .and_then(Innings::from_number)
                .ok_or_else(|| malformed(INNINGS, raw))?,
        };

        let target_score = match (innings, self.target_score) {
            (_, idx) if mode == ParseMode::Historical => idx.and_then(|i| parse_count(cell(i))),
            (Innings::Second, None) => {
                return Err(ReportError::Schema {
                    missing: vec![TARGET_SCORE.to_string()],
                })
            }
            (Innings::Second, Some(idx)) => Some(count(idx, TARGET_SCORE)?),
            (Innings::First, idx) => idx.and_then(|i| parse_count(cell(i))),
        };

        let wicket_raw = cell(self.wicket);
        let wicket = parse_flag(wicket_raw).ok_or_else(|| malformed(WICKET, wicket_raw))?;

        let ctx_names = [
            BATTER_HISTORICAL_AVG,
            BOWLER_HISTORICAL_ECONOMY,
            BATTER_VS_BOWLER_AVG,
            TEAM_POWERPLAY_PERFORMANCE,
            MATCH_PHASE,
        ];
        let mut ctx = [0.0f64; 5];
        for ((slot, idx), name) in ctx.iter_mut().zip(self.context).zip(ctx_names) {
            if let Some(idx) = idx {
                let raw = cell(idx);
                if !raw.is_empty() {
                    *slot = raw.parse().map_err(|_| malformed(name, raw))?;
                }
            }
        }

        Ok(BallEvent {
            innings,
            over: count(self.over, OVER)?,
            ball: count(self.ball, BALL)?,
            batter: cell(self.batter).to_string(),
            bowler: cell(self.bowler).to_string(),
            batter_runs: runs(self.batter_runs, BATTER_RUNS)?,
            runs_from_ball: runs(self.runs_from_ball, RUNS_FROM_BALL)?,
            wicket,
            venue: cell(self.venue).to_string(),
            target_score,
            context: ContextFeatures {
                batter_historical_avg: ctx[0],
                bowler_historical_economy: ctx[1],
                batter_vs_bowler_avg: ctx[2],
                powerplay_performance: ctx[3],
                match_phase: ctx[4],
            },
        })
    }
}

/// Non-negative whole number; tolerates float renderings like `4.0`.
fn parse_count(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().or_else(|| {
        let v: f64 = raw.parse().ok()?;
        (v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64).then_some(v as u32)
    })
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "0" | "0.0" | "false" => Some(false),
        "1" | "1.0" | "true" => Some(true),
        _ => None,
    }
}

fn read_events(csv_text: &str, mode: ParseMode) -> Result<Vec<BallEvent>, ReportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());
    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut events = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        events.push(columns.read_event(&record, i + 1, mode)?);
    }
    debug!("Parsed {} ball events ({:?})", events.len(), mode);
    Ok(events)
}

/// Parse a live match's ball-by-ball CSV and return its events in canonical order.
pub fn parse_events(csv_text: &str) -> Result<Vec<BallEvent>, ReportError> {
    normalize(read_events(csv_text, ParseMode::Live)?)
}

/// Parse a multi-match historical log. Rows keep their file order and
/// repeated delivery keys are expected.
pub fn parse_history(csv_text: &str) -> Result<Vec<BallEvent>, ReportError> {
    read_events(csv_text, ParseMode::Historical)
}

/// Stable-sort by (innings, over, ball) and reject repeated keys.
///
/// Position in the returned vector is the event's sequential index.
pub fn normalize(mut events: Vec<BallEvent>) -> Result<Vec<BallEvent>, ReportError> {
    events.sort_by_key(BallEvent::key);
    if let Some(pair) = events.windows(2).find(|w| w[0].key() == w[1].key()) {
        let (innings, over, ball) = pair[1].key();
        return Err(ReportError::DuplicateDelivery {
            innings: innings.number(),
            over,
            ball,
        });
    }
    Ok(events)
}

/// Read a historical ball-by-ball log from disk.
pub fn load_history(path: &Path) -> anyhow::Result<Vec<BallEvent>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
    parse_history(&text).with_context(|| format!("Invalid ball-by-ball data in {}", path.display()))
}
