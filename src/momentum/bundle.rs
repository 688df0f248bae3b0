use serde::Serialize;
use tracing::debug;

use super::artifacts::{ModelArtifacts, UNKNOWN_VENUE_CODE};
use crate::error::ReportError;
use crate::features::AugmentedBallEvent;

/// Model inputs for one report, built from the tail of the augmented table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumFeatureBundle {
    /// Last `W` deliveries, oldest first, one scaled ball-feature vector each
    pub sequence: Vec<Vec<f64>>,
    pub cumulative: Vec<f64>,
    pub venue_code: u32,
    pub context: Vec<f64>,
    pub chase: Vec<f64>,
}

impl MomentumFeatureBundle {
    pub fn build(
        table: &[AugmentedBallEvent],
        artifacts: &ModelArtifacts,
        window: usize,
    ) -> Result<Self, ReportError> {
        let needed = window.max(1);
        if table.len() < needed {
            return Err(ReportError::InsufficientEvents {
                needed,
                got: table.len(),
            });
        }
        let tail = &table[table.len() - needed..];
        let last = &tail[needed - 1];

        let venue = &last.event.venue;
        let venue_code = artifacts.venue_code(venue).unwrap_or_else(|| {
            debug!("Unknown venue '{}', using default code", venue);
            UNKNOWN_VENUE_CODE
        });

        Ok(MomentumFeatureBundle {
            sequence: tail.iter().map(|row| artifacts.ball.transform(row)).collect(),
            cumulative: artifacts.cumulative.transform(last),
            venue_code,
            context: artifacts.context.transform(last),
            chase: artifacts.chase.transform(last),
        })
    }

    /// Every numeric input in model order (venue code excluded).
    pub fn numeric_features(&self) -> Vec<f64> {
        self.sequence
            .iter()
            .flatten()
            .chain(&self.cumulative)
            .chain(&self.context)
            .chain(&self.chase)
            .copied()
            .collect()
    }
}
