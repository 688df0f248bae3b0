use tracing::{debug, info};

use super::MatchReport;
use crate::analysis::HistoricalStats;
use crate::error::ReportError;
use crate::events::parse_events;
use crate::features::augment;
use crate::momentum::{ModelArtifacts, MomentumFeatureBundle, MomentumPredictor};

/// Process-wide, read-only state plus the per-request pipeline that uses it.
pub struct ReportEngine {
    historical: HistoricalStats,
    artifacts: ModelArtifacts,
    predictor: Box<dyn MomentumPredictor>,
    /// Deliveries in the predictor's sequence window
    seq_length: usize,
    /// Balls allotted to an innings
    total_balls: u32,
}

impl ReportEngine {
    pub fn new(
        historical: HistoricalStats,
        artifacts: ModelArtifacts,
        predictor: Box<dyn MomentumPredictor>,
        seq_length: usize,
        total_balls: u32,
    ) -> Self {
        ReportEngine {
            historical,
            artifacts,
            predictor,
            seq_length,
            total_balls,
        }
    }

    pub fn seq_length(&self) -> usize {
        self.seq_length
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    /// Run the full pipeline over one uploaded ball-by-ball CSV.
    pub async fn generate(&self, csv_text: &str) -> Result<MatchReport, ReportError> {
        let events = parse_events(csv_text)?;
        let table = augment(events, self.total_balls);
        debug!("Augmented {} deliveries", table.len());

        let bundle = MomentumFeatureBundle::build(&table, &self.artifacts, self.seq_length)?;
        let momentum = self.predictor.predict(&bundle).await?;
        debug!(
            "Momentum {:.2} from {} predictor (venue code {})",
            momentum,
            self.predictor.name(),
            bundle.venue_code
        );

        let report = MatchReport::assemble(&table, &self.historical, momentum);
        info!(
            "Report generated: {} balls, {}/{}, momentum {:.2}",
            report.summary.total_balls,
            report.summary.total_runs,
            report.summary.total_wickets,
            momentum
        );
        Ok(report)
    }
}
