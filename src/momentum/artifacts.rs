//! Preprocessing artifacts the momentum model was trained with: which
//! columns feed each input, how each input is scaled, and the venue vocabulary.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::events::normalize::VENUE;
use crate::features::{
    AugmentedBallEvent, FeatureColumn, CHASE_DIFFERENTIAL, IS_CHASING, REQUIRED_RUN_RATE,
};

/// Code used for venues the model never saw.
pub const UNKNOWN_VENUE_CODE: u32 = 0;

fn default_chase_features() -> Vec<String> {
    vec![
        IS_CHASING.to_string(),
        REQUIRED_RUN_RATE.to_string(),
        CHASE_DIFFERENTIAL.to_string(),
    ]
}

/// Standard-score scaler: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, values: &mut [f64]) {
        for ((v, mean), scale) in values.iter_mut().zip(&self.mean).zip(&self.scale) {
            // A constant training column has zero scale; leave it centred only.
            let scale = if *scale == 0.0 { 1.0 } else { *scale };
            *v = (*v - mean) / scale;
        }
    }
}

/// Logistic scoring head used when no remote model is configured.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearHead {
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Additive term per venue code; codes past the end contribute nothing
    #[serde(default)]
    pub venue_bias: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ArtifactsFile {
    ball_features: Vec<String>,
    cum_features: Vec<String>,
    ctx_features: Vec<String>,
    #[serde(default = "default_chase_features")]
    chase_features: Vec<String>,
    ball_scaler: StandardScaler,
    cum_scaler: StandardScaler,
    ctx_scaler: StandardScaler,
    chase_scaler: StandardScaler,
    venues: Vec<String>,
    #[serde(default)]
    linear_head: Option<LinearHead>,
}

/// An ordered list of columns and the scaler fitted to them.
#[derive(Debug, Clone)]
pub struct FeatureGroup {
    columns: Vec<FeatureColumn>,
    scaler: StandardScaler,
}

impl FeatureGroup {
    fn new(group: &str, names: &[String], scaler: StandardScaler) -> Result<Self> {
        let columns = names
            .iter()
            .map(|name| {
                FeatureColumn::from_name(name)
                    .with_context(|| format!("Unknown feature '{}' in {} features", name, group))
            })
            .collect::<Result<Vec<_>>>()?;
        if scaler.width() != columns.len() || scaler.scale.len() != columns.len() {
            bail!(
                "{} scaler has width {}/{} but {} features are listed",
                group,
                scaler.mean.len(),
                scaler.scale.len(),
                columns.len()
            );
        }
        Ok(FeatureGroup { columns, scaler })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Scaled feature vector for one row of the augmented table.
    pub fn transform(&self, row: &AugmentedBallEvent) -> Vec<f64> {
        let mut values: Vec<f64> = self.columns.iter().map(|c| c.value(row)).collect();
        self.scaler.transform(&mut values);
        values
    }
}

/// Everything needed to turn an augmented table into model inputs.
///
/// Loaded once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub ball: FeatureGroup,
    pub cumulative: FeatureGroup,
    pub context: FeatureGroup,
    pub chase: FeatureGroup,
    venues: HashMap<String, u32>,
    pub linear_head: Option<LinearHead>,
}

impl ModelArtifacts {
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ArtifactsFile =
            serde_json::from_str(json).context("Failed to parse model artifacts")?;

        // The venue travels as its own categorical input, not in the numeric context.
        let ctx_names: Vec<String> = file
            .ctx_features
            .into_iter()
            .filter(|name| name != VENUE)
            .collect();

        Ok(ModelArtifacts {
            ball: FeatureGroup::new("ball", &file.ball_features, file.ball_scaler)?,
            cumulative: FeatureGroup::new("cumulative", &file.cum_features, file.cum_scaler)?,
            context: FeatureGroup::new("context", &ctx_names, file.ctx_scaler)?,
            chase: FeatureGroup::new("chase", &file.chase_features, file.chase_scaler)?,
            venues: file
                .venues
                .into_iter()
                .enumerate()
                .map(|(code, venue)| (venue, code as u32))
                .collect(),
            linear_head: file.linear_head,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifacts: {}", path.display()))?;
        let artifacts = Self::from_json(&json)?;
        info!(
            "Model artifacts loaded from {}: {} ball / {} cumulative / {} context / {} chase features, {} venues",
            path.display(),
            artifacts.ball.width(),
            artifacts.cumulative.width(),
            artifacts.context.width(),
            artifacts.chase.width(),
            artifacts.venues.len()
        );
        Ok(artifacts)
    }

    /// Known venues map to their training code; anything else to the default.
    pub fn venue_code(&self, venue: &str) -> Option<u32> {
        self.venues.get(venue).copied()
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }
}
