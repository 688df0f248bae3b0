use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::artifacts::LinearHead;
use super::bundle::MomentumFeatureBundle;
use crate::error::ReportError;

/// Scores a feature bundle on a 0-100 momentum scale.
///
/// Called once per report with no retry. Implementations must be safe to
/// share across concurrent requests.
#[async_trait]
pub trait MomentumPredictor: Send + Sync {
    async fn predict(&self, bundle: &MomentumFeatureBundle) -> Result<f64, ReportError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

fn bounded(score: f64) -> Result<f64, ReportError> {
    if !score.is_finite() {
        return Err(ReportError::Predictor(format!(
            "model returned a non-finite score ({})",
            score
        )));
    }
    Ok(score.clamp(0.0, 100.0))
}

/// Model served over HTTP; the bundle is POSTed as JSON.
pub struct RemotePredictor {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PredictorResponse {
    Momentum { momentum: f64 },
    Predictions { predictions: Vec<Vec<f64>> },
}

impl RemotePredictor {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(RemotePredictor {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl MomentumPredictor for RemotePredictor {
    fn name(&self) -> &str {
        "remote"
    }

    async fn predict(&self, bundle: &MomentumFeatureBundle) -> Result<f64, ReportError> {
        debug!("Requesting momentum score from {}", self.url);
        let resp = self
            .http
            .post(&self.url)
            .json(bundle)
            .send()
            .await
            .map_err(|e| ReportError::Predictor(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(ReportError::Predictor(format!(
                "model server returned {}",
                resp.status()
            )));
        }

        let body: PredictorResponse = resp
            .json()
            .await
            .map_err(|e| ReportError::Predictor(format!("unreadable response: {}", e)))?;

        let score = match body {
            PredictorResponse::Momentum { momentum } => momentum,
            PredictorResponse::Predictions { predictions } => predictions
                .first()
                .and_then(|row| row.first())
                .copied()
                .ok_or_else(|| ReportError::Predictor("empty predictions".to_string()))?,
        };
        bounded(score)
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Local logistic head: `100 * sigmoid(bias + venue_bias + w . x)`.
pub struct LinearPredictor {
    head: LinearHead,
}

impl LinearPredictor {
    /// `width` is the length of [`MomentumFeatureBundle::numeric_features`].
    pub fn new(head: LinearHead, width: usize) -> Result<Self> {
        if head.weights.len() != width {
            bail!(
                "linear head has {} weights but the model takes {} numeric features",
                head.weights.len(),
                width
            );
        }
        Ok(LinearPredictor { head })
    }
}

#[async_trait]
impl MomentumPredictor for LinearPredictor {
    fn name(&self) -> &str {
        "linear"
    }

    async fn predict(&self, bundle: &MomentumFeatureBundle) -> Result<f64, ReportError> {
        let features = bundle.numeric_features();
        if features.len() != self.head.weights.len() {
            return Err(ReportError::Internal(format!(
                "feature width {} does not match {} weights",
                features.len(),
                self.head.weights.len()
            )));
        }
        let venue_bias = self
            .head
            .venue_bias
            .get(bundle.venue_code as usize)
            .copied()
            .unwrap_or(0.0);
        let z: f64 = self.head.bias
            + venue_bias
            + features
                .iter()
                .zip(&self.head.weights)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        bounded(100.0 * sigmoid(z))
    }
}
