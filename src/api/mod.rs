use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::error::{ErrorKind, ReportError};
use crate::report::{MatchSummary, ReportEngine};

/// Multipart field carrying the live ball-by-ball CSV.
const UPLOAD_FIELD: &str = "live_csv";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ReportEngine>,
}

/// Build the Axum router for the report API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/report", post(report_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
struct ReportResponse {
    report: String,
    generated_at: DateTime<Utc>,
    summary: MatchSummary,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Client => StatusCode::BAD_REQUEST,
            ErrorKind::Precondition => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Report request failed: {}", self);
        } else {
            warn!("Report request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Pull the CSV text out of the upload, ignoring any other fields.
async fn read_upload(mut multipart: Multipart) -> Result<String, ReportError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ReportError::Csv(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ReportError::Csv(e.to_string()))?;
        return String::from_utf8(bytes.to_vec())
            .map_err(|_| ReportError::Csv("file is not valid UTF-8".to_string()));
    }
    Err(ReportError::MissingPayload)
}

/// POST /report (multipart, field `live_csv`)
async fn report_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ReportError> {
    let csv_text = read_upload(multipart).await?;
    info!("Report requested ({} bytes)", csv_text.len());
    let report = state.engine.generate(&csv_text).await?;
    Ok(Json(ReportResponse {
        report: report.to_string(),
        generated_at: Utc::now(),
        summary: report.summary,
    }))
}

/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "seq_length": state.engine.seq_length(),
        "venues": state.engine.artifacts().venue_count(),
    }))
}
