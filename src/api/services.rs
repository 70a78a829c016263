use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::{
    models::{HealthResponse, ScanResponse},
    state::AppState,
};
use crate::api::error::ApiError;
use crate::audit::ScanError;
use crate::observability::Metrics;

/// Scan endpoint (POST /scan)
///
/// Accepts `manual_barcode` and/or `file` as multipart or urlencoded form
/// fields. Logical failures (invalid image, missing input, lookup failure)
/// still answer 200 with `success: false`; only unreadable request bodies
/// produce an error status.
pub async fn scan(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ScanResponse>, ApiError> {
    let limit = state.config.server.max_upload_bytes.as_u64();
    let scan_request = super::utils::read_scan_form(request, limit).await?;

    tracing::debug!(
        has_identifier = scan_request.identifier.is_some(),
        image_bytes = scan_request.image.as_ref().map(|b| b.len()),
        "Scan request received"
    );

    let outcome = state.handler.scan(scan_request).await;
    match &outcome {
        Ok(records) => {
            state.metrics.scan_succeeded();
            tracing::info!(records = records.len(), "Scan succeeded");
        }
        Err(err) => {
            record_failure(&state.metrics, err);
            tracing::warn!(error = %err, "Scan failed");
        }
    }

    Ok(Json(ScanResponse::from(outcome)))
}

fn record_failure(metrics: &Metrics, err: &ScanError) {
    match err {
        ScanError::InvalidImage(_) => metrics.invalid_image(),
        ScanError::MissingInput => metrics.missing_input(),
        ScanError::Lookup(_) => metrics.lookup_failed(),
    }
}

/// Health check endpoint (GET /)
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::default()))
}
