// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict endpoint handler

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::request::{PredictQuery, PredictRequest};
use super::response::PredictResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::detection::{Detection, ModelError};
use crate::environment::{filter_environment_variables, prediction_logging_target};
use crate::prediction_log::append_log_entry;
use crate::vision::ImageError;

enum InferenceFailure {
    Decode(ImageError),
    Model(ModelError),
}

/// POST /model/predict - Detect objects in an uploaded image
///
/// # Request
/// Multipart form:
/// - `image`: PNG or JPEG file (required)
/// - `threshold`: probability threshold (default 0.7), also accepted as a query parameter
///
/// # Response
/// - `status`: "ok" or "error"
/// - `predictions`: label, probability and `[ymin, xmin, ymax, xmax]` box per object
/// - `environment_variables`: variables whose name contains CLUSTER_NAME, CLOUD_PROVIDER or VERSION
///
/// # Errors
/// - 400 Bad Request: missing image, non-float threshold, undecodable image
/// - 413 Payload Too Large: image above the configured limit
/// - 500 Internal Server Error: `{"status": "error"}` when inference or logging fails
pub async fn predict_handler(
    State(state): State<AppState>,
    Query(query): Query<PredictQuery>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PredictResponse>), ApiError> {
    let start = Instant::now();

    // 1. Parse request; a missing image never reaches the model
    let request = PredictRequest::from_multipart(multipart, &query, state.model.max_image_bytes())
        .await
        .map_err(|e| {
            warn!("Predict request rejected: {}", e);
            e
        })?;

    debug!(
        "Predict request: {} bytes ({:?}), threshold {}",
        request.image.len(),
        request.file_name,
        request.threshold
    );

    // 2. Decode and detect on the blocking pool
    let model = state.model.clone();
    let threshold = request.threshold;
    let image_bytes = request.image;
    let outcome = tokio::task::spawn_blocking(move || -> Result<Vec<Detection>, InferenceFailure> {
        let image = model
            .read_image(&image_bytes)
            .map_err(InferenceFailure::Decode)?;
        model
            .predict(&image, threshold)
            .map_err(InferenceFailure::Model)
    })
    .await;

    let predictions = match outcome {
        Ok(Ok(predictions)) => predictions,
        Ok(Err(InferenceFailure::Decode(e))) => {
            warn!("Failed to decode image: {}", e);
            return Err(e.into());
        }
        Ok(Err(InferenceFailure::Model(e))) => {
            error!("Prediction failed: {}", e);
            return Ok(failed());
        }
        Err(e) => {
            error!("Prediction task failed: {}", e);
            return Ok(failed());
        }
    };

    // 3. Echo selected environment variables
    let environment_variables = filter_environment_variables(state.environment.as_ref());
    let response = PredictResponse::ok(predictions, environment_variables);

    // 4. Optional prediction log
    if let Some(path) = prediction_logging_target(state.environment.as_ref()) {
        if let Err(e) = append_log_entry(&path, &response).await {
            error!("Prediction logging failed: {:#}", e);
            return Ok(failed());
        }
    }

    info!(
        "Prediction complete: {} objects above {:.2}, {}ms",
        response.predictions.len(),
        threshold,
        start.elapsed().as_millis()
    );

    Ok((StatusCode::OK, Json(response)))
}

fn failed() -> (StatusCode, Json<PredictResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(PredictResponse::error()),
    )
}
