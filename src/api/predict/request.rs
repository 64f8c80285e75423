// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict request parsing

use axum::http::StatusCode;
use axum_extra::extract::{multipart::MultipartError, Multipart};
use serde::Deserialize;
use tracing::debug;

use crate::api::errors::ApiError;

/// Threshold used when the caller does not send one
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Query-string fallback for form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictQuery {
    pub threshold: Option<String>,
}

/// A parsed predict request
#[derive(Debug, Clone)]
pub struct PredictRequest {
    /// Raw uploaded bytes, expected to be PNG or JPEG
    pub image: Vec<u8>,
    /// File name supplied with the upload, if any
    pub file_name: Option<String>,
    /// Probability threshold for including a detected object.
    /// Expected in [0, 1] but not range checked.
    pub threshold: f32,
}

/// Parse a threshold the way a float coercion would; no range check.
pub fn parse_threshold(raw: &str) -> Result<f32, ApiError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| ApiError::ValidationError {
            field: "threshold".to_string(),
            message: format!("threshold must be a float, got '{}'", raw),
        })
}

/// Map a multipart read failure; bodies cut off by the body limit are 413
fn multipart_error(err: MultipartError, context: &str, max_image_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge {
            size: None,
            limit: max_image_bytes,
        };
    }
    ApiError::InvalidRequest(format!("{}: {}", context, err))
}

impl PredictRequest {
    /// Read the `image` and `threshold` fields from a multipart body.
    ///
    /// Unknown fields are ignored. A form `threshold` wins over the query string.
    /// `max_image_bytes` is reported back when the upload exceeds the body limit.
    pub async fn from_multipart(
        mut multipart: Multipart,
        query: &PredictQuery,
        max_image_bytes: usize,
    ) -> Result<Self, ApiError> {
        let mut image = None;
        let mut file_name = None;
        let mut form_threshold = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, "Malformed multipart body", max_image_bytes))?
        {
            match field.name() {
                Some("image") => {
                    file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| {
                        multipart_error(e, "Failed to read image field", max_image_bytes)
                    })?;
                    image = Some(bytes.to_vec());
                }
                Some("threshold") => {
                    let text = field.text().await.map_err(|e| {
                        multipart_error(e, "Failed to read threshold field", max_image_bytes)
                    })?;
                    form_threshold = Some(text);
                }
                other => debug!("Ignoring multipart field {:?}", other),
            }
        }

        let image = image.ok_or_else(|| ApiError::missing_field("image"))?;

        let threshold = match form_threshold.as_deref().or(query.threshold.as_deref()) {
            Some(raw) => parse_threshold(raw)?,
            None => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            image,
            file_name,
            threshold,
        })
    }
}
