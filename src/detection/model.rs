// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model wrapper seam between the HTTP layer and the detection runtime

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::{decode_image_bytes_with_limit, ImageError, MAX_IMAGE_SIZE};

/// A class the model can predict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Class label identifier
    pub id: String,
    /// Class label
    pub name: String,
}

impl Label {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label identifier, absent when the model emits an unmapped class
    pub label_id: Option<String>,
    /// Class label
    pub label: String,
    /// Predicted probability for the class label (0.0-1.0)
    pub probability: f32,
    /// Normalized box as `[ymin, xmin, ymax, xmax]`
    pub detection_box: [f32; 4],
}

/// Descriptive information about the served model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub source: String,
    pub license: String,
}

/// Errors raised by a model wrapper while running inference
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unexpected model output: {0}")]
    InvalidOutput(String),
}

/// Image decoding and inference behind one shared instance.
///
/// Implementations are constructed once at startup and shared across
/// requests through `Arc<dyn ModelWrapper>`, so they must be `Send + Sync`.
pub trait ModelWrapper: Send + Sync {
    /// Describes the model for the metadata endpoint.
    fn metadata(&self) -> ModelMetadata;

    /// The fixed set of labels the model can emit.
    fn categories(&self) -> &[Label];

    /// Largest accepted upload, in bytes.
    fn max_image_bytes(&self) -> usize {
        MAX_IMAGE_SIZE
    }

    /// Decode raw upload bytes into an image.
    fn read_image(&self, bytes: &[u8]) -> Result<DynamicImage, ImageError> {
        let (image, info) = decode_image_bytes_with_limit(bytes, self.max_image_bytes())?;
        tracing::debug!(
            "Decoded image: {}x{}, {} bytes",
            info.width,
            info.height,
            info.size_bytes
        );
        Ok(image)
    }

    /// Detect objects whose probability is at least `threshold`.
    ///
    /// Returned detections keep the model's ordering.
    fn predict(&self, image: &DynamicImage, threshold: f32) -> Result<Vec<Detection>, ModelError>;
}
