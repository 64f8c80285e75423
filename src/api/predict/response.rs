// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict response types

use serde::{Deserialize, Serialize};

use crate::detection::Detection;
use crate::environment::EnvironmentVariable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictStatus {
    Ok,
    Error,
}

/// Response from the predict endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Response status message
    pub status: PredictStatus,
    /// Predicted class labels, probabilities and bounding box for each detected object
    pub predictions: Vec<Detection>,
    /// Environment variables selected for echoing
    pub environment_variables: Vec<EnvironmentVariable>,
}

impl PredictResponse {
    pub fn ok(predictions: Vec<Detection>, environment_variables: Vec<EnvironmentVariable>) -> Self {
        Self {
            status: PredictStatus::Ok,
            predictions,
            environment_variables,
        }
    }

    /// A failed prediction discards everything but the status
    pub fn error() -> Self {
        Self {
            status: PredictStatus::Error,
            predictions: Vec::new(),
            environment_variables: Vec::new(),
        }
    }
}
