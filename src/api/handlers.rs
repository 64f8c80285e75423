// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;
use crate::detection::ModelMetadata;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model: String,
    pub labels: usize,
    pub version: String,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: true,
        model: state.model.metadata().id,
        labels: state.model.categories().len(),
        version: version::VERSION.to_string(),
    })
}

/// GET /model/metadata - Return the metadata associated with the model
pub async fn metadata_handler(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.model.metadata())
}
