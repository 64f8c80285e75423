// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Labels endpoint handler

use axum::{extract::State, Json};
use tracing::debug;

use super::response::LabelsResponse;
use crate::api::http_server::AppState;

/// GET /model/labels - Return the list of labels that can be predicted by the model
pub async fn labels_handler(State(state): State<AppState>) -> Json<LabelsResponse> {
    let labels = state.model.categories().to_vec();
    debug!("Listing {} labels", labels.len());
    Json(LabelsResponse::new(labels))
}
