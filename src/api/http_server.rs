// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{health_handler, metadata_handler};
use super::labels::labels_handler;
use super::predict::predict_handler;
use crate::detection::ModelWrapper;
use crate::environment::{EnvironmentSource, ProcessEnvironment};

/// Room for multipart boundaries, headers and the threshold field on top of the image
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared handler state: one model wrapper for every request
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ModelWrapper>,
    pub environment: Arc<dyn EnvironmentSource>,
}

impl AppState {
    /// State reading the live process environment
    pub fn new(model: Arc<dyn ModelWrapper>) -> Self {
        Self {
            model,
            environment: Arc::new(ProcessEnvironment),
        }
    }

    /// Replace the environment source (tests, embedding)
    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentSource>) -> Self {
        self.environment = environment;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.model.max_image_bytes() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health_handler))
        .route("/model/metadata", get(metadata_handler))
        .route("/model/labels", get(labels_handler))
        .route("/model/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
