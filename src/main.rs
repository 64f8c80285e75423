// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use object_detector_api::{
    api::{start_server, AppState},
    config::ServerArgs,
    detection::OnnxDetector,
    version,
};
use std::{env, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = ServerArgs::parse();

    tracing::info!("🚀 Starting {}", version::get_version_string());
    tracing::info!("🧠 Loading detection model from {}", args.model_path.display());

    let detector = OnnxDetector::new(args.detector_config())?;
    let state = AppState::new(Arc::new(detector));

    tracing::info!("🔧 Endpoints:");
    tracing::info!("   GET  /health");
    tracing::info!("   GET  /model/metadata");
    tracing::info!("   GET  /model/labels");
    tracing::info!("   POST /model/predict");

    start_server(args.listen_addr, state).await?;

    tracing::info!("👋 Object detector API stopped");
    Ok(())
}
