// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod detection;
pub mod environment;
pub mod prediction_log;
pub mod version;
pub mod vision;

pub use api::{create_app, start_server, AppState};
pub use detection::{Detection, Label, ModelWrapper, OnnxDetector, OnnxDetectorConfig};
pub use environment::{EnvironmentSource, EnvironmentVariable, ProcessEnvironment, StaticEnvironment};
