// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Predict API endpoint module
//!
//! Provides POST /model/predict for detecting objects in an uploaded image.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::predict_handler;
pub use request::{parse_threshold, PredictQuery, PredictRequest, DEFAULT_THRESHOLD};
pub use response::{PredictResponse, PredictStatus};
