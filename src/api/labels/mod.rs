// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Labels API endpoint module
//!
//! Provides GET /model/labels for listing the classes the model can predict.

pub mod handler;
pub mod response;

pub use handler::labels_handler;
pub use response::LabelsResponse;
