// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection model wrappers
//!
//! The HTTP layer only sees the [`ModelWrapper`] trait. [`OnnxDetector`]
//! serves SSD graphs through ONNX Runtime on CPU.

pub mod labels;
pub mod model;
pub mod onnx;
pub mod postprocessing;

pub use labels::LabelMap;
pub use model::{Detection, Label, ModelError, ModelMetadata, ModelWrapper};
pub use onnx::{OnnxDetector, OnnxDetectorConfig};
pub use postprocessing::{select_detections, RawDetections};
