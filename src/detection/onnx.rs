// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime wrapper for SSD object detection graphs
//!
//! Serves graphs exported from the TensorFlow Object Detection API, which take
//! a `uint8` image tensor `[1, H, W, 3]` and emit:
//! - `detection_boxes` `[1, N, 4]` (normalized `[ymin, xmin, ymax, xmax]`)
//! - `detection_classes` `[1, N]`
//! - `detection_scores` `[1, N]`
//! - `num_detections` `[1]`

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::{debug, info};

use super::labels::LabelMap;
use super::model::{Detection, Label, ModelError, ModelMetadata, ModelWrapper};
use super::postprocessing::{select_detections, RawDetections};
use crate::vision::{preprocess_for_detection, MAX_IMAGE_SIZE};

/// Configuration for loading an [`OnnxDetector`]
#[derive(Debug, Clone)]
pub struct OnnxDetectorConfig {
    /// Path to the ONNX graph
    pub model_path: PathBuf,
    /// Optional `id,name` label file; the COCO table is used otherwise
    pub labels_path: Option<PathBuf>,
    /// Fixed `(width, height)` input size, for graphs without dynamic dims
    pub input_size: Option<(u32, u32)>,
    /// Intra-op thread count for ONNX Runtime
    pub intra_threads: usize,
    /// Largest accepted upload, in bytes
    pub max_image_bytes: usize,
}

impl Default for OnnxDetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/ssd_mobilenet_v1.onnx"),
            labels_path: None,
            input_size: None,
            intra_threads: 4,
            max_image_bytes: MAX_IMAGE_SIZE,
        }
    }
}

/// Names of the graph outputs consumed by post-processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub boxes: String,
    pub classes: String,
    pub scores: String,
    pub num_detections: Option<String>,
}

/// Resolve output tensors by name, falling back to the exporter's sorted order
/// (`detection_boxes`, `detection_classes`, `detection_scores`, `num_detections`).
pub fn resolve_output_names(names: &[String]) -> Result<OutputNames, ModelError> {
    let find = |needle: &str| names.iter().find(|n| n.contains(needle)).cloned();

    let by_name = (
        find("detection_boxes"),
        find("detection_classes"),
        find("detection_scores"),
    );

    match by_name {
        (Some(boxes), Some(classes), Some(scores)) => Ok(OutputNames {
            boxes,
            classes,
            scores,
            num_detections: find("num_detections"),
        }),
        _ if names.len() >= 3 => Ok(OutputNames {
            boxes: names[0].clone(),
            classes: names[1].clone(),
            scores: names[2].clone(),
            num_detections: names.get(3).cloned(),
        }),
        _ => Err(ModelError::InvalidOutput(format!(
            "expected at least 3 detection outputs, graph has {:?}",
            names
        ))),
    }
}

/// SSD detector backed by an ONNX Runtime session (CPU execution)
pub struct OnnxDetector {
    /// `Session::run` needs `&mut`, so requests take turns on the session
    session: Mutex<Session>,
    input_name: String,
    outputs: OutputNames,
    input_size: Option<(u32, u32)>,
    labels: LabelMap,
    max_image_bytes: usize,
    model_name: String,
}

impl std::fmt::Debug for OnnxDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxDetector")
            .field("input_name", &self.input_name)
            .field("outputs", &self.outputs)
            .field("input_size", &self.input_size)
            .field("labels", &self.labels.len())
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl OnnxDetector {
    /// Load the detection graph and label table
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found or not a valid ONNX graph
    /// - Label file cannot be read or parsed
    /// - Graph outputs do not look like an SSD detection head
    pub fn new(config: OnnxDetectorConfig) -> Result<Self> {
        let model_path = config.model_path.as_path();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        let labels = match &config.labels_path {
            Some(path) => LabelMap::load(path)?,
            None => LabelMap::coco(),
        };

        info!("Loading detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detection model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "image_tensor:0".to_string());

        let output_names: Vec<String> = session
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();
        let outputs = resolve_output_names(&output_names)?;

        debug!(
            "Detection model loaded - input: {}, outputs: {:?}",
            input_name, outputs
        );

        info!(
            "✅ Detection model loaded ({} labels, CPU-only)",
            labels.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            outputs,
            input_size: config.input_size,
            labels,
            max_image_bytes: config.max_image_bytes,
            model_name: model_file_stem(model_path),
        })
    }

    fn run(&self, image: &DynamicImage) -> Result<RawDetections, ModelError> {
        let tensor = preprocess_for_detection(image, self.input_size);
        let input_value = Value::from_array(tensor)
            .map_err(|e| ModelError::Inference(format!("Failed to create input tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::Inference("detection session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let extract = |name: &str| -> Result<Vec<f32>, ModelError> {
            let tensor = outputs[name]
                .try_extract_array::<f32>()
                .map_err(|e| ModelError::InvalidOutput(format!("{}: {}", name, e)))?;
            Ok(tensor.iter().copied().collect())
        };

        let num_detections = match &self.outputs.num_detections {
            Some(name) => extract(name)?.first().copied(),
            None => None,
        };

        let boxes = extract(&self.outputs.boxes)?;
        let classes = extract(&self.outputs.classes)?;
        let scores = extract(&self.outputs.scores)?;

        RawDetections::from_outputs(boxes, classes, scores, num_detections)
    }
}

impl ModelWrapper for OnnxDetector {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            id: self.model_name.clone(),
            name: format!("{} ONNX Model", self.model_name),
            description: format!(
                "{} object detection model served through ONNX Runtime",
                self.model_name
            ),
            model_type: "Object Detection".to_string(),
            source: "https://github.com/tensorflow/models/tree/master/research/object_detection"
                .to_string(),
            license: "Apache-2.0".to_string(),
        }
    }

    fn categories(&self) -> &[Label] {
        self.labels.labels()
    }

    fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    fn predict(&self, image: &DynamicImage, threshold: f32) -> Result<Vec<Detection>, ModelError> {
        let start = Instant::now();
        let raw = self.run(image)?;
        let detections = select_detections(&raw, threshold, &self.labels);

        debug!(
            "Detection complete: {} of {} candidates above {:.2}, {}ms",
            detections.len(),
            raw.valid_rows(),
            threshold,
            start.elapsed().as_millis()
        );

        Ok(detections)
    }
}

fn model_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("detector")
        .to_string()
}
