// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Turning raw SSD outputs into detections

use super::labels::LabelMap;
use super::model::{Detection, ModelError};

/// Label used when the model emits a class id missing from the label map
pub const UNKNOWN_LABEL: &str = "unknown";

/// Raw, flattened outputs of one SSD forward pass
#[derive(Debug, Clone, Default)]
pub struct RawDetections {
    /// `[ymin, xmin, ymax, xmax]` per candidate
    pub boxes: Vec<[f32; 4]>,
    pub classes: Vec<f32>,
    pub scores: Vec<f32>,
    /// Number of valid rows reported by the graph, when it reports one
    pub num_detections: Option<usize>,
}

impl RawDetections {
    /// Reshape flat graph outputs; `boxes` holds four values per candidate.
    ///
    /// A negative or NaN `num_detections` counts as zero rows.
    pub fn from_outputs(
        boxes: Vec<f32>,
        classes: Vec<f32>,
        scores: Vec<f32>,
        num_detections: Option<f32>,
    ) -> Result<Self, ModelError> {
        if boxes.len() % 4 != 0 {
            return Err(ModelError::InvalidOutput(format!(
                "detection boxes have {} values, not a multiple of 4",
                boxes.len()
            )));
        }

        Ok(Self {
            boxes: boxes
                .chunks_exact(4)
                .map(|c| [c[0], c[1], c[2], c[3]])
                .collect(),
            classes,
            scores,
            num_detections: num_detections.map(|n| n.max(0.0) as usize),
        })
    }

    /// Rows that are present in every output and within `num_detections`
    pub fn valid_rows(&self) -> usize {
        let available = self
            .boxes
            .len()
            .min(self.classes.len())
            .min(self.scores.len());
        match self.num_detections {
            Some(n) => n.min(available),
            None => available,
        }
    }
}

/// Keep candidates whose clamped score is `>= threshold`, in model order.
pub fn select_detections(raw: &RawDetections, threshold: f32, labels: &LabelMap) -> Vec<Detection> {
    (0..raw.valid_rows())
        .map(|i| (i, raw.scores[i].clamp(0.0, 1.0)))
        .filter(|&(_, probability)| probability >= threshold)
        .map(|(i, probability)| {
            let class_id = raw.classes[i].round();
            let label = if class_id >= 0.0 {
                labels.get(class_id as u32)
            } else {
                None
            };

            Detection {
                label_id: label.map(|l| l.id.clone()),
                label: label
                    .map(|l| l.name.clone())
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
                probability,
                detection_box: clamp_box(raw.boxes[i]),
            }
        })
        .collect()
}

fn clamp_box(bbox: [f32; 4]) -> [f32; 4] {
    bbox.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
}
