// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Labels response types

use serde::{Deserialize, Serialize};

use crate::detection::Label;

/// Response listing every class label the model can emit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsResponse {
    /// Number of class labels returned
    pub count: usize,
    /// Class labels that can be predicted by the model
    pub labels: Vec<Label>,
}

impl LabelsResponse {
    /// Build a response; `count` always matches `labels.len()`
    pub fn new(labels: Vec<Label>) -> Self {
        Self {
            count: labels.len(),
            labels,
        }
    }
}
