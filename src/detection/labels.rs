// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Class label tables for the detection model

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use super::model::Label;

/// COCO categories as numbered by the TensorFlow Object Detection API.
///
/// Ids are sparse: the 80 trained classes keep their original 1..90 numbering.
const COCO_CATEGORIES: &[(u32, &str)] = &[
    (1, "person"),
    (2, "bicycle"),
    (3, "car"),
    (4, "motorcycle"),
    (5, "airplane"),
    (6, "bus"),
    (7, "train"),
    (8, "truck"),
    (9, "boat"),
    (10, "traffic light"),
    (11, "fire hydrant"),
    (13, "stop sign"),
    (14, "parking meter"),
    (15, "bench"),
    (16, "bird"),
    (17, "cat"),
    (18, "dog"),
    (19, "horse"),
    (20, "sheep"),
    (21, "cow"),
    (22, "elephant"),
    (23, "bear"),
    (24, "zebra"),
    (25, "giraffe"),
    (27, "backpack"),
    (28, "umbrella"),
    (31, "handbag"),
    (32, "tie"),
    (33, "suitcase"),
    (34, "frisbee"),
    (35, "skis"),
    (36, "snowboard"),
    (37, "sports ball"),
    (38, "kite"),
    (39, "baseball bat"),
    (40, "baseball glove"),
    (41, "skateboard"),
    (42, "surfboard"),
    (43, "tennis racket"),
    (44, "bottle"),
    (46, "wine glass"),
    (47, "cup"),
    (48, "fork"),
    (49, "knife"),
    (50, "spoon"),
    (51, "bowl"),
    (52, "banana"),
    (53, "apple"),
    (54, "sandwich"),
    (55, "orange"),
    (56, "broccoli"),
    (57, "carrot"),
    (58, "hot dog"),
    (59, "pizza"),
    (60, "donut"),
    (61, "cake"),
    (62, "chair"),
    (63, "couch"),
    (64, "potted plant"),
    (65, "bed"),
    (67, "dining table"),
    (70, "toilet"),
    (72, "tv"),
    (73, "laptop"),
    (74, "mouse"),
    (75, "remote"),
    (76, "keyboard"),
    (77, "cell phone"),
    (78, "microwave"),
    (79, "oven"),
    (80, "toaster"),
    (81, "sink"),
    (82, "refrigerator"),
    (84, "book"),
    (85, "clock"),
    (86, "vase"),
    (87, "scissors"),
    (88, "teddy bear"),
    (89, "hair drier"),
    (90, "toothbrush"),
];

/// Ordered label list with lookup by the numeric class id the model emits
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Vec<Label>,
    by_class: HashMap<u32, usize>,
}

impl LabelMap {
    /// Build a map from `(class id, name)` pairs, keeping their order.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, &'a str)>,
    {
        let mut labels = Vec::new();
        let mut by_class = HashMap::new();
        for (id, name) in pairs {
            by_class.insert(id, labels.len());
            labels.push(Label::new(id.to_string(), name));
        }
        Self { labels, by_class }
    }

    /// The built-in COCO table
    pub fn coco() -> Self {
        Self::from_pairs(COCO_CATEGORIES.iter().copied())
    }

    /// Parse a label file with one `id,name` entry per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (id, name) = line
                .split_once(',')
                .with_context(|| format!("line {}: expected `id,name`", index + 1))?;
            let id: u32 = id
                .trim()
                .parse()
                .with_context(|| format!("line {}: invalid class id '{}'", index + 1, id.trim()))?;
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("line {}: empty label name", index + 1);
            }
            pairs.push((id, name));
        }

        if pairs.is_empty() {
            anyhow::bail!("label file contains no labels");
        }

        Ok(Self::from_pairs(pairs))
    }

    /// Load a label file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid label file {}", path.display()))
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Look up the label for a class id as emitted by the model
    pub fn get(&self, class_id: u32) -> Option<&Label> {
        self.by_class.get(&class_id).map(|&idx| &self.labels[idx])
    }
}
