// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from command-line flags and environment variables

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::detection::OnnxDetectorConfig;
use crate::vision::MAX_IMAGE_SIZE;

/// Object detector HTTP API
#[derive(Parser, Debug, Clone)]
#[command(name = "object-detector-api")]
#[command(version)]
#[command(about = "Serve a pretrained object detection model over HTTP", long_about = None)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "API_LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: SocketAddr,

    /// Path to the ONNX detection graph
    #[arg(long, env = "MODEL_PATH", default_value = "./models/ssd_mobilenet_v1.onnx")]
    pub model_path: PathBuf,

    /// Label file with one `id,name` pair per line (defaults to COCO)
    #[arg(long, env = "LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Square input size for graphs without dynamic image dimensions
    #[arg(long, env = "MODEL_INPUT_SIZE")]
    pub input_size: Option<u32>,

    /// Largest accepted image upload, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "ORT_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl ServerArgs {
    pub fn detector_config(&self) -> OnnxDetectorConfig {
        OnnxDetectorConfig {
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            input_size: self.input_size.map(|size| (size, size)),
            intra_threads: self.intra_threads,
            max_image_bytes: self.max_upload_bytes,
        }
    }
}
