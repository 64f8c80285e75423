// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for API tests: a fake detector and a multipart body builder

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response},
    Router,
};
use image::{DynamicImage, ImageFormat};
use object_detector_api::{
    api::{create_app, AppState},
    detection::{Detection, Label, LabelMap, ModelError, ModelMetadata, ModelWrapper},
    environment::StaticEnvironment,
    vision::MAX_IMAGE_SIZE,
};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const BOUNDARY: &str = "----object-detector-test-boundary";

/// Detector returning canned detections filtered by threshold
pub struct FakeDetector {
    labels: LabelMap,
    detections: Vec<Detection>,
    fail: bool,
    max_image_bytes: Option<usize>,
    pub predict_calls: AtomicUsize,
    pub last_threshold: std::sync::Mutex<Option<f32>>,
}

impl FakeDetector {
    pub fn new() -> Self {
        Self {
            labels: LabelMap::coco(),
            detections: vec![
                detection(Some("1"), "person", 0.98, [0.05, 0.1, 0.9, 0.45]),
                detection(Some("18"), "dog", 0.81, [0.4, 0.5, 0.95, 0.9]),
                detection(Some("62"), "chair", 0.7, [0.2, 0.6, 0.5, 0.8]),
                detection(None, "unknown", 0.55, [0.0, 0.0, 0.1, 0.1]),
                detection(Some("47"), "cup", 0.12, [0.3, 0.3, 0.35, 0.34]),
            ],
            fail: false,
            max_image_bytes: None,
            predict_calls: AtomicUsize::new(0),
            last_threshold: std::sync::Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_max_image_bytes(max_image_bytes: usize) -> Self {
        Self {
            max_image_bytes: Some(max_image_bytes),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub fn threshold_seen(&self) -> Option<f32> {
        *self.last_threshold.lock().unwrap()
    }
}

impl ModelWrapper for FakeDetector {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            id: "fake-ssd".to_string(),
            name: "Fake SSD".to_string(),
            description: "Canned detections for tests".to_string(),
            model_type: "Object Detection".to_string(),
            source: "tests".to_string(),
            license: "Apache-2.0".to_string(),
        }
    }

    fn categories(&self) -> &[Label] {
        self.labels.labels()
    }

    fn max_image_bytes(&self) -> usize {
        self.max_image_bytes.unwrap_or(MAX_IMAGE_SIZE)
    }

    fn predict(&self, _image: &DynamicImage, threshold: f32) -> Result<Vec<Detection>, ModelError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_threshold.lock().unwrap() = Some(threshold);

        if self.fail {
            return Err(ModelError::Inference("fake failure".to_string()));
        }

        Ok(self
            .detections
            .iter()
            .filter(|d| d.probability >= threshold)
            .cloned()
            .collect())
    }
}

pub fn detection(id: Option<&str>, label: &str, probability: f32, bbox: [f32; 4]) -> Detection {
    Detection {
        label_id: id.map(str::to_string),
        label: label.to_string(),
        probability,
        detection_box: bbox,
    }
}

pub fn app_with(model: Arc<FakeDetector>, env: StaticEnvironment) -> Router {
    let state = AppState::new(model).with_environment(Arc::new(env));
    create_app(state)
}

pub fn png_bytes() -> Vec<u8> {
    let img = DynamicImage::new_rgb8(4, 4);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub enum Part<'a> {
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn image_part<'a>(bytes: Vec<u8>) -> Part<'a> {
    Part::File {
        name: "image",
        file_name: "test.png",
        content_type: "image/png",
        bytes,
    }
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn predict_request(uri: &str, parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
