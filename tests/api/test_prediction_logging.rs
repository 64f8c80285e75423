// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Prediction logging tests
//!
//! Logging is switched on when LOG_PREDICTIONS contains "TRUE" and appends
//! double-encoded entries to LOG_PREDICTIONS_FILE with no separator.

use axum::http::StatusCode;
use object_detector_api::{
    api::PredictResponse, environment::StaticEnvironment, prediction_log::encode_log_entry,
};
use std::path::Path;
use std::sync::Arc;

use super::common::{app_with, body_json, image_part, png_bytes, predict_request, send, FakeDetector};

fn logging_env(flag: &str, path: &Path) -> StaticEnvironment {
    StaticEnvironment::new([
        ("LOG_PREDICTIONS", flag.to_string()),
        ("LOG_PREDICTIONS_FILE", path.display().to_string()),
        ("CLUSTER_NAME", "test-cluster".to_string()),
    ])
}

#[cfg(test)]
mod prediction_logging_tests {
    use super::*;

    #[tokio::test]
    async fn test_two_predictions_concatenate_without_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.log");
        let model = Arc::new(FakeDetector::new());

        let mut expected_len = 0;
        let mut expected_contents = String::new();
        for threshold in ["0.7", "0.5"] {
            let app = app_with(model.clone(), logging_env("TRUE", &path));
            let uri = format!("/model/predict?threshold={}", threshold);
            let response = send(app, predict_request(&uri, &[image_part(png_bytes())])).await;
            assert_eq!(response.status(), StatusCode::OK);

            let body: PredictResponse = serde_json::from_value(body_json(response).await).unwrap();
            let entry = encode_log_entry(&body).unwrap();
            expected_len += entry.len();
            expected_contents.push_str(&entry);
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.len(), expected_len);
        assert_eq!(contents, expected_contents);
        assert!(!contents.contains('\n'));
    }

    #[tokio::test]
    async fn test_log_entry_is_escaped_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.log");
        let app = app_with(Arc::new(FakeDetector::new()), logging_env("TRUE", &path));

        let response = send(app, predict_request("/model/predict", &[image_part(png_bytes())])).await;
        assert_eq!(response.status(), StatusCode::OK);

        let contents = std::fs::read_to_string(&path).unwrap();
        let decoded: String = serde_json::from_str(&contents).unwrap();
        let inner: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(inner["status"], "ok");
        assert_eq!(inner["environment_variables"][0]["value"], "test-cluster");
    }

    #[tokio::test]
    async fn test_substring_flag_enables_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.log");
        let app = app_with(Arc::new(FakeDetector::new()), logging_env("NOTRUEVALUE", &path));

        let response = send(app, predict_request("/model/predict", &[image_part(png_bytes())])).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_logging_disabled_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.log");
        let app = app_with(Arc::new(FakeDetector::new()), logging_env("false", &path));

        let response = send(app, predict_request("/model/predict", &[image_part(png_bytes())])).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_prediction_is_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.log");
        let app = app_with(Arc::new(FakeDetector::failing()), logging_env("TRUE", &path));

        let response = send(app, predict_request("/model/predict", &[image_part(png_bytes())])).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unwritable_log_collapses_to_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("predictions.log");
        let app = app_with(Arc::new(FakeDetector::new()), logging_env("TRUE", &path));

        let response = send(app, predict_request("/model/predict", &[image_part(png_bytes())])).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert!(json["predictions"].as_array().unwrap().is_empty());
    }
}
