// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! These tests verify that:
//! - The metadata and health routes are registered
//! - /model/predict only accepts POST
//! - Unknown routes return 404

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use object_detector_api::environment::StaticEnvironment;
use std::sync::Arc;

use super::common::{app_with, body_json, send, FakeDetector};

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[cfg(test)]
mod route_registration_tests {
    use super::*;

    #[tokio::test]
    async fn test_metadata_route() {
        let app = app_with(Arc::new(FakeDetector::new()), StaticEnvironment::default());

        let response = send(app, request(Method::GET, "/model/metadata")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["id"], "fake-ssd");
        assert_eq!(json["type"], "Object Detection");
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = app_with(Arc::new(FakeDetector::new()), StaticEnvironment::default());

        let response = send(app, request(Method::GET, "/health")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model_loaded"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["model"], "fake-ssd");
        assert_eq!(json["labels"], 80);
    }

    #[tokio::test]
    async fn test_predict_rejects_get() {
        let app = app_with(Arc::new(FakeDetector::new()), StaticEnvironment::default());

        let response = send(app, request(Method::GET, "/model/predict")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_predict_without_multipart_is_rejected() {
        let model = Arc::new(FakeDetector::new());
        let app = app_with(model.clone(), StaticEnvironment::default());

        let response = send(
            app,
            Request::builder()
                .method(Method::POST)
                .uri("/model/predict")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;

        assert!(response.status().is_client_error());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app_with(Arc::new(FakeDetector::new()), StaticEnvironment::default());

        let response = send(app, request(Method::GET, "/v1/unknown")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
