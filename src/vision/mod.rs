// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling shared by every model wrapper
//!
//! This module provides:
//! - Decoding of uploaded PNG/JPEG bytes
//! - Conversion of decoded images into detection input tensors

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{
    decode_image_bytes, decode_image_bytes_with_limit, detect_format, ImageError, ImageInfo,
    MAX_IMAGE_SIZE,
};
pub use preprocessing::preprocess_for_detection;
