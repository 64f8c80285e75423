// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the SSD detection graph

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

/// Convert an image into the `uint8` NHWC tensor `[1, H, W, 3]` the detection graph expects.
///
/// When the graph declares a fixed input size the image is stretched to it.
/// Output boxes are normalized, so stretching does not affect box coordinates.
pub fn preprocess_for_detection(image: &DynamicImage, target: Option<(u32, u32)>) -> Array4<u8> {
    let rgb = match target {
        Some((width, height)) if (width, height) != (image.width(), image.height()) => image
            .resize_exact(width, height, FilterType::Triangle)
            .to_rgb8(),
        _ => image.to_rgb8(),
    };

    let (width, height) = rgb.dimensions();
    let mut tensor = Array4::<u8>::zeros((1, height as usize, width as usize, 3));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = pixel[c];
        }
    }

    tensor
}
