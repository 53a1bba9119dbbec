// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! YOLOS session tests
//!
//! The inference test needs a model file on disk and is ignored by
//! default; the validation tests always run.

use fabstir_inference_core::models::{YoloInput, YoloModel};
use fabstir_inference_core::postprocess::{process_detections, DetectionOptions, ImageSize};

const MODEL_PATH: &str = ".cache/models/yolos-small.onnx";

#[tokio::test]
async fn test_missing_model_path_fails() {
    let result = YoloModel::new("/nonexistent/model.onnx").await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_pixel_buffer_shape_is_validated() {
    let model = YoloModel::new(MODEL_PATH).await.expect("Failed to load model");
    let result = model.run(&YoloInput {
        height: 640,
        width: 640,
        pixels: vec![0.0; 100],
    });
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_detection_end_to_end() {
    let model = YoloModel::new(MODEL_PATH).await.expect("Failed to load model");

    let output = model
        .run(&YoloInput {
            height: 640,
            width: 640,
            pixels: vec![0.5; 3 * 640 * 640],
        })
        .expect("Failed to run inference");

    assert!(!output.logits.is_empty());
    assert_eq!(output.boxes.len() % 4, 0);

    let labels = [(0usize, "N/A".to_string())].into_iter().collect();
    let detections = process_detections(
        &output.logits,
        &output.boxes,
        ImageSize {
            width: 1280,
            height: 960,
        },
        &DetectionOptions {
            labels: &labels,
            max_detections: 100,
            confidence_threshold: 0.9,
            iou_threshold: 0.45,
        },
    )
    .expect("Failed to process detections");

    assert!(detections.len() <= 100);
}
