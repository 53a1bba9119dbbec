// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOS object detection session
//!
//! Wraps an ONNX Runtime session behind the
//! `pixel_values` -> `logits` + `pred_boxes` contract. Pair with
//! `process_detections` for output.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use super::load_session;

/// Input tensor for a YOLOS forward pass
#[derive(Debug, Clone)]
pub struct YoloInput {
    /// Height of the preprocessed image
    pub height: usize,
    /// Width of the preprocessed image
    pub width: usize,
    /// Preprocessed image data in NCHW layout, `[1, 3, height, width]`
    pub pixels: Vec<f32>,
}

/// Raw output of a YOLOS forward pass
#[derive(Debug, Clone)]
pub struct YoloOutput {
    /// Flat class-score blocks, one fixed-width block per candidate
    pub logits: Vec<f32>,
    /// Flat box regressions, 4 floats per candidate in normalized
    /// center form `(cx, cy, w, h)`
    pub boxes: Vec<f32>,
}

/// YOLOS model session
#[derive(Clone)]
pub struct YoloModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for YoloModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloModel").finish_non_exhaustive()
    }
}

impl YoloModel {
    /// Loads a YOLOS ONNX model from a file.
    ///
    /// # Errors
    /// Returns error if the model file is missing or the session fails
    /// to initialize.
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = load_session(model_path.as_ref(), "YOLOS")?;
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Runs a forward pass and returns the flat logit and box buffers.
    ///
    /// # Errors
    /// Returns error if the pixel buffer does not match the declared
    /// dimensions or the session run fails.
    pub fn run(&self, input: &YoloInput) -> Result<YoloOutput> {
        let expected = 3 * input.height * input.width;
        if input.pixels.len() != expected {
            anyhow::bail!(
                "Invalid pixel buffer length {}, expected {} for [1, 3, {}, {}]",
                input.pixels.len(),
                expected,
                input.height,
                input.width
            );
        }

        let pixel_values = Array4::from_shape_vec(
            (1, 3, input.height, input.width),
            input.pixels.clone(),
        )
        .context("Failed to create pixel_values array")?;

        let mut session = self.session.lock().unwrap();
        let outputs = session
            .run(ort::inputs!["pixel_values" => Value::from_array(pixel_values)?])
            .context("YOLOS inference failed")?;

        let logits = outputs["logits"]
            .try_extract_array::<f32>()
            .context("Failed to extract logits tensor")?;
        let boxes = outputs["pred_boxes"]
            .try_extract_array::<f32>()
            .context("Failed to extract pred_boxes tensor")?;

        Ok(YoloOutput {
            logits: logits.iter().copied().collect(),
            boxes: boxes.iter().copied().collect(),
        })
    }
}
