// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ResNet image classification session
//!
//! Wraps an ONNX Runtime session behind the `pixel_values` -> `logits`
//! contract. Pair with `process_classification` for output.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use super::load_session;

/// Expected spatial input size (224x224)
pub const RESNET_INPUT_SIZE: usize = 224;

/// Input tensor for a ResNet forward pass
#[derive(Debug, Clone)]
pub struct ResnetInput {
    /// Preprocessed image data in NCHW layout, `[1, 3, 224, 224]`
    pub pixels: Vec<f32>,
}

/// Raw output of a ResNet forward pass
#[derive(Debug, Clone)]
pub struct ResnetOutput {
    /// Raw class logits, one score per class, before softmax
    pub logits: Vec<f32>,
}

/// ResNet model session
#[derive(Clone)]
pub struct ResnetModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for ResnetModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResnetModel").finish_non_exhaustive()
    }
}

impl ResnetModel {
    /// Loads a ResNet ONNX model from a file.
    ///
    /// # Errors
    /// Returns error if the model file is missing or the session fails
    /// to initialize.
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = load_session(model_path.as_ref(), "ResNet")?;
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Runs a forward pass and returns the flat class logits.
    ///
    /// # Errors
    /// Returns error if the pixel buffer does not match the expected
    /// `[1, 3, 224, 224]` shape or the session run fails.
    pub fn run(&self, input: &ResnetInput) -> Result<ResnetOutput> {
        let expected = 3 * RESNET_INPUT_SIZE * RESNET_INPUT_SIZE;
        if input.pixels.len() != expected {
            anyhow::bail!(
                "Invalid pixel buffer length {}, expected {} for [1, 3, {}, {}]",
                input.pixels.len(),
                expected,
                RESNET_INPUT_SIZE,
                RESNET_INPUT_SIZE
            );
        }

        let pixel_values = Array4::from_shape_vec(
            (1, 3, RESNET_INPUT_SIZE, RESNET_INPUT_SIZE),
            input.pixels.clone(),
        )
        .context("Failed to create pixel_values array")?;

        let mut session = self.session.lock().unwrap();
        let outputs = session
            .run(ort::inputs!["pixel_values" => Value::from_array(pixel_values)?])
            .context("ResNet inference failed")?;

        let logits = outputs["logits"]
            .try_extract_array::<f32>()
            .context("Failed to extract logits tensor")?;

        Ok(ResnetOutput {
            logits: logits.iter().copied().collect(),
        })
    }
}
