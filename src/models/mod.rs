// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Thin ONNX Runtime session wrappers for the supported models
//!
//! Each wrapper owns one session and exposes a narrow
//! "run(inputs) -> tensors" surface:
//! - `bert` - `input_ids` + `attention_mask` -> `logits`
//! - `resnet` - `pixel_values` -> `logits`
//! - `yolo` - `pixel_values` -> `logits` + `pred_boxes`
//!
//! The decoders in `postprocess` consume only the flat float buffers
//! these wrappers return and never touch execution internals. The
//! native runtime itself is fetched at build time by `ort`'s
//! download-binaries feature.

pub mod bert;
pub mod resnet;
pub mod yolo;

pub use bert::{BertInput, BertModel, BertOutput};
pub use resnet::{ResnetInput, ResnetModel, ResnetOutput, RESNET_INPUT_SIZE};
pub use yolo::{YoloInput, YoloModel, YoloOutput};

use std::path::Path;

use anyhow::{Context, Result};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use tracing::info;

/// Loads a session for `model_kind`, validating the path first.
///
/// With the `cuda` feature enabled this tries the CUDA execution
/// provider and falls back to CPU; otherwise the session is CPU-only.
pub(crate) fn load_session(model_path: &Path, model_kind: &str) -> Result<Session> {
    if !model_path.exists() {
        anyhow::bail!("{} model not found: {}", model_kind, model_path.display());
    }

    let session = build_session(model_path)?;

    info!("✅ {} model loaded from {}", model_kind, model_path.display());
    Ok(session)
}

#[cfg(feature = "cuda")]
fn build_session(model_path: &Path) -> Result<Session> {
    use ort::execution_providers::CUDAExecutionProvider;
    use tracing::warn;

    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda_result {
        Ok(session) => {
            info!("CUDA execution provider initialized");
            Ok(session)
        }
        Err(e) => {
            warn!("⚠️  CUDA execution provider failed: {}", e);
            warn!("   Falling back to CPU execution provider");
            cpu_session(model_path)
        }
    }
}

#[cfg(not(feature = "cuda"))]
fn build_session(model_path: &Path) -> Result<Session> {
    cpu_session(model_path)
}

fn cpu_session(model_path: &Path) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load model from {}",
            model_path.display()
        ))
}
