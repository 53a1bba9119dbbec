// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoders that turn raw model tensors into structured predictions
//!
//! This module consumes the flat float buffers a model session
//! produces and never touches execution internals:
//! - `classification` - Ranked, thresholded, labeled class predictions
//!   from a single score vector
//! - `detection` - Pixel-space labeled boxes from per-anchor class
//!   logits and box regressions, deduplicated with class-aware NMS

pub mod classification;
pub mod detection;

pub use classification::{process_classification, Classification, ClassificationOptions};
pub use detection::{
    non_max_suppression, process_detections, BoundingBox, Detection, DetectionOptions, ImageSize,
};

use thiserror::Error;

/// Errors surfaced by the tensor decoders
#[derive(Debug, Error)]
pub enum PostprocessError {
    /// A tensor buffer length does not match the declared candidate or
    /// class counts. Recoverable by the caller.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),
}
