// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection decoding and class-aware non-maximum suppression
//!
//! Converts per-anchor class logits and normalized center-form box
//! regressions into pixel-space labeled boxes, then removes
//! same-class duplicates with a greedy NMS sweep.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use super::classification::Classification;
use super::PostprocessError;
use crate::ml;

/// Pre-resize image dimensions, used to rescale normalized boxes back
/// to original pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// A bounding box in pixel coordinates, `x1 <= x2` and `y1 <= y2` for
/// well-formed input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    /// Area of the box
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1) * (self.y2 - self.y1)
    }

    /// Corner form as consumed by `ml::iou`
    pub fn corners(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// A detected object: a class prediction paired with its box
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub classification: Classification,
    pub bbox: BoundingBox,
}

/// Options for decoding detection results
#[derive(Debug, Clone)]
pub struct DetectionOptions<'a> {
    /// Class index to display label; unlabeled classes are dropped
    pub labels: &'a HashMap<usize, String>,
    /// Cap on the total detections returned; 0 means unlimited.
    /// Applied as a post-filter on the kept, confidence-sorted list.
    pub max_detections: usize,
    /// Minimum per-candidate confidence
    pub confidence_threshold: f32,
    /// IoU above which a lower-confidence same-class box is suppressed
    pub iou_threshold: f32,
}

/// Converts raw detection tensors into labeled pixel-space boxes.
///
/// `logits` holds one fixed-width class-score block per candidate;
/// `boxes` holds 4 floats per candidate in normalized center form
/// `(cx, cy, w, h)` relative to `[0, 1]`. Each candidate is decoded by
/// softmaxing its score block and taking the arg-max class; candidates
/// below the confidence threshold or without a registered label are
/// dropped. Survivors are converted to pixel corner form scaled by
/// `image_size` and deduplicated with class-aware NMS.
///
/// # Errors
/// Returns a shape mismatch when the box buffer is not a multiple of 4
/// or the logits buffer does not divide evenly over the candidates.
pub fn process_detections(
    logits: &[f32],
    boxes: &[f32],
    image_size: ImageSize,
    options: &DetectionOptions<'_>,
) -> Result<Vec<Detection>, PostprocessError> {
    if logits.is_empty() && boxes.is_empty() {
        return Ok(Vec::new());
    }
    if boxes.len() % 4 != 0 {
        return Err(PostprocessError::ShapeMismatch(format!(
            "box buffer length {} is not a multiple of 4",
            boxes.len()
        )));
    }

    let num_boxes = boxes.len() / 4;
    if num_boxes == 0 || logits.len() % num_boxes != 0 {
        return Err(PostprocessError::ShapeMismatch(format!(
            "logits length {} does not divide over {} candidates",
            logits.len(),
            num_boxes
        )));
    }

    let num_classes = logits.len() / num_boxes;
    if num_classes == 0 {
        return Err(PostprocessError::ShapeMismatch(
            "empty class score block".to_string(),
        ));
    }

    let width = image_size.width as f32;
    let height = image_size.height as f32;

    let mut detections = Vec::new();

    for i in 0..num_boxes {
        let class_scores = &logits[i * num_classes..(i + 1) * num_classes];
        let probs = ml::softmax(class_scores);

        let mut max_class = 0;
        let mut max_prob = 0.0f32;
        for (class, &prob) in probs.iter().enumerate() {
            if prob > max_prob {
                max_prob = prob;
                max_class = class;
            }
        }

        if max_prob < options.confidence_threshold {
            continue;
        }

        let label = match options.labels.get(&max_class) {
            Some(label) => label,
            None => continue,
        };

        let regression = &boxes[i * 4..(i + 1) * 4];
        let (cx, cy, w, h) = (regression[0], regression[1], regression[2], regression[3]);

        detections.push(Detection {
            classification: Classification {
                label: label.clone(),
                class: max_class,
                confidence: max_prob,
            },
            bbox: BoundingBox {
                x1: (cx - w / 2.0) * width,
                y1: (cy - h / 2.0) * height,
                x2: (cx + w / 2.0) * width,
                y2: (cy + h / 2.0) * height,
            },
        });
    }

    let mut kept = non_max_suppression(detections, options.iou_threshold);
    if options.max_detections > 0 && kept.len() > options.max_detections {
        kept.truncate(options.max_detections);
    }

    debug!("Retained {} detections after suppression", kept.len());
    Ok(kept)
}

/// Greedy class-aware non-maximum suppression.
///
/// Candidates are sorted by descending confidence (stable, so equal
/// confidences keep their input order) and swept left to right: each
/// unsuppressed candidate is kept and suppresses every later candidate
/// of the same class whose IoU against it exceeds the threshold.
/// Candidates of different classes never suppress each other. The kept
/// list comes back in descending confidence order.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if detections.is_empty() {
        return detections;
    }

    detections.sort_by(|a, b| {
        b.classification
            .confidence
            .partial_cmp(&a.classification.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut suppressed = vec![false; detections.len()];
    let mut kept = Vec::new();

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        suppressed[i] = true;
        kept.push(detections[i].clone());

        for j in (i + 1)..detections.len() {
            if suppressed[j]
                || detections[i].classification.class != detections[j].classification.class
            {
                continue;
            }

            if ml::iou(detections[i].bbox.corners(), detections[j].bbox.corners())
                > iou_threshold
            {
                suppressed[j] = true;
            }
        }
    }

    kept
}
