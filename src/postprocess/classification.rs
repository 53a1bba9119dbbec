// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification decoding from raw score vectors

use std::collections::HashMap;

use crate::ml;

/// A single class prediction
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Display label from the caller-supplied label table
    pub label: String,
    /// Class index within the score vector
    pub class: usize,
    /// Probability in `[0, 1]` when softmax was requested, otherwise
    /// the raw unnormalized score
    pub confidence: f32,
}

/// Options for decoding classification results
#[derive(Debug, Clone)]
pub struct ClassificationOptions<'a> {
    /// Class index to display label; indices absent from this table
    /// are dropped from the output
    pub labels: &'a HashMap<usize, String>,
    /// Number of top predictions to consider
    pub top_k: usize,
    /// Minimum confidence threshold
    pub min_score: f32,
    /// Whether to apply softmax to the scores first
    pub softmax: bool,
}

/// Converts a raw score vector into ranked, labeled classifications.
///
/// The scores are optionally softmax-normalized, the `top_k` highest
/// are selected in descending order, and entries below `min_score` or
/// without a registered label are dropped. The surviving entries keep
/// their descending-confidence order; an empty list (never an error)
/// is returned when nothing survives.
pub fn process_classification(
    logits: &[f32],
    options: &ClassificationOptions<'_>,
) -> Vec<Classification> {
    if logits.is_empty() {
        return Vec::new();
    }

    let probabilities = if options.softmax {
        ml::softmax(logits)
    } else {
        logits.to_vec()
    };

    let indices = ml::top_k(&probabilities, options.top_k);

    let mut classifications = Vec::with_capacity(indices.len());
    for index in indices {
        let confidence = probabilities[index];
        if confidence < options.min_score {
            continue;
        }

        let label = match options.labels.get(&index) {
            Some(label) => label,
            None => continue,
        };

        classifications.push(Classification {
            label: label.clone(),
            class: index,
            confidence,
        });
    }

    classifications
}
