// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BERT masked-language-model session
//!
//! Wraps an ONNX Runtime session behind the
//! `input_ids` + `attention_mask` -> `logits` contract. Pair with the
//! WordPiece tokenizer for input and `mask_logits` +
//! `process_classification` for output.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;

use super::load_session;

/// Input tensors for a BERT forward pass
#[derive(Debug, Clone)]
pub struct BertInput {
    /// Token ids, CLS/SEP framed and PAD filled
    pub input_ids: Vec<i64>,
    /// 1 for real tokens, 0 for padding
    pub attention_mask: Vec<i64>,
}

/// Raw output of a BERT forward pass
#[derive(Debug, Clone)]
pub struct BertOutput {
    /// Flat per-position vocabulary logits
    pub logits: Vec<f32>,
}

/// BERT model session
#[derive(Clone)]
pub struct BertModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for BertModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertModel").finish_non_exhaustive()
    }
}

impl BertModel {
    /// Loads a BERT ONNX model from a file.
    ///
    /// # Errors
    /// Returns error if the model file is missing or the session fails
    /// to initialize.
    pub async fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = load_session(model_path.as_ref(), "BERT")?;
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }

    /// Runs a forward pass and returns the flat logits buffer.
    ///
    /// # Errors
    /// Returns error if the input sequences differ in length or the
    /// session run fails.
    pub fn run(&self, input: &BertInput) -> Result<BertOutput> {
        if input.input_ids.len() != input.attention_mask.len() {
            anyhow::bail!(
                "input_ids length {} does not match attention_mask length {}",
                input.input_ids.len(),
                input.attention_mask.len()
            );
        }

        let seq_len = input.input_ids.len();
        let input_ids = Array2::from_shape_vec((1, seq_len), input.input_ids.clone())
            .context("Failed to create input_ids array")?;
        let attention_mask = Array2::from_shape_vec((1, seq_len), input.attention_mask.clone())
            .context("Failed to create attention_mask array")?;

        let mut session = self.session.lock().unwrap();
        let outputs = session
            .run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?,
                "attention_mask" => Value::from_array(attention_mask)?
            ])
            .context("BERT inference failed")?;

        let logits = outputs["logits"]
            .try_extract_array::<f32>()
            .context("Failed to extract logits tensor")?;

        Ok(BertOutput {
            logits: logits.iter().copied().collect(),
        })
    }
}
