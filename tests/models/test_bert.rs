// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! BERT session tests
//!
//! The inference tests need a model file on disk and are ignored by
//! default; run them with `cargo test -- --ignored` after downloading
//! the model. The error-path tests always run.

use fabstir_inference_core::models::{BertInput, BertModel};
use fabstir_inference_core::postprocess::{process_classification, ClassificationOptions};
use fabstir_inference_core::tokenizer::{Vocabulary, WordPieceTokenizer};

// Model file paths (downloaded separately)
const MODEL_PATH: &str = ".cache/models/distilbert.onnx";
const VOCAB_PATH: &str = ".cache/models/bert-vocab.txt";

#[tokio::test]
async fn test_missing_model_path_fails() {
    let result = BertModel::new("/nonexistent/model.onnx").await;
    assert!(result.is_err());
    let message = format!("{:?}", result.err().unwrap());
    assert!(message.contains("not found"));
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_mismatched_input_lengths_fail() {
    let model = BertModel::new(MODEL_PATH).await.expect("Failed to load model");
    let result = model.run(&BertInput {
        input_ids: vec![101, 102],
        attention_mask: vec![1],
    });
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_masked_prediction_end_to_end() {
    let vocab = Vocabulary::from_file(VOCAB_PATH).expect("Failed to load vocab");
    let tokenizer = WordPieceTokenizer::new(vocab).expect("Failed to build tokenizer");
    let model = BertModel::new(MODEL_PATH).await.expect("Failed to load model");

    let encoding = tokenizer.encode("The capital of France is [MASK].", 32);
    let output = model
        .run(&BertInput {
            input_ids: encoding.input_ids.clone(),
            attention_mask: encoding.attention_mask.clone(),
        })
        .expect("Failed to run inference");

    let blocks = tokenizer
        .mask_logits(&encoding.tokens, &output.logits)
        .expect("Failed to slice mask logits");
    assert_eq!(blocks.len(), 1);

    let predictions = process_classification(
        blocks[0].logits,
        &ClassificationOptions {
            labels: tokenizer.labels(),
            top_k: 5,
            min_score: 0.0,
            softmax: true,
        },
    );
    assert_eq!(predictions.len(), 5);
    assert_eq!(predictions[0].label, "paris");
}
