// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Masked-position logit extraction and its pairing with the
//! classification decoder, mirroring the masked-language-model flow:
//! encode -> model -> mask_logits -> process_classification.

use fabstir_inference_core::postprocess::{process_classification, ClassificationOptions};
use fabstir_inference_core::tokenizer::{TokenizerError, Vocabulary, WordPieceTokenizer};

fn tokenizer(extra: &[&str]) -> WordPieceTokenizer {
    let mut lines = vec!["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]"];
    lines.extend_from_slice(extra);
    WordPieceTokenizer::new(Vocabulary::from_lines(&lines.join("\n")))
        .expect("Failed to build tokenizer")
}

#[test]
fn test_mask_logits_blocks_line_up_with_positions() {
    let tok = tokenizer(&["the", "sky", "is"]); // vocab size 8
    let encoding = tok.encode("the sky is [MASK]", 8);
    let mask_position = tok.mask_positions(&encoding.tokens)[0];

    // One vocab-sized logit block per sequence position.
    let vocab_size = tok.vocab_size();
    let logits: Vec<f32> = (0..encoding.tokens.len() * vocab_size)
        .map(|v| v as f32)
        .collect();

    let blocks = tok
        .mask_logits(&encoding.tokens, &logits)
        .expect("Failed to slice mask logits");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].position, mask_position);
    assert_eq!(blocks[0].logits.len(), vocab_size);
    assert_eq!(blocks[0].logits[0], (mask_position * vocab_size) as f32);
}

#[test]
fn test_mask_prediction_decodes_against_vocab_labels() {
    let tok = tokenizer(&["blue", "green"]); // ids 5 and 6
    let encoding = tok.encode("[MASK]", 4);

    // Fake model output favoring "blue" at the mask position.
    let vocab_size = tok.vocab_size();
    let mut logits = vec![0.0f32; encoding.tokens.len() * vocab_size];
    let mask_position = tok.mask_positions(&encoding.tokens)[0];
    logits[mask_position * vocab_size + 5] = 8.0;
    logits[mask_position * vocab_size + 6] = 4.0;

    let blocks = tok
        .mask_logits(&encoding.tokens, &logits)
        .expect("Failed to slice mask logits");

    let predictions = process_classification(
        blocks[0].logits,
        &ClassificationOptions {
            labels: tok.labels(),
            top_k: 2,
            min_score: 0.0,
            softmax: true,
        },
    );

    assert_eq!(predictions[0].label, "blue");
    assert_eq!(predictions[1].label, "green");
    assert!(predictions[0].confidence > predictions[1].confidence);
}

#[test]
fn test_mask_logits_shape_mismatch_is_recoverable() {
    let tok = tokenizer(&[]);
    let encoding = tok.encode("[MASK]", 4);

    // One float short of dividing evenly over the sequence.
    let logits = vec![0.0f32; 4 * tok.vocab_size() - 1];
    let result = tok.mask_logits(&encoding.tokens, &logits);

    assert!(matches!(
        result,
        Err(TokenizerError::LogitsShapeMismatch { .. })
    ));
}
