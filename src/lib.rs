// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Post-processing and tokenization pipeline for pretrained vision and
//! language models run through ONNX Runtime
//!
//! The crate turns free text into fixed-length, model-ready token-id
//! sequences (greedy WordPiece matching) and turns raw output tensors
//! (class logits, box regressions) into thresholded, deduplicated,
//! human-labeled predictions:
//!
//! - `ml` - Numeric primitives (softmax, sigmoid, L2 normalize, top-k,
//!   IoU)
//! - `tokenizer` - Vocabulary handling and WordPiece encoding
//! - `postprocess` - Classification and detection decoders with
//!   class-aware NMS
//! - `models` - Thin ONNX session wrappers (BERT, ResNet, YOLOS)
//!
//! Everything outside `models` is pure and synchronous; tokenizers and
//! label tables are immutable after construction and safe to share
//! across threads without locking.

pub mod ml;
pub mod models;
pub mod postprocess;
pub mod tokenizer;

// Re-export the main pipeline types
pub use models::{
    BertInput, BertModel, BertOutput, ResnetInput, ResnetModel, ResnetOutput, YoloInput,
    YoloModel, YoloOutput,
};
pub use postprocess::{
    process_classification, process_detections, Classification, ClassificationOptions,
    Detection, DetectionOptions, ImageSize, PostprocessError,
};
pub use tokenizer::{
    Encoding, MaskLogits, SpecialTokens, TokenizerError, Vocabulary, WordPieceTokenizer,
};
