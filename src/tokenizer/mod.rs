// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! WordPiece tokenization for BERT-style language models
//!
//! This module turns free text into fixed-length, model-ready token-id
//! sequences:
//! - `vocab` - Vocabulary loading (newline-delimited lists and
//!   HuggingFace `tokenizer.json`) and the token/id bijection
//! - `special` - Special token roles (PAD/UNK/CLS/SEP/MASK)
//! - `wordpiece` - Greedy longest-match subword encoding
//!
//! The vocabulary and special-token tables are immutable after
//! construction, so a tokenizer can be shared across threads freely.

pub mod special;
pub mod vocab;
pub mod wordpiece;

pub use special::SpecialTokens;
pub use vocab::Vocabulary;
pub use wordpiece::{Encoding, MaskLogits, WordPieceTokenizer};

use thiserror::Error;

/// Errors surfaced by tokenizer construction and mask-logit lookups
#[derive(Debug, Error)]
pub enum TokenizerError {
    /// A mandatory special token is missing from the vocabulary.
    /// Fatal at construction time, not recoverable per-call.
    #[error("Required token {0} not found in vocabulary")]
    MissingSpecialToken(String),

    /// The vocabulary source could not be parsed
    #[error("Invalid vocabulary config: {0}")]
    InvalidConfig(String),

    /// The vocabulary source could not be read
    #[error("Failed to read vocabulary: {0}")]
    Io(#[from] std::io::Error),

    /// A logits buffer does not divide evenly over the token sequence
    /// it was paired against
    #[error("Logits length ({logits}) is not a multiple of tokens length ({tokens})")]
    LogitsShapeMismatch { logits: usize, tokens: usize },

    /// A logits buffer ends before the block for a mask position
    #[error("Logits buffer too short for mask at position {position}")]
    LogitsTooShort { position: usize },
}
