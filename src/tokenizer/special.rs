// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Special token roles used by the WordPiece tokenizer

use std::collections::HashMap;

/// The five special token roles and their canonical spellings.
///
/// Matching against input text is case-insensitive, but the canonical
/// (vocabulary-registered) spelling is always what gets emitted and
/// looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens {
    /// Padding filler for sequences shorter than the target length
    pub pad: String,
    /// Fallback for tokens with no vocabulary match
    pub unk: String,
    /// Sequence start marker
    pub cls: String,
    /// Sequence end marker
    pub sep: String,
    /// Masked-position marker for masked-language-model inputs
    pub mask: String,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            pad: "[PAD]".to_string(),
            unk: "[UNK]".to_string(),
            cls: "[CLS]".to_string(),
            sep: "[SEP]".to_string(),
            mask: "[MASK]".to_string(),
        }
    }
}

impl SpecialTokens {
    /// Builds the case-insensitive lookup table mapping uppercased
    /// spellings to canonical ones. Built once at tokenizer
    /// construction and reused for every encode call.
    pub(crate) fn canonical_map(&self) -> HashMap<String, String> {
        [&self.pad, &self.unk, &self.cls, &self.sep, &self.mask]
            .into_iter()
            .map(|token| (token.to_uppercase(), token.clone()))
            .collect()
    }
}
