// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Greedy longest-match WordPiece encoding
//!
//! Turns raw text into the fixed-length id/attention-mask/token triple
//! a BERT-style model expects:
//! 1. Coarse split into bracket runs, word runs, and punctuation runs
//! 2. Case-insensitive special-token canonicalization
//! 3. Greedy longest-match subword splitting with `##` continuations
//! 4. CLS/SEP framing, then hard truncation or PAD filling to exactly
//!    the requested length

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use super::special::SpecialTokens;
use super::vocab::Vocabulary;
use super::TokenizerError;

/// Coarse token categories, longest-match first: bracket-delimited runs
/// (candidate special tokens), word-character runs, punctuation runs.
/// Whitespace separates and is never captured.
const COARSE_TOKEN_PATTERN: &str = r"\[[^\[\]]+\]|\w+|[^\w\s]+";

/// Fixed-length tokenizer output.
///
/// The three sequences always have identical length: the requested
/// `max_length` of the encode call that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Vocabulary ids, CLS first, SEP after the content, PAD filler
    pub input_ids: Vec<i64>,
    /// 1 for every real and special token, 0 for every PAD slot
    pub attention_mask: Vec<i64>,
    /// The textual token pieces behind each id
    pub tokens: Vec<String>,
}

impl Encoding {
    /// Number of real (non-padding) positions, special tokens included.
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().map(|&m| m as usize).sum()
    }
}

/// Logit block for one MASK position in an encoded sequence
#[derive(Debug, Clone, PartialEq)]
pub struct MaskLogits<'a> {
    /// Position of the mask token within the sequence
    pub position: usize,
    /// Per-vocabulary-entry logits for that position
    pub logits: &'a [f32],
}

/// WordPiece tokenizer over an immutable vocabulary.
///
/// All lookup tables (special-token case map, special-token ids, the
/// coarse split pattern) are computed once at construction; encoding
/// never mutates shared state, so one tokenizer can serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct WordPieceTokenizer {
    vocab: Vocabulary,
    special_tokens: SpecialTokens,
    canonical_specials: HashMap<String, String>,
    coarse_pattern: Regex,
    pad_id: usize,
    unk_id: usize,
    cls_id: usize,
    sep_id: usize,
}

impl WordPieceTokenizer {
    /// Creates a tokenizer with the default BERT special tokens.
    ///
    /// # Errors
    /// Returns `TokenizerError::MissingSpecialToken` if the vocabulary
    /// lacks PAD, UNK, CLS, or SEP. MASK is optional; sequences without
    /// masked positions never need it.
    pub fn new(vocab: Vocabulary) -> Result<Self, TokenizerError> {
        Self::with_special_tokens(vocab, SpecialTokens::default())
    }

    /// Creates a tokenizer with caller-supplied special token
    /// spellings.
    pub fn with_special_tokens(
        vocab: Vocabulary,
        special_tokens: SpecialTokens,
    ) -> Result<Self, TokenizerError> {
        let require = |token: &str| {
            vocab
                .id(token)
                .ok_or_else(|| TokenizerError::MissingSpecialToken(token.to_string()))
        };

        let pad_id = require(&special_tokens.pad)?;
        let unk_id = require(&special_tokens.unk)?;
        let cls_id = require(&special_tokens.cls)?;
        let sep_id = require(&special_tokens.sep)?;

        let canonical_specials = special_tokens.canonical_map();
        let coarse_pattern = Regex::new(COARSE_TOKEN_PATTERN).unwrap();

        debug!(
            "WordPiece tokenizer ready with {} vocabulary entries",
            vocab.len()
        );

        Ok(Self {
            vocab,
            special_tokens,
            canonical_specials,
            coarse_pattern,
            pad_id,
            unk_id,
            cls_id,
            sep_id,
        })
    }

    /// Encodes text into an id/attention-mask/token triple of exactly
    /// `max_length` positions.
    ///
    /// Content is framed with CLS and SEP and right-padded with PAD
    /// (attention 0). Sequences that overflow are hard-truncated to
    /// `max_length`, which can cut off the trailing SEP; that is the
    /// documented behavior, not an error.
    pub fn encode(&self, text: &str, max_length: usize) -> Encoding {
        let mut pieces: Vec<String> = Vec::new();

        for mat in self.coarse_pattern.find_iter(text) {
            let token = mat.as_str();

            if token.starts_with('[') && token.ends_with(']') {
                if let Some(canonical) = self.canonical_specials.get(&token.to_uppercase()) {
                    pieces.push(canonical.clone());
                    continue;
                }
            }

            let lowered = token.to_lowercase();
            if self.vocab.contains(&lowered) {
                pieces.push(lowered);
            } else {
                pieces.extend(self.wordpiece(&lowered));
            }
        }

        let mut input_ids: Vec<i64> = vec![self.cls_id as i64];
        let mut tokens: Vec<String> = vec![self.special_tokens.cls.clone()];

        for piece in pieces {
            match self.vocab.id(&piece) {
                Some(id) => {
                    input_ids.push(id as i64);
                    tokens.push(piece);
                }
                None => {
                    input_ids.push(self.unk_id as i64);
                    tokens.push(self.special_tokens.unk.clone());
                }
            }
        }

        input_ids.push(self.sep_id as i64);
        tokens.push(self.special_tokens.sep.clone());

        let mut attention_mask: Vec<i64> = vec![1; input_ids.len()];

        if input_ids.len() > max_length {
            input_ids.truncate(max_length);
            attention_mask.truncate(max_length);
            tokens.truncate(max_length);
        } else {
            while input_ids.len() < max_length {
                input_ids.push(self.pad_id as i64);
                attention_mask.push(0);
                tokens.push(self.special_tokens.pad.clone());
            }
        }

        Encoding {
            input_ids,
            attention_mask,
            tokens,
        }
    }

    /// Greedy longest-match subword split for a token that is not a
    /// direct vocabulary entry.
    ///
    /// Scans left to right; at each position the longest vocabulary
    /// match wins, with non-initial candidates prefixed by `##`. If no
    /// match exists at some position, the whole token collapses to a
    /// single UNK piece rather than a partial split. Candidate
    /// substrings always end on character boundaries.
    fn wordpiece(&self, word: &str) -> Vec<String> {
        let boundaries: Vec<usize> = word
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(word.len()))
            .collect();
        let last = boundaries.len() - 1;

        let mut pieces = Vec::new();
        let mut start = 0;

        while start < last {
            let mut matched: Option<(usize, String)> = None;

            let mut end = last;
            while end > start {
                let substr = &word[boundaries[start]..boundaries[end]];
                let candidate = if start == 0 {
                    substr.to_string()
                } else {
                    format!("##{substr}")
                };

                if self.vocab.contains(&candidate) {
                    matched = Some((end, candidate));
                    break;
                }
                end -= 1;
            }

            match matched {
                Some((end, piece)) => {
                    pieces.push(piece);
                    start = end;
                }
                None => return vec![self.special_tokens.unk.clone()],
            }
        }

        pieces
    }

    /// Positions of the MASK special token in an encoded sequence.
    pub fn mask_positions(&self, tokens: &[String]) -> Vec<usize> {
        tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.as_str() == self.special_tokens.mask)
            .map(|(position, _)| position)
            .collect()
    }

    /// Slices a flat per-position logits buffer at every MASK position.
    ///
    /// The buffer is expected to hold one vocabulary-sized block per
    /// token position.
    ///
    /// # Errors
    /// Returns a shape-mismatch error when the buffer length does not
    /// divide evenly over the token count, or ends before the block for
    /// some mask position.
    pub fn mask_logits<'a>(
        &self,
        tokens: &[String],
        logits: &'a [f32],
    ) -> Result<Vec<MaskLogits<'a>>, TokenizerError> {
        if tokens.is_empty() || logits.len() % tokens.len() != 0 {
            return Err(TokenizerError::LogitsShapeMismatch {
                logits: logits.len(),
                tokens: tokens.len(),
            });
        }

        let vocab_size = self.vocab.len();
        let mut mask_logits = Vec::new();

        for position in self.mask_positions(tokens) {
            let start = position * vocab_size;
            let end = start + vocab_size;
            if end > logits.len() {
                return Err(TokenizerError::LogitsTooShort { position });
            }
            mask_logits.push(MaskLogits {
                position,
                logits: &logits[start..end],
            });
        }

        Ok(mask_logits)
    }

    /// The underlying vocabulary.
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Number of vocabulary entries.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// The id-to-token mapping, usable as a classification label table
    /// when decoding vocabulary logits (e.g. masked-token prediction).
    pub fn labels(&self) -> &HashMap<usize, String> {
        self.vocab.labels()
    }

    /// The special token spellings this tokenizer emits.
    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special_tokens
    }
}
