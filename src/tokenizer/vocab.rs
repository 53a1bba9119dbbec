// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vocabulary loading and the token/id bijection
//!
//! Two source formats are supported:
//! - Newline-delimited token lists, one token per line; blank lines are
//!   skipped and ids are assigned sequentially starting at 0 in file
//!   order.
//! - HuggingFace `tokenizer.json` documents, where ids come from the
//!   nested `model.vocab` mapping rather than line order.
//!
//! A vocabulary is built once and read-only afterwards; the reverse
//! (id to token) mapping is derived at construction and never mutated.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::TokenizerError;

/// Shape of the `tokenizer.json` fields we care about
#[derive(Debug, Deserialize)]
struct TokenizerConfig {
    model: TokenizerModel,
}

#[derive(Debug, Deserialize)]
struct TokenizerModel {
    vocab: HashMap<String, usize>,
}

/// Immutable mapping between token strings and dense integer ids
#[derive(Debug, Clone)]
pub struct Vocabulary {
    token_to_id: HashMap<String, usize>,
    id_to_token: HashMap<usize, String>,
}

impl Vocabulary {
    /// Builds a vocabulary from an already-loaded token/id mapping.
    pub fn from_map(token_to_id: HashMap<String, usize>) -> Self {
        let id_to_token = token_to_id
            .iter()
            .map(|(token, &id)| (id, token.clone()))
            .collect();
        Self {
            token_to_id,
            id_to_token,
        }
    }

    /// Builds a vocabulary from newline-delimited token text.
    ///
    /// Blank lines are skipped; ids are assigned sequentially starting
    /// at 0 in line order.
    pub fn from_lines(text: &str) -> Self {
        let mut token_to_id = HashMap::new();
        let mut id = 0;
        for line in text.lines() {
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            token_to_id.insert(token.to_string(), id);
            id += 1;
        }
        debug!("Loaded {} vocabulary entries", token_to_id.len());
        Self::from_map(token_to_id)
    }

    /// Builds a vocabulary from a newline-delimited byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TokenizerError> {
        let mut token_to_id = HashMap::new();
        let mut id = 0;
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            token_to_id.insert(token.to_string(), id);
            id += 1;
        }
        debug!("Loaded {} vocabulary entries", token_to_id.len());
        Ok(Self::from_map(token_to_id))
    }

    /// Builds a vocabulary from a newline-delimited token file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TokenizerError> {
        let file = fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Builds a vocabulary from a HuggingFace `tokenizer.json`
    /// document. Ids come from the `model.vocab` mapping.
    pub fn from_tokenizer_json(json: &str) -> Result<Self, TokenizerError> {
        let config: TokenizerConfig = serde_json::from_str(json)
            .map_err(|e| TokenizerError::InvalidConfig(e.to_string()))?;
        debug!("Loaded {} vocabulary entries", config.model.vocab.len());
        Ok(Self::from_map(config.model.vocab))
    }

    /// Builds a vocabulary from a HuggingFace `tokenizer.json` file.
    pub fn from_tokenizer_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TokenizerError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_tokenizer_json(&json)
    }

    /// Looks up the id for a token.
    pub fn id(&self, token: &str) -> Option<usize> {
        self.token_to_id.get(token).copied()
    }

    /// Looks up the token for an id.
    pub fn token(&self, id: usize) -> Option<&str> {
        self.id_to_token.get(&id).map(String::as_str)
    }

    /// Whether the vocabulary contains a token.
    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Number of vocabulary entries.
    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    /// The id-to-token mapping, usable directly as a label table for
    /// classification decoding over vocabulary logits.
    pub fn labels(&self) -> &HashMap<usize, String> {
        &self.id_to_token
    }
}
