// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Vocabulary loading tests
//!
//! Covers both supported source formats: newline-delimited token
//! lists (sequential line-order ids) and HuggingFace tokenizer.json
//! documents (ids from the model.vocab mapping).

use std::io::Write;

use fabstir_inference_core::tokenizer::{TokenizerError, Vocabulary, WordPieceTokenizer};

#[test]
fn test_vocab_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "[PAD]\n[UNK]\n[CLS]\n[SEP]\n\nhello\nworld\n")
        .expect("Failed to write vocab file");

    let vocab = Vocabulary::from_file(file.path()).expect("Failed to load vocab file");

    // Blank line skipped, ids stay sequential in file order.
    assert_eq!(vocab.len(), 6);
    assert_eq!(vocab.id("hello"), Some(4));
    assert_eq!(vocab.id("world"), Some(5));
}

#[test]
fn test_vocab_file_missing_path() {
    let result = Vocabulary::from_file("/nonexistent/vocab.txt");
    assert!(matches!(result, Err(TokenizerError::Io(_))));
}

#[test]
fn test_tokenizer_json_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"{{"model": {{"vocab": {{"[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3, "hello": 9}}}}}}"#
    )
    .expect("Failed to write tokenizer config");

    let vocab = Vocabulary::from_tokenizer_json_file(file.path())
        .expect("Failed to load tokenizer config");

    // Ids come from the document, not insertion order.
    assert_eq!(vocab.id("hello"), Some(9));

    let tokenizer = WordPieceTokenizer::new(vocab).expect("Failed to build tokenizer");
    assert_eq!(tokenizer.vocab_size(), 5);
}

#[test]
fn test_tokenizer_json_requires_mandatory_tokens() {
    let json = r#"{"model": {"vocab": {"[PAD]": 0, "hello": 1}}}"#;
    let vocab = Vocabulary::from_tokenizer_json(json).expect("Failed to parse config");

    let result = WordPieceTokenizer::new(vocab);
    assert!(matches!(
        result,
        Err(TokenizerError::MissingSpecialToken(_))
    ));
}
