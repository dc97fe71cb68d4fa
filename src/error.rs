//! Crate-wide structured error type.
//!
//! The tokenization core is total on well-formed input and never returns
//! `Result` (see the module docs on `tokenizer`); this type is surfaced by
//! the trie's word-modification operations and by the dictionary loader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("word is empty")]
    EmptyWord,

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}
