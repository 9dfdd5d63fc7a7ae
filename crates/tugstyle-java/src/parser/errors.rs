// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error at {line}:{column}: {message}")]
    TokenizerError {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("parser error at {line}:{column}: expected {expected}, found '{found}'")]
    ParserError {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },
}

impl ParserError {
    /// 1-based line and column of the error.
    pub fn location(&self) -> (usize, usize) {
        match self {
            ParserError::TokenizerError { line, column, .. }
            | ParserError::ParserError { line, column, .. } => (*line, *column),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;

/// 1-based line and column of a byte offset.
pub(crate) fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let head = &source.as_bytes()[..offset];
    let line = memchr::memchr_iter(b'\n', head).count() + 1;
    let line_start = memchr::memrchr(b'\n', head).map_or(0, |pos| pos + 1);
    let column = source[line_start..offset].chars().count() + 1;
    (line, column)
}
