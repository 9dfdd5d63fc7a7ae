// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for Java source text.
//!
//! Every token carries the whitespace and comments in front of it as its
//! `prefix`, so concatenating `prefix + text` over all tokens reproduces the
//! source exactly. The final [`TokType::Eof`] token holds the trailing trivia.
//!
//! `>` is always emitted as a single character. The parser joins adjacent
//! `>` tokens into shift operators where an expression expects one, which
//! keeps `List<List<String>>` unambiguous.

use winnow::combinator::{alt, opt, repeat};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_till, take_until, take_while};
use winnow::ModalResult;

use crate::nodes::LiteralKind;
use crate::parser::errors::{line_column, ParserError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokType {
    /// Identifiers and keywords.
    Word,
    Number(LiteralKind),
    Char,
    String,
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokType,
    pub text: &'a str,
    pub prefix: &'a str,
    /// Byte offset of `text` in the source.
    pub offset: usize,
}

impl Token<'_> {
    pub fn is(&self, text: &str) -> bool {
        self.kind != TokType::Eof && self.text == text
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Longest alternatives first.
const PUNCTUATION: [&str; 45] = [
    "<<=", "...", "->", "::", "++", "--", "&&", "||", "==", "!=", //
    "<=", "<<", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", //
    "(", ")", "{", "}", "[", "]", ";", ",", ".", "@", //
    "=", ">", "<", "!", "~", "?", ":", "+", "-", "*", //
    "/", "&", "|", "^", "%",
];

pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParserError> {
    let mut input = source;
    let mut tokens = Vec::new();
    loop {
        let prefix = trivia
            .parse_next(&mut input)
            .map_err(|_| tokenizer_error(source, source.len() - input.len(), "bad trivia"))?;
        let offset = source.len() - input.len();
        if input.is_empty() {
            tokens.push(Token {
                kind: TokType::Eof,
                text: "",
                prefix,
                offset,
            });
            return Ok(tokens);
        }
        if input.starts_with("/*") {
            return Err(tokenizer_error(source, offset, "unterminated comment"));
        }
        let (kind, text) = token
            .parse_next(&mut input)
            .map_err(|_| tokenizer_error(source, offset, "unrecognized character"))?;
        tokens.push(Token {
            kind,
            text,
            prefix,
            offset,
        });
    }
}

fn tokenizer_error(source: &str, offset: usize, message: &str) -> ParserError {
    let (line, column) = line_column(source, offset);
    ParserError::TokenizerError {
        line,
        column,
        message: message.to_string(),
    }
}

// ============================================================================
// Trivia
// ============================================================================

fn whitespace<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., (' ', '\t', '\r', '\n', '\x0c')).parse_next(input)
}

fn line_comment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ("//", take_till(0.., |c: char| c == '\n'))
        .take()
        .parse_next(input)
}

fn block_comment<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    ("/*", take_until(0.., "*/"), "*/").take().parse_next(input)
}

fn trivia<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    repeat::<_, _, (), _, _>(0.., alt((whitespace, line_comment, block_comment)))
        .take()
        .parse_next(input)
}

// ============================================================================
// Tokens
// ============================================================================

fn token<'i>(input: &mut &'i str) -> ModalResult<(TokType, &'i str)> {
    alt((
        word.map(|t| (TokType::Word, t)),
        number.map(|t| (TokType::Number(number_kind(t)), t)),
        string_literal.map(|t| (TokType::String, t)),
        char_literal.map(|t| (TokType::Char, t)),
        alt(PUNCTUATION).map(|t| (TokType::Punct, t)),
    ))
    .parse_next(input)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    )
        .take()
        .parse_next(input)
}

fn digits<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| c.is_ascii_digit() || c == '_').parse_next(input)
}

fn radix_number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        '0',
        one_of(['x', 'X', 'b', 'B']),
        take_while(1.., |c: char| c.is_ascii_hexdigit() || c == '_'),
        opt(one_of(['l', 'L'])),
    )
        .take()
        .parse_next(input)
}

fn decimal_number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        alt((
            (digits, opt(('.', digits))).void(),
            ('.', digits).void(),
        )),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digits)),
        opt(one_of(['l', 'L', 'f', 'F', 'd', 'D'])),
    )
        .take()
        .parse_next(input)
}

fn number<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((radix_number, decimal_number)).parse_next(input)
}

fn number_kind(text: &str) -> LiteralKind {
    let lower = text.to_ascii_lowercase();
    let radix = lower.starts_with("0x") || lower.starts_with("0b");
    if lower.ends_with('l') {
        LiteralKind::Long
    } else if radix {
        LiteralKind::Int
    } else if lower.ends_with('f') {
        LiteralKind::Float
    } else if lower.ends_with('d') || lower.contains('.') || lower.contains('e') {
        LiteralKind::Double
    } else {
        LiteralKind::Int
    }
}

fn quoted<'i>(quote: char) -> impl Parser<&'i str, &'i str, winnow::error::ErrMode<winnow::error::ContextError>> {
    (
        quote,
        repeat::<_, _, (), _, _>(
            0..,
            alt((('\\', any).void(), none_of([quote, '\\', '\n']).void())),
        ),
        quote,
    )
        .take()
}

fn string_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    quoted('"').parse_next(input)
}

fn char_literal<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    quoted('\'').parse_next(input)
}
