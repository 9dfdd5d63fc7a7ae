// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser producing the formatted tree.
//!
//! Whitespace ownership follows the rules in [`crate::nodes::traits`]. A
//! node that starts at the current token calls [`Parser::take_prefix`]
//! before parsing its children, so the outermost node claims the leading
//! trivia and inner nodes see an empty prefix. Consuming a keyword or
//! delimiter with [`Parser::expect`] returns the trivia in front of it
//! (empty when already claimed) so the caller can store it in the right
//! `*_prefix` or `suffix` field.

mod declaration;
pub(crate) mod errors;
mod expression;
mod statement;

pub use errors::{ParserError, Result};

use crate::nodes::{CompilationUnit, Expr, Formatting, NodeId, Stmt};
use crate::tokenizer::{tokenize, TokType, Token};
use errors::line_column;

const KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

pub(crate) fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}

/// Parse a whole source file.
pub fn parse_compilation_unit(source: &str) -> Result<CompilationUnit> {
    let mut parser = Parser::new(source)?;
    let unit = parser.compilation_unit()?;
    parser.expect_eof()?;
    Ok(unit)
}

/// Parse a single statement, including its `;` when it needs one.
pub fn parse_statement(source: &str) -> Result<Stmt> {
    let mut parser = Parser::new(source)?;
    let stmt = parser.statement()?;
    parser.expect_eof()?;
    Ok(stmt)
}

/// Parse a single expression.
pub fn parse_expression(source: &str) -> Result<Expr> {
    let mut parser = Parser::new(source)?;
    let expr = parser.expression()?;
    parser.expect_eof()?;
    Ok(expr)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    pos: usize,
    prefix_taken: bool,
}

pub(crate) struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Whether the current token's prefix was claimed by a node.
    prefix_taken: bool,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str) -> Result<Self> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            prefix_taken: false,
        })
    }

    // ------------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------------

    pub(crate) fn peek(&self) -> Token<'a> {
        self.peek_at(0)
    }

    pub(crate) fn peek_at(&self, n: usize) -> Token<'a> {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    pub(crate) fn at(&self, text: &str) -> bool {
        self.peek().is(text)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.peek().kind == TokType::Eof
    }

    /// `text` follows the current token with no trivia in between.
    pub(crate) fn joined_at(&self, n: usize, text: &str) -> bool {
        let tok = self.peek_at(n);
        tok.is(text) && tok.prefix.is_empty()
    }

    pub(crate) fn at_word(&self) -> bool {
        self.peek().kind == TokType::Word
    }

    /// An identifier that is not a reserved word.
    pub(crate) fn at_identifier_at(&self, n: usize) -> bool {
        let tok = self.peek_at(n);
        tok.kind == TokType::Word && !is_keyword(tok.text)
    }

    /// Claim the current token's leading trivia for a node starting here.
    pub(crate) fn take_prefix(&mut self) -> String {
        if self.prefix_taken {
            String::new()
        } else {
            self.prefix_taken = true;
            self.peek().prefix.to_string()
        }
    }

    /// Consume the current token, returning it and its unclaimed prefix.
    pub(crate) fn bump(&mut self) -> (Token<'a>, String) {
        let tok = self.peek();
        let prefix = if self.prefix_taken {
            String::new()
        } else {
            tok.prefix.to_string()
        };
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        self.prefix_taken = false;
        (tok, prefix)
    }

    /// Consume `text`, returning the trivia in front of it.
    pub(crate) fn expect(&mut self, text: &str) -> Result<String> {
        if self.at(text) {
            Ok(self.bump().1)
        } else {
            Err(self.error(&format!("'{}'", text)))
        }
    }

    /// Consume `text` if present.
    pub(crate) fn eat(&mut self, text: &str) -> Option<String> {
        if self.at(text) {
            Some(self.bump().1)
        } else {
            None
        }
    }

    pub(crate) fn expect_eof(&self) -> Result<()> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.error("end of input"))
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            prefix_taken: self.prefix_taken,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.prefix_taken = checkpoint.prefix_taken;
    }

    /// Source text from the start of token `from` to the end of the last
    /// consumed token, interior trivia included.
    pub(crate) fn text_since(&self, from: usize) -> String {
        let start = self.tokens[from].offset;
        let end = if self.pos == 0 {
            start
        } else {
            self.tokens[self.pos - 1].end()
        };
        self.source[start..end.max(start)].to_string()
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Index of the token that closes the bracket at offset `n`.
    pub(crate) fn matching_close(&self, n: usize) -> Option<usize> {
        let open = self.peek_at(n);
        let close = match open.text {
            "(" => ")",
            "[" => "]",
            "{" => "}",
            _ => return None,
        };
        let mut depth = 0usize;
        for (i, tok) in self.tokens.iter().enumerate().skip(self.pos + n) {
            if tok.kind != TokType::Punct {
                continue;
            }
            if tok.text == open.text {
                depth += 1;
            } else if tok.text == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i - self.pos);
                }
            }
        }
        None
    }

    pub(crate) fn error(&self, expected: &str) -> ParserError {
        let tok = self.peek();
        let (line, column) = line_column(self.source, tok.offset);
        ParserError::ParserError {
            line,
            column,
            expected: expected.to_string(),
            found: if tok.kind == TokType::Eof {
                "<eof>".to_string()
            } else {
                tok.text.to_string()
            },
        }
    }

    // ------------------------------------------------------------------------
    // Shared pieces
    // ------------------------------------------------------------------------

    /// A comma-separated list between `open` and `close`. Each element's
    /// suffix receives the trivia before the following `,` or `close`.
    pub(crate) fn container<T>(
        &mut self,
        open: &str,
        close: &str,
        mut element: impl FnMut(&mut Self) -> Result<T>,
        suffix: impl Fn(&mut T) -> &mut String,
    ) -> Result<crate::nodes::Container<T>> {
        let before = self.expect(open)?;
        let mut elems = Vec::new();
        if let Some(empty) = self.eat(close) {
            return Ok(crate::nodes::Container {
                before,
                elems,
                empty,
            });
        }
        loop {
            let mut elem = element(self)?;
            if let Some(gap) = self.eat(",") {
                *suffix(&mut elem) = gap;
                elems.push(elem);
            } else {
                *suffix(&mut elem) = self.expect(close)?;
                elems.push(elem);
                break;
            }
        }
        Ok(crate::nodes::Container {
            before,
            elems,
            empty: String::new(),
        })
    }

    pub(crate) fn empty_node(&mut self) -> crate::nodes::Empty {
        crate::nodes::Empty {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(self.take_prefix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Codegen;

    #[test]
    fn test_parse_statement_includes_semicolon() {
        let stmt = parse_statement("  return x ;").unwrap();
        assert!(matches!(stmt, Stmt::Return(_)));
        assert_eq!(stmt.fmt().prefix, "  ");
        assert_eq!(stmt.fmt().suffix, " ");
        let mut state = crate::codegen::CodegenState::default();
        crate::codegen::codegen_statement(&stmt, &mut state);
        assert_eq!(state.to_string(), "  return x ;");
    }

    #[test]
    fn test_parse_expression_round_trips() {
        let source = "a + (b * c) - d";
        assert_eq!(parse_expression(source).unwrap().to_source(), source);
    }

    #[test]
    fn test_error_location() {
        let err = parse_compilation_unit("class A {\n  void f() { int x = ; }\n}").unwrap_err();
        assert_eq!(err.location().0, 2);
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        assert!(parse_expression("a b").is_err());
    }
}
