// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Wrap the bodies of `if`, `else`, `for`, `while` and `do` in braces.
//!
//! An `else if` chain is not wrapped. With `allowSingleLineStatement`, a
//! construct written entirely on one line is left alone; with
//! `allowEmptyLoopBody`, `while (x);` and `for (...);` are too.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_stmt;
use tugstyle_java::{
    has_newline, Block, Codegen, Cursor, Effects, Formatting, JavaVisitor, Rule, Stmt,
};

use crate::format::{stmt_line_indent, INDENT};
use crate::token::Token;

#[derive(Debug)]
pub struct NeedBraces {
    effects: Effects,
    allow_single_line_statement: bool,
    allow_empty_loop_body: bool,
    tokens: BTreeSet<Token>,
}

impl NeedBraces {
    pub const NAME: &'static str = "NeedBraces";

    const DEFAULT_TOKENS: [Token; 5] = [
        Token::LiteralDo,
        Token::LiteralElse,
        Token::LiteralFor,
        Token::LiteralIf,
        Token::LiteralWhile,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            allow_single_line_statement: options.bool("allowSingleLineStatement", false),
            allow_empty_loop_body: options.bool("allowEmptyLoopBody", false),
            tokens: options.tokens(Self::DEFAULT_TOKENS),
        }
    }

    /// Whether `body` of a construct of kind `token` needs braces. `source`
    /// is the construct's text without its leading whitespace.
    fn needs_braces(&self, token: Token, body: &Stmt, source: &str, is_loop: bool) -> bool {
        if !self.tokens.contains(&token) || matches!(body, Stmt::Block(_)) {
            return false;
        }
        if is_loop && self.allow_empty_loop_body && matches!(body, Stmt::Empty(_)) {
            return false;
        }
        !(self.allow_single_line_statement && !has_newline(source))
    }
}

impl Default for NeedBraces {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

/// `body` as the only statement of a new block laid out for an owner
/// indented by `indent`.
fn braced(body: Stmt, indent: Option<&str>) -> Stmt {
    let (inner, end) = match indent {
        Some(indent) => (format!("\n{indent}{INDENT}"), format!("\n{indent}")),
        None => (" ".to_string(), " ".to_string()),
    };
    let stmts = match body {
        Stmt::Empty(_) => Vec::new(),
        stmt => vec![stmt.with_prefix(inner)],
    };
    Stmt::Block(Block::new(stmts, Formatting::prefixed(" "), end))
}

fn wrap(slot: &mut Stmt, indent: Option<&str>) {
    *slot = braced(slot.clone(), indent);
}

fn source_of(stmt: &Stmt) -> String {
    stmt.clone().with_prefix("").to_source()
}

impl JavaVisitor for NeedBraces {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let mut out = walk_stmt(self, stmt, cursor);
        let indent = stmt_line_indent(cursor);
        let source = source_of(stmt);
        let mut changed = false;
        match &mut out {
            Stmt::If(iff) => {
                if self.needs_braces(Token::LiteralIf, &iff.then_stmt, &source, false) {
                    wrap(&mut iff.then_stmt, indent);
                    changed = true;
                }
                if let Some(else_part) = iff.else_part.as_mut() {
                    let else_source = else_part.body.to_source();
                    if !matches!(else_part.body.as_ref(), Stmt::If(_))
                        && self.needs_braces(Token::LiteralElse, &else_part.body, &else_source, false)
                    {
                        wrap(&mut else_part.body, indent);
                        changed = true;
                    }
                }
            }
            Stmt::For(for_loop) => {
                if self.needs_braces(Token::LiteralFor, &for_loop.body, &source, true) {
                    wrap(&mut for_loop.body, indent);
                    changed = true;
                }
            }
            Stmt::ForEach(for_each) => {
                if self.needs_braces(Token::LiteralFor, &for_each.body, &source, true) {
                    wrap(&mut for_each.body, indent);
                    changed = true;
                }
            }
            Stmt::While(while_loop) => {
                if self.needs_braces(Token::LiteralWhile, &while_loop.body, &source, true) {
                    wrap(&mut while_loop.body, indent);
                    changed = true;
                }
            }
            Stmt::DoWhile(do_while) => {
                if self.needs_braces(Token::LiteralDo, &do_while.body, &source, false) {
                    wrap(&mut do_while.body, indent);
                    if !has_newline(&do_while.while_prefix) {
                        do_while.while_prefix = " ".to_string();
                    }
                    changed = true;
                }
            }
            _ => {}
        }
        if changed {
            self.effects.record_change(stmt.id());
        }
        out
    }
}

impl Rule for NeedBraces {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_add_braces() {
        let before = "public class A {
    int n;
    void foo() {
        while (true);
        if (n == 1) return;
        else return;
        while (true) return;
        do this.notify(); while (true);
        for (int i = 0; ; ) this.notify();
    }
}
";
        let after = "public class A {
    int n;
    void foo() {
        while (true) {
        }
        if (n == 1) {
            return;
        }
        else {
            return;
        }
        while (true) {
            return;
        }
        do {
            this.notify();
        } while (true);
        for (int i = 0; ; ) {
            this.notify();
        }
    }
}
";
        assert_fix(NeedBraces::default, before, after);
    }

    #[test]
    fn test_allow_empty_loop_body() {
        assert_unchanged(
            NeedBraces::new(&RuleOptions::new().with("allowEmptyLoopBody", "true")),
            "public class A {
    {
        while (true);
        for(int i = 0; i < 10; i++);
    }
}
",
        );
    }

    #[test]
    fn test_allow_single_line_statement() {
        assert_unchanged(
            NeedBraces::new(&RuleOptions::new().with("allowSingleLineStatement", "true")),
            "public class A {
    int n;
    void foo() {
        if (n == 1) return;
        while (true) return;
        do this.notify(); while (true);
        for (int i = 0; ; ) this.notify();
    }
}
",
        );
    }

    #[test]
    fn test_else_if_chain() {
        let before = "class A {
    void f(int n) {
        if (n == 1) {
            a();
        } else if (n == 2)
            b();
    }
}
";
        let after = "class A {
    void f(int n) {
        if (n == 1) {
            a();
        } else if (n == 2) {
            b();
        }
    }
}
";
        assert_fix(NeedBraces::default, before, after);
    }

    #[test]
    fn test_case_tokens_leave_switches_alone() {
        assert_unchanged(
            NeedBraces::new(
                &RuleOptions::new()
                    .with("tokens", "LITERAL_CASE, LITERAL_DEFAULT")
                    .with("allowSingleLineStatement", "true"),
            ),
            "public class A {
    {
        int n = 1;
        switch (n) {
          case 1: counter++; break;
          default: counter = 100; break;
        }
    }
}
",
        );
    }
}
