// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Placement of `}`.
//!
//! The keyword after a closing brace (`else`, `catch`, `finally`) goes on
//! the same line as the brace with `SAME`, and on a line of its own with
//! `ALONE` and `ALONE_OR_SINGLELINE`. A block whose `}` shares a line with
//! its last statement gets the brace moved to its own line, unless the
//! whole block sits on one line and the option allows that: `SAME` and
//! `ALONE_OR_SINGLELINE` keep `{ return 1; }`, `ALONE` does not. Nested
//! plain blocks are always checked.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{walk_method, walk_stmt};
use tugstyle_java::{
    has_newline, last_line_indent, Block, Codegen, Cursor, Effects, JavaVisitor, MethodDecl,
    Rule, Stmt,
};

use crate::format::{is_blank, stmt_line_indent, INDENT};
use crate::policy::RightCurlyPolicy;
use crate::token::Token;

#[derive(Debug)]
pub struct RightCurly {
    effects: Effects,
    option: RightCurlyPolicy,
    tokens: BTreeSet<Token>,
}

impl RightCurly {
    pub const NAME: &'static str = "RightCurly";

    const DEFAULT_TOKENS: [Token; 5] = [
        Token::LiteralTry,
        Token::LiteralCatch,
        Token::LiteralFinally,
        Token::LiteralIf,
        Token::LiteralElse,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            option: options.option(RightCurlyPolicy::Same),
            tokens: options.tokens(Self::DEFAULT_TOKENS),
        }
    }

    /// Put the `}` of `block` on its own line at `indent`. `token` is the
    /// construct owning the block; `None` checks it regardless of `tokens`.
    fn fix_block(&self, token: Option<Token>, block: &mut Block, indent: &str) -> bool {
        if token.is_some_and(|token| !self.tokens.contains(&token)) {
            return false;
        }
        if has_newline(&block.end) || !is_blank(&block.end) {
            return false;
        }
        let spans_lines = block.stmts.iter().any(|stmt| has_newline(&stmt.to_source()));
        if self.option != RightCurlyPolicy::Alone && !spans_lines {
            return false;
        }
        let inner = format!("\n{indent}{INDENT}");
        for stmt in &mut block.stmts {
            let prefix = &mut stmt.fmt_mut().prefix;
            if !has_newline(prefix) && is_blank(prefix) {
                *prefix = inner.clone();
            }
        }
        block.end = format!("\n{indent}");
        true
    }

    /// Move the keyword whose leading whitespace is `prefix` next to or
    /// away from the preceding `}`.
    fn fix_follower(&self, token: Token, prefix: &mut String, indent: &str) -> bool {
        if !self.tokens.contains(&token) || !is_blank(prefix) {
            return false;
        }
        let alone = has_newline(prefix);
        match self.option {
            RightCurlyPolicy::Same if alone => *prefix = " ".to_string(),
            RightCurlyPolicy::Alone | RightCurlyPolicy::AloneOrSingleline if !alone => {
                *prefix = format!("\n{indent}")
            }
            _ => return false,
        }
        true
    }
}

impl Default for RightCurly {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

fn as_block_mut(stmt: &mut Stmt) -> Option<&mut Block> {
    match stmt {
        Stmt::Block(block) => Some(block),
        _ => None,
    }
}

fn parent_is_block(cursor: &Cursor<'_>) -> bool {
    cursor
        .parent()
        .is_ok_and(|parent| parent.node().as_block().is_some())
}

impl JavaVisitor for RightCurly {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        if !has_newline(&method.fmt.prefix) {
            return out;
        }
        let indent = last_line_indent(&method.fmt.prefix);
        let token = if method.is_constructor() {
            Token::CtorDef
        } else {
            Token::MethodDef
        };
        if let Some(body) = out.body.as_mut() {
            if self.fix_block(Some(token), body, indent) {
                self.effects.record_change(method.id);
            }
        }
        out
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let mut out = walk_stmt(self, stmt, cursor);
        let Some(indent) = stmt_line_indent(cursor) else {
            return out;
        };
        let mut changed = false;
        match &mut out {
            Stmt::If(iff) => {
                let then_is_block = match as_block_mut(&mut iff.then_stmt) {
                    Some(block) => {
                        changed |= self.fix_block(Some(Token::LiteralIf), block, indent);
                        true
                    }
                    None => false,
                };
                if let Some(else_part) = iff.else_part.as_mut() {
                    if then_is_block {
                        changed |= self.fix_follower(Token::LiteralElse, &mut else_part.fmt.prefix, indent);
                    }
                    if let Some(block) = as_block_mut(&mut else_part.body) {
                        changed |= self.fix_block(Some(Token::LiteralElse), block, indent);
                    }
                }
            }
            Stmt::Try(tri) => {
                changed |= self.fix_block(Some(Token::LiteralTry), &mut tri.body, indent);
                for catch in &mut tri.catches {
                    changed |= self.fix_follower(Token::LiteralCatch, &mut catch.fmt.prefix, indent);
                    changed |= self.fix_block(Some(Token::LiteralCatch), &mut catch.body, indent);
                }
                if let Some(finally) = tri.finally.as_mut() {
                    changed |= self.fix_follower(Token::LiteralFinally, &mut finally.fmt.prefix, indent);
                    changed |= self.fix_block(Some(Token::LiteralFinally), &mut finally.body, indent);
                }
            }
            Stmt::For(for_loop) => {
                if let Some(block) = as_block_mut(&mut for_loop.body) {
                    changed |= self.fix_block(Some(Token::LiteralFor), block, indent);
                }
            }
            Stmt::ForEach(for_each) => {
                if let Some(block) = as_block_mut(&mut for_each.body) {
                    changed |= self.fix_block(Some(Token::LiteralFor), block, indent);
                }
            }
            Stmt::While(while_loop) => {
                if let Some(block) = as_block_mut(&mut while_loop.body) {
                    changed |= self.fix_block(Some(Token::LiteralWhile), block, indent);
                }
            }
            Stmt::Block(block) if parent_is_block(cursor) => {
                changed |= self.fix_block(None, block, indent);
            }
            _ => {}
        }
        if changed {
            self.effects.record_change(stmt.id());
        }
        out
    }
}

impl Rule for RightCurly {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::assert_fix;

    #[test]
    fn test_alone() {
        let before = "class A {
    {
        if(1 == 2) {} else if(2 == 3) {} else {}

        try {} catch(Throwable t) {} finally {}

        { int n = 1; }
    }

    public int foo() { return 1; }
}
";
        let after = "class A {
    {
        if(1 == 2) {
        }
        else if(2 == 3) {
        }
        else {
        }

        try {
        }
        catch(Throwable t) {
        }
        finally {
        }

        {
            int n = 1;
        }
    }

    public int foo() {
        return 1;
    }
}
";
        let tokens = "LITERAL_TRY, LITERAL_CATCH, LITERAL_FINALLY, LITERAL_IF, LITERAL_ELSE, METHOD_DEF";
        assert_fix(
            || {
                RightCurly::new(
                    &RuleOptions::new()
                        .with("option", "alone")
                        .with("tokens", tokens),
                )
            },
            before,
            after,
        );
    }

    #[test]
    fn test_alone_or_singleline() {
        let before = "class A {
    {
        if(1 == 2) {} else if(2 == 3) {} else {}

        try {} catch(Throwable t) {} finally {}

        {
            int n = 1; }
    }

    public int foo() { return 1; }
}
";
        let after = "class A {
    {
        if(1 == 2) {}
        else if(2 == 3) {}
        else {}

        try {}
        catch(Throwable t) {}
        finally {}

        {
            int n = 1;
        }
    }

    public int foo() { return 1; }
}
";
        assert_fix(
            || RightCurly::new(&RuleOptions::new().with("option", "alone_or_singleline")),
            before,
            after,
        );
    }

    #[test]
    fn test_same() {
        let before = "class A {
    {
        if(1 == 2) {} else if(2 == 3) {}
        else {}

        try {} catch(java.io.IOException e) {}
        catch(Throwable t) {}
        finally {}

        {
            int n = 1; }
    }

    public int foo() { return 1; }
}
";
        let after = "class A {
    {
        if(1 == 2) {} else if(2 == 3) {} else {}

        try {} catch(java.io.IOException e) {} catch(Throwable t) {} finally {}

        {
            int n = 1;
        }
    }

    public int foo() { return 1; }
}
";
        assert_fix(RightCurly::default, before, after);
    }
}
