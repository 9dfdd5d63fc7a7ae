// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove stray `;` statements.
//!
//! A lone `;` in a statement list is dropped. A stray `;` used as the body of
//! `if`, `for` or `while` is most likely a typo that detached the real body,
//! so the statement that follows is moved into its place:
//!
//! ```text
//! if (ready);                 if (ready)
//!     go();          =>           go();
//! ```
//!
//! When nothing follows, the whole statement is removed.

use tugstyle_java::visitor::{walk_block, walk_case};
use tugstyle_java::{Block, Case, Cursor, Effects, JavaVisitor, Rule, Stmt};

#[derive(Debug, Default)]
pub struct EmptyStatement {
    effects: Effects,
}

impl EmptyStatement {
    pub const NAME: &'static str = "EmptyStatement";

    pub fn new() -> Self {
        Self::default()
    }

    fn fix_stmts(&mut self, stmts: Vec<Stmt>) -> Vec<Stmt> {
        if !stmts.iter().any(|s| matches!(s, Stmt::Empty(_)) || has_empty_body(s)) {
            return stmts;
        }
        // Built back to front, so the last element is the statement that
        // follows the one being looked at.
        let mut out: Vec<Stmt> = Vec::with_capacity(stmts.len());
        for mut stmt in stmts.into_iter().rev() {
            if matches!(stmt, Stmt::Empty(_)) {
                self.effects.record_change(stmt.id());
                continue;
            }
            if has_empty_body(&stmt) {
                self.effects.record_change(stmt.id());
                let Some(next) = out.pop() else {
                    continue;
                };
                if let Some(body) = empty_body_mut(&mut stmt) {
                    *body = next;
                }
                out.push(stmt);
                continue;
            }
            out.push(stmt);
        }
        out.reverse();
        out
    }
}

/// The body slot of an `if` without `else`, `for`, for-each or `while`.
fn body_slot(stmt: &Stmt) -> Option<&Stmt> {
    match stmt {
        Stmt::If(iff) if iff.else_part.is_none() => Some(&iff.then_stmt),
        Stmt::For(for_loop) => Some(&for_loop.body),
        Stmt::ForEach(for_each) => Some(&for_each.body),
        Stmt::While(while_loop) => Some(&while_loop.body),
        _ => None,
    }
}

fn has_empty_body(stmt: &Stmt) -> bool {
    matches!(body_slot(stmt), Some(Stmt::Empty(_)))
}

fn empty_body_mut(stmt: &mut Stmt) -> Option<&mut Stmt> {
    let body = match stmt {
        Stmt::If(iff) if iff.else_part.is_none() => iff.then_stmt.as_mut(),
        Stmt::For(for_loop) => for_loop.body.as_mut(),
        Stmt::ForEach(for_each) => for_each.body.as_mut(),
        Stmt::While(while_loop) => while_loop.body.as_mut(),
        _ => return None,
    };
    matches!(body, Stmt::Empty(_)).then_some(body)
}

impl JavaVisitor for EmptyStatement {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_block<'a>(&mut self, block: &'a Block, cursor: &Cursor<'a>) -> Block {
        let mut out = walk_block(self, block, cursor);
        out.stmts = self.fix_stmts(std::mem::take(&mut out.stmts));
        out
    }

    fn visit_case<'a>(&mut self, case: &'a Case, cursor: &Cursor<'a>) -> Case {
        let mut out = walk_case(self, case, cursor);
        out.stmts = self.fix_stmts(std::mem::take(&mut out.stmts));
        out
    }
}

impl Rule for EmptyStatement {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_remove_empty_statement() {
        let before = "public class A {
    {
        if(1 == 2);
            System.out.println(\"always runs\");
        for(;;);
            System.out.println(\"always runs\");
        for(String s : new String[0]);
            System.out.println(\"always runs\");
        while(true);
            System.out.println(\"always runs\");
        while(true);
    }
}
";
        let after = "public class A {
    {
        if(1 == 2)
            System.out.println(\"always runs\");
        for(;;)
            System.out.println(\"always runs\");
        for(String s : new String[0])
            System.out.println(\"always runs\");
        while(true)
            System.out.println(\"always runs\");
    }
}
";
        assert_fix(EmptyStatement::new, before, after);
    }

    #[test]
    fn test_lone_semicolons() {
        assert_fix(
            EmptyStatement::new,
            "class A { void f() { a();; ; b(); } }",
            "class A { void f() { a(); b(); } }",
        );
    }

    #[test]
    fn test_if_with_else_is_left_alone() {
        assert_unchanged(
            EmptyStatement::new(),
            "class A { void f() { if (a()); else b(); } }",
        );
    }
}
