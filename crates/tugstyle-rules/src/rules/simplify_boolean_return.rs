// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Fold `if (c) return true; return false;` into `return c;`.
//!
//! Only an `if` at the top level of a method body is folded. Its then-part
//! must return a boolean literal, and the opposite literal must be returned
//! either by an `else` (which may not be an `else if`) or by the statement
//! right after the `if`, which must then be the last one in the method. A
//! then-part returning `false` produces `return !c;`. Comments in the parts
//! that disappear are kept above the new `return`.

use tugstyle_java::visitor::walk_stmt;
use tugstyle_java::{
    codegen_statement, maybe_transform, Codegen, CodegenState, Cursor, Effects, EngineError,
    Formatting, If, JavaVisitor, NodeId, NodeRef, Return, Rule, Stmt,
};

use super::simplify_boolean_expression::negate;
use crate::deferred::DeleteStatement;
use crate::format::{comments, prefix_with_comments};

#[derive(Debug, Default)]
pub struct SimplifyBooleanReturn {
    effects: Effects,
}

impl SimplifyBooleanReturn {
    pub const NAME: &'static str = "SimplifyBooleanReturn";

    pub fn new() -> Self {
        Self::default()
    }
}

/// How a matching `if` is folded.
#[derive(Debug, Clone)]
struct Fold {
    /// The then-part returns `false`.
    negate: bool,
    /// A `return` after the `if` that becomes dead.
    delete: Option<NodeId>,
    /// Comments on the dead `return`.
    carried: Vec<String>,
}

/// The boolean returned by `stmt`, when it is `return true;` or
/// `return false;`, possibly alone in a block.
fn returned_literal(stmt: &Stmt) -> Option<bool> {
    match stmt {
        Stmt::Return(ret) => ret.expr.as_ref()?.as_bool_literal(),
        Stmt::Block(block) if block.stmts.len() == 1 => returned_literal(&block.stmts[0]),
        _ => None,
    }
}

fn plan(iff: &If, cursor: &Cursor<'_>) -> Result<Option<Fold>, EngineError> {
    let parent = cursor.parent()?;
    let NodeRef::Block(block) = parent.node() else {
        return Ok(None);
    };
    if !matches!(parent.parent()?.node(), NodeRef::Method(_)) {
        return Ok(None);
    }
    let Some(then_value) = returned_literal(&iff.then_stmt) else {
        return Ok(None);
    };
    let Some(index) = block.stmts.iter().position(|s| s.id() == iff.id) else {
        return Ok(None);
    };
    let following = &block.stmts[index + 1..];

    let mut carried = Vec::new();
    let delete = match &iff.else_part {
        Some(else_part) => {
            if matches!(else_part.body.as_ref(), Stmt::If(_)) || !following.is_empty() {
                return Ok(None);
            }
            if returned_literal(&else_part.body) != Some(!then_value) {
                return Ok(None);
            }
            None
        }
        None => {
            let [next] = following else {
                return Ok(None);
            };
            if !matches!(next, Stmt::Return(_)) || returned_literal(next) != Some(!then_value) {
                return Ok(None);
            }
            carried = comments(&render(next));
            Some(next.id())
        }
    };
    Ok(Some(Fold {
        negate: !then_value,
        delete,
        carried,
    }))
}

fn render(stmt: &Stmt) -> String {
    let mut state = CodegenState::default();
    codegen_statement(stmt, &mut state);
    state.to_string()
}

/// Comments in the parts of `iff` that folding drops: the formatting around
/// the condition, both branches, and the suffix.
fn dropped_comments(iff: &If) -> Vec<String> {
    let condition = &iff.condition;
    let inner = condition.inner.fmt();
    let mut state = CodegenState::default();
    for text in [&condition.fmt.prefix, &inner.prefix, &inner.suffix, &condition.fmt.suffix] {
        state.add_token(text);
    }
    codegen_statement(&iff.then_stmt, &mut state);
    if let Some(else_part) = &iff.else_part {
        else_part.codegen(&mut state);
    }
    state.add_token(&iff.fmt.suffix);
    comments(&state.to_string())
}

fn fold(iff: &If, fold: Fold) -> Stmt {
    let mut carried = dropped_comments(iff);
    carried.extend(fold.carried);
    let condition = iff.condition.inner.as_ref().clone();
    let expr = if fold.negate {
        negate(condition, Formatting::space())
    } else {
        condition.with_fmt(Formatting::space())
    };
    let prefix = prefix_with_comments(&iff.fmt.prefix, &carried);
    Stmt::Return(Return::new(Some(expr), Formatting::prefixed(prefix)))
}

impl JavaVisitor for SimplifyBooleanReturn {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let planned = match stmt {
            Stmt::If(iff) => self.effects.check(plan(iff, cursor)).flatten(),
            _ => None,
        };
        maybe_transform(
            self,
            stmt.id(),
            planned.is_some(),
            cursor,
            |v| walk_stmt(v, stmt, cursor),
            |v, recursed, _| {
                let (Stmt::If(iff), Some(planned)) = (recursed, planned) else {
                    return None;
                };
                if let Some(dead) = planned.delete {
                    v.effects.and_then(dead, DeleteStatement::new(dead));
                }
                Some(fold(iff, planned))
            },
        )
    }
}

impl Rule for SimplifyBooleanReturn {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_simplify_boolean_return() {
        let before = "public class A {
    boolean ifNoElse() {
        if (isOddMillis()) {
            return true;
        }
        return false;
    }

    static boolean isOddMillis() {
        boolean even = System.currentTimeMillis() % 2 == 0;
        if (even == true) {
            return false;
        }
        else {
            return true;
        }
    }
}
";
        let after = "public class A {
    boolean ifNoElse() {
        return isOddMillis();
    }

    static boolean isOddMillis() {
        boolean even = System.currentTimeMillis() % 2 == 0;
        return !(even == true);
    }
}
";
        assert_fix(SimplifyBooleanReturn::new, before, after);
    }

    #[test]
    fn test_only_the_last_if_folds() {
        let before = "public class A {
    public boolean absurdEquals(Object o) {
        if(this == o) {
            return true;
        }
        if(this == o) {
            return true;
        }
        return false;
    }
}";
        let after = "public class A {
    public boolean absurdEquals(Object o) {
        if(this == o) {
            return true;
        }
        return this == o;
    }
}";
        assert_fix(SimplifyBooleanReturn::new, before, after);
    }

    #[test]
    fn test_simple_case() {
        assert_fix(
            SimplifyBooleanReturn::new,
            "class A { boolean f(boolean x) { if (x) return true; return false; } }",
            "class A { boolean f(boolean x) { return x; } }",
        );
    }

    #[test]
    fn test_nested_ifs_without_blocks() {
        assert_unchanged(
            SimplifyBooleanReturn::new(),
            "public class A {
    public boolean absurdEquals(Object o) {
        if(this == o)
            if(this == 0)
                return true;
        return false;
    }
}
",
        );
    }

    #[test]
    fn test_else_if_is_left_alone() {
        assert_unchanged(
            SimplifyBooleanReturn::new(),
            "public class A {
    public boolean foo(int n) {
        if (n == 1) {
            return false;
        }
        else if (n == 2) {
            return true;
        }
        else {
            return false;
        }
    }
}
",
        );
    }

    #[test]
    fn test_else_with_other_statements_is_left_alone() {
        assert_unchanged(
            SimplifyBooleanReturn::new(),
            "public class A {
    public boolean foo(int n) {
        if (n == 1) {
            return true;
        }
        else {
            System.out.println(\"side effect\");
            return false;
        }
    }
}
",
        );
    }

    #[test]
    fn test_if_inside_loop_is_left_alone() {
        assert_unchanged(
            SimplifyBooleanReturn::new(),
            "import java.util.*;
public class A {
    public static boolean deepEquals(List<byte[]> l, List<byte[]> r) {
        for (int i = 0; i < l.size(); ++i) {
            if (!Arrays.equals(l.get(i), r.get(i))) {
                return false;
            }
        }
        return true;
    }
}
",
        );
    }

    #[test]
    fn test_negated_ternary_is_parenthesized() {
        let before = "public class A {
    Object failure;
    public boolean equals(Object o) {
        if (failure != null ? !failure.equals(that.failure) : that.failure != null) {
            return false;
        }
        return true;
    }
}
";
        let after = "public class A {
    Object failure;
    public boolean equals(Object o) {
        return !(failure != null ? !failure.equals(that.failure) : that.failure != null);
    }
}
";
        assert_fix(SimplifyBooleanReturn::new, before, after);
    }

    #[test]
    fn test_comments_move_above_the_return() {
        let before = "class A {
    boolean f(boolean x) {
        if (x) { // fast path
            return true;
        }
        // fallback
        return false;
    }
}
";
        let after = "class A {
    boolean f(boolean x) {
        // fast path
        // fallback
        return x;
    }
}
";
        assert_fix(SimplifyBooleanReturn::new, before, after);
    }

    #[test]
    fn test_comments_in_else_and_condition_are_kept() {
        let before = "class A {
    boolean f(boolean x) {
        if (x /* checked */) {
            return false;
        } else {
            /* default */ return true;
        }
    }
}
";
        let after = "class A {
    boolean f(boolean x) {
        /* checked */
        /* default */
        return !x;
    }
}
";
        assert_fix(SimplifyBooleanReturn::new, before, after);
    }

    #[test]
    fn test_inline_comment_stays_on_the_line() {
        assert_fix(
            SimplifyBooleanReturn::new,
            "class A { boolean f(boolean x) { if (x) /* yes */ return true; return false; } }",
            "class A { boolean f(boolean x) { /* yes */ return x; } }",
        );
    }
}
