// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Call `equals` on the string literal rather than on the variable.
//!
//! `s.equals("x")` becomes `"x".equals(s)`, and likewise for
//! `equalsIgnoreCase` unless `ignoreEqualsIgnoreCase` is set. When the call is
//! the right side of `s != null && ...`, the null check is now redundant and
//! a follow-up visitor removes it.

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_expr;
use tugstyle_java::{
    maybe_transform, BinaryOp, Cursor, Effects, Expr, JavaVisitor, LiteralKind, MethodCall,
    NodeId, NodeRef, Rule,
};

use super::unnecessary_parentheses::UnnecessaryParentheses;

#[derive(Debug)]
pub struct EqualsAvoidsNull {
    effects: Effects,
    ignore_equals_ignore_case: bool,
}

impl EqualsAvoidsNull {
    pub const NAME: &'static str = "EqualsAvoidsNull";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            ignore_equals_ignore_case: options.bool("ignoreEqualsIgnoreCase", false),
        }
    }

    fn applies(&self, call: &MethodCall) -> bool {
        let name = call.name.name.as_str();
        if name != "equals" && (name != "equalsIgnoreCase" || self.ignore_equals_ignore_case) {
            return false;
        }
        let [arg] = call.args.elems.as_slice() else {
            return false;
        };
        is_string_literal(arg) && call.select.as_deref().is_some_and(|s| !is_string_literal(s))
    }
}

impl Default for EqualsAvoidsNull {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

fn is_string_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal(literal) if literal.kind == LiteralKind::String)
}

fn is_null(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal(literal) if literal.kind == LiteralKind::Null)
}

/// Whether `check` is `subject != null` or `null != subject`.
fn is_null_check_of(check: &Expr, subject: &Expr) -> bool {
    let Expr::Binary(binary) = check.unparenthesized() else {
        return false;
    };
    if binary.op != BinaryOp::Ne {
        return false;
    }
    let (left, right) = (binary.left.as_ref(), binary.right.as_ref());
    (is_null(right) && left.is_equivalent(subject)) || (is_null(left) && right.is_equivalent(subject))
}

/// The `&&` whose left side null-checks the receiver of `call`, when `call`
/// is its right side.
fn guarding_null_check(call: &MethodCall, cursor: &Cursor<'_>) -> Option<NodeId> {
    let select = call.select.as_deref()?;
    let parent = cursor.parent().ok()?;
    let NodeRef::Expr(Expr::Binary(binary)) = parent.node() else {
        return None;
    };
    (binary.op == BinaryOp::And
        && binary.right.id() == call.id
        && is_null_check_of(&binary.left, select))
    .then_some(binary.id)
}

fn swap(call: &MethodCall) -> Option<MethodCall> {
    let select = call.select.as_deref()?;
    let literal = call.args.elems.first()?;
    let mut out = call.clone();
    out.select = Some(Box::new(literal.clone().with_fmt(select.fmt().clone())));
    out.args.elems = vec![select.clone().with_fmt(literal.fmt().clone())];
    Some(out)
}

impl JavaVisitor for EqualsAvoidsNull {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let Expr::MethodCall(call) = expr else {
            return walk_expr(self, expr, cursor);
        };
        let condition = self.applies(call);
        maybe_transform(
            self,
            expr.id(),
            condition,
            cursor,
            |v| walk_expr(v, expr, cursor),
            |v, recursed, cursor| {
                let Expr::MethodCall(recursed) = recursed else {
                    return None;
                };
                if let Some(guard) = guarding_null_check(call, cursor) {
                    v.effects.and_then(guard, RemoveNullCheck::new(guard));
                }
                swap(recursed).map(Expr::MethodCall)
            },
        )
    }
}

impl Rule for EqualsAvoidsNull {
    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Replace `s != null && "x".equals(s)` with its right side, then drop the
/// parentheses that may have held it.
#[derive(Debug)]
struct RemoveNullCheck {
    effects: Effects,
    target: NodeId,
}

impl RemoveNullCheck {
    const NAME: &'static str = "RemoveNullCheck";

    fn new(target: NodeId) -> Self {
        Self {
            effects: Effects::default(),
            target,
        }
    }
}

impl JavaVisitor for RemoveNullCheck {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let target = self.target;
        maybe_transform(
            self,
            expr.id(),
            expr.id() == target,
            cursor,
            |v| walk_expr(v, expr, cursor),
            |v, recursed, cursor| {
                let Expr::Binary(binary) = recursed else {
                    return None;
                };
                if let Ok(parent) = cursor.parent() {
                    if let NodeRef::Expr(Expr::Parens(parens)) = parent.node() {
                        v.effects
                            .and_then(parens.id, UnnecessaryParentheses::targeted(parens.id));
                    }
                }
                Some(binary.right.as_ref().clone().with_fmt(binary.fmt.clone()))
            },
        )
    }
}

impl Rule for RemoveNullCheck {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    fn make() -> EqualsAvoidsNull {
        EqualsAvoidsNull::default()
    }

    #[test]
    fn test_literal_moves_to_receiver() {
        let before = "public class A {
    {
        String s = null;
        if(s.equals(\"test\")) {}
        if(s.equalsIgnoreCase(\"test\")) {}
    }
}
";
        let after = "public class A {
    {
        String s = null;
        if(\"test\".equals(s)) {}
        if(\"test\".equalsIgnoreCase(s)) {}
    }
}
";
        assert_fix(make, before, after);
    }

    #[test]
    fn test_ignore_equals_ignore_case() {
        let before = "class A { boolean f(String s) { return s.equalsIgnoreCase(\"x\") || s.equals(\"y\"); } }";
        let after = "class A { boolean f(String s) { return s.equalsIgnoreCase(\"x\") || \"y\".equals(s); } }";
        assert_fix(
            || EqualsAvoidsNull::new(&RuleOptions::new().with("ignoreEqualsIgnoreCase", "true")),
            before,
            after,
        );
    }

    #[test]
    fn test_null_check_is_removed() {
        let before = "public class A {
    {
        String s = null;
        if(s != null && s.equals(\"test\")) {}
        if(null != s && s.equals(\"test\")) {}
    }
}
";
        let after = "public class A {
    {
        String s = null;
        if(\"test\".equals(s)) {}
        if(\"test\".equals(s)) {}
    }
}
";
        assert_fix(make, before, after);
    }

    #[test]
    fn test_null_check_in_parentheses_is_removed() {
        assert_fix(
            make,
            "class A { { String s = null; if((s != null && s.equals(\"test\"))) {} } }",
            "class A { { String s = null; if(\"test\".equals(s)) {} } }",
        );
    }

    #[test]
    fn test_other_null_checks_stay() {
        assert_fix(
            make,
            "class A { boolean f(String s, String t) { return t != null && s.equals(\"x\"); } }",
            "class A { boolean f(String s, String t) { return t != null && \"x\".equals(s); } }",
        );
    }

    #[test]
    fn test_literal_receiver_and_non_literal_argument_are_left_alone() {
        assert_unchanged(
            make(),
            "class A { boolean f(String s, String t) { return \"x\".equals(s) || s.equals(t); } }",
        );
    }
}
