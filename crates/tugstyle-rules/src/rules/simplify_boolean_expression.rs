// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Fold boolean expressions involving `true`/`false` literals.
//!
//! `b || true` becomes `true`, `a == true` becomes `a`, `!!g` becomes `g`
//! and `c || c` becomes `c`. Operands are simplified before the operator
//! that holds them, so `(e == true) || e` folds all the way to `e`.
//!
//! When the folded expression sits directly inside parentheses, those
//! parentheses are handed to a targeted [`UnnecessaryParentheses`] for the
//! next pass.

use tugstyle_java::visitor::{walk_compilation_unit, walk_expr};
use tugstyle_java::{
    maybe_transform, Binary, BinaryOp, CompilationUnit, Cursor, Effects, Expr, Formatting,
    JavaVisitor, NodeId, NodeRef, Parens, Rule, Unary, UnaryOp, UNARY_PRECEDENCE,
};

use super::unnecessary_parentheses::UnnecessaryParentheses;

#[derive(Debug, Default)]
pub struct SimplifyBooleanExpression {
    effects: Effects,
}

impl SimplifyBooleanExpression {
    pub const NAME: &'static str = "SimplifyBooleanExpression";

    pub fn new() -> Self {
        Self::default()
    }
}

/// `!expr` with formatting `fmt`.
///
/// Operands looser than a unary operator are parenthesized, and a negated
/// negation is unwrapped instead.
pub(crate) fn negate(expr: Expr, fmt: Formatting) -> Expr {
    if let Expr::Unary(unary) = &expr {
        if unary.op == UnaryOp::Not {
            return unary.expr.as_ref().clone().with_fmt(fmt);
        }
    }
    let operand = expr.with_fmt(Formatting::default());
    let operand = if operand.precedence() > UNARY_PRECEDENCE {
        Expr::Parens(Parens::new(operand, Formatting::default()))
    } else {
        operand
    };
    Expr::Unary(Unary {
        id: NodeId::fresh(),
        fmt,
        op: UnaryOp::Not,
        op_prefix: String::new(),
        expr: Box::new(operand),
    })
}

fn literal(expr: &Expr) -> Option<bool> {
    expr.unparenthesized().as_bool_literal()
}

/// The simplified form of `binary`, if one of the rewrites applies.
fn simplify_binary(binary: &Binary) -> Option<Expr> {
    let left = binary.left.as_ref();
    let right = binary.right.as_ref();
    let keep = |expr: &Expr| Some(expr.clone().with_fmt(binary.fmt.clone()));
    let same = || {
        !left.has_side_effects() && left.unparenthesized().is_equivalent(right.unparenthesized())
    };

    match (binary.op, literal(left), literal(right)) {
        (BinaryOp::And, Some(false), _) | (BinaryOp::Or, Some(true), _) => keep(left),
        (BinaryOp::And, _, Some(false)) | (BinaryOp::Or, _, Some(true)) => keep(right),
        (BinaryOp::And, Some(true), _) | (BinaryOp::Or, Some(false), _) => keep(right),
        (BinaryOp::And, _, Some(true)) | (BinaryOp::Or, _, Some(false)) => keep(left),
        (BinaryOp::And | BinaryOp::Or, _, _) if same() => keep(left),
        (BinaryOp::Eq, Some(true), _) | (BinaryOp::Ne, Some(false), _) => keep(right),
        (BinaryOp::Eq, _, Some(true)) | (BinaryOp::Ne, _, Some(false)) => keep(left),
        (BinaryOp::Eq, Some(false), _) | (BinaryOp::Ne, Some(true), _) => {
            Some(negate(right.clone(), binary.fmt.clone()))
        }
        (BinaryOp::Eq, _, Some(false)) | (BinaryOp::Ne, _, Some(true)) => {
            Some(negate(left.clone(), binary.fmt.clone()))
        }
        _ => None,
    }
}

fn simplify_not(unary: &Unary) -> Option<Expr> {
    if unary.op != UnaryOp::Not {
        return None;
    }
    let operand = unary.expr.unparenthesized();
    if let Some(value) = operand.as_bool_literal() {
        return Some(Expr::boolean(!value, unary.fmt.clone()));
    }
    match operand {
        Expr::Unary(inner) if inner.op == UnaryOp::Not => {
            Some(inner.expr.as_ref().clone().with_fmt(unary.fmt.clone()))
        }
        _ => None,
    }
}

impl JavaVisitor for SimplifyBooleanExpression {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_compilation_unit<'a>(
        &mut self,
        unit: &'a CompilationUnit,
        cursor: &Cursor<'a>,
    ) -> CompilationUnit {
        let unit_out = walk_compilation_unit(self, unit, cursor);
        if self.effects.has_changes() {
            self.effects.and_then(unit.id, SimplifyBooleanExpression::new());
        }
        unit_out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let condition = match expr {
            Expr::Binary(binary) => matches!(
                binary.op,
                BinaryOp::And | BinaryOp::Or | BinaryOp::Eq | BinaryOp::Ne
            ),
            Expr::Unary(unary) => unary.op == UnaryOp::Not,
            _ => false,
        };
        maybe_transform(
            self,
            expr.id(),
            condition,
            cursor,
            |v| walk_expr(v, expr, cursor),
            |v, recursed, cursor| {
                let simplified = match recursed {
                    Expr::Binary(binary) => simplify_binary(binary),
                    Expr::Unary(unary) => simplify_not(unary),
                    _ => None,
                }?;
                if let Ok(parent) = cursor.parent() {
                    if let NodeRef::Expr(Expr::Parens(parens)) = parent.node() {
                        v.effects
                            .and_then(parens.id, UnnecessaryParentheses::targeted(parens.id));
                    }
                }
                Some(simplified)
            },
        )
    }
}

impl Rule for SimplifyBooleanExpression {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    fn init(body: &str) -> String {
        format!("public class A {{\n    {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn test_simplify_boolean_expression() {
        let before = init(
            "        boolean a = !false;
        boolean b = (a == true);
        boolean c = b || true;
        boolean d = c || c;
        boolean e = d && d;
        boolean f = (e == true) || e;
        boolean g = f && false;
        boolean h = !!g;
        boolean i = (a != false);
",
        );
        let after = init(
            "        boolean a = true;
        boolean b = a;
        boolean c = true;
        boolean d = c;
        boolean e = d;
        boolean f = e;
        boolean g = false;
        boolean h = g;
        boolean i = a;
",
        );
        assert_fix(SimplifyBooleanExpression::new, &before, &after);
    }

    #[test]
    fn test_negations() {
        assert_fix(
            SimplifyBooleanExpression::new,
            "class A { boolean f(boolean a) { return !(!a); } }",
            "class A { boolean f(boolean a) { return a; } }",
        );
        assert_fix(
            SimplifyBooleanExpression::new,
            "class A { boolean f(boolean a) { return !(true); } }",
            "class A { boolean f(boolean a) { return false; } }",
        );
        assert_fix(
            SimplifyBooleanExpression::new,
            "class A { boolean f(int x) { return x > 0 == false; } }",
            "class A { boolean f(int x) { return !(x > 0); } }",
        );
        assert_fix(
            SimplifyBooleanExpression::new,
            "class A { boolean f(boolean a) { return true != a; } }",
            "class A { boolean f(boolean a) { return !a; } }",
        );
    }

    #[test]
    fn test_literal_identity_operands() {
        assert_fix(
            SimplifyBooleanExpression::new,
            "class A { boolean f(boolean a) { return true && a || false; } }",
            "class A { boolean f(boolean a) { return a; } }",
        );
    }

    #[test]
    fn test_calls_are_not_collapsed() {
        assert_unchanged(
            SimplifyBooleanExpression::new(),
            "class A { boolean f() { return next() && next(); } }",
        );
    }

    #[test]
    fn test_if_condition() {
        assert_fix(
            SimplifyBooleanExpression::new,
            "class A { void f(boolean a) { if (a == true) { g(); } } }",
            "class A { void f(boolean a) { if (a) { g(); } } }",
        );
    }
}
