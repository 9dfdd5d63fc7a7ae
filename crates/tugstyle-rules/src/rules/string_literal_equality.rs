// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compare strings with `equals` instead of `==` when one side is a literal.
//!
//! `a == "x"` and `"x" == a` both become `"x".equals(a)`. `!=` becomes the
//! negated call, `!"x".equals(a)`.

use tugstyle_java::visitor::walk_expr;
use tugstyle_java::{
    maybe_transform, Binary, BinaryOp, Container, Cursor, Effects, Expr, Formatting, Ident,
    JavaVisitor, LiteralKind, MethodCall, NodeId, Rule,
};

use super::simplify_boolean_expression::negate;

#[derive(Debug, Default)]
pub struct StringLiteralEquality {
    effects: Effects,
}

impl StringLiteralEquality {
    pub const NAME: &'static str = "StringLiteralEquality";

    pub fn new() -> Self {
        Self::default()
    }
}

fn is_string_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal(literal) if literal.kind == LiteralKind::String)
}

fn applies(binary: &Binary) -> bool {
    matches!(binary.op, BinaryOp::Eq | BinaryOp::Ne)
        && (is_string_literal(&binary.left) || is_string_literal(&binary.right))
}

fn rewrite(binary: &Binary) -> Expr {
    let (receiver, arg) = if is_string_literal(&binary.right) {
        (binary.right.as_ref(), binary.left.as_ref())
    } else {
        (binary.left.as_ref(), binary.right.as_ref())
    };
    let call = Expr::MethodCall(MethodCall {
        id: NodeId::fresh(),
        fmt: Formatting::default(),
        select: Some(Box::new(receiver.clone().with_fmt(Formatting::default()))),
        type_args: None,
        name: Ident::new("equals", Formatting::default()),
        args: Container::new(vec![arg.clone().with_fmt(Formatting::default())]),
    });
    match binary.op {
        BinaryOp::Ne => negate(call, binary.fmt.clone()),
        _ => call.with_fmt(binary.fmt.clone()),
    }
}

impl JavaVisitor for StringLiteralEquality {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let Expr::Binary(binary) = expr else {
            return walk_expr(self, expr, cursor);
        };
        maybe_transform(
            self,
            expr.id(),
            applies(binary),
            cursor,
            |v| walk_expr(v, expr, cursor),
            |_, recursed, _| match recursed {
                Expr::Binary(recursed) => Some(rewrite(recursed)),
                _ => None,
            },
        )
    }
}

impl Rule for StringLiteralEquality {
    fn name(&self) -> &str {
        Self::NAME
    }
}
