// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove parentheses that do not change how an expression parses.
//!
//! Parentheses around a literal or a name always go. Around anything else
//! they go when the surrounding context is not an operator, or when the
//! parenthesized expression binds tighter than the operator it is an operand
//! of. For operands of equal precedence, a left operand can always lose its
//! parentheses, a right operand only under the same associative operator.
//! `2 ^ (i >>> 8)` therefore becomes `2 ^ i >>> 8`, while `(2 ^ i) >>> 8`
//! is left alone.
//!
//! The parentheses of a single untyped lambda parameter are dropped too.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_expr;
use tugstyle_java::{
    maybe_transform, Binary, Cursor, Effects, EngineError, Expr, JavaVisitor, LiteralKind, NodeId,
    NodeRef, Parens, Rule, Stmt, INSTANCEOF_PRECEDENCE, TERNARY_PRECEDENCE,
};

use crate::format::is_blank;
use crate::token::Token;

const DEFAULT_TOKENS: [Token; 23] = [
    Token::Expr,
    Token::Ident,
    Token::NumDouble,
    Token::NumFloat,
    Token::NumInt,
    Token::NumLong,
    Token::StringLiteral,
    Token::LiteralNull,
    Token::LiteralFalse,
    Token::LiteralTrue,
    Token::Assign,
    Token::BandAssign,
    Token::BorAssign,
    Token::BsrAssign,
    Token::BxorAssign,
    Token::DivAssign,
    Token::MinusAssign,
    Token::ModAssign,
    Token::PlusAssign,
    Token::SlAssign,
    Token::SrAssign,
    Token::StarAssign,
    Token::Lambda,
];

#[derive(Debug)]
pub struct UnnecessaryParentheses {
    effects: Effects,
    tokens: BTreeSet<Token>,
    /// When set, only these parentheses are considered.
    target: Option<NodeId>,
}

impl UnnecessaryParentheses {
    pub const NAME: &'static str = "UnnecessaryParentheses";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            tokens: options.tokens(DEFAULT_TOKENS),
            target: None,
        }
    }

    /// Unwrap only the parentheses with id `target`, if they are
    /// unnecessary.
    pub fn targeted(target: NodeId) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    fn has(&self, token: Token) -> bool {
        self.tokens.contains(&token)
    }

    /// Whether `parens`, an operand in the context of `cursor`'s parent,
    /// can lose its parentheses.
    fn is_unnecessary(&self, parens: &Parens, cursor: &Cursor<'_>) -> Result<bool, EngineError> {
        let inner = parens.inner.as_ref();
        if let Some(token) = simple_operand_token(inner) {
            return Ok(self.has(token));
        }
        let precedence = inner.precedence();
        let parent = cursor.parent()?.node();
        let allowed = match parent {
            NodeRef::Expr(expr) => match expr {
                Expr::Binary(binary) => {
                    self.has(Token::Expr) && operand_binds_tighter(binary, parens.id, inner)
                }
                Expr::Unary(_) | Expr::Cast(_) | Expr::FieldAccess(_) | Expr::MemberRef(_) => {
                    self.has(Token::Expr) && precedence == 0
                }
                Expr::InstanceOf(_) => self.has(Token::Expr) && precedence < INSTANCEOF_PRECEDENCE,
                Expr::Ternary(_) => self.has(Token::Expr) && precedence < TERNARY_PRECEDENCE,
                Expr::Assign(assign) => {
                    assign.value.id() == parens.id && self.has(Token::of_assign(assign.op))
                }
                Expr::MethodCall(call) => {
                    let receiver = call.select.as_ref().is_some_and(|s| s.id() == parens.id);
                    self.has(Token::Expr) && (!receiver || precedence == 0)
                }
                Expr::ArrayAccess(access) => {
                    let array = access.array.id() == parens.id;
                    self.has(Token::Expr) && (!array || precedence == 0)
                }
                _ => self.has(Token::Expr),
            },
            NodeRef::NamedVar(_) => self.has(Token::Assign),
            _ => self.has(Token::Expr),
        };
        Ok(allowed)
    }

    fn unwrap(&self, parens: &Parens, cursor: &Cursor<'_>) -> Result<Option<Expr>, EngineError> {
        if !self.is_unnecessary(parens, cursor)? {
            return Ok(None);
        }
        let inner = parens.inner.as_ref().clone();
        let mut prefix = parens.fmt.prefix.clone();
        if !is_blank(&inner.fmt().prefix) {
            prefix.push_str(&inner.fmt().prefix);
        }
        let mut suffix = inner.fmt().suffix.clone();
        if is_blank(&suffix) {
            suffix.clear();
        }
        suffix.push_str(&parens.fmt.suffix);
        if prefix.is_empty() && needs_separator(&inner, cursor)? {
            prefix.push(' ');
        }
        let mut fmt = inner.fmt().clone();
        fmt.prefix = prefix;
        fmt.suffix = suffix;
        Ok(Some(inner.with_fmt(fmt)))
    }

    fn unwrap_lambda_param(&self, expr: &Expr) -> Option<Expr> {
        let Expr::Lambda(lambda) = expr else {
            return None;
        };
        let params = &lambda.params;
        if !params.parenthesized || params.params.len() != 1 || params.params.elems[0].ty.is_some() {
            return None;
        }
        let mut lambda = lambda.clone();
        lambda.params.parenthesized = false;
        let before = std::mem::take(&mut lambda.params.params.before);
        let param = &mut lambda.params.params.elems[0];
        param.fmt.prefix = before;
        param.fmt.suffix.clear();
        Some(Expr::Lambda(lambda))
    }
}

impl Default for UnnecessaryParentheses {
    fn default() -> Self {
        Self::new(&RuleOptions::new())
    }
}

/// The token of a literal or name, which may always be unwrapped.
fn simple_operand_token(expr: &Expr) -> Option<Token> {
    match expr {
        Expr::Ident(_) => Some(Token::Ident),
        Expr::Literal(literal) => match literal.kind {
            LiteralKind::Int => Some(Token::NumInt),
            LiteralKind::Long => Some(Token::NumLong),
            LiteralKind::Float => Some(Token::NumFloat),
            LiteralKind::Double => Some(Token::NumDouble),
            LiteralKind::String => Some(Token::StringLiteral),
            LiteralKind::True => Some(Token::LiteralTrue),
            LiteralKind::False => Some(Token::LiteralFalse),
            LiteralKind::Null => Some(Token::LiteralNull),
            LiteralKind::Char => None,
        },
        _ => None,
    }
}

/// Whether the operand with id `operand` of `binary` parses the same
/// without its parentheses.
fn operand_binds_tighter(binary: &Binary, operand: NodeId, inner: &Expr) -> bool {
    let child = inner.precedence();
    let parent = binary.op.precedence();
    if child != parent {
        return child < parent;
    }
    if binary.left.id() == operand {
        return true;
    }
    matches!(inner, Expr::Binary(b) if b.op == binary.op && binary.op.is_associative())
}

/// Whether removing the parentheses would glue the operand to the token
/// before it, as in `return(x)` or `a-(-b)`.
fn needs_separator(inner: &Expr, cursor: &Cursor<'_>) -> Result<bool, EngineError> {
    let parent = cursor.parent()?.node();
    let after_keyword = matches!(
        parent,
        NodeRef::Stmt(Stmt::Return(_) | Stmt::Throw(_)) | NodeRef::Case(_)
    ) || matches!(parent, NodeRef::Expr(Expr::InstanceOf(_)));
    let signed = matches!(inner, Expr::Unary(u) if !u.op.is_postfix());
    Ok(after_keyword || (signed && matches!(parent, NodeRef::Expr(Expr::Binary(_) | Expr::Unary(_)))))
}

impl JavaVisitor for UnnecessaryParentheses {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let targeted = self.target.is_none_or(|target| target == expr.id());
        match expr {
            Expr::Parens(parens) => {
                let condition = targeted
                    && self
                        .effects
                        .check(self.is_unnecessary(parens, cursor))
                        .unwrap_or(false);
                maybe_transform(
                    self,
                    expr.id(),
                    condition,
                    cursor,
                    |v| walk_expr(v, expr, cursor),
                    |v, recursed, cursor| match recursed {
                        Expr::Parens(p) => v.effects.check(v.unwrap(p, cursor)).flatten(),
                        _ => None,
                    },
                )
            }
            Expr::Lambda(_) => {
                let condition = self.target.is_none() && self.has(Token::Lambda);
                maybe_transform(
                    self,
                    expr.id(),
                    condition,
                    cursor,
                    |v| walk_expr(v, expr, cursor),
                    |v, recursed, _| v.unwrap_lambda_param(recursed),
                )
            }
            _ => walk_expr(self, expr, cursor),
        }
    }
}

impl Rule for UnnecessaryParentheses {
    fn name(&self) -> &str {
        Self::NAME
    }
}
