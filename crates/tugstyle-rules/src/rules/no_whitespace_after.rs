// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove whitespace after tokens that bind to what follows them.
//!
//! Covered by default: prefix unary operators, the `.` of member selection,
//! `@` of annotations, array declarators and index operators, and the inside
//! of array initializer braces. `TYPECAST`, `METHOD_REF` and
//! `LITERAL_SYNCHRONIZED` can be added through `tokens`. Whitespace holding
//! a comment is never touched. With `allowLineBreaks` a gap that breaks the
//! line is kept.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{
    walk_class_decl, walk_enum_constant, walk_expr, walk_method, walk_stmt, walk_type_tree,
    walk_var_decls,
};
use tugstyle_java::{
    has_newline, ArrayInit, ClassDecl, Cursor, Effects, EnumConstant, Expr, JavaVisitor,
    MethodDecl, Modifier, ModifierKind, Rule, Stmt, TypeTree, UnaryOp, VarDecls,
};

use crate::format::is_blank;
use crate::token::Token;

#[derive(Debug)]
pub struct NoWhitespaceAfter {
    effects: Effects,
    allow_line_breaks: bool,
    tokens: BTreeSet<Token>,
}

impl NoWhitespaceAfter {
    pub const NAME: &'static str = "NoWhitespaceAfter";

    const DEFAULT_TOKENS: [Token; 11] = [
        Token::ArrayInit,
        Token::At,
        Token::Inc,
        Token::Dec,
        Token::UnaryMinus,
        Token::UnaryPlus,
        Token::Bnot,
        Token::Lnot,
        Token::Dot,
        Token::ArrayDeclarator,
        Token::IndexOp,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            allow_line_breaks: options.bool("allowLineBreaks", true),
            tokens: options.tokens(Self::DEFAULT_TOKENS),
        }
    }

    /// Empty `gap` if `token` is checked and the gap is plain whitespace.
    fn strip(&self, token: Token, gap: &mut String) -> bool {
        if !self.tokens.contains(&token) || gap.is_empty() || !is_blank(gap) {
            return false;
        }
        if self.allow_line_breaks && has_newline(gap) {
            return false;
        }
        gap.clear();
        true
    }

    fn strip_annotations(&self, modifiers: &mut [Modifier]) -> bool {
        if !self.tokens.contains(&Token::At) {
            return false;
        }
        let mut changed = false;
        for modifier in modifiers {
            if let ModifierKind::Annotation(text) = &mut modifier.kind {
                let rest = &text[1..];
                let trimmed = rest.trim_start();
                if trimmed.len() != rest.len() && !trimmed.starts_with('/') {
                    *text = format!("@{trimmed}");
                    changed = true;
                }
            }
        }
        changed
    }

    fn strip_array_init(&self, init: &mut ArrayInit) -> bool {
        let trailing_comma = init.trailing_comma;
        let Some(first) = init.elems.first_mut() else {
            return false;
        };
        let mut changed = self.strip(Token::ArrayInit, &mut first.fmt_mut().prefix);
        if trailing_comma {
            changed |= self.strip(Token::ArrayInit, &mut init.end);
        } else if let Some(last) = init.elems.last_mut() {
            changed |= self.strip(Token::ArrayInit, &mut last.fmt_mut().suffix);
        }
        changed
    }
}

impl Default for NoWhitespaceAfter {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

fn unary_token(op: UnaryOp) -> Option<Token> {
    match op {
        UnaryOp::Not => Some(Token::Lnot),
        UnaryOp::Neg => Some(Token::UnaryMinus),
        UnaryOp::Pos => Some(Token::UnaryPlus),
        UnaryOp::Complement => Some(Token::Bnot),
        UnaryOp::PreInc => Some(Token::Inc),
        UnaryOp::PreDec => Some(Token::Dec),
        UnaryOp::PostInc | UnaryOp::PostDec => None,
    }
}

impl JavaVisitor for NoWhitespaceAfter {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        if self.strip_annotations(&mut out.modifiers) {
            self.effects.record_change(class.id);
        }
        out
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        if self.strip_annotations(&mut out.modifiers) {
            self.effects.record_change(method.id);
        }
        out
    }

    fn visit_var_decls<'a>(&mut self, decls: &'a VarDecls, cursor: &Cursor<'a>) -> VarDecls {
        let mut out = walk_var_decls(self, decls, cursor);
        if self.strip_annotations(&mut out.modifiers) {
            self.effects.record_change(decls.id);
        }
        out
    }

    fn visit_enum_constant<'a>(
        &mut self,
        constant: &'a EnumConstant,
        cursor: &Cursor<'a>,
    ) -> EnumConstant {
        let mut out = walk_enum_constant(self, constant, cursor);
        if self.strip_annotations(&mut out.modifiers) {
            self.effects.record_change(constant.id);
        }
        out
    }

    fn visit_type_tree<'a>(&mut self, ty: &'a TypeTree, cursor: &Cursor<'a>) -> TypeTree {
        let mut out = walk_type_tree(self, ty, cursor);
        let mut changed = false;
        for dim in &mut out.dims {
            changed |= self.strip(Token::ArrayDeclarator, &mut dim.before);
        }
        if changed {
            self.effects.record_change(ty.id);
        }
        out
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let mut out = walk_stmt(self, stmt, cursor);
        if let Stmt::Synchronized(sync) = &mut out {
            if self.strip(Token::LiteralSynchronized, &mut sync.lock.fmt.prefix) {
                self.effects.record_change(stmt.id());
            }
        }
        out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let mut out = walk_expr(self, expr, cursor);
        let changed = match &mut out {
            Expr::Unary(unary) => match unary_token(unary.op) {
                Some(token) => self.strip(token, &mut unary.expr.fmt_mut().prefix),
                None => false,
            },
            Expr::FieldAccess(access) => self.strip(Token::Dot, &mut access.name.fmt.prefix),
            Expr::MethodCall(call) if call.select.is_some() && call.type_args.is_none() => {
                self.strip(Token::Dot, &mut call.name.fmt.prefix)
            }
            Expr::ArrayAccess(access) => self.strip(Token::IndexOp, &mut access.array.fmt_mut().suffix),
            Expr::Cast(cast) => self.strip(Token::Typecast, &mut cast.expr.fmt_mut().prefix),
            Expr::MemberRef(member_ref) => self.strip(Token::MethodRef, &mut member_ref.name.fmt.prefix),
            Expr::ArrayInit(init) => self.strip_array_init(init),
            Expr::NewArray(new_array) => {
                let mut changed = false;
                for dim in &mut new_array.dims {
                    changed |= self.strip(Token::ArrayDeclarator, &mut dim.before);
                }
                if let Some(init) = new_array.init.as_mut() {
                    changed |= self.strip_array_init(init);
                }
                changed
            }
            _ => false,
        };
        if changed {
            self.effects.record_change(expr.id());
        }
        out
    }
}

impl Rule for NoWhitespaceAfter {
    fn name(&self) -> &str {
        Self::NAME
    }
}
