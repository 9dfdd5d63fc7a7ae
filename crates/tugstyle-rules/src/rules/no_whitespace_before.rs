// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove whitespace before tokens that bind to what precedes them.
//!
//! Covered by default: `,`, `;`, postfix `++` and `--`, and `...`. `DOT`,
//! `GENERIC_START`, `GENERIC_END` and `METHOD_REF` can be added through
//! `tokens`. The whitespace before a `)` is left to the paren padding rules.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{
    walk_class_decl, walk_compilation_unit, walk_expr, walk_member, walk_method, walk_stmt,
    walk_type_tree, walk_var_decls,
};
use tugstyle_java::{
    has_newline, ClassDecl, CompilationUnit, Container, Cursor, Effects, Expr, JavaVisitor,
    Member, MethodDecl, NodeRef, Rule, Stmt, TypeTree, UnaryOp, VarDecls,
};

use crate::format::is_blank;
use crate::token::Token;

#[derive(Debug)]
pub struct NoWhitespaceBefore {
    effects: Effects,
    allow_line_breaks: bool,
    tokens: BTreeSet<Token>,
}

impl NoWhitespaceBefore {
    pub const NAME: &'static str = "NoWhitespaceBefore";

    const DEFAULT_TOKENS: [Token; 5] = [
        Token::Comma,
        Token::Semi,
        Token::PostInc,
        Token::PostDec,
        Token::Ellipsis,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            allow_line_breaks: options.bool("allowLineBreaks", false),
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

    /// Strip the gaps before the commas of a list whose elements keep that
    /// gap in `suffix`. The last element's gap precedes the closing token.
    fn strip_commas<T>(&self, elems: &mut [T], suffix: impl Fn(&mut T) -> &mut String) -> bool {
        let mut changed = false;
        let len = elems.len();
        for elem in elems.iter_mut().take(len.saturating_sub(1)) {
            changed |= self.strip(Token::Comma, suffix(elem));
        }
        changed
    }

    /// `<` and `>` of a type argument or parameter list, and its commas.
    fn strip_generic<T>(
        &self,
        container: &mut Container<T>,
        before_open: bool,
        suffix: impl Fn(&mut T) -> &mut String,
    ) -> bool {
        let mut changed = before_open && self.strip(Token::GenericStart, &mut container.before);
        changed |= self.strip_commas(&mut container.elems, &suffix);
        match container.elems.last_mut() {
            Some(last) => changed |= self.strip(Token::GenericEnd, suffix(last)),
            None => changed |= self.strip(Token::GenericEnd, &mut container.empty),
        }
        changed
    }
}

impl Default for NoWhitespaceBefore {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

/// Whether the statement at `cursor` is part of a `for` header, where the
/// gap before `,` and `;` is handled with the loop.
fn is_for_init(stmt: &Stmt, cursor: &Cursor<'_>) -> bool {
    cursor.parent().is_ok_and(|parent| match parent.node() {
        NodeRef::Stmt(Stmt::For(for_loop)) => {
            for_loop.control.init.iter().any(|init| init.id() == stmt.id())
        }
        _ => false,
    })
}

fn is_empty_stmt(stmt: &Stmt) -> bool {
    matches!(stmt, Stmt::Empty(_))
}

impl JavaVisitor for NoWhitespaceBefore {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_compilation_unit<'a>(
        &mut self,
        unit: &'a CompilationUnit,
        cursor: &Cursor<'a>,
    ) -> CompilationUnit {
        let mut out = walk_compilation_unit(self, unit, cursor);
        let mut changed = false;
        if let Some(package) = out.package.as_mut() {
            changed |= self.strip(Token::Semi, &mut package.fmt.suffix);
        }
        for import in &mut out.imports {
            changed |= self.strip(Token::Semi, &mut import.fmt.suffix);
        }
        if changed {
            self.effects.record_change(unit.id);
        }
        out
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        let mut changed = false;
        if let Some(type_params) = out.type_params.as_mut() {
            changed |= self.strip_generic(type_params, true, |p| &mut p.fmt.suffix);
        }
        if let Some(constants) = out.body.enum_constants.as_mut() {
            let trailing_comma = constants.trailing_comma;
            let len = constants.constants.len();
            for (i, constant) in constants.constants.iter_mut().enumerate() {
                if i + 1 < len || trailing_comma {
                    changed |= self.strip(Token::Comma, &mut constant.fmt.suffix);
                }
            }
            if let Some(semicolon) = constants.semicolon.as_mut() {
                changed |= self.strip(Token::Semi, semicolon);
            }
        }
        if changed {
            self.effects.record_change(class.id);
        }
        out
    }

    fn visit_member<'a>(&mut self, member: &'a Member, cursor: &Cursor<'a>) -> Member {
        let mut out = walk_member(self, member, cursor);
        if let Member::Field(field) = &mut out {
            if self.strip(Token::Semi, &mut field.fmt.suffix) {
                self.effects.record_change(field.id);
            }
        }
        out
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        let mut changed = self.strip_commas(&mut out.params.elems, |p| &mut p.fmt.suffix);
        if let Some(type_params) = out.type_params.as_mut() {
            changed |= self.strip_generic(type_params, false, |p| &mut p.fmt.suffix);
        }
        if out.body.is_none() {
            changed |= self.strip(Token::Semi, &mut out.fmt.suffix);
        }
        if changed {
            self.effects.record_change(method.id);
        }
        out
    }

    fn visit_var_decls<'a>(&mut self, decls: &'a VarDecls, cursor: &Cursor<'a>) -> VarDecls {
        let mut out = walk_var_decls(self, decls, cursor);
        let mut changed = self.strip_commas(&mut out.vars, |v| &mut v.fmt.suffix);
        if let Some(varargs) = out.varargs.as_mut() {
            changed |= self.strip(Token::Ellipsis, varargs);
        }
        if changed {
            self.effects.record_change(decls.id);
        }
        out
    }

    fn visit_type_tree<'a>(&mut self, ty: &'a TypeTree, cursor: &Cursor<'a>) -> TypeTree {
        let mut out = walk_type_tree(self, ty, cursor);
        if let Some(args) = out.type_args.as_mut() {
            if self.strip_generic(args, true, |t| &mut t.fmt.suffix) {
                self.effects.record_change(ty.id);
            }
        }
        out
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let mut out = walk_stmt(self, stmt, cursor);
        let mut changed = false;
        if out.needs_semicolon() && !is_empty_stmt(&out) && !is_for_init(stmt, cursor) {
            changed |= self.strip(Token::Semi, &mut out.fmt_mut().suffix);
        }
        match &mut out {
            Stmt::For(for_loop) => {
                let control = &mut for_loop.control;
                match control.init.as_mut_slice() {
                    [Stmt::LocalVar(decls)] => {
                        changed |= self.strip(Token::Semi, &mut decls.fmt.suffix);
                    }
                    [Stmt::Empty(empty)] => {
                        changed |= self.strip(Token::Semi, &mut empty.fmt.prefix);
                    }
                    inits => {
                        changed |= self.strip_commas(inits, |s| &mut s.fmt_mut().suffix);
                        if let Some(last) = inits.last_mut() {
                            changed |= self.strip(Token::Semi, &mut last.fmt_mut().suffix);
                        }
                    }
                }
                changed |= self.strip(Token::Semi, &mut control.condition.fmt_mut().suffix);
                changed |= self.strip_commas(&mut control.update, |e| &mut e.fmt_mut().suffix);
                if is_empty_stmt(&for_loop.body) {
                    changed |= self.strip(Token::Semi, &mut for_loop.body.fmt_mut().prefix);
                }
            }
            Stmt::ForEach(for_each) if is_empty_stmt(&for_each.body) => {
                changed |= self.strip(Token::Semi, &mut for_each.body.fmt_mut().prefix);
            }
            Stmt::While(while_loop) if is_empty_stmt(&while_loop.body) => {
                changed |= self.strip(Token::Semi, &mut while_loop.body.fmt_mut().prefix);
            }
            _ => {}
        }
        if changed {
            self.effects.record_change(stmt.id());
        }
        out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let mut out = walk_expr(self, expr, cursor);
        let changed = match &mut out {
            Expr::Unary(unary) if unary.op.is_postfix() => {
                let token = if unary.op == UnaryOp::PostInc {
                    Token::PostInc
                } else {
                    Token::PostDec
                };
                self.strip(token, &mut unary.op_prefix)
            }
            Expr::FieldAccess(access) => self.strip(Token::Dot, &mut access.target.fmt_mut().suffix),
            Expr::MethodCall(call) => {
                let mut changed = self.strip_commas(&mut call.args.elems, |e| &mut e.fmt_mut().suffix);
                if let Some(select) = call.select.as_mut() {
                    changed |= self.strip(Token::Dot, &mut select.fmt_mut().suffix);
                }
                changed
            }
            Expr::NewClass(new_class) => {
                self.strip_commas(&mut new_class.args.elems, |e| &mut e.fmt_mut().suffix)
            }
            Expr::ArrayInit(init) => {
                let mut changed = self.strip_commas(&mut init.elems, |e| &mut e.fmt_mut().suffix);
                if init.trailing_comma {
                    if let Some(last) = init.elems.last_mut() {
                        changed |= self.strip(Token::Comma, &mut last.fmt_mut().suffix);
                    }
                }
                changed
            }
            Expr::Lambda(lambda) => {
                self.strip_commas(&mut lambda.params.params.elems, |p| &mut p.fmt.suffix)
            }
            Expr::MemberRef(member_ref) => {
                self.strip(Token::MethodRef, &mut member_ref.target.fmt_mut().suffix)
            }
            _ => false,
        };
        if changed {
            self.effects.record_change(expr.id());
        }
        out
    }
}

impl Rule for NoWhitespaceBefore {
    fn name(&self) -> &str {
        Self::NAME
    }
}
