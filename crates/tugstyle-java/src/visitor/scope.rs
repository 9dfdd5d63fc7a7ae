// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only scope queries.
//!
//! These helpers look at the tree without rebuilding it: collecting the
//! names a scope declares, and iterating over every expression below a
//! statement or class body.

use std::collections::BTreeSet;

use super::cursor::{Cursor, NodeRef};
use crate::nodes::*;

// ============================================================================
// Expression iteration
// ============================================================================

/// Call `f` on `expr` and every expression nested in it, outer first.
///
/// Lambda bodies and anonymous class bodies are included.
pub fn for_each_expr<'a>(expr: &'a Expr, f: &mut dyn FnMut(&'a Expr)) {
    f(expr);
    match expr {
        Expr::Ident(_) | Expr::Literal(_) | Expr::Empty(_) => {}
        Expr::Binary(e) => {
            for_each_expr(&e.left, f);
            for_each_expr(&e.right, f);
        }
        Expr::Unary(e) => for_each_expr(&e.expr, f),
        Expr::Assign(e) => {
            for_each_expr(&e.target, f);
            for_each_expr(&e.value, f);
        }
        Expr::Parens(e) => for_each_expr(&e.inner, f),
        Expr::Ternary(e) => {
            for_each_expr(&e.condition, f);
            for_each_expr(&e.then_expr, f);
            for_each_expr(&e.else_expr, f);
        }
        Expr::InstanceOf(e) => for_each_expr(&e.expr, f),
        Expr::Cast(e) => for_each_expr(&e.expr, f),
        Expr::MethodCall(e) => {
            if let Some(select) = &e.select {
                for_each_expr(select, f);
            }
            for arg in &e.args.elems {
                for_each_expr(arg, f);
            }
        }
        Expr::FieldAccess(e) => for_each_expr(&e.target, f),
        Expr::ArrayAccess(e) => {
            for_each_expr(&e.array, f);
            for_each_expr(&e.index, f);
        }
        Expr::NewClass(e) => {
            for arg in &e.args.elems {
                for_each_expr(arg, f);
            }
            if let Some(body) = &e.body {
                for_each_expr_in_class_body(body, f);
            }
        }
        Expr::NewArray(e) => {
            for size in e.dims.iter().filter_map(|d| d.size.as_deref()) {
                for_each_expr(size, f);
            }
            if let Some(init) = &e.init {
                for elem in &init.elems {
                    for_each_expr(elem, f);
                }
            }
        }
        Expr::ArrayInit(e) => {
            for elem in &e.elems {
                for_each_expr(elem, f);
            }
        }
        Expr::Lambda(e) => match &e.body {
            LambdaBody::Expr(body) => for_each_expr(body, f),
            LambdaBody::Block(body) => for_each_expr_in_stmts(&body.stmts, f),
        },
        Expr::MemberRef(e) => for_each_expr(&e.target, f),
    }
}

pub fn for_each_expr_in_stmts<'a>(stmts: &'a [Stmt], f: &mut dyn FnMut(&'a Expr)) {
    for stmt in stmts {
        for_each_expr_in_stmt(stmt, f);
    }
}

fn for_each_expr_in_var_decls<'a>(decls: &'a VarDecls, f: &mut dyn FnMut(&'a Expr)) {
    for init in decls.vars.iter().filter_map(|v| v.init.as_ref()) {
        for_each_expr(&init.expr, f);
    }
}

/// Call `f` on every expression below `stmt`, in source order.
pub fn for_each_expr_in_stmt<'a>(stmt: &'a Stmt, f: &mut dyn FnMut(&'a Expr)) {
    match stmt {
        Stmt::Block(b) => for_each_expr_in_stmts(&b.stmts, f),
        Stmt::LocalVar(v) => for_each_expr_in_var_decls(v, f),
        Stmt::LocalClass(c) => for_each_expr_in_class_body(&c.body, f),
        Stmt::Expr(e) => for_each_expr(e, f),
        Stmt::If(s) => {
            for_each_expr(&s.condition.inner, f);
            for_each_expr_in_stmt(&s.then_stmt, f);
            if let Some(else_part) = &s.else_part {
                for_each_expr_in_stmt(&else_part.body, f);
            }
        }
        Stmt::For(s) => {
            for_each_expr_in_stmts(&s.control.init, f);
            for_each_expr(&s.control.condition, f);
            for update in &s.control.update {
                for_each_expr(update, f);
            }
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::ForEach(s) => {
            for_each_expr(&s.control.iterable, f);
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::While(s) => {
            for_each_expr(&s.condition.inner, f);
            for_each_expr_in_stmt(&s.body, f);
        }
        Stmt::DoWhile(s) => {
            for_each_expr_in_stmt(&s.body, f);
            for_each_expr(&s.condition.inner, f);
        }
        Stmt::Switch(s) => {
            for_each_expr(&s.selector.inner, f);
            for case in &s.cases {
                if let Some(pattern) = &case.pattern {
                    for_each_expr(pattern, f);
                }
                for_each_expr_in_stmts(&case.stmts, f);
            }
        }
        Stmt::Try(s) => {
            if let Some(resources) = &s.resources {
                for decl in &resources.decls {
                    for_each_expr_in_var_decls(decl, f);
                }
            }
            for_each_expr_in_stmts(&s.body.stmts, f);
            for catch in &s.catches {
                for_each_expr_in_stmts(&catch.body.stmts, f);
            }
            if let Some(finally) = &s.finally {
                for_each_expr_in_stmts(&finally.body.stmts, f);
            }
        }
        Stmt::Synchronized(s) => {
            for_each_expr(&s.lock.inner, f);
            for_each_expr_in_stmts(&s.body.stmts, f);
        }
        Stmt::Return(s) => {
            if let Some(expr) = &s.expr {
                for_each_expr(expr, f);
            }
        }
        Stmt::Throw(s) => for_each_expr(&s.expr, f),
        Stmt::Labeled(s) => for_each_expr_in_stmt(&s.stmt, f),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) => {}
    }
}

/// Call `f` on every expression in field initializers, method bodies,
/// initializers and nested classes of `body`.
pub fn for_each_expr_in_class_body<'a>(body: &'a ClassBody, f: &mut dyn FnMut(&'a Expr)) {
    if let Some(constants) = &body.enum_constants {
        for constant in &constants.constants {
            if let Some(args) = &constant.args {
                for arg in &args.elems {
                    for_each_expr(arg, f);
                }
            }
            if let Some(body) = &constant.body {
                for_each_expr_in_class_body(body, f);
            }
        }
    }
    for member in &body.members {
        match member {
            Member::Field(field) => for_each_expr_in_var_decls(field, f),
            Member::Method(method) => {
                if let Some(body) = &method.body {
                    for_each_expr_in_stmts(&body.stmts, f);
                }
            }
            Member::Class(class) => for_each_expr_in_class_body(&class.body, f),
            Member::Initializer(block) => for_each_expr_in_stmts(&block.stmts, f),
            Member::Empty(_) => {}
        }
    }
}

// ============================================================================
// Declared names
// ============================================================================

fn add_var_names(decls: &VarDecls, out: &mut BTreeSet<String>) {
    out.extend(decls.names().map(str::to_string));
}

fn add_lambda_names(expr: &Expr, out: &mut BTreeSet<String>) {
    if let Expr::Lambda(lambda) = expr {
        out.extend(lambda.params.params.elems.iter().map(|p| p.name.name.clone()));
        if let LambdaBody::Block(body) = &lambda.body {
            declared_names_in_stmts(&body.stmts, out);
        }
    }
}

pub fn declared_names_in_stmts(stmts: &[Stmt], out: &mut BTreeSet<String>) {
    for stmt in stmts {
        declared_names_in_stmt(stmt, out);
    }
}

/// Names of every local variable, parameter and lambda parameter declared
/// in `stmt`, nested scopes included.
pub fn declared_names_in_stmt(stmt: &Stmt, out: &mut BTreeSet<String>) {
    match stmt {
        Stmt::LocalVar(decls) => add_var_names(decls, out),
        Stmt::Block(b) => declared_names_in_stmts(&b.stmts, out),
        Stmt::If(s) => {
            declared_names_in_stmt(&s.then_stmt, out);
            if let Some(else_part) = &s.else_part {
                declared_names_in_stmt(&else_part.body, out);
            }
        }
        Stmt::For(s) => {
            declared_names_in_stmts(&s.control.init, out);
            declared_names_in_stmt(&s.body, out);
        }
        Stmt::ForEach(s) => {
            add_var_names(&s.control.var, out);
            declared_names_in_stmt(&s.body, out);
        }
        Stmt::While(s) => declared_names_in_stmt(&s.body, out),
        Stmt::DoWhile(s) => declared_names_in_stmt(&s.body, out),
        Stmt::Switch(s) => {
            for case in &s.cases {
                declared_names_in_stmts(&case.stmts, out);
            }
        }
        Stmt::Try(s) => {
            if let Some(resources) = &s.resources {
                for decl in &resources.decls {
                    add_var_names(decl, out);
                }
            }
            declared_names_in_stmts(&s.body.stmts, out);
            for catch in &s.catches {
                add_var_names(&catch.param, out);
                declared_names_in_stmts(&catch.body.stmts, out);
            }
            if let Some(finally) = &s.finally {
                declared_names_in_stmts(&finally.body.stmts, out);
            }
        }
        Stmt::Synchronized(s) => declared_names_in_stmts(&s.body.stmts, out),
        Stmt::Labeled(s) => declared_names_in_stmt(&s.stmt, out),
        _ => {}
    }
    for_each_expr_in_direct_stmt(stmt, &mut |expr| add_lambda_names(expr, out));
}

/// Like [`for_each_expr_in_stmt`] but without descending into nested
/// statements, which [`declared_names_in_stmt`] already visits.
fn for_each_expr_in_direct_stmt<'a>(stmt: &'a Stmt, f: &mut dyn FnMut(&'a Expr)) {
    match stmt {
        Stmt::Expr(e) => for_each_expr(e, f),
        Stmt::LocalVar(v) => for_each_expr_in_var_decls(v, f),
        Stmt::Return(Return { expr: Some(e), .. }) => for_each_expr(e, f),
        Stmt::Throw(t) => for_each_expr(&t.expr, f),
        _ => {}
    }
}

/// Names of the fields declared directly in `body`.
pub fn field_names(body: &ClassBody) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for field in body.fields() {
        add_var_names(field, &mut out);
    }
    if let Some(constants) = &body.enum_constants {
        out.extend(constants.constants.iter().map(|c| c.name.name.clone()));
    }
    out
}

/// Every name a new variable at `cursor` could collide with.
///
/// Collects the locals and parameters of the enclosing method, initializer
/// or lambda, and the fields of every enclosing class.
pub fn names_in_scope(cursor: &Cursor<'_>) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut in_member = false;
    for frame in cursor.ancestors() {
        match frame.node() {
            NodeRef::Method(method) => {
                if !in_member {
                    for param in &method.params.elems {
                        add_var_names(param, &mut out);
                    }
                    if let Some(body) = &method.body {
                        declared_names_in_stmts(&body.stmts, &mut out);
                    }
                    in_member = true;
                }
            }
            NodeRef::Expr(expr @ Expr::Lambda(_)) if !in_member => {
                add_lambda_names(expr, &mut out);
            }
            NodeRef::Block(block) if !in_member => {
                declared_names_in_stmts(&block.stmts, &mut out);
            }
            NodeRef::Class(class) | NodeRef::Stmt(Stmt::LocalClass(class)) => {
                out.extend(field_names(&class.body));
                in_member = true;
            }
            _ => {}
        }
    }
    out
}
