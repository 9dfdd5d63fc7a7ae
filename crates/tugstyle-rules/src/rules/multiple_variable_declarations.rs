// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! One variable per declaration.
//!
//! `int a = 0, b;` becomes `int a = 0;` followed by `int b;` on its own line.
//! Array dimensions written after a later name keep their meaning: the
//! dimensions of the shared type move behind that name, so
//! `Integer[] q, r[]` yields `Integer[] q;` and `Integer r[][];`.
//! Declarations in a `for` header are left alone.

use tugstyle_java::{
    Cursor, Effects, JavaVisitor, Member, NodeId, NodeRef, Rule, Stmt, Transform, VarDecls,
};

use crate::format::same_line_start;

#[derive(Debug, Default)]
pub struct MultipleVariableDeclarations {
    effects: Effects,
}

impl MultipleVariableDeclarations {
    pub const NAME: &'static str = "MultipleVariableDeclarations";

    pub fn new() -> Self {
        Self::default()
    }
}

/// Split `decls` into one declaration per variable.
fn split(decls: VarDecls) -> Vec<VarDecls> {
    let line = same_line_start(&decls.fmt.prefix);
    let end = decls
        .vars
        .last()
        .map(|var| var.fmt.suffix.clone())
        .unwrap_or_default();
    let mut template = decls.clone();
    template.vars.clear();

    let mut out = Vec::with_capacity(decls.vars.len());
    for (i, mut var) in decls.vars.into_iter().enumerate() {
        var.fmt.suffix = end.clone();
        let mut single = template.clone();
        if i > 0 {
            single.id = NodeId::fresh();
            single.fmt.prefix = line.clone();
            single.ty.id = NodeId::fresh();
            for modifier in &mut single.modifiers {
                modifier.id = NodeId::fresh();
            }
            var.fmt.prefix = " ".to_string();
            if !var.dims.is_empty() {
                let mut dims = std::mem::take(&mut single.ty.dims);
                dims.append(&mut var.dims);
                var.dims = dims;
            }
        }
        single.vars.push(var);
        out.push(single);
    }
    out
}

fn is_statement_list(cursor: &Cursor<'_>) -> bool {
    cursor.parent().is_ok_and(|parent| {
        parent.node().as_block().is_some() || matches!(parent.node(), NodeRef::Case(_))
    })
}

impl JavaVisitor for MultipleVariableDeclarations {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_stmt_in_list<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Transform<Stmt> {
        let recursed = self.visit_stmt(stmt, cursor);
        match recursed {
            Stmt::LocalVar(decls) if decls.vars.len() > 1 && is_statement_list(cursor) => {
                self.effects.record_change(decls.id);
                Transform::Flatten(split(decls).into_iter().map(Stmt::LocalVar).collect())
            }
            other => Transform::Keep(other),
        }
    }

    fn visit_member_in_list<'a>(
        &mut self,
        member: &'a Member,
        cursor: &Cursor<'a>,
    ) -> Transform<Member> {
        match self.visit_member(member, cursor) {
            Member::Field(decls) if decls.vars.len() > 1 => {
                self.effects.record_change(decls.id);
                Transform::Flatten(split(decls).into_iter().map(Member::Field).collect())
            }
            other => Transform::Keep(other),
        }
    }
}

impl Rule for MultipleVariableDeclarations {
    fn name(&self) -> &str {
        Self::NAME
    }
}
