// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Add `final` to local variables that are never reassigned.
//!
//! A declaration qualifies when every variable it declares has an
//! initializer and no assignment, compound assignment, `++` or `--` in the
//! declaring scope names it. Shadowing in nested classes is not resolved,
//! so a same-named assignment anywhere in scope keeps the variable mutable.

use std::collections::BTreeSet;

use tugstyle_java::visitor::scope::{for_each_expr_in_stmt, for_each_expr_in_stmts};
use tugstyle_java::visitor::walk_var_decls;
use tugstyle_java::{
    Cursor, Effects, Expr, JavaVisitor, ModifierKind, Modifiers, NodeRef, Rule, Stmt, VarDecls,
};

#[derive(Debug, Default)]
pub struct FinalLocalVariable {
    effects: Effects,
}

impl FinalLocalVariable {
    pub const NAME: &'static str = "FinalLocalVariable";

    pub fn new() -> Self {
        Self::default()
    }
}

/// Names assigned or incremented anywhere in the scope that declares the
/// local at `cursor`. `None` when the declaration is not a plain local.
fn reassigned_in_scope(cursor: &Cursor<'_>) -> Option<BTreeSet<String>> {
    if !matches!(cursor.node(), NodeRef::Stmt(Stmt::LocalVar(_))) {
        return None;
    }
    let parent = cursor.parent().ok()?;
    let mut names = BTreeSet::new();
    let mut collect = |expr: &Expr| {
        let target = match expr {
            Expr::Assign(assign) => assign.target.unparenthesized(),
            Expr::Unary(unary) if unary.op.is_mutation() => unary.expr.unparenthesized(),
            _ => return,
        };
        if let Some(name) = target.as_ident() {
            names.insert(name.to_string());
        }
    };
    match parent.node() {
        NodeRef::Case(_) => {
            let switch = parent.parent().ok()?.node().as_stmt()?;
            for_each_expr_in_stmt(switch, &mut collect);
        }
        NodeRef::Stmt(stmt @ Stmt::For(_)) => for_each_expr_in_stmt(stmt, &mut collect),
        node => for_each_expr_in_stmts(&node.as_block()?.stmts, &mut collect),
    }
    Some(names)
}

impl JavaVisitor for FinalLocalVariable {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_var_decls<'a>(&mut self, decls: &'a VarDecls, cursor: &Cursor<'a>) -> VarDecls {
        let mut out = walk_var_decls(self, decls, cursor);
        if decls.is_final() || decls.vars.iter().any(|var| var.init.is_none()) {
            return out;
        }
        let Some(reassigned) = reassigned_in_scope(cursor) else {
            return out;
        };
        if decls.names().any(|name| reassigned.contains(name)) {
            return out;
        }
        out.add_modifier(ModifierKind::Final);
        self.effects.record_change(decls.id);
        out
    }
}

impl Rule for FinalLocalVariable {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_local_variables_are_made_final() {
        let before = "public class A {
    {
        int n = 1;
        for(int i = 0; i < n; i++) {
        }
    }
}
";
        let after = "public class A {
    {
        final int n = 1;
        for(int i = 0; i < n; i++) {
        }
    }
}
";
        assert_fix(FinalLocalVariable::new, before, after);
    }

    #[test]
    fn test_annotated_local() {
        assert_fix(
            FinalLocalVariable::new,
            "class A { void f() { @SuppressWarnings(\"x\") String s = g(); } }",
            "class A { void f() { @SuppressWarnings(\"x\") final String s = g(); } }",
        );
    }

    #[test]
    fn test_reassigned_variables_stay_mutable() {
        assert_unchanged(
            FinalLocalVariable::new(),
            "public class A {
    {
        int a, b = 1;
        a = 0;
        int c = 0;
        c += 2;
        int d = 0;
        while (d < 3) {
            d++;
        }
        switch (b) {
            case 0:
                int f = 1;
                break;
            default:
                f = 2;
        }
    }
}
",
        );
    }

    #[test]
    fn test_fields_parameters_and_loop_variables_are_left_alone() {
        assert_unchanged(
            FinalLocalVariable::new(),
            "class A {
    int field = 0;
    void f(int p) {
        for (String s : list()) {
            g(s);
        }
    }
}
",
        );
    }
}
