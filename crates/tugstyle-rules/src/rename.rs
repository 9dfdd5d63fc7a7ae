// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Scoped renaming of a variable and its references.
//!
//! [`RenameVariable`] is queued by rules that pick a new name for a
//! declaration. It runs as a deferred visitor in the next pass, renaming the
//! declaration itself and every reference to it inside the declaration's
//! scope.

use tugstyle_java::visitor::{
    walk_compilation_unit, walk_expr, walk_lambda_param, walk_named_var,
};
use tugstyle_java::{
    maybe_transform, CompilationUnit, Cursor, Effects, Expr, JavaVisitor, LambdaParam, NamedVar,
    NodeId, Rule,
};

/// How references are found.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// A local variable or parameter. Only simple names after the
    /// declaration refer to it.
    Local,
    /// A field. Simple names anywhere in the class refer to it, as do
    /// `this.name` and `Qualifier.name` for each listed qualifier.
    Field { qualifiers: Vec<String> },
}

/// Rename one declaration and the references to it within `scope`.
#[derive(Debug)]
pub struct RenameVariable {
    effects: Effects,
    decl: NodeId,
    scope: NodeId,
    from: String,
    to: String,
    binding: Binding,
    /// Whether the declaration has been passed in the current traversal.
    declared: bool,
}

impl RenameVariable {
    pub const NAME: &'static str = "RenameVariable";

    /// Rename a local variable, parameter or lambda parameter.
    ///
    /// `decl` is the id of the [`NamedVar`] or [`LambdaParam`]; `scope` is
    /// the block, statement, method or lambda that owns it.
    pub fn local(decl: NodeId, scope: NodeId, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::with_binding(decl, scope, from.into(), to.into(), Binding::Local)
    }

    /// Rename a field of the class `scope`.
    ///
    /// `class_name` qualifies static references such as `Owner.FIELD`.
    pub fn field(
        decl: NodeId,
        scope: NodeId,
        class_name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let qualifiers = vec!["this".to_string(), class_name.into()];
        Self::with_binding(decl, scope, from.into(), to.into(), Binding::Field { qualifiers })
    }

    fn with_binding(decl: NodeId, scope: NodeId, from: String, to: String, binding: Binding) -> Self {
        let mut rename = Self {
            effects: Effects::default(),
            decl,
            scope,
            from,
            to,
            binding,
            declared: false,
        };
        rename.reset();
        rename
    }

    /// Fields are in scope before their declaration; locals are not.
    fn reset(&mut self) {
        self.declared = matches!(self.binding, Binding::Field { .. });
    }

    fn is_reference(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Ident(ident) => ident.name == self.from,
            Expr::FieldAccess(access) => match &self.binding {
                Binding::Field { qualifiers } => {
                    access.name.name == self.from
                        && access
                            .target
                            .as_ident()
                            .is_some_and(|q| qualifiers.iter().any(|known| known == q))
                }
                Binding::Local => false,
            },
            _ => false,
        }
    }

    fn renamed(&self, expr: &Expr) -> Option<Expr> {
        match expr {
            Expr::Ident(ident) => {
                let mut ident = ident.clone();
                ident.name = self.to.clone();
                Some(Expr::Ident(ident))
            }
            Expr::FieldAccess(access) => {
                let mut access = access.clone();
                access.name.name = self.to.clone();
                Some(Expr::FieldAccess(access))
            }
            _ => None,
        }
    }
}

impl JavaVisitor for RenameVariable {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_compilation_unit<'a>(
        &mut self,
        unit: &'a CompilationUnit,
        cursor: &Cursor<'a>,
    ) -> CompilationUnit {
        self.reset();
        walk_compilation_unit(self, unit, cursor)
    }

    fn visit_named_var<'a>(&mut self, var: &'a NamedVar, cursor: &Cursor<'a>) -> NamedVar {
        let mut var = walk_named_var(self, var, cursor);
        if var.id == self.decl && var.name.name == self.from {
            var.name.name = self.to.clone();
            self.declared = true;
            self.effects.record_change(var.id);
        }
        var
    }

    fn visit_lambda_param<'a>(&mut self, param: &'a LambdaParam, cursor: &Cursor<'a>) -> LambdaParam {
        let mut param = walk_lambda_param(self, param, cursor);
        if param.id == self.decl && param.name.name == self.from {
            param.name.name = self.to.clone();
            self.declared = true;
            self.effects.record_change(param.id);
        }
        param
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let condition =
            self.declared && self.is_reference(expr) && cursor.is_same_or_descendant_of(self.scope);
        maybe_transform(
            self,
            expr.id(),
            condition,
            cursor,
            |v| walk_expr(v, expr, cursor),
            |v, recursed, _| v.renamed(recursed),
        )
    }
}

impl Rule for RenameVariable {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugstyle_java::{parse_compilation_unit, Codegen, Member, Scheduler, Stmt};

    fn run(rule: RenameVariable, unit: tugstyle_java::CompilationUnit) -> String {
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(rule)];
        Scheduler::default()
            .run(unit, &mut rules)
            .unwrap()
            .unit
            .to_source()
    }

    #[test]
    fn test_local_rename_skips_earlier_field_use() {
        let source = "class A { int x; void f() { x = 1; int x = 2; use(x); } }";
        let unit = parse_compilation_unit(source).unwrap();
        let Member::Method(method) = &unit.types[0].body.members[1] else {
            panic!("expected method");
        };
        let body = method.body.as_ref().unwrap();
        let Stmt::LocalVar(decls) = &body.stmts[1] else {
            panic!("expected local");
        };
        let rule = RenameVariable::local(decls.vars[0].id, body.id, "x", "x1");
        assert_eq!(
            run(rule, unit.clone()),
            "class A { int x; void f() { x = 1; int x1 = 2; use(x1); } }"
        );
    }

    #[test]
    fn test_each_run_starts_before_the_declaration() {
        let source = "class A { int x; void f() { x = 1; int x = 2; use(x); } }";
        let unit = parse_compilation_unit(source).unwrap();
        let Member::Method(method) = &unit.types[0].body.members[1] else {
            panic!("expected method");
        };
        let body = method.body.as_ref().unwrap();
        let Stmt::LocalVar(decls) = &body.stmts[1] else {
            panic!("expected local");
        };
        let mut rule = RenameVariable::local(decls.vars[0].id, body.id, "x", "x1");
        let first = rule.visit_compilation_unit(&unit, &Cursor::root(&unit));
        assert_eq!(
            first.to_source(),
            "class A { int x; void f() { x = 1; int x1 = 2; use(x1); } }"
        );
        // A second traversal over the original tree must not carry over the
        // state of the first.
        let second = rule.visit_compilation_unit(&unit, &Cursor::root(&unit));
        assert_eq!(second.to_source(), first.to_source());
    }

    #[test]
    fn test_field_rename_covers_qualified_references() {
        let source = "class A { void f() { use(MY_VAR, this.MY_VAR, A.MY_VAR, other.MY_VAR); } static int MY_VAR; }";
        let unit = parse_compilation_unit(source).unwrap();
        let class = &unit.types[0];
        let field = class.body.fields().next().unwrap();
        let rule = RenameVariable::field(field.vars[0].id, class.id, "A", "MY_VAR", "myVar");
        assert_eq!(
            run(rule, unit.clone()),
            "class A { void f() { use(myVar, this.myVar, A.myVar, other.MY_VAR); } static int myVar; }"
        );
    }
}
