// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rename local variables and parameters that hide a field.
//!
//! A declaration hides a field when the field is visible from it: a field of
//! an enclosing class, or a non-private field of a supertype declared in the
//! same file. Static code only sees static fields, and static nested types
//! do not see the instance fields of the types around them.
//!
//! The hiding declaration gets the next free name in the `n`, `n1`, `n2`
//! sequence, skipping names already used in its scope, names of supertype
//! members and names handed out earlier in the same file. The rename itself
//! is done by a deferred [`RenameVariable`].

use std::collections::{BTreeSet, HashSet};

use regex::Regex;
use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::scope::names_in_scope;
use tugstyle_java::visitor::{walk_lambda_param, walk_named_var};
use tugstyle_java::{
    ClassBody, ClassDecl, ClassKind, CompilationUnit, Cursor, Effects, EngineError, Expr,
    JavaVisitor, LambdaParam, MethodDecl, Modifiers, NamedVar, NodeId, NodeRef, Rule, Stmt,
    VarDecls, Visibility,
};

use crate::rename::RenameVariable;
use crate::token::Token;

#[derive(Debug)]
pub struct HiddenField {
    effects: Effects,
    ignore_format: Option<Regex>,
    ignore_constructor_parameter: bool,
    ignore_setter: bool,
    setter_can_return_its_class: bool,
    ignore_abstract_methods: bool,
    tokens: BTreeSet<Token>,
    queued: HashSet<NodeId>,
    /// New names handed out this pass, with the scope they are visible in.
    claimed: Vec<(NodeId, String)>,
}

impl HiddenField {
    pub const NAME: &'static str = "HiddenField";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            ignore_format: options.optional_regex("ignoreFormat"),
            ignore_constructor_parameter: options.bool("ignoreConstructorParameter", false),
            ignore_setter: options.bool("ignoreSetter", false),
            setter_can_return_its_class: options.bool("setterCanReturnItsClass", false),
            ignore_abstract_methods: options.bool("ignoreAbstractMethods", false),
            tokens: options.tokens([Token::VariableDef, Token::ParameterDef, Token::Lambda]),
            queued: HashSet::new(),
            claimed: Vec::new(),
        }
    }

    fn is_ignored_method(&self, method: &MethodDecl, name: &str, cursor: &Cursor<'_>) -> bool {
        if self.ignore_constructor_parameter && method.is_constructor() {
            return true;
        }
        if self.ignore_abstract_methods && method.is_abstract() {
            return true;
        }
        self.ignore_setter && self.is_setter_for(method, name, cursor)
    }

    fn is_setter_for(&self, method: &MethodDecl, name: &str, cursor: &Cursor<'_>) -> bool {
        let Some(property) = method.name.name.strip_prefix("set") else {
            return false;
        };
        if property.is_empty() || !property.eq_ignore_ascii_case(name) || method.params.len() != 1 {
            return false;
        }
        let Some(ret) = &method.return_type else {
            return false;
        };
        if ret.is_void() {
            return true;
        }
        self.setter_can_return_its_class
            && cursor
                .enclosing_class()
                .is_some_and(|class| class.name.name == ret.simple_name())
    }

    /// Whether `name` was already given to a declaration whose scope
    /// encloses the cursor.
    fn is_claimed(&self, name: &str, cursor: &Cursor<'_>) -> bool {
        self.claimed
            .iter()
            .any(|(scope, claimed)| claimed == name && cursor.is_same_or_descendant_of(*scope))
    }

    fn check(&mut self, decl: &Declaration<'_>, name: &str, cursor: &Cursor<'_>) {
        if !self.tokens.contains(&decl.token) || self.queued.contains(&decl.id) {
            return;
        }
        if self.ignore_format.as_ref().is_some_and(|re| re.is_match(name)) {
            return;
        }
        if decl
            .method
            .is_some_and(|method| self.is_ignored_method(method, name, cursor))
        {
            return;
        }
        let fields = visible_fields(cursor);
        if !fields.hidable.contains(name) {
            return;
        }

        let mut taken = names_in_scope(cursor);
        taken.extend(fields.hidable);
        taken.extend(fields.supertype_members);
        let mut candidate = next_name(name);
        while taken.contains(&candidate) || self.is_claimed(&candidate, cursor) {
            candidate = next_name(&candidate);
        }

        self.queued.insert(decl.id);
        self.claimed.push((decl.scope, candidate.clone()));
        self.effects.and_then(
            decl.id,
            RenameVariable::local(decl.id, decl.scope, name, candidate),
        );
    }
}

impl Default for HiddenField {
    fn default() -> Self {
        Self::new(&RuleOptions::new())
    }
}

/// A local variable, parameter or lambda parameter.
struct Declaration<'a> {
    id: NodeId,
    token: Token,
    /// The node the name is visible in.
    scope: NodeId,
    /// The method, for parameters.
    method: Option<&'a MethodDecl>,
}

/// Classify the variable at `cursor`. Fields give `None`.
fn classify_var<'a>(var: &NamedVar, cursor: &Cursor<'a>) -> Result<Option<Declaration<'a>>, EngineError> {
    let owner = cursor.parent()?.parent()?;
    let (token, scope, method) = match owner.node() {
        NodeRef::Class(_) | NodeRef::EnumConstant(_) => return Ok(None),
        NodeRef::Stmt(Stmt::LocalClass(_)) | NodeRef::Expr(Expr::NewClass(_)) => return Ok(None),
        NodeRef::Method(method) => (Token::ParameterDef, method.id, Some(method)),
        NodeRef::Catch(catch) => (Token::ParameterDef, catch.id, None),
        // A local in a switch group is visible in the later groups too.
        NodeRef::Case(_) => (Token::VariableDef, owner.parent()?.id(), None),
        _ => (Token::VariableDef, owner.id(), None),
    };
    Ok(Some(Declaration {
        id: var.id,
        token,
        scope,
        method,
    }))
}

#[derive(Debug, Default)]
struct VisibleFields {
    /// Fields a declaration at the cursor would hide.
    hidable: BTreeSet<String>,
    /// Non-private members of same-file supertypes, visible or not.
    supertype_members: BTreeSet<String>,
}

fn compilation_unit<'a>(cursor: &Cursor<'a>) -> Option<&'a CompilationUnit> {
    match cursor.ancestors().last()?.node() {
        NodeRef::CompilationUnit(unit) => Some(unit),
        _ => None,
    }
}

fn add_fields(body: &ClassBody, implicitly_static: bool, statics_only: bool, out: &mut BTreeSet<String>) {
    for field in body.fields() {
        if !statics_only || implicitly_static || field.is_static() {
            out.extend(field.names().map(str::to_string));
        }
    }
    if let Some(constants) = &body.enum_constants {
        out.extend(constants.constants.iter().map(|c| c.name.name.clone()));
    }
}

/// Non-private fields inherited by `class` from classes in the same file.
fn supertype_fields<'a>(unit: &'a CompilationUnit, class: &ClassDecl) -> Vec<&'a VarDecls> {
    let classes = unit.all_classes();
    let mut fields = Vec::new();
    let mut current = class.extends.as_ref().and_then(|e| e.types.first());
    // Bounded by the number of classes so an inheritance cycle terminates.
    for _ in 0..classes.len() {
        let Some(ty) = current else {
            break;
        };
        let Some(parent) = classes.iter().find(|c| c.name.name == ty.simple_name()) else {
            break;
        };
        fields.extend(
            parent
                .body
                .fields()
                .filter(|f| f.visibility() != Visibility::Private),
        );
        current = parent.extends.as_ref().and_then(|e| e.types.first());
    }
    fields
}

fn visible_fields(cursor: &Cursor<'_>) -> VisibleFields {
    let unit = compilation_unit(cursor);
    let mut visible = VisibleFields::default();
    let mut static_context = false;
    let mut outer_statics_only = false;

    for frame in cursor.ancestors().skip(1) {
        let node = frame.node();
        let (body, class) = match node {
            NodeRef::Method(method) => {
                static_context |= method.is_static();
                continue;
            }
            NodeRef::Block(block) => {
                static_context |= block.static_init.is_some();
                continue;
            }
            NodeRef::VarDecls(decls) => {
                static_context |= decls.is_static();
                continue;
            }
            NodeRef::Expr(Expr::NewClass(new)) => match &new.body {
                Some(body) => (body, None),
                None => continue,
            },
            NodeRef::EnumConstant(constant) => match &constant.body {
                Some(body) => (body, None),
                None => continue,
            },
            _ => match node.as_class() {
                Some(class) => (&class.body, Some(class)),
                None => continue,
            },
        };

        let statics_only = static_context || outer_statics_only;
        let implicitly_static = class.is_some_and(|c| c.kind == ClassKind::Interface);
        add_fields(body, implicitly_static, statics_only, &mut visible.hidable);

        if let (Some(class), Some(unit)) = (class, unit) {
            for field in supertype_fields(unit, class) {
                visible.supertype_members.extend(field.names().map(str::to_string));
                if !statics_only || field.is_static() {
                    visible.hidable.extend(field.names().map(str::to_string));
                }
            }
        }

        static_context = false;
        if class.is_some_and(|c| c.is_static() || c.kind != ClassKind::Class) {
            outer_statics_only = true;
        }
    }
    visible
}

/// `n` becomes `n1`, `n1` becomes `n2` and `n9` becomes `n10`.
fn next_name(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    match name[stem.len()..].parse::<u64>() {
        Ok(n) if !stem.is_empty() => format!("{stem}{}", n + 1),
        _ => format!("{name}1"),
    }
}

impl JavaVisitor for HiddenField {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_named_var<'a>(&mut self, var: &'a NamedVar, cursor: &Cursor<'a>) -> NamedVar {
        if let Some(Some(decl)) = self.effects.check(classify_var(var, cursor)) {
            self.check(&decl, &var.name.name, cursor);
        }
        walk_named_var(self, var, cursor)
    }

    fn visit_lambda_param<'a>(&mut self, param: &'a LambdaParam, cursor: &Cursor<'a>) -> LambdaParam {
        if let Some(lambda) = self.effects.check(cursor.parent()) {
            let decl = Declaration {
                id: param.id,
                token: Token::Lambda,
                scope: lambda.id(),
                method: None,
            };
            self.check(&decl, &param.name.name, cursor);
        }
        walk_lambda_param(self, param, cursor)
    }
}

impl Rule for HiddenField {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_next_name() {
        assert_eq!(next_name("n"), "n1");
        assert_eq!(next_name("n1"), "n2");
        assert_eq!(next_name("n9"), "n10");
        assert_eq!(next_name("a2b"), "a2b1");
    }

    #[test]
    fn test_renames_avoid_collisions() {
        let before = "public class B {
    protected int n2;
    int n3;
    private int n4;
}

class A extends B {
    int n;
    int n1;

    class C {
        public void foo(int n) {
            int n1 = 2;
            use(n, n1);
        }
    }

    static class D {
        public void foo(int n) {
        }
    }
}
";
        let after = "public class B {
    protected int n2;
    int n3;
    private int n4;
}

class A extends B {
    int n;
    int n1;

    class C {
        public void foo(int n4) {
            int n5 = 2;
            use(n4, n5);
        }
    }

    static class D {
        public void foo(int n) {
        }
    }
}
";
        assert_fix(HiddenField::default, before, after);
    }

    #[test]
    fn test_names_are_reused_across_unrelated_scopes() {
        assert_fix(
            HiddenField::default,
            "class A { int n; void f() { int n = 0; } void g() { int n = 0; } }",
            "class A { int n; void f() { int n1 = 0; } void g() { int n1 = 0; } }",
        );
    }

    #[test]
    fn test_field_uses_before_local_keep_their_name() {
        assert_fix(
            HiddenField::default,
            "class A { int count; void f() { count++; int count = 0; count++; } }",
            "class A { int count; void f() { count++; int count1 = 0; count1++; } }",
        );
    }

    #[test]
    fn test_lambda_parameter() {
        assert_fix(
            HiddenField::default,
            "class A { int x; void f() { run(x -> x + 1); } }",
            "class A { int x; void f() { run(x1 -> x1 + 1); } }",
        );
    }

    #[test]
    fn test_static_method_only_sees_static_fields() {
        assert_unchanged(
            HiddenField::default(),
            "class A { int n; static void f(int n) { } }",
        );
        assert_fix(
            HiddenField::default,
            "class A { static int n; static void f(int n) { } }",
            "class A { static int n; static void f(int n1) { } }",
        );
    }

    #[test]
    fn test_ignore_format() {
        let options = RuleOptions::new().with("ignoreFormat", "^n$");
        assert_unchanged(
            HiddenField::new(&options),
            "class A { int n; void foo(int n) { } }",
        );
    }

    #[test]
    fn test_ignore_constructor_parameter() {
        let source = "class A { int n; A(int n) { } }";
        let options = RuleOptions::new().with("ignoreConstructorParameter", "true");
        assert_unchanged(HiddenField::new(&options), source);
        assert_fix(
            HiddenField::default,
            source,
            "class A { int n; A(int n1) { } }",
        );
    }

    #[test]
    fn test_ignore_setter() {
        let options = RuleOptions::new().with("ignoreSetter", "true");
        assert_fix(
            || HiddenField::new(&options),
            "class A { int n; void setN(int n) { } A setN(int n) { return this; } }",
            "class A { int n; void setN(int n) { } A setN(int n1) { return this; } }",
        );
        let options = options.with("setterCanReturnItsClass", "true");
        assert_unchanged(
            HiddenField::new(&options),
            "class A { int n; A setN(int n) { return this; } }",
        );
    }

    #[test]
    fn test_ignore_abstract_methods() {
        let options = RuleOptions::new().with("ignoreAbstractMethods", "true");
        assert_unchanged(
            HiddenField::new(&options),
            "abstract class A { int n; abstract void foo(int n); }",
        );
    }

    #[test]
    fn test_tokens_limit_declaration_kinds() {
        let options = RuleOptions::new().with("tokens", "PARAMETER_DEF");
        assert_fix(
            || HiddenField::new(&options),
            "class A { int n; void foo(int n) { int m = 0; } void bar() { int n = 0; } }",
            "class A { int n; void foo(int n1) { int m = 0; } void bar() { int n = 0; } }",
        );
    }
}
