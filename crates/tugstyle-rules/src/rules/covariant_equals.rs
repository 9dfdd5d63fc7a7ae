// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Turn `boolean equals(T other)` into a real override of `equals(Object)`.
//!
//! A class that declares `equals` for its own type and no `equals(Object)`
//! gets the parameter retyped to `Object` and renamed to `o`, `@Override`
//! added, and a preamble that checks identity and class before casting back
//! to the old parameter name:
//!
//! ```text
//! if (this == o) return true;
//! if (o == null || getClass() != o.getClass()) return false;
//! Test t = (Test) o;
//! ```

use tugstyle_java::visitor::walk_method;
use tugstyle_java::{
    parse_statement, ClassDecl, Codegen, Cursor, Effects, EngineError, Formatting, JavaVisitor,
    MethodDecl, Modifier, ModifierKind, NodeRef, Rule, Stmt, TypeTree,
};

use crate::format::{nested_line_start, same_line_start};

#[derive(Debug, Default)]
pub struct CovariantEquals {
    effects: Effects,
}

impl CovariantEquals {
    pub const NAME: &'static str = "CovariantEquals";

    pub fn new() -> Self {
        Self::default()
    }
}

fn is_object(ty: &TypeTree) -> bool {
    matches!(ty.name.as_str(), "Object" | "java.lang.Object") && !ty.is_array()
}

fn single_param_type(method: &MethodDecl) -> Option<&TypeTree> {
    match method.params.elems.as_slice() {
        [param] if param.vars.len() == 1 && param.varargs.is_none() => Some(&param.ty),
        _ => None,
    }
}

fn is_boolean_equals(method: &MethodDecl) -> bool {
    method.name.name == "equals"
        && method
            .return_type
            .as_ref()
            .is_some_and(|ty| ty.name == "boolean" && !ty.is_array())
}

/// Whether `method` is `boolean equals(C)` for the class `class` that declares
/// no `equals(Object)`.
fn is_covariant_equals(method: &MethodDecl, class: &ClassDecl) -> bool {
    if !is_boolean_equals(method) || method.body.is_none() {
        return false;
    }
    let Some(ty) = single_param_type(method) else {
        return false;
    };
    if ty.simple_name() != class.name.name || ty.is_array() {
        return false;
    }
    !class.body.methods().any(|other| {
        is_boolean_equals(other) && single_param_type(other).is_some_and(is_object)
    })
}

fn has_override(method: &MethodDecl) -> bool {
    method.modifiers.iter().any(|m| {
        matches!(&m.kind, ModifierKind::Annotation(text)
            if text == "@Override" || text == "@java.lang.Override")
    })
}

/// Put `@Override` in front of the modifiers, on a line of its own when the
/// method starts a line.
fn add_override(method: &mut MethodDecl) {
    let line = same_line_start(&method.fmt.prefix);
    match method.modifiers.first_mut() {
        Some(first) => first.fmt.prefix = line,
        None => *method.after_modifiers_prefix_mut() = line,
    }
    method.modifiers.insert(
        0,
        Modifier::new(
            ModifierKind::Annotation("@Override".to_string()),
            Formatting::default(),
        ),
    );
}

fn preamble(class_type: &str, param: &str, local: &str) -> Result<Vec<Stmt>, EngineError> {
    [
        format!("if (this == {param}) return true;"),
        format!("if ({param} == null || getClass() != {param}.getClass()) return false;"),
        format!("{class_type} {local} = ({class_type}) {param};"),
    ]
    .iter()
    .map(|text| parse_statement(text).map_err(|e| EngineError::InvalidTree(e.to_string())))
    .collect()
}

fn rewrite(method: &MethodDecl) -> Result<MethodDecl, EngineError> {
    let mut out = method.clone();
    let (Some(param), Some(body)) = (out.params.elems.first_mut(), out.body.as_mut()) else {
        return Err(EngineError::InvalidTree("equals without parameter or body".into()));
    };
    let Some(var) = param.vars.first_mut() else {
        return Err(EngineError::InvalidTree("parameter without a name".into()));
    };

    let local = var.name.name.clone();
    let renamed = if local == "o" { "other" } else { "o" };
    let mut bare = param.ty.clone();
    bare.fmt = Formatting::default();
    let class_type = bare.to_source();
    var.name.name = renamed.to_string();
    param.ty = TypeTree::named("Object", param.ty.fmt.clone());

    let line = match body.stmts.first() {
        Some(first) => same_line_start(&first.fmt().prefix),
        None => nested_line_start(&method.fmt.prefix),
    };
    let mut stmts = preamble(&class_type, renamed, &local)?;
    for stmt in &mut stmts {
        stmt.fmt_mut().prefix = line.clone();
    }
    if let Some(first) = body.stmts.first_mut() {
        stmts[0].fmt_mut().prefix = std::mem::replace(&mut first.fmt_mut().prefix, line);
    } else if !body.end.contains('\n') {
        body.end = same_line_start(&method.fmt.prefix);
    }
    stmts.append(&mut body.stmts);
    body.stmts = stmts;

    if !has_override(&out) {
        add_override(&mut out);
    }
    Ok(out)
}

impl JavaVisitor for CovariantEquals {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let applies = match cursor.parent().map(|parent| parent.node()) {
            Ok(NodeRef::Class(class)) => is_covariant_equals(method, class),
            _ => false,
        };
        let recursed = walk_method(self, method, cursor);
        if !applies {
            return recursed;
        }
        match self.effects.check(rewrite(&recursed)) {
            Some(fixed) => {
                self.effects.record_change(method.id);
                fixed
            }
            None => recursed,
        }
    }
}

impl Rule for CovariantEquals {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_covariant_equals() {
        let before = "class Test {
    int n;

    public boolean equals(Test t) {
        return n == t.n;
    }
}
";
        let after = "class Test {
    int n;

    @Override
    public boolean equals(Object o) {
        if (this == o) return true;
        if (o == null || getClass() != o.getClass()) return false;
        Test t = (Test) o;
        return n == t.n;
    }
}
";
        assert_fix(CovariantEquals::new, before, after);
    }

    #[test]
    fn test_parameter_named_o() {
        let before = "class Test {
    int n;

    boolean equals(Test o) {
        return n == o.n;
    }
}
";
        let after = "class Test {
    int n;

    @Override
    boolean equals(Object other) {
        if (this == other) return true;
        if (other == null || getClass() != other.getClass()) return false;
        Test o = (Test) other;
        return n == o.n;
    }
}
";
        assert_fix(CovariantEquals::new, before, after);
    }

    #[test]
    fn test_existing_equals_object_is_left_alone() {
        assert_unchanged(
            CovariantEquals::new(),
            "class Test {
    public boolean equals(Test t) {
        return true;
    }

    @Override
    public boolean equals(Object o) {
        return o instanceof Test && equals((Test) o);
    }
}
",
        );
    }

    #[test]
    fn test_other_types_are_left_alone() {
        assert_unchanged(
            CovariantEquals::new(),
            "class Test {
    public boolean equals(String s) {
        return false;
    }
}
",
        );
    }
}
