// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tighten whitespace around `<` and `>` of generics.
//!
//! No whitespace is left just inside the angle brackets, before the `<` of a
//! generic type, class type parameters or diamond, or around the type
//! arguments of a method call. The `<` of a generic method declaration
//! follows modifiers, so the gap before it is kept. Gaps that contain a line
//! break or a comment are left alone.

use tugstyle_java::visitor::{walk_class_decl, walk_expr, walk_method, walk_type_tree};
use tugstyle_java::{
    ClassDecl, Container, Cursor, Effects, Expr, Formatting, JavaVisitor, MethodDecl, Rule,
    TypeParam, TypeTree,
};

use crate::policy::PadPolicy;

const NO_SPACE: PadPolicy = PadPolicy::NoSpace;

#[derive(Debug, Default)]
pub struct GenericWhitespace {
    effects: Effects,
}

impl GenericWhitespace {
    pub const NAME: &'static str = "GenericWhitespace";

    pub fn new() -> Self {
        Self::default()
    }
}

/// Strip the gaps just inside `< >`, and the one before `<` when
/// `before_open` is set.
fn tighten<T>(
    list: &mut Container<T>,
    before_open: bool,
    fmt: impl Fn(&mut T) -> &mut Formatting,
) -> bool {
    let mut changed = NO_SPACE.apply(&mut list.empty);
    if before_open {
        changed |= NO_SPACE.apply(&mut list.before);
    }
    if let Some(first) = list.elems.first_mut() {
        changed |= NO_SPACE.apply(&mut fmt(first).prefix);
    }
    if let Some(last) = list.elems.last_mut() {
        changed |= NO_SPACE.apply(&mut fmt(last).suffix);
    }
    changed
}

fn type_fmt(ty: &mut TypeTree) -> &mut Formatting {
    &mut ty.fmt
}

fn param_fmt(param: &mut TypeParam) -> &mut Formatting {
    &mut param.fmt
}

impl JavaVisitor for GenericWhitespace {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        if let Some(params) = out.type_params.as_mut() {
            if tighten(params, true, param_fmt) {
                self.effects.record_change(class.id);
            }
        }
        out
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        if let Some(params) = out.type_params.as_mut() {
            if tighten(params, false, param_fmt) {
                self.effects.record_change(method.id);
            }
        }
        out
    }

    fn visit_type_tree<'a>(&mut self, ty: &'a TypeTree, cursor: &Cursor<'a>) -> TypeTree {
        let mut out = walk_type_tree(self, ty, cursor);
        if let Some(args) = out.type_args.as_mut() {
            if tighten(args, true, type_fmt) {
                self.effects.record_change(ty.id);
            }
        }
        out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let mut out = walk_expr(self, expr, cursor);
        let changed = match &mut out {
            Expr::MethodCall(call) => match call.type_args.as_mut() {
                Some(args) => {
                    let tightened = tighten(args, true, type_fmt);
                    NO_SPACE.apply(&mut call.name.fmt.prefix) || tightened
                }
                None => false,
            },
            Expr::NewClass(new_class) if new_class.ty.type_args.is_some() => {
                NO_SPACE.apply(&mut new_class.args.before)
            }
            _ => false,
        };
        if changed {
            self.effects.record_change(expr.id());
        }
        out
    }
}

impl Rule for GenericWhitespace {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_generic_whitespace() {
        let before = "import java.util.*;
public class A < T1, T2 > {
    Map < String, Integer > map;

    {
        boolean same = this.< Integer, Integer >foo(1, 2);
        map = new HashMap <>();

        List < String > list = new ArrayList< String > ();
    }

    < K, V extends Number > boolean foo(K k, V v) {
        return true;
    }
}
";
        let after = "import java.util.*;
public class A<T1, T2> {
    Map<String, Integer> map;

    {
        boolean same = this.<Integer, Integer>foo(1, 2);
        map = new HashMap<>();

        List<String> list = new ArrayList<String>();
    }

    <K, V extends Number> boolean foo(K k, V v) {
        return true;
    }
}
";
        assert_fix(GenericWhitespace::new, before, after);
    }

    #[test]
    fn test_nested_and_wildcard_arguments() {
        assert_fix(
            GenericWhitespace::new,
            "class A { Map< String, List< ? extends Number > > m; }",
            "class A { Map<String, List<? extends Number>> m; }",
        );
    }

    #[test]
    fn test_wrapped_arguments_are_left_alone() {
        assert_unchanged(
            GenericWhitespace::new(),
            "class A {
    Map<
        String,
        Integer
    > m;
    public static <T> T id(T t) { return t; }
}
",
        );
    }
}
