// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Make a class `final` when it can only be constructed from inside itself.

use tugstyle_java::visitor::walk_class_decl;
use tugstyle_java::{
    ClassDecl, ClassKind, Cursor, Effects, JavaVisitor, ModifierKind, Modifiers, Rule, Visibility,
};

#[derive(Debug, Default)]
pub struct FinalClass {
    effects: Effects,
}

impl FinalClass {
    pub const NAME: &'static str = "FinalClass";

    pub fn new() -> Self {
        Self::default()
    }
}

fn has_only_private_constructors(class: &ClassDecl) -> bool {
    let mut constructors = class.body.constructors().peekable();
    constructors.peek().is_some()
        && constructors.all(|ctor| ctor.visibility() == Visibility::Private)
}

impl JavaVisitor for FinalClass {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        if class.kind == ClassKind::Class
            && !class.is_final()
            && !class.is_abstract()
            && has_only_private_constructors(class)
        {
            out.add_modifier(ModifierKind::Final);
            self.effects.record_change(class.id);
        }
        out
    }
}

impl Rule for FinalClass {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_single_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_should_be_final_class() {
        let before = "public class A {
    private A(String s) {
    }

    private A() {
    }
}
";
        let after = "public final class A {
    private A(String s) {
    }

    private A() {
    }
}
";
        assert_fix(FinalClass::new, before, after);
    }

    #[test]
    fn test_package_private_class() {
        assert_fix(
            FinalClass::new,
            "@Deprecated\nclass A { private A() {} }",
            "@Deprecated\nfinal class A { private A() {} }",
        );
    }

    #[test]
    fn test_static_nested_class() {
        assert_fix(
            FinalClass::new,
            "class A { private static class B { private B() {} } }",
            "class A { private static final class B { private B() {} } }",
        );
    }

    #[test]
    fn test_should_not_be_final_class() {
        assert_unchanged(
            FinalClass::new(),
            "public class A {
    private A(String s) {
    }

    public A() {
    }
}
",
        );
    }

    #[test]
    fn test_class_without_constructors_is_left_alone() {
        assert_unchanged(FinalClass::new(), "public class A { void f() {} }");
    }
}
