// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove `finalize()` overrides.

use tracing::debug;
use tugstyle_java::{Cursor, Effects, JavaVisitor, Member, MethodDecl, Rule, Transform};

#[derive(Debug, Default)]
pub struct NoFinalizer {
    effects: Effects,
}

impl NoFinalizer {
    pub const NAME: &'static str = "NoFinalizer";

    pub fn new() -> Self {
        Self::default()
    }
}

fn is_finalizer(method: &MethodDecl) -> bool {
    method.name.name == "finalize"
        && method.params.is_empty()
        && method.return_type.as_ref().is_some_and(|ty| ty.is_void())
}

impl JavaVisitor for NoFinalizer {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_member_in_list<'a>(
        &mut self,
        member: &'a Member,
        cursor: &Cursor<'a>,
    ) -> Transform<Member> {
        match member {
            Member::Method(method) if is_finalizer(method) => {
                debug!(rule = Self::NAME, "removing finalizer");
                self.effects.record_change(method.id);
                Transform::Remove
            }
            _ => Transform::Keep(self.visit_member(member, cursor)),
        }
    }
}

impl Rule for NoFinalizer {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_no_finalizer() {
        let before = "public class A {
    public static void main(String[] args) {
    }

    @Override
    protected void finalize() throws Throwable {
        super.finalize();
    }
}
";
        let after = "public class A {
    public static void main(String[] args) {
    }
}
";
        assert_fix(NoFinalizer::new, before, after);
    }

    #[test]
    fn test_nested_class_finalizer() {
        assert_fix(
            NoFinalizer::new,
            "class A { static class B { void finalize() {} } }",
            "class A { static class B { } }",
        );
    }

    #[test]
    fn test_overloads_are_left_alone() {
        assert_unchanged(
            NoFinalizer::new(),
            "class A { void finalize(int n) {} int finalize(String s) { return 0; } }",
        );
    }
}
