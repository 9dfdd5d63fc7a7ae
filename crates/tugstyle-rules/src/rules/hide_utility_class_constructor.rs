// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Stop utility classes from being instantiated.
//!
//! A concrete class that extends nothing, declares at least one static method
//! or field and nothing that is not static (nested types aside) is a
//! utility class. Its non-private constructors become private. When it
//! declares no constructor, a private no-argument one is added after the
//! fields.

use tugstyle_java::visitor::walk_class_decl;
use tugstyle_java::{
    insert_modifier, Block, ClassBody, ClassDecl, ClassKind, Container, Cursor, Effects,
    Formatting, Ident, JavaVisitor, Member, MethodDecl, Modifier, ModifierKind, Modifiers, NodeId,
    Rule, Visibility,
};

use crate::format::{nested_line_start, same_line_start};

#[derive(Debug, Default)]
pub struct HideUtilityClassConstructor {
    effects: Effects,
}

impl HideUtilityClassConstructor {
    pub const NAME: &'static str = "HideUtilityClassConstructor";

    pub fn new() -> Self {
        Self::default()
    }
}

fn is_utility_class(class: &ClassDecl) -> bool {
    if class.kind != ClassKind::Class || class.is_abstract() || class.extends.is_some() {
        return false;
    }
    let mut has_static = false;
    for member in &class.body.members {
        match member {
            Member::Method(method) if method.is_constructor() => {}
            Member::Method(method) if method.is_static() => has_static = true,
            Member::Field(field) if field.is_static() => has_static = true,
            Member::Initializer(block) if block.static_init.is_some() => {}
            Member::Class(_) | Member::Empty(_) => {}
            _ => return false,
        }
    }
    has_static
}

/// Make `ctor` private, replacing its access modifier when it has one.
fn make_private(ctor: &mut MethodDecl) {
    let access = ctor
        .modifiers
        .iter_mut()
        .find(|m| matches!(m.kind, ModifierKind::Public | ModifierKind::Protected));
    match access {
        Some(modifier) => modifier.kind = ModifierKind::Private,
        None => {
            let mut gap = std::mem::take(ctor.after_modifiers_prefix_mut());
            insert_modifier(&mut ctor.modifiers, ModifierKind::Private, &mut gap);
            *ctor.after_modifiers_prefix_mut() = gap;
        }
    }
}

fn private_constructor(name: &str, prefix: String) -> MethodDecl {
    let end = same_line_start(&prefix);
    MethodDecl {
        id: NodeId::fresh(),
        fmt: Formatting::prefixed(prefix),
        modifiers: vec![Modifier::new(ModifierKind::Private, Formatting::default())],
        type_params: None,
        return_type: None,
        name: Ident::new(name, Formatting::space()),
        params: Container::new(Vec::new()),
        throws: None,
        default_value: None,
        body: Some(Block::new(Vec::new(), Formatting::space(), end)),
    }
}

/// Insert a private constructor after the last field, separated from its
/// neighbors by a blank line when members are on their own lines.
fn add_constructor(body: &mut ClassBody, name: &str) {
    let position = body
        .members
        .iter()
        .rposition(|m| matches!(m, Member::Field(_)))
        .map_or(0, |index| index + 1);
    let ctor = match body.members.get_mut(position) {
        Some(next) => {
            let prefix = next.fmt().prefix.clone();
            if prefix.contains('\n') && !prefix.starts_with("\n\n") {
                next.fmt_mut().prefix = format!("\n{prefix}");
            }
            let line = same_line_start(&prefix);
            let prefix = match position {
                0 => prefix,
                _ if line.starts_with('\n') => format!("\n{line}"),
                _ => line,
            };
            private_constructor(name, prefix)
        }
        None => {
            let prefix = match body.members.last() {
                Some(last) => match same_line_start(&last.fmt().prefix) {
                    line if line.starts_with('\n') => format!("\n{line}"),
                    line => line,
                },
                None => nested_line_start(&body.end),
            };
            private_constructor(name, prefix)
        }
    };
    body.members.insert(position, Member::Method(ctor));
}

impl JavaVisitor for HideUtilityClassConstructor {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        if !is_utility_class(class) {
            return out;
        }
        let mut has_constructor = false;
        for member in &mut out.body.members {
            let Member::Method(method) = member else {
                continue;
            };
            if !method.is_constructor() {
                continue;
            }
            has_constructor = true;
            if method.visibility() != Visibility::Private {
                make_private(method);
                self.effects.record_change(method.id);
            }
        }
        if !has_constructor {
            add_constructor(&mut out.body, &class.name.name);
            self.effects.record_change(class.id);
        }
        out
    }
}

impl Rule for HideUtilityClassConstructor {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_hide_utility_constructor() {
        let before = "public class A {
    public A() {
    }

    public static void utility() {
    }
}
";
        let after = "public class A {
    private A() {
    }

    public static void utility() {
    }
}
";
        assert_fix(HideUtilityClassConstructor::new, before, after);
    }

    #[test]
    fn test_package_private_constructor() {
        assert_fix(
            HideUtilityClassConstructor::new,
            "class A { @Inject A() {} static int n; }",
            "class A { @Inject private A() {} static int n; }",
        );
    }

    #[test]
    fn test_constructor_is_added_after_fields() {
        let before = "public class Strings {
    static final String EMPTY = \"\";

    static boolean isEmpty(String s) {
        return s.isEmpty();
    }
}
";
        let after = "public class Strings {
    static final String EMPTY = \"\";

    private Strings() {
    }

    static boolean isEmpty(String s) {
        return s.isEmpty();
    }
}
";
        assert_fix(HideUtilityClassConstructor::new, before, after);
    }

    #[test]
    fn test_constructor_is_added_first_without_fields() {
        let before = "class Util {
    static void f() {
    }
}
";
        let after = "class Util {
    private Util() {
    }

    static void f() {
    }
}
";
        assert_fix(HideUtilityClassConstructor::new, before, after);
    }

    #[test]
    fn test_classes_with_instance_members_are_left_alone() {
        assert_unchanged(
            HideUtilityClassConstructor::new(),
            "class A {
    int n;
    static void f() {
    }
}

class B extends A {
    static void g() {
    }
}

abstract class C {
    static void h() {
    }
}

class D {
}
",
        );
    }
}
