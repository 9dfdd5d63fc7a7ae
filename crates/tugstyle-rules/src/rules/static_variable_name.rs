// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rename non-final static fields written in `UPPER_SNAKE_CASE` to camelCase.
//!
//! Only names that do not match `format` are considered, and only when the
//! field's visibility is one the options apply to. The field and every
//! reference to it, including `this.X` and `Owner.X`, are renamed by a
//! deferred [`RenameVariable`].

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::scope::field_names;
use tugstyle_java::visitor::walk_var_decls;
use tugstyle_java::{
    ClassDecl, ClassKind, Cursor, Effects, JavaVisitor, Modifiers, NodeId, Rule, VarDecls,
    Visibility,
};

use crate::rename::RenameVariable;

static DEFAULT_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z][a-zA-Z0-9]*$").unwrap());

#[derive(Debug)]
pub struct StaticVariableName {
    effects: Effects,
    format: Regex,
    apply_to_public: bool,
    apply_to_protected: bool,
    apply_to_package: bool,
    apply_to_private: bool,
    queued: HashSet<NodeId>,
    /// New names handed out this pass, per class.
    claimed: HashSet<(NodeId, String)>,
}

impl StaticVariableName {
    pub const NAME: &'static str = "StaticVariableName";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            format: options.regex("format", &DEFAULT_FORMAT),
            apply_to_public: options.bool("applyToPublic", true),
            apply_to_protected: options.bool("applyToProtected", true),
            apply_to_package: options.bool("applyToPackage", true),
            apply_to_private: options.bool("applyToPrivate", true),
            queued: HashSet::new(),
            claimed: HashSet::new(),
        }
    }

    fn applies_to(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => self.apply_to_public,
            Visibility::Protected => self.apply_to_protected,
            Visibility::Package => self.apply_to_package,
            Visibility::Private => self.apply_to_private,
        }
    }

    fn check(&mut self, decls: &VarDecls, class: &ClassDecl) {
        if class.kind != ClassKind::Class && class.kind != ClassKind::Enum {
            return;
        }
        if !decls.is_static() || decls.is_final() || !self.applies_to(decls.visibility()) {
            return;
        }
        let mut taken: Option<BTreeSet<String>> = None;
        for var in &decls.vars {
            let from = var.name.name.as_str();
            if self.queued.contains(&var.id) || self.format.is_match(from) {
                continue;
            }
            let to = snake_case_to_camel(from);
            if to == from {
                continue;
            }
            let taken = taken.get_or_insert_with(|| field_names(&class.body));
            if taken.contains(&to) || self.claimed.contains(&(class.id, to.clone())) {
                debug!(rule = Self::NAME, from, to = %to, "name already in use");
                continue;
            }
            debug!(rule = Self::NAME, from, to = %to, "renaming static field");
            self.queued.insert(var.id);
            self.claimed.insert((class.id, to.clone()));
            self.effects.and_then(
                var.id,
                RenameVariable::field(var.id, class.id, class.name.name.clone(), from, to),
            );
        }
    }
}

impl Default for StaticVariableName {
    fn default() -> Self {
        Self::new(&RuleOptions::new())
    }
}

/// Whether `value` is made of upper-case letters and digits, separated by
/// underscores, and starts with one of the former.
fn is_upper_snake_case(value: &str) -> bool {
    value
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// `CAMEL_CASE_NAME_1` becomes `camelCaseName1`. Anything that is not upper
/// snake case is returned as is.
pub fn snake_case_to_camel(value: &str) -> String {
    if !is_upper_snake_case(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len());
    let mut after_underscore = false;
    for c in value.chars() {
        if c == '_' {
            after_underscore = true;
            continue;
        }
        if after_underscore {
            out.push(c);
        } else {
            out.push(c.to_ascii_lowercase());
        }
        after_underscore = false;
    }
    out
}

impl JavaVisitor for StaticVariableName {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_var_decls<'a>(&mut self, decls: &'a VarDecls, cursor: &Cursor<'a>) -> VarDecls {
        if let Some(class) = cursor.parent().ok().and_then(|parent| parent.node().as_class()) {
            self.check(decls, class);
        }
        walk_var_decls(self, decls, cursor)
    }
}

impl Rule for StaticVariableName {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    #[test]
    fn test_snake_case_to_camel() {
        assert_eq!(snake_case_to_camel("CAMEL_CASE_NAME_1"), "camelCaseName1");
        assert_eq!(snake_case_to_camel("MY_LIST"), "myList");
        assert_eq!(snake_case_to_camel("already_lower"), "already_lower");
        assert_eq!(snake_case_to_camel("_LEADING"), "_LEADING");
    }

    #[test]
    fn test_instance_fields_are_left_alone() {
        assert_unchanged(
            StaticVariableName::default(),
            "import java.util.List;
public class A {
   List MY_LIST;
   static final int MAX_SIZE = 1;
}
",
        );
    }

    #[test]
    fn test_field_and_references_are_renamed() {
        let before = "import java.util.*;
public class A {
   static List<String> MY_LIST;

   static {
       MY_LIST = new ArrayList<>();
       A.MY_LIST.add(\"a\");
   }
}
";
        let after = "import java.util.*;
public class A {
   static List<String> myList;

   static {
       myList = new ArrayList<>();
       A.myList.add(\"a\");
   }
}
";
        assert_fix(StaticVariableName::default, before, after);
    }

    #[test]
    fn test_only_matching_visibility() {
        let before = "import java.util.List;
public class A {
   static List MY_LIST;
   private static List MY_PRIVATE_LIST;
   public static List MY_PUBLIC_LIST;
   protected static List MY_PROTECTED_LIST;
}
";
        let after = "import java.util.List;
public class A {
   static List MY_LIST;
   private static List MY_PRIVATE_LIST;
   public static List MY_PUBLIC_LIST;
   protected static List myProtectedList;
}
";
        assert_fix(
            || {
                StaticVariableName::new(
                    &RuleOptions::new()
                        .with("applyToPublic", "false")
                        .with("applyToPackage", "false")
                        .with("applyToPrivate", "false"),
                )
            },
            before,
            after,
        );
    }

    #[test]
    fn test_same_name_in_two_classes() {
        assert_fix(
            StaticVariableName::default,
            "class A { static int MAX_SIZE; } class B { static int MAX_SIZE; }",
            "class A { static int maxSize; } class B { static int maxSize; }",
        );
    }

    #[test]
    fn test_existing_name_blocks_rename() {
        assert_unchanged(
            StaticVariableName::default(),
            "class A {
    static int COUNT;
    int count;
}
",
        );
    }
}
