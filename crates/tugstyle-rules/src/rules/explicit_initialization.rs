// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove field initializers that assign the default value.

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_var_decls;
use tugstyle_java::{
    ClassKind, Cursor, Effects, Expr, JavaVisitor, LiteralKind, Modifiers, NamedVar, Rule,
    TypeTree, VarDecls,
};

#[derive(Debug)]
pub struct ExplicitInitialization {
    effects: Effects,
    only_object_references: bool,
}

impl ExplicitInitialization {
    pub const NAME: &'static str = "ExplicitInitialization";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            only_object_references: options.bool("onlyObjectReferences", false),
        }
    }

    fn is_default(&self, ty: &TypeTree, var: &NamedVar) -> bool {
        let Some(Expr::Literal(literal)) = var.init.as_ref().map(|init| &init.expr) else {
            return false;
        };
        if ty.is_array() || !var.dims.is_empty() || !ty.is_primitive() {
            return literal.kind == LiteralKind::Null;
        }
        if self.only_object_references {
            return false;
        }
        match (ty.name.as_str(), literal.kind) {
            ("boolean", LiteralKind::False) => true,
            ("int" | "long" | "short" | "char", LiteralKind::Int | LiteralKind::Long) => {
                is_zero(&literal.text)
            }
            ("char", LiteralKind::Char) => is_nul_char(&literal.text),
            _ => false,
        }
    }
}

impl Default for ExplicitInitialization {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

/// Whether an integer literal is zero in any radix: `0`, `0L`, `0x0`, `0b0_0`.
fn is_zero(text: &str) -> bool {
    let digits = text.trim_end_matches(['l', 'L']);
    let digits = ["0x", "0X", "0b", "0B"]
        .iter()
        .find_map(|radix| digits.strip_prefix(radix))
        .unwrap_or(digits);
    !digits.is_empty() && digits.chars().all(|c| c == '0' || c == '_')
}

/// `'\0'`, `'\000'` or `'\u0000'`.
fn is_nul_char(text: &str) -> bool {
    let Some(escape) = text
        .strip_prefix("'\\")
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };
    let digits = escape.trim_start_matches('u');
    let unicode = digits.len() != escape.len();
    !digits.is_empty()
        && digits.chars().all(|c| c == '0')
        && if unicode { digits.len() == 4 } else { digits.len() <= 3 }
}

fn is_field_of_class(cursor: &Cursor<'_>) -> bool {
    cursor
        .parent()
        .ok()
        .and_then(|parent| parent.node().as_class())
        .is_some_and(|class| matches!(class.kind, ClassKind::Class | ClassKind::Enum))
}

impl JavaVisitor for ExplicitInitialization {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_var_decls<'a>(&mut self, decls: &'a VarDecls, cursor: &Cursor<'a>) -> VarDecls {
        let mut out = walk_var_decls(self, decls, cursor);
        if decls.is_final() || !is_field_of_class(cursor) {
            return out;
        }
        for var in &mut out.vars {
            if self.is_default(&decls.ty, var) {
                var.init = None;
                self.effects.record_change(var.id);
            }
        }
        out
    }
}

impl Rule for ExplicitInitialization {
    fn name(&self) -> &str {
        Self::NAME
    }
}
