// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Padding inside the parentheses of a cast: `(int) m` or `( int ) m`.

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_expr;
use tugstyle_java::{maybe_transform, Cursor, Effects, Expr, JavaVisitor, Rule};

use crate::policy::PadPolicy;

#[derive(Debug)]
pub struct TypecastParenPad {
    effects: Effects,
    option: PadPolicy,
}

impl TypecastParenPad {
    pub const NAME: &'static str = "TypecastParenPad";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            option: options.option(PadPolicy::NoSpace),
        }
    }
}

impl Default for TypecastParenPad {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

impl JavaVisitor for TypecastParenPad {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let option = self.option;
        let condition = match expr {
            Expr::Cast(cast) => {
                option.fix(&cast.ty.fmt.prefix).is_some() || option.fix(&cast.ty.fmt.suffix).is_some()
            }
            _ => false,
        };
        maybe_transform(
            self,
            expr.id(),
            condition,
            cursor,
            |v| walk_expr(v, expr, cursor),
            |_, recursed, _| {
                let mut out = recursed.clone();
                let Expr::Cast(cast) = &mut out else {
                    return None;
                };
                let opened = option.apply(&mut cast.ty.fmt.prefix);
                let closed = option.apply(&mut cast.ty.fmt.suffix);
                (opened || closed).then_some(out)
            },
        )
    }
}

impl Rule for TypecastParenPad {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    const PADDED: &str = "public class A {
    {
        long m = 0L;
        int n = ( int ) m;
    }
}
";

    const UNPADDED: &str = "public class A {
    {
        long m = 0L;
        int n = (int) m;
    }
}
";

    #[test]
    fn test_pad_typecast() {
        assert_fix(
            || TypecastParenPad::new(&RuleOptions::new().with("option", "space")),
            UNPADDED,
            PADDED,
        );
    }

    #[test]
    fn test_unpad_typecast() {
        assert_fix(TypecastParenPad::default, PADDED, UNPADDED);
    }

    #[test]
    fn test_wrapped_cast_is_left_alone() {
        assert_unchanged(
            TypecastParenPad::default(),
            "class A { Object f(Object o) { return (\n        String) o; } }",
        );
    }
}
