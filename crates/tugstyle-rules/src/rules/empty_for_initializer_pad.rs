// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Padding of an empty `for` initializer: `for (; ...` or `for ( ; ...`.

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_stmt;
use tugstyle_java::{maybe_transform, Cursor, Effects, JavaVisitor, Rule, Stmt};

use crate::policy::PadPolicy;

#[derive(Debug)]
pub struct EmptyForInitializerPad {
    effects: Effects,
    option: PadPolicy,
}

impl EmptyForInitializerPad {
    pub const NAME: &'static str = "EmptyForInitializerPad";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            option: options.option(PadPolicy::NoSpace),
        }
    }
}

impl Default for EmptyForInitializerPad {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

/// The gap before the first `;` when the initializer is empty.
fn empty_init_gap(stmt: &Stmt) -> Option<&str> {
    let Stmt::For(for_loop) = stmt else {
        return None;
    };
    match for_loop.control.init.as_slice() {
        [Stmt::Empty(empty)] => Some(&empty.fmt.prefix),
        _ => None,
    }
}

impl JavaVisitor for EmptyForInitializerPad {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let option = self.option;
        let condition = empty_init_gap(stmt).is_some_and(|gap| option.fix(gap).is_some());
        maybe_transform(
            self,
            stmt.id(),
            condition,
            cursor,
            |v| walk_stmt(v, stmt, cursor),
            |_, recursed, _| {
                let pad = option.fix(empty_init_gap(recursed)?)?;
                let mut out = recursed.clone();
                if let Stmt::For(for_loop) = &mut out {
                    for_loop.control.init[0].fmt_mut().prefix = pad.to_string();
                }
                Some(out)
            },
        )
    }
}

impl Rule for EmptyForInitializerPad {
    fn name(&self) -> &str {
        Self::NAME
    }
}
