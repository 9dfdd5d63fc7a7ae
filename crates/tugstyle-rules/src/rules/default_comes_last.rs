// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Move the `default` label of a switch to the end.
//!
//! Cases that fall into one another form a chain: control entering any of
//! them runs straight through to the first case that ends in a jump. The
//! chain holding `default` moves to the end as one block, so every label
//! still reaches the same code. Inside the block, an empty `default` takes
//! the body of the case it falls into, and that case's label joins the
//! labels sharing it. The case left at the end of the remaining labels gets
//! a `break;` if it could now fall into the moved block, and a `break;`
//! that ends `default` at the end of the switch is dropped.

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_stmt;
use tugstyle_java::{maybe_transform, Case, Cursor, Effects, JavaVisitor, Rule, Stmt, Switch};

use crate::format::case_stmt_prefix;

#[derive(Debug)]
pub struct DefaultComesLast {
    effects: Effects,
    skip_if_last_and_shared_with_case: bool,
}

impl DefaultComesLast {
    pub const NAME: &'static str = "DefaultComesLast";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            skip_if_last_and_shared_with_case: options.bool("skipIfLastAndSharedWithCase", false),
        }
    }

    fn needs_reorder(&self, switch: &Switch) -> bool {
        let Some(index) = switch.cases.iter().position(Case::is_default) else {
            return false;
        };
        if index + 1 == switch.cases.len() {
            return false;
        }
        let shared = index > 0 && switch.cases[index - 1].stmts.is_empty();
        !(self.skip_if_last_and_shared_with_case && shared)
    }

    fn reorder(&self, switch: &Switch) -> Option<Switch> {
        let cases = &switch.cases;
        let index = cases.iter().position(Case::is_default)?;

        // The chain around default: cases that run into it, and the cases it
        // runs into up to the first one that ends in a jump.
        let mut first = index;
        while first > 0 && !completes_abruptly(&cases[first - 1].stmts) {
            first -= 1;
        }
        let mut last = index;
        while last + 1 < cases.len() && !completes_abruptly(&cases[last].stmts) {
            last += 1;
        }

        let mut fixed: Vec<Case> = cases[..first].to_vec();
        fixed.extend(cases[last + 1..].iter().cloned());

        let mut default = cases[index].clone();
        let mut moved: Vec<Case> = cases[first..index].to_vec();
        let mut after = cases[index + 1..=last].iter().cloned();

        // An empty default shares the body of the first case with
        // statements after it; the labels in between share it too.
        if default.stmts.is_empty() {
            for mut case in after.by_ref() {
                if case.stmts.is_empty() {
                    moved.push(case);
                    continue;
                }
                default.stmts = std::mem::take(&mut case.stmts);
                moved.push(case);
                break;
            }
        }
        let rest: Vec<Case> = after.collect();

        // Default now ends the switch, so its closing break is a no-op.
        let ends_in_break =
            matches!(default.stmts.last(), Some(Stmt::Break(b)) if b.label.is_none());
        if rest.is_empty() && ends_in_break {
            default.stmts.pop();
        }

        if let Some(tail) = fixed.last_mut() {
            if !completes_abruptly(&tail.stmts) {
                let prefix = case_stmt_prefix(tail);
                tail.stmts.push(Stmt::break_stmt(prefix));
            }
        }

        fixed.extend(moved);
        fixed.push(default);
        fixed.extend(rest);

        if fixed == switch.cases {
            return None;
        }
        Some(Switch {
            cases: fixed,
            ..switch.clone()
        })
    }
}

/// Whether control cannot leave the end of `stmts` normally.
fn completes_abruptly(stmts: &[Stmt]) -> bool {
    match stmts.last() {
        None => false,
        Some(last) if last.is_jump() => true,
        Some(Stmt::Block(block)) => completes_abruptly(&block.stmts),
        Some(Stmt::If(s)) => s.else_part.as_ref().is_some_and(|else_part| {
            completes_abruptly(std::slice::from_ref(s.then_stmt.as_ref()))
                && completes_abruptly(std::slice::from_ref(else_part.body.as_ref()))
        }),
        Some(Stmt::Synchronized(s)) => completes_abruptly(&s.body.stmts),
        _ => false,
    }
}

impl Default for DefaultComesLast {
    fn default() -> Self {
        Self::new(&RuleOptions::new())
    }
}

impl JavaVisitor for DefaultComesLast {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let condition = matches!(stmt, Stmt::Switch(s) if self.needs_reorder(s));
        maybe_transform(
            self,
            stmt.id(),
            condition,
            cursor,
            |v| walk_stmt(v, stmt, cursor),
            |v, recursed, _| match recursed {
                Stmt::Switch(s) => v.reorder(s).map(Stmt::Switch),
                _ => None,
            },
        )
    }
}

impl Rule for DefaultComesLast {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    fn wrap(body: &str) -> String {
        format!("class A {{\n    void f(int x) {{\n{body}    }}\n}}\n")
    }

    #[test]
    fn test_default_moves_to_end() {
        let before = wrap(
            "        switch (x) {
            case 1:
                a();
                break;
            default:
                d();
                break;
            case 2:
                b();
                break;
        }
",
        );
        let after = wrap(
            "        switch (x) {
            case 1:
                a();
                break;
            case 2:
                b();
                break;
            default:
                d();
        }
",
        );
        assert_fix(DefaultComesLast::default, &before, &after);
    }

    #[test]
    fn test_shared_label_moves_with_default_and_break_is_added() {
        let before = "class A { void f(int x) { switch (x) { case 1: default: foo(); break; case 2: bar(); } } }";
        let after = "class A { void f(int x) { switch (x) { case 2: bar(); break; case 1: default: foo(); } } }";
        assert_fix(DefaultComesLast::default, before, after);
    }

    #[test]
    fn test_case_falling_into_default_moves_with_it() {
        let before = "class A { void f(int x) { switch (x) { case 1: a(); default: d(); break; case 2: b(); break; } } }";
        let after = "class A { void f(int x) { switch (x) { case 2: b(); break; case 1: a(); default: d(); } } }";
        assert_fix(DefaultComesLast::default, before, after);
    }

    #[test]
    fn test_default_falling_into_next_case_moves_with_it() {
        let before = "class A { void f(int x) { switch (x) { case 0: z(); break; default: d(); case 2: b(); break; case 3: c(); } } }";
        let after = "class A { void f(int x) { switch (x) { case 0: z(); break; case 3: c(); break; default: d(); case 2: b(); break; } } }";
        assert_fix(DefaultComesLast::default, before, after);
    }

    #[test]
    fn test_chain_already_at_end_is_left_alone() {
        // Default runs into case 2, which ends the switch; no order keeps
        // both that and default last.
        assert_unchanged(
            DefaultComesLast::default(),
            "class A { void f(int x) { switch (x) { case 1: default: foo(); case 2: bar(); } } }",
        );
    }

    #[test]
    fn test_if_with_returning_branches_ends_the_case() {
        let before = "class A { int f(int x) { switch (x) { default: return 0; case 1: if (x > 0) { return 1; } else { return 2; } } } }";
        let after = "class A { int f(int x) { switch (x) { case 1: if (x > 0) { return 1; } else { return 2; } default: return 0; } } }";
        assert_fix(DefaultComesLast::default, before, after);
    }

    #[test]
    fn test_empty_default_takes_next_body() {
        let before = "class A { void f(int x) { switch (x) { case 0: z(); return; default: case 1: one(); break; case 2: two(); } } }";
        let after = "class A { void f(int x) { switch (x) { case 0: z(); return; case 2: two(); break; case 1: default: one(); } } }";
        assert_fix(DefaultComesLast::default, before, after);
    }

    #[test]
    fn test_default_already_last_or_absent() {
        assert_unchanged(
            DefaultComesLast::default(),
            "class A { void f(int x) { switch (x) { case 1: a(); break; default: b(); } } }",
        );
        assert_unchanged(
            DefaultComesLast::default(),
            "class A { void f(int x) { switch (x) { case 1: a(); break; case 2: b(); } } }",
        );
    }

    #[test]
    fn test_skip_if_shared_with_case() {
        let options = RuleOptions::new().with("skipIfLastAndSharedWithCase", "true");
        assert_unchanged(
            DefaultComesLast::new(&options),
            "class A { void f(int x) { switch (x) { case 1: default: a(); break; case 2: b(); } } }",
        );
    }
}
