// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Add `break;` to switch cases that fall through into the next one.
//!
//! A case ends when its last statement is a jump, when a trailing block,
//! `if`/`else`, `try` or `synchronized` ends on every path, or when a relief
//! comment such as `// falls through` marks the fall-through as intended.
//! Labels without statements share the next case's body and are left alone.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::walk_case;
use tugstyle_java::{Case, Cursor, Effects, EngineError, JavaVisitor, NodeId, Rule, Stmt, Switch};

use crate::format::next_stmt_prefix;

static DEFAULT_RELIEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("falls?[ -]?thr(u|ough)").unwrap());

#[derive(Debug)]
pub struct FallThrough {
    effects: Effects,
    check_last_case_group: bool,
    relief: Regex,
    queued: HashSet<NodeId>,
}

impl FallThrough {
    pub const NAME: &'static str = "FallThrough";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            check_last_case_group: options.bool("checkLastCaseGroup", false),
            relief: options.regex("reliefPattern", &DEFAULT_RELIEF),
            queued: HashSet::new(),
        }
    }
}

impl Default for FallThrough {
    fn default() -> Self {
        Self::new(&RuleOptions::new())
    }
}

/// Whether control can leave the end of `stmts`.
fn ends(stmts: &[Stmt], relief: &Regex) -> bool {
    let Some(last) = stmts.last() else {
        return false;
    };
    if relief.is_match(&last.fmt().suffix) {
        return true;
    }
    match last {
        _ if last.is_jump() => true,
        Stmt::Empty(empty) => relief.is_match(&empty.fmt.prefix),
        Stmt::Block(block) => ends(&block.stmts, relief) || relief.is_match(&block.end),
        Stmt::If(s) => match &s.else_part {
            Some(else_part) => ends_stmt(&s.then_stmt, relief) && ends_stmt(&else_part.body, relief),
            None => false,
        },
        Stmt::Try(s) => {
            let finally_ends = s
                .finally
                .as_ref()
                .is_some_and(|f| ends(&f.body.stmts, relief));
            finally_ends
                || (ends(&s.body.stmts, relief)
                    && s.catches.iter().all(|c| ends(&c.body.stmts, relief)))
        }
        Stmt::Synchronized(s) => ends(&s.body.stmts, relief),
        Stmt::Labeled(s) => ends_stmt(&s.stmt, relief),
        _ => false,
    }
}

fn ends_stmt(stmt: &Stmt, relief: &Regex) -> bool {
    ends(std::slice::from_ref(stmt), relief)
}

/// Whether the case with `case_id` in `switch` runs into whatever follows
/// it. `stmts` are the case's current statements.
fn falls_through(
    switch: &Switch,
    case_id: NodeId,
    stmts: &[Stmt],
    check_last: bool,
    relief: &Regex,
) -> bool {
    let Some(index) = switch.cases.iter().position(|c| c.id == case_id) else {
        return false;
    };
    if stmts.is_empty() {
        return false;
    }
    // A comment after the last statement belongs to the next label.
    let following = match switch.cases.get(index + 1) {
        Some(next) => &next.fmt.prefix,
        None if check_last => &switch.end,
        None => return false,
    };
    !relief.is_match(following) && !ends(stmts, relief)
}

fn enclosing_switch<'a>(cursor: &Cursor<'a>) -> Result<Option<&'a Switch>, EngineError> {
    Ok(match cursor.parent()?.node().as_stmt() {
        Some(Stmt::Switch(switch)) => Some(switch),
        _ => None,
    })
}

impl JavaVisitor for FallThrough {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_case<'a>(&mut self, case: &'a Case, cursor: &Cursor<'a>) -> Case {
        let Some(switch) = self.effects.check(enclosing_switch(cursor)).flatten() else {
            return walk_case(self, case, cursor);
        };
        let check_last = self.check_last_case_group;
        if falls_through(switch, case.id, &case.stmts, check_last, &self.relief)
            && self.queued.insert(case.id)
        {
            self.effects.and_then(
                case.id,
                AddBreak::new(case.id, check_last, self.relief.clone()),
            );
        }
        walk_case(self, case, cursor)
    }
}

impl Rule for FallThrough {
    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Append `break;` to one case, inside its innermost trailing block.
#[derive(Debug)]
pub struct AddBreak {
    effects: Effects,
    target: NodeId,
    check_last: bool,
    relief: Regex,
}

impl AddBreak {
    pub const NAME: &'static str = "AddBreak";

    pub fn new(target: NodeId, check_last: bool, relief: Regex) -> Self {
        Self {
            effects: Effects::default(),
            target,
            check_last,
            relief,
        }
    }
}

fn append_break(stmts: &mut Vec<Stmt>, owner_prefix: &str) {
    if let Some(Stmt::Block(block)) = stmts.last_mut() {
        let end = block.end.clone();
        append_break(&mut block.stmts, &end);
        return;
    }
    let prefix = next_stmt_prefix(stmts.last(), owner_prefix);
    stmts.push(Stmt::break_stmt(prefix));
}

impl JavaVisitor for AddBreak {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_case<'a>(&mut self, case: &'a Case, cursor: &Cursor<'a>) -> Case {
        let mut recursed = walk_case(self, case, cursor);
        if case.id != self.target {
            return recursed;
        }
        let Some(switch) = self.effects.check(enclosing_switch(cursor)).flatten() else {
            return recursed;
        };
        if falls_through(switch, case.id, &recursed.stmts, self.check_last, &self.relief) {
            let owner = recursed.fmt.prefix.clone();
            append_break(&mut recursed.stmts, &owner);
            self.effects.record_change(case.id);
        }
        recursed
    }
}

impl Rule for AddBreak {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    fn method(body: &str) -> String {
        format!("class A {{ void f(int x) {{ {body} }} }}")
    }

    #[test]
    fn test_break_added_after_falling_case() {
        assert_fix(
            FallThrough::default,
            &method("switch(x){case 1: a(); case 2: b();}"),
            &method("switch(x){case 1: a(); break; case 2: b();}"),
        );
    }

    #[test]
    fn test_relief_comment_is_respected() {
        assert_unchanged(
            FallThrough::default(),
            &method("switch(x){case 1: a(); /* falls through */ case 2: b();}"),
        );
        assert_unchanged(
            FallThrough::default(),
            &method("switch(x){case 1: a(); // fallthru\n case 2: b();}"),
        );
    }

    #[test]
    fn test_terminated_cases() {
        assert_unchanged(
            FallThrough::default(),
            &method(
                "switch(x){case 1: if (x > 0) { return; } else { throw e; } case 2: { b(); continue; } case 3: try { c(); return; } finally { d(); } case 4: e();}",
            ),
        );
    }

    #[test]
    fn test_shared_labels_get_no_break() {
        assert_unchanged(
            FallThrough::default(),
            &method("switch(x){case 1: case 2: b(); break; default: c();}"),
        );
    }

    #[test]
    fn test_break_goes_into_trailing_block() {
        let before = "class A {
    void f(int x) {
        switch (x) {
            case 1: {
                a();
            }
            case 2:
                b();
        }
    }
}
";
        let after = "class A {
    void f(int x) {
        switch (x) {
            case 1: {
                a();
                break;
            }
            case 2:
                b();
        }
    }
}
";
        assert_fix(FallThrough::default, before, after);
    }

    #[test]
    fn test_if_without_else_falls_through() {
        assert_fix(
            FallThrough::default,
            &method("switch(x){case 1: if (x > 0) return; case 2: b();}"),
            &method("switch(x){case 1: if (x > 0) return; break; case 2: b();}"),
        );
    }

    #[test]
    fn test_last_case_group() {
        let source = method("switch(x){case 1: a(); break; case 2: b();}");
        assert_unchanged(FallThrough::default(), &source);
        let options = RuleOptions::new().with("checkLastCaseGroup", "true");
        assert_fix(
            || FallThrough::new(&options),
            &source,
            &method("switch(x){case 1: a(); break; case 2: b(); break;}"),
        );
    }

    #[test]
    fn test_custom_relief_pattern() {
        let options = RuleOptions::new().with("reliefPattern", "continue in next case");
        assert_unchanged(
            FallThrough::new(&options),
            &method("switch(x){case 1: a(); // continue in next case\n case 2: b();}"),
        );
    }
}
