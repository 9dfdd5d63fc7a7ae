// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Test helpers for rule tests.
//!
//! Every helper runs the real scheduler, so deferred visitors and later
//! passes are exercised exactly as in production.

use difference::{Changeset, Difference};
use tugstyle_java::{parse_compilation_unit, Codegen, CompilationUnit, Rule, Scheduler};

/// Run `rules` over an already parsed unit and print the result.
pub fn fix_unit(mut rules: Vec<Box<dyn Rule>>, unit: CompilationUnit) -> String {
    let result = Scheduler::default()
        .run(unit, &mut rules)
        .unwrap_or_else(|e| panic!("rewrite failed: {e}"));
    assert!(
        result.outcome.is_converged(),
        "rewrite did not converge after {} passes",
        result.outcome.passes()
    );
    result.unit.to_source()
}

/// Parse `source`, run `rules` and print the result.
pub fn fix_with(rules: Vec<Box<dyn Rule>>, source: &str) -> String {
    let unit = parse_compilation_unit(source)
        .unwrap_or_else(|e| panic!("failed to parse test source: {e}\n{source}"));
    fix_unit(rules, unit)
}

/// Run one rule over `source`.
pub fn fix<R: Rule + 'static>(rule: R, source: &str) -> String {
    fix_with(vec![Box::new(rule)], source)
}

/// Assert that the rule rewrites `before` into `after`, and that running a
/// fresh instance over `after` changes nothing.
pub fn assert_fix<R: Rule + 'static>(make: impl Fn() -> R, before: &str, after: &str) {
    let actual = fix(make(), before);
    assert_same(&actual, after);
    let again = fix(make(), &actual);
    assert_same(&again, after);
}

/// Assert that the rule leaves `source` alone.
pub fn assert_unchanged<R: Rule + 'static>(rule: R, source: &str) {
    let actual = fix(rule, source);
    assert_same(&actual, source);
}

fn assert_same(actual: &str, expected: &str) {
    if actual == expected {
        return;
    }
    let changeset = Changeset::new(expected, actual, "");
    let mut report = String::new();
    for diff in &changeset.diffs {
        match diff {
            Difference::Same(text) => report.push_str(text),
            Difference::Rem(text) => report.push_str(&format!("[-{text}-]")),
            Difference::Add(text) => report.push_str(&format!("{{+{text}+}}")),
        }
    }
    panic!("unexpected rewrite\nexpected:\n{expected}\nactual:\n{actual}\ndiff:\n{report}");
}
