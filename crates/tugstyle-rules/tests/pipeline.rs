// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! End-to-end rule runs through the registry and the scheduler.
//!
//! These tests drive rules exactly as the command line does: modules are
//! looked up by name, instantiated fresh for every run and scheduled to a
//! fixpoint.

use std::path::PathBuf;

use difference::assert_diff;
use tugstyle_core::{ModuleConfig, RuleOptions};
use tugstyle_java::{parse_compilation_unit, Codegen, Scheduler, SchedulerResult};
use tugstyle_rules::{RuleRegistry, KNOWN_RULES};

fn run(registry: &RuleRegistry, source: &str) -> SchedulerResult {
    let unit = parse_compilation_unit(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
    Scheduler::default()
        .run(unit, &mut registry.instantiate())
        .unwrap_or_else(|e| panic!("rewrite failed: {e}"))
}

fn fixtures() -> Vec<(PathBuf, String)> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../tugstyle-java/tests/fixtures");
    let mut paths: Vec<PathBuf> = dir
        .read_dir()
        .expect("read_dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "java"))
        .collect();
    paths.sort();
    paths
        .into_iter()
        .map(|path| {
            let source = std::fs::read_to_string(&path).expect("reading fixture");
            (path, source)
        })
        .collect()
}

/// A second run of the same rule over its own output changes nothing.
#[test]
fn every_rule_is_idempotent_on_fixtures() {
    for (path, source) in fixtures() {
        for name in KNOWN_RULES {
            let registry = RuleRegistry::build([ModuleConfig::new(*name)]);
            let first = run(&registry, &source);
            assert!(
                first.outcome.is_converged(),
                "{name} did not converge on {}",
                path.display()
            );
            let fixed = first.unit.to_source();
            if first.changed_rules.is_empty() {
                assert_diff!(&source, &fixed, "", 0);
            }
            let second = run(&registry, &fixed);
            assert!(
                second.changed_rules.is_empty(),
                "{name} changed its own output for {}",
                path.display()
            );
            assert_diff!(&fixed, &second.unit.to_source(), "", 0);
        }
    }
}

#[test]
fn configured_rules_cooperate_in_one_run() {
    let registry = RuleRegistry::build([
        ModuleConfig::new("DefaultComesLast"),
        ModuleConfig::new("SimplifyBooleanExpression"),
        ModuleConfig::new("UnnecessaryParentheses"),
        ModuleConfig::new("JavadocMethod"),
    ]);
    assert_eq!(registry.len(), 3);

    let before = "class A { int f(int i, boolean b) { int h = (2 ^ i) >>> 8; if (b == true) { h++; } switch (i) { default: h++; break; case 1: h--; } return (h); } }";
    let after = "class A { int f(int i, boolean b) { int h = (2 ^ i) >>> 8; if (b) { h++; } switch (i) { case 1: h--; break; default: h++; } return h; } }";

    let result = run(&registry, before);
    assert!(result.outcome.is_converged());
    assert_diff!(after, &result.unit.to_source(), "", 0);
    assert_eq!(
        result.changed_rules.iter().map(String::as_str).collect::<Vec<_>>(),
        ["DefaultComesLast", "SimplifyBooleanExpression", "UnnecessaryParentheses"]
    );
}

#[test]
fn options_reach_the_rule() {
    let padded = "class A { long f(int m) { return ( long ) m; } }";
    let unpadded = "class A { long f(int m) { return (long) m; } }";

    let default = RuleRegistry::build([ModuleConfig::new("TypecastParenPad")]);
    assert_eq!(run(&default, padded).unit.to_source(), unpadded);

    let space = RuleRegistry::build([ModuleConfig::with_options(
        "TypecastParenPad",
        RuleOptions::new().with("option", "space"),
    )]);
    assert_eq!(run(&space, unpadded).unit.to_source(), padded);
}

#[test]
fn untouched_source_is_printed_verbatim() {
    let source = "class A {\n    // keep me\n    int  x = 1 ;   /* and me */\n}\n";
    let result = run(&RuleRegistry::build([ModuleConfig::new("EmptyStatement")]), source);
    assert!(result.changed_rules.is_empty());
    assert_eq!(result.unit.to_source(), source);
}
