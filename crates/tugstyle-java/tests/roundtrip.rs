// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the Java parser.
//!
//! These tests verify that `parse(code).to_source() == code` for every
//! accepted input. Rules rely on this: a file no rule touches must be
//! written back byte-for-byte.
//!
//! # Test Organization
//!
//! - Fixture-based tests: every `.java` file in `tests/fixtures/`
//! - Inline tests: individual snippets for whitespace and comment placement

use difference::assert_diff;
use itertools::Itertools;
use std::path::PathBuf;
use tugstyle_java::{parse_compilation_unit, Codegen};

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

/// Helper to perform round-trip test on source code
fn assert_roundtrip(source: &str, label: &str) {
    let unit = match parse_compilation_unit(source) {
        Ok(unit) => unit,
        Err(e) => panic!("{}: {}", label, e),
    };
    let generated = unit.to_source();
    if generated != source {
        let got = visualize(&generated);
        let expected = visualize(source);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn all_fixtures() -> impl Iterator<Item = (PathBuf, String)> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");

    path.read_dir()
        .expect("read_dir")
        .map(|file| file.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "java"))
        .sorted()
        .map(|path| {
            let contents = std::fs::read_to_string(&path).expect("reading file");
            (path, contents)
        })
}

#[test]
fn roundtrip_fixtures() {
    let mut count = 0;
    for (path, input) in all_fixtures() {
        assert_roundtrip(&input, &format!("{:?}", path));
        count += 1;
    }
    assert!(count >= 2, "expected fixture files");
}

#[test]
fn roundtrip_comments_everywhere() {
    assert_roundtrip(
        "class /* a */ A /* b */ { /* c */ int /* d */ x /* e */ = /* f */ 1 /* g */ ; /* h */ }",
        "comments",
    );
}

#[test]
fn roundtrip_crlf_and_tabs() {
    assert_roundtrip("class A {\r\n\tvoid f() {\r\n\t\tg( 1 ,2 );\r\n\t}\r\n}\r\n", "crlf");
}

#[test]
fn roundtrip_operators_without_spaces() {
    assert_roundtrip(
        "class A { int f(int a,int b){return a>>b>>>1<<2&~a|b^-a%3>=0?a++:--b;} }",
        "operators",
    );
}

#[test]
fn roundtrip_generics_closing_angles() {
    assert_roundtrip(
        "class A { java.util.Map<String, java.util.List<java.util.Set<Integer>>> m; boolean b = 1 >> 2 > 0; }",
        "angles",
    );
}

#[test]
fn roundtrip_trailing_trivia() {
    assert_roundtrip("\n\n// lead\nclass A {}\n\n// trailing\n", "trivia");
}

#[test]
fn roundtrip_empty_file() {
    assert_roundtrip("", "empty");
    assert_roundtrip("  // only a comment\n", "comment only");
}
