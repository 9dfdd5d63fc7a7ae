//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Root crate
// ============================================================================

use tugstyle::error::{OutputErrorCode, TugstyleError};
use tugstyle::report::{
    emit_response, ErrorInfo, ErrorResponse, FileReport, FileStatus, RunReport, Summary,
    SCHEMA_VERSION,
};
use tugstyle::runner::run;
use tugstyle::{fix_file, fix_source, FixOptions, FixResult};

// ============================================================================
// Core infrastructure
// ============================================================================

use tugstyle_core::{
    discover_java_files, CheckstyleConfig, ConfigCache, ConfigError, DiscoveryOptions,
    ModuleConfig, Properties, RuleOptions, Suppressions,
};

// ============================================================================
// Tree, visitor and scheduler
// ============================================================================

use tugstyle_java::{
    maybe_transform, parse_compilation_unit, parse_expression, parse_statement, Codegen,
    CompilationUnit, Cursor, Effects, EngineError, Expr, Formatting, JavaVisitor, NodeId,
    NodeKind, NodeRef, Outcome, ParserError, Rule, Scheduler, SchedulerResult, Stmt, Transform,
    DEFAULT_MAX_PASSES,
};

// ============================================================================
// Rules and registry
// ============================================================================

use tugstyle_rules::rules::{
    CovariantEquals, DefaultComesLast, EmptyBlock, EmptyForInitializerPad, EmptyForIteratorPad,
    EmptyStatement, EqualsAvoidsNull, ExplicitInitialization, FallThrough, FinalClass,
    FinalLocalVariable, GenericWhitespace, HiddenField, HideUtilityClassConstructor, LeftCurly,
    MethodParamPad, MultipleVariableDeclarations, NeedBraces, NoFinalizer, NoWhitespaceAfter,
    NoWhitespaceBefore, OperatorWrap, RightCurly, SimplifyBooleanExpression,
    SimplifyBooleanReturn, StaticVariableName, StringLiteralEquality, TypecastParenPad,
    UnnecessaryParentheses,
};
use tugstyle_rules::{
    construct, is_known, BlockPolicy, LeftCurlyPolicy, PadPolicy, RightCurlyPolicy, RuleRegistry,
    Token, WrapPolicy, KNOWN_RULES,
};

#[test]
fn api_surface_compiles() {
    // This test exists only to ensure the imports above compile.
    // If we get here, the API surface is intact.
}

#[test]
fn every_rule_is_reachable_by_name() {
    for name in KNOWN_RULES {
        assert!(is_known(name));
        assert!(construct(name, &RuleOptions::new()).is_some());
    }
    assert!(!is_known("LineLength"));
}
