// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A formatting-preserving Java syntax tree and rewrite engine.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_compilation_unit`] turns source text into a
//!   [`CompilationUnit`] whose nodes own every byte of whitespace and
//!   comments as prefix/suffix formatting.
//! - **Code Generation**: the [`Codegen`] trait prints a tree back to source.
//!   Printing an unmodified tree reproduces the input exactly.
//! - **Visiting**: [`visitor::JavaVisitor`] rebuilds a tree node by node with
//!   a [`visitor::Cursor`] describing the path from the root.
//! - **Scheduling**: [`scheduler::Scheduler`] runs a set of
//!   [`visitor::Rule`]s to a fixpoint.
//!
//! # Quick Start
//!
//! ```
//! use tugstyle_java::{parse_compilation_unit, Codegen};
//!
//! let source = "class A { int x = 1; }";
//! let unit = parse_compilation_unit(source).expect("parse error");
//! assert_eq!(unit.to_source(), source);
//! ```

pub mod codegen;
pub mod error;
pub mod nodes;
pub mod parser;
pub mod scheduler;
pub mod tokenizer;
pub mod visitor;

pub use codegen::{codegen_statement, normalized_source, Codegen, CodegenState};
pub use error::EngineError;
pub use nodes::*;
pub use parser::{parse_compilation_unit, parse_expression, parse_statement, ParserError};
pub use scheduler::{Outcome, Scheduler, SchedulerResult, DEFAULT_MAX_PASSES};
pub use visitor::{maybe_transform, Cursor, Effects, JavaVisitor, NodeKind, NodeRef, Rule, Transform};
