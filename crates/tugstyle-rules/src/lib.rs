// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Checkstyle checks as tree rewrites.
//!
//! Each rule in [`rules`] detects one kind of Checkstyle violation and
//! rewrites only the offending subtree. Rules are built from a Checkstyle
//! option bag through the [`RuleRegistry`]:
//!
//! ```
//! use tugstyle_core::ModuleConfig;
//! use tugstyle_java::{parse_compilation_unit, Codegen, Scheduler};
//! use tugstyle_rules::RuleRegistry;
//!
//! let registry = RuleRegistry::build([ModuleConfig::new("EmptyStatement")]);
//! let unit = parse_compilation_unit("class A { void f() { g();; } }").unwrap();
//! let result = Scheduler::default().run(unit, &mut registry.instantiate()).unwrap();
//! assert_eq!(result.unit.to_source(), "class A { void f() { g(); } }");
//! ```

mod format;
mod imports;

pub mod deferred;
pub mod policy;
pub mod registry;
pub mod rename;
pub mod rules;
pub mod token;

#[cfg(test)]
mod test_helpers;

pub use policy::{BlockPolicy, LeftCurlyPolicy, PadPolicy, RightCurlyPolicy, WrapPolicy};
pub use registry::{construct, is_known, RuleRegistry, KNOWN_RULES};
pub use token::Token;
