// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for rewriting Java trees.
//!
//! - [`JavaVisitor`]: rebuilding visitor with one `visit_*` method per node
//!   kind and a default `walk_*` traversal.
//! - [`Cursor`]: the path from the root to the node being visited.
//! - [`maybe_transform`]: recurse first, then rewrite and record a change
//!   when a condition held for the original node.
//! - [`Rule`]: a named visitor the scheduler can run.
//! - [`scope`]: read-only queries over declared names and expressions.

mod cursor;
mod dispatch;
pub mod scope;
mod traits;

pub use cursor::{Cursor, NodeKind, NodeRef};
pub use dispatch::*;
pub use traits::{maybe_transform, Effects, JavaVisitor, Rule, Transform};
