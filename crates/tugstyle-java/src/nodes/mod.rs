// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The Java syntax tree.
//!
//! The tree is immutable by convention: transformations take a node by
//! reference and return a new owned node. Untouched subtrees are cloned,
//! which preserves their [`NodeId`]s.

pub mod declaration;
pub mod expression;
pub mod statement;
pub mod traits;

pub use declaration::*;
pub use expression::*;
pub use statement::*;
pub use traits::{has_newline, last_line_indent, Container, Formatting, NodeId};
