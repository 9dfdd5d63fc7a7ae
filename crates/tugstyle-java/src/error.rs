// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised while rewriting a tree.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A cursor query walked past the root.
    #[error("no enclosing scope")]
    NoEnclosingScope,

    /// A rule found the tree in a shape it cannot handle.
    #[error("invalid tree: {0}")]
    InvalidTree(String),
}
