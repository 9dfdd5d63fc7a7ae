// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Identity and formatting shared by every tree node.
//!
//! # NodeId
//!
//! [`NodeId`] gives a node a stable identity. Cloning a node keeps its id, so
//! a node that survives a rewrite untouched is still recognizable in the next
//! pass. Fresh ids come from a process-wide counter and are never reused.
//!
//! # Formatting
//!
//! Every node owns a [`Formatting`] payload:
//!
//! - `prefix` is the whitespace and comments before the node's first token.
//!   When several nodes start at the same token, the outermost one owns it.
//! - `suffix` is the whitespace and comments between the node's last token and
//!   a delimiter that belongs to the parent (`,` `;` `)` `]` `>` `.` `:`).
//!   Again the outermost node ending there owns it.
//!
//! Operators and keywords in the middle of a node keep their leading
//! whitespace in explicit `*_prefix` fields on that node.

use std::sync::atomic::{AtomicU32, Ordering};

// ============================================================================
// Node Identity
// ============================================================================

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

/// A stable, unique identifier for a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Allocate a never-before-seen NodeId.
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Verbatim whitespace and comments attached to the edges of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formatting {
    pub prefix: String,
    pub suffix: String,
}

impl Formatting {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Formatting with only a prefix.
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::new(prefix, "")
    }

    /// A single leading space, the most common formatting for a new node.
    pub fn space() -> Self {
        Self::prefixed(" ")
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Whether a stretch of formatting text contains a line break.
pub fn has_newline(text: &str) -> bool {
    memchr::memchr(b'\n', text.as_bytes()).is_some()
}

/// The indentation of the last line in a formatting string.
///
/// `"\n    // c\n        "` yields `"        "`.
pub fn last_line_indent(text: &str) -> &str {
    match memchr::memrchr(b'\n', text.as_bytes()) {
        Some(pos) => {
            let tail = &text[pos + 1..];
            let end = tail
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(tail.len());
            &tail[..end]
        }
        None => "",
    }
}

// ============================================================================
// Delimited lists
// ============================================================================

/// A comma-separated list between an opening and closing delimiter.
///
/// Used for argument lists `( )`, parameter lists `( )`, type argument lists
/// `< >` and parenthesized lambda parameters. Each element carries its own
/// prefix (after the opening delimiter or comma) and suffix (before the next
/// comma or the closing delimiter).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container<T> {
    /// Whitespace before the opening delimiter.
    pub before: String,
    pub elems: Vec<T>,
    /// Whitespace between the delimiters when the list is empty.
    pub empty: String,
}

impl<T> Container<T> {
    pub fn new(elems: Vec<T>) -> Self {
        Self {
            before: String::new(),
            elems,
            empty: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Rebuild the container with transformed elements, keeping its whitespace.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Container<U> {
        Container {
            before: self.before.clone(),
            elems: self.elems.iter().map(f).collect(),
            empty: self.empty.clone(),
        }
    }
}
