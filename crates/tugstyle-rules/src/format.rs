// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace helpers for nodes created by rules.

use tugstyle_java::{
    codegen_statement, has_newline, last_line_indent, parse_statement, Block, Case, CodegenState,
    Cursor, EngineError, NodeRef, Stmt,
};

/// Indentation added for one nesting level when none can be copied.
pub(crate) const INDENT: &str = "    ";

/// A prefix that starts a new line at the same indentation as `prefix`, or a
/// single space when `prefix` does not break the line.
///
/// Comments in `prefix` are not copied.
pub(crate) fn same_line_start(prefix: &str) -> String {
    if has_newline(prefix) {
        format!("\n{}", last_line_indent(prefix))
    } else {
        " ".to_string()
    }
}

/// A prefix one level deeper than `prefix`.
pub(crate) fn nested_line_start(prefix: &str) -> String {
    if has_newline(prefix) {
        format!("\n{}{INDENT}", last_line_indent(prefix))
    } else {
        " ".to_string()
    }
}

/// The prefix for a statement appended to a list whose last element is
/// `last`, or whose owner starts with `owner_prefix` when it is empty.
pub(crate) fn next_stmt_prefix(last: Option<&Stmt>, owner_prefix: &str) -> String {
    match last {
        Some(stmt) => same_line_start(&stmt.fmt().prefix),
        None => nested_line_start(owner_prefix),
    }
}

/// Indentation of the line the statement at `cursor` starts on, or `None`
/// when it shares its line with the code before it.
///
/// An `else if` or a labeled statement starts on its parent's line.
pub(crate) fn stmt_line_indent<'a>(cursor: &Cursor<'a>) -> Option<&'a str> {
    for frame in cursor.ancestors() {
        let stmt = frame.node().as_stmt()?;
        let prefix = &stmt.fmt().prefix;
        if has_newline(prefix) {
            return Some(last_line_indent(prefix));
        }
        let continues_parent = frame.parent().is_ok_and(|parent| {
            matches!(
                parent.node(),
                NodeRef::Stmt(Stmt::If(_)) | NodeRef::Stmt(Stmt::Labeled(_))
            )
        });
        if !continues_parent {
            return None;
        }
    }
    None
}

/// The prefix for a statement appended to `case`.
pub(crate) fn case_stmt_prefix(case: &Case) -> String {
    next_stmt_prefix(case.stmts.last(), &case.fmt.prefix)
}

/// The prefix for a statement put into the empty `block`. A block closed on
/// the same line gets a space before its `}`.
pub(crate) fn block_stmt_prefix(block: &mut Block) -> String {
    if has_newline(&block.end) {
        nested_line_start(&block.end)
    } else {
        block.end = " ".to_string();
        " ".to_string()
    }
}

/// Put `stmts` into an empty `block`, one per line when the block spans
/// lines and on the same line otherwise.
pub(crate) fn fill_block(block: &mut Block, stmts: Vec<Stmt>) {
    let line = block_stmt_prefix(block);
    block.stmts = stmts
        .into_iter()
        .map(|stmt| stmt.with_prefix(line.clone()))
        .collect();
}

/// `stmt` reprinted one level deeper: every line break inside it gains an
/// [`INDENT`]. The statement's own prefix is replaced by `prefix`.
pub(crate) fn shift_right(stmt: &Stmt, prefix: &str) -> Result<Stmt, EngineError> {
    let mut state = CodegenState::default();
    codegen_statement(&stmt.clone().with_prefix(""), &mut state);
    let shifted = state.to_string().replace('\n', &format!("\n{INDENT}"));
    let reparsed = parse_statement(&shifted).map_err(|e| EngineError::InvalidTree(e.to_string()))?;
    Ok(reparsed.with_prefix(prefix))
}

/// Whether `text` is whitespace only.
pub(crate) fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// The `//` and `/* */` comments in `text`, in order.
///
/// `text` must not contain string or character literals.
pub(crate) fn comments(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('/') {
        let tail = &rest[start..];
        let end = if tail.starts_with("//") {
            tail.find('\n').unwrap_or(tail.len())
        } else if tail.starts_with("/*") {
            tail[2..].find("*/").map_or(tail.len(), |i| i + 4)
        } else {
            rest = &tail[1..];
            continue;
        };
        found.push(tail[..end].trim_end().to_string());
        rest = &tail[end..];
    }
    found
}

/// `prefix` followed by `comments`, each on its own line at the indentation
/// `prefix` ends with. When `prefix` does not break the line, block comments
/// stay on it and line comments end it.
pub(crate) fn prefix_with_comments(prefix: &str, comments: &[String]) -> String {
    let mut out = prefix.to_string();
    for comment in comments {
        out.push_str(comment);
        if has_newline(prefix) {
            out.push('\n');
            out.push_str(last_line_indent(prefix));
        } else if comment.starts_with("//") {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    out
}
