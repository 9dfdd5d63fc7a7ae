// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes.
//!
//! Statements never contain their terminating `;`. Whoever holds the
//! statement (a block, a case, an `if` branch) prints the semicolon after
//! the statement's suffix when [`Stmt::needs_semicolon`] says so. The suffix
//! is therefore the whitespace before the `;`.

use super::declaration::{ClassDecl, VarDecls};
use super::expression::{Empty, Expr, Ident, Parens};
use super::traits::{Formatting, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NodeId,
    /// Prefix is the whitespace before `{` (or before `static`).
    pub fmt: Formatting,
    /// Set for static initializers: the whitespace between `static` and `{`.
    pub static_init: Option<String>,
    pub stmts: Vec<Stmt>,
    /// Whitespace before `}`.
    pub end: String,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, fmt: Formatting, end: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            static_init: None,
            stmts,
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Else {
    pub id: NodeId,
    /// Prefix is the whitespace before `else`.
    pub fmt: Formatting,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub id: NodeId,
    pub fmt: Formatting,
    pub condition: Parens,
    pub then_stmt: Box<Stmt>,
    pub else_part: Option<Else>,
}

/// `( init ; condition ; update )`.
///
/// Absent parts are [`Stmt::Empty`] / [`Expr::Empty`] nodes whose prefix is
/// the whitespace in the gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForControl {
    /// Whitespace before `(`.
    pub before: String,
    pub init: Vec<Stmt>,
    pub condition: Box<Expr>,
    pub update: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct For {
    pub id: NodeId,
    pub fmt: Formatting,
    pub control: ForControl,
    pub body: Box<Stmt>,
}

/// `( Type name : iterable )`. The variable's suffix is the whitespace before
/// the `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForEachControl {
    pub before: String,
    pub var: VarDecls,
    pub iterable: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForEach {
    pub id: NodeId,
    pub fmt: Formatting,
    pub control: ForEachControl,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct While {
    pub id: NodeId,
    pub fmt: Formatting,
    pub condition: Parens,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoWhile {
    pub id: NodeId,
    pub fmt: Formatting,
    pub body: Box<Stmt>,
    pub while_prefix: String,
    pub condition: Parens,
}

/// One `case x:` or `default:` label with the statements that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub id: NodeId,
    pub fmt: Formatting,
    /// `None` for `default`.
    pub pattern: Option<Expr>,
    pub colon_prefix: String,
    pub stmts: Vec<Stmt>,
}

impl Case {
    pub fn is_default(&self) -> bool {
        self.pattern.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    pub id: NodeId,
    pub fmt: Formatting,
    pub selector: Parens,
    /// Whitespace before `{`.
    pub block_prefix: String,
    pub cases: Vec<Case>,
    /// Whitespace before `}`.
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catch {
    pub id: NodeId,
    /// Prefix is the whitespace before `catch`.
    pub fmt: Formatting,
    /// Whitespace before `(`.
    pub paren_prefix: String,
    /// Multi-catch alternatives are kept verbatim in the type name.
    pub param: VarDecls,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finally {
    pub id: NodeId,
    pub fmt: Formatting,
    pub body: Block,
}

/// `( Res r = ...; Res s = ... )`. Each resource's suffix is the whitespace
/// before the following `;` or `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub before: String,
    pub decls: Vec<VarDecls>,
    /// Whitespace before `)` after a trailing `;`.
    pub trailing_semicolon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Try {
    pub id: NodeId,
    pub fmt: Formatting,
    pub resources: Option<Resources>,
    pub body: Block,
    pub catches: Vec<Catch>,
    pub finally: Option<Finally>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synchronized {
    pub id: NodeId,
    pub fmt: Formatting,
    pub lock: Parens,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    pub id: NodeId,
    pub fmt: Formatting,
    pub expr: Option<Expr>,
}

impl Return {
    pub fn new(expr: Option<Expr>, fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            expr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Break {
    pub id: NodeId,
    pub fmt: Formatting,
    pub label: Option<Ident>,
}

impl Break {
    pub fn new(fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continue {
    pub id: NodeId,
    pub fmt: Formatting,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throw {
    pub id: NodeId,
    pub fmt: Formatting,
    pub expr: Expr,
}

/// `label: stmt`. The label's suffix is the whitespace before `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeled {
    pub id: NodeId,
    pub fmt: Formatting,
    pub label: Ident,
    pub stmt: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    LocalVar(VarDecls),
    LocalClass(ClassDecl),
    Expr(Expr),
    If(If),
    For(For),
    ForEach(ForEach),
    While(While),
    DoWhile(DoWhile),
    Switch(Switch),
    Try(Try),
    Synchronized(Synchronized),
    Return(Return),
    Break(Break),
    Continue(Continue),
    Throw(Throw),
    Labeled(Labeled),
    Empty(Empty),
}

macro_rules! stmt_common {
    ($self:ident, $e:ident => $expr_body:expr, $s:ident => $body:expr) => {
        match $self {
            Stmt::Expr($e) => $expr_body,
            Stmt::Block($s) => $body,
            Stmt::LocalVar($s) => $body,
            Stmt::LocalClass($s) => $body,
            Stmt::If($s) => $body,
            Stmt::For($s) => $body,
            Stmt::ForEach($s) => $body,
            Stmt::While($s) => $body,
            Stmt::DoWhile($s) => $body,
            Stmt::Switch($s) => $body,
            Stmt::Try($s) => $body,
            Stmt::Synchronized($s) => $body,
            Stmt::Return($s) => $body,
            Stmt::Break($s) => $body,
            Stmt::Continue($s) => $body,
            Stmt::Throw($s) => $body,
            Stmt::Labeled($s) => $body,
            Stmt::Empty($s) => $body,
        }
    };
}

impl Stmt {
    pub fn id(&self) -> NodeId {
        stmt_common!(self, e => e.id(), s => s.id)
    }

    pub fn fmt(&self) -> &Formatting {
        stmt_common!(self, e => e.fmt(), s => &s.fmt)
    }

    pub fn fmt_mut(&mut self) -> &mut Formatting {
        stmt_common!(self, e => e.fmt_mut(), s => &mut s.fmt)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fmt_mut().prefix = prefix.into();
        self
    }

    /// Whether the holder of this statement prints a `;` after it.
    pub fn needs_semicolon(&self) -> bool {
        matches!(
            self,
            Stmt::LocalVar(_)
                | Stmt::Expr(_)
                | Stmt::DoWhile(_)
                | Stmt::Return(_)
                | Stmt::Break(_)
                | Stmt::Continue(_)
                | Stmt::Throw(_)
                | Stmt::Empty(_)
        )
    }

    /// A `break;` with the given prefix.
    pub fn break_stmt(prefix: impl Into<String>) -> Self {
        Stmt::Break(Break::new(Formatting::prefixed(prefix)))
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Stmt::Block(b) => Some(b),
            _ => None,
        }
    }

    /// `break`, `continue`, `return` or `throw`.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Return(_) | Stmt::Throw(_)
        )
    }
}
