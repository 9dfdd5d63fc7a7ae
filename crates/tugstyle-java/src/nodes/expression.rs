// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.

use super::declaration::{ClassBody, TypeTree};
use super::statement::Block;
use super::traits::{Container, Formatting, NodeId};

// ============================================================================
// Operators
// ============================================================================

/// Binary operators, grouped by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    pub fn from_token(text: &str) -> Option<Self> {
        Some(match text {
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Le,
            ">=" => BinaryOp::Ge,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "&" => BinaryOp::BitAnd,
            "^" => BinaryOp::BitXor,
            "|" => BinaryOp::BitOr,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            _ => return None,
        })
    }

    /// Binding strength; a larger number binds looser.
    ///
    /// Unary operators are 1, `instanceof` shares 5 with the relational
    /// operators, ternaries are 12 and assignments 13.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 2,
            BinaryOp::Add | BinaryOp::Sub => 3,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 4,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 5,
            BinaryOp::Eq | BinaryOp::Ne => 6,
            BinaryOp::BitAnd => 7,
            BinaryOp::BitXor => 8,
            BinaryOp::BitOr => 9,
            BinaryOp::And => 10,
            BinaryOp::Or => 11,
        }
    }

    /// `(a op b) op c == a op (b op c)` for every operand.
    ///
    /// `+` is excluded because it doubles as string concatenation, and `*`
    /// because regrouping changes where `int` overflows before widening
    /// and how floating point rounds.
    pub fn is_associative(&self) -> bool {
        matches!(
            self,
            BinaryOp::BitAnd
                | BinaryOp::BitXor
                | BinaryOp::BitOr
                | BinaryOp::And
                | BinaryOp::Or
        )
    }
}

pub const UNARY_PRECEDENCE: u8 = 1;
pub const INSTANCEOF_PRECEDENCE: u8 = 5;
pub const TERNARY_PRECEDENCE: u8 = 12;
pub const ASSIGNMENT_PRECEDENCE: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Complement,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Complement => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }

    /// Whether the operator writes to its operand.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
        }
    }

    pub fn from_token(text: &str) -> Option<Self> {
        Some(match text {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Div,
            "%=" => AssignOp::Rem,
            "&=" => AssignOp::BitAnd,
            "|=" => AssignOp::BitOr,
            "^=" => AssignOp::BitXor,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            ">>>=" => AssignOp::UShr,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    True,
    False,
    Null,
}

// ============================================================================
// Expression nodes
// ============================================================================

/// A simple name. Also used for qualified names that are never rewritten
/// piecewise (package and import names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub id: NodeId,
    pub fmt: Formatting,
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>, fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub id: NodeId,
    pub fmt: Formatting,
    pub kind: LiteralKind,
    /// Source text, including quotes and suffixes.
    pub text: String,
}

impl Literal {
    pub fn boolean(value: bool, fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            kind: if value {
                LiteralKind::True
            } else {
                LiteralKind::False
            },
            text: if value { "true" } else { "false" }.to_string(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            LiteralKind::True => Some(true),
            LiteralKind::False => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub id: NodeId,
    pub fmt: Formatting,
    pub left: Box<Expr>,
    pub op_prefix: String,
    pub op: BinaryOp,
    pub right: Box<Expr>,
}

/// Prefix or postfix unary expression.
///
/// For prefix operators the whitespace between operator and operand is the
/// operand's prefix. For postfix operators `op_prefix` holds the whitespace
/// before the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unary {
    pub id: NodeId,
    pub fmt: Formatting,
    pub op: UnaryOp,
    pub op_prefix: String,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub id: NodeId,
    pub fmt: Formatting,
    pub target: Box<Expr>,
    pub op_prefix: String,
    pub op: AssignOp,
    pub value: Box<Expr>,
}

/// `( inner )`. Also the condition of `if`, `while`, `do`, `switch` and
/// `synchronized`, where the parentheses are part of the statement syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parens {
    pub id: NodeId,
    pub fmt: Formatting,
    pub inner: Box<Expr>,
}

impl Parens {
    pub fn new(inner: Expr, fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            inner: Box::new(inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ternary {
    pub id: NodeId,
    pub fmt: Formatting,
    pub condition: Box<Expr>,
    pub question_prefix: String,
    pub then_expr: Box<Expr>,
    pub colon_prefix: String,
    pub else_expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceOf {
    pub id: NodeId,
    pub fmt: Formatting,
    pub expr: Box<Expr>,
    pub op_prefix: String,
    pub ty: TypeTree,
}

/// `(Type) expr`. The type's prefix and suffix are the padding inside the
/// parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    pub id: NodeId,
    pub fmt: Formatting,
    pub ty: TypeTree,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub id: NodeId,
    pub fmt: Formatting,
    /// Receiver; its suffix is the whitespace before the `.`.
    pub select: Option<Box<Expr>>,
    pub type_args: Option<Container<TypeTree>>,
    pub name: Ident,
    pub args: Container<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccess {
    pub id: NodeId,
    pub fmt: Formatting,
    /// Its suffix is the whitespace before the `.`.
    pub target: Box<Expr>,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayAccess {
    pub id: NodeId,
    pub fmt: Formatting,
    /// Its suffix is the whitespace before the `[`.
    pub array: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub id: NodeId,
    pub fmt: Formatting,
    pub ty: TypeTree,
    pub args: Container<Expr>,
    pub body: Option<ClassBody>,
}

/// One `[size]` or `[]` in an array creation expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDimension {
    pub before: String,
    pub size: Option<Box<Expr>>,
    /// Whitespace inside `[]` when there is no size.
    pub empty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArray {
    pub id: NodeId,
    pub fmt: Formatting,
    pub elem: TypeTree,
    pub dims: Vec<ArrayDimension>,
    pub init: Option<ArrayInit>,
}

/// `{ a, b, }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayInit {
    pub id: NodeId,
    pub fmt: Formatting,
    pub elems: Vec<Expr>,
    pub trailing_comma: bool,
    /// Whitespace before `}` after a trailing comma or in an empty initializer.
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaParam {
    pub id: NodeId,
    pub fmt: Formatting,
    pub ty: Option<TypeTree>,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaParams {
    pub parenthesized: bool,
    pub params: Container<LambdaParam>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub id: NodeId,
    pub fmt: Formatting,
    pub params: LambdaParams,
    pub arrow_prefix: String,
    pub body: LambdaBody,
}

/// `target::name`. The target's suffix is the whitespace before `::`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub id: NodeId,
    pub fmt: Formatting,
    pub target: Box<Expr>,
    pub name: Ident,
}

/// Placeholder for an absent expression or statement, such as a missing
/// `for` condition. Prints only its formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Empty {
    pub id: NodeId,
    pub fmt: Formatting,
}

impl Empty {
    pub fn new(fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    Binary(Binary),
    Unary(Unary),
    Assign(Assign),
    Parens(Parens),
    Ternary(Ternary),
    InstanceOf(InstanceOf),
    Cast(Cast),
    MethodCall(MethodCall),
    FieldAccess(FieldAccess),
    ArrayAccess(ArrayAccess),
    NewClass(NewClass),
    NewArray(NewArray),
    ArrayInit(ArrayInit),
    Lambda(Lambda),
    MemberRef(MemberRef),
    Empty(Empty),
}

macro_rules! expr_common {
    ($self:ident, $e:ident => $body:expr) => {
        match $self {
            Expr::Ident($e) => $body,
            Expr::Literal($e) => $body,
            Expr::Binary($e) => $body,
            Expr::Unary($e) => $body,
            Expr::Assign($e) => $body,
            Expr::Parens($e) => $body,
            Expr::Ternary($e) => $body,
            Expr::InstanceOf($e) => $body,
            Expr::Cast($e) => $body,
            Expr::MethodCall($e) => $body,
            Expr::FieldAccess($e) => $body,
            Expr::ArrayAccess($e) => $body,
            Expr::NewClass($e) => $body,
            Expr::NewArray($e) => $body,
            Expr::ArrayInit($e) => $body,
            Expr::Lambda($e) => $body,
            Expr::MemberRef($e) => $body,
            Expr::Empty($e) => $body,
        }
    };
}

impl Expr {
    pub fn id(&self) -> NodeId {
        expr_common!(self, e => e.id)
    }

    pub fn fmt(&self) -> &Formatting {
        expr_common!(self, e => &e.fmt)
    }

    pub fn fmt_mut(&mut self) -> &mut Formatting {
        expr_common!(self, e => &mut e.fmt)
    }

    /// Replace this node's formatting.
    pub fn with_fmt(mut self, fmt: Formatting) -> Self {
        *self.fmt_mut() = fmt;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fmt_mut().prefix = prefix.into();
        self
    }

    pub fn ident(name: impl Into<String>, fmt: Formatting) -> Self {
        Expr::Ident(Ident::new(name, fmt))
    }

    pub fn boolean(value: bool, fmt: Formatting) -> Self {
        Expr::Literal(Literal::boolean(value, fmt))
    }

    /// The value of a `true`/`false` literal.
    pub fn as_bool_literal(&self) -> Option<bool> {
        match self {
            Expr::Literal(lit) => lit.as_bool(),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        match self {
            Expr::Parens(p) => p.inner.unparenthesized(),
            other => other,
        }
    }

    /// Binding strength of the outermost operator, per [`BinaryOp::precedence`].
    /// Primary expressions return 0.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(b) => b.op.precedence(),
            Expr::Unary(_) | Expr::Cast(_) => UNARY_PRECEDENCE,
            Expr::InstanceOf(_) => INSTANCEOF_PRECEDENCE,
            Expr::Ternary(_) => TERNARY_PRECEDENCE,
            Expr::Assign(_) | Expr::Lambda(_) => ASSIGNMENT_PRECEDENCE,
            _ => 0,
        }
    }

    /// Structural equality that ignores identity and formatting.
    pub fn is_equivalent(&self, other: &Expr) -> bool {
        crate::codegen::normalized_source(self) == crate::codegen::normalized_source(other)
    }

    /// Whether evaluating the expression can have an observable effect
    /// (calls, assignments, increments, object creation).
    pub fn has_side_effects(&self) -> bool {
        match self {
            Expr::Ident(_) | Expr::Literal(_) | Expr::Empty(_) | Expr::MemberRef(_) => false,
            Expr::Lambda(_) => false,
            Expr::MethodCall(_) | Expr::NewClass(_) | Expr::Assign(_) => true,
            Expr::NewArray(n) => {
                n.dims
                    .iter()
                    .any(|d| d.size.as_ref().is_some_and(|s| s.has_side_effects()))
                    || n.init.as_ref().is_some_and(|i| i.elems.iter().any(Expr::has_side_effects))
            }
            Expr::Unary(u) => u.op.is_mutation() || u.expr.has_side_effects(),
            Expr::Binary(b) => b.left.has_side_effects() || b.right.has_side_effects(),
            Expr::Parens(p) => p.inner.has_side_effects(),
            Expr::Ternary(t) => {
                t.condition.has_side_effects()
                    || t.then_expr.has_side_effects()
                    || t.else_expr.has_side_effects()
            }
            Expr::InstanceOf(i) => i.expr.has_side_effects(),
            Expr::Cast(c) => c.expr.has_side_effects(),
            Expr::FieldAccess(f) => f.target.has_side_effects(),
            Expr::ArrayAccess(a) => a.array.has_side_effects() || a.index.has_side_effects(),
            Expr::ArrayInit(i) => i.elems.iter().any(Expr::has_side_effects),
        }
    }
}
