// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The path from the root of the tree to the node being visited.
//!
//! A [`Cursor`] is a linked list of stack frames: each walk function pushes a
//! frame for the node it descends into and drops it on return. Frames borrow
//! the *original* nodes of the current pass, so queries see the tree as it
//! was before any rewrite in this pass.

use crate::error::EngineError;
use crate::nodes::*;

/// A borrowed reference to one of the node kinds that gets a cursor frame.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    CompilationUnit(&'a CompilationUnit),
    Class(&'a ClassDecl),
    EnumConstant(&'a EnumConstant),
    Method(&'a MethodDecl),
    VarDecls(&'a VarDecls),
    NamedVar(&'a NamedVar),
    Stmt(&'a Stmt),
    Block(&'a Block),
    Case(&'a Case),
    Catch(&'a Catch),
    Expr(&'a Expr),
    LambdaParam(&'a LambdaParam),
}

/// Kinds usable with [`Cursor::nearest_enclosing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    Class,
    EnumConstant,
    Method,
    VarDecls,
    NamedVar,
    Block,
    If,
    For,
    ForEach,
    While,
    DoWhile,
    Switch,
    Case,
    Try,
    Catch,
    Synchronized,
    Labeled,
    /// Any other statement.
    Statement,
    Lambda,
    LambdaParam,
    NewClass,
    /// Any other expression.
    Expression,
}

impl NodeKind {
    /// Kinds that open a new scope for local names.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::CompilationUnit
                | NodeKind::Class
                | NodeKind::Method
                | NodeKind::Block
                | NodeKind::For
                | NodeKind::ForEach
                | NodeKind::Catch
                | NodeKind::Try
                | NodeKind::Lambda
                | NodeKind::Switch
        )
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::CompilationUnit(n) => n.id,
            NodeRef::Class(n) => n.id,
            NodeRef::EnumConstant(n) => n.id,
            NodeRef::Method(n) => n.id,
            NodeRef::VarDecls(n) => n.id,
            NodeRef::NamedVar(n) => n.id,
            NodeRef::Stmt(n) => n.id(),
            NodeRef::Block(n) => n.id,
            NodeRef::Case(n) => n.id,
            NodeRef::Catch(n) => n.id,
            NodeRef::Expr(n) => n.id(),
            NodeRef::LambdaParam(n) => n.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::CompilationUnit(_) => NodeKind::CompilationUnit,
            NodeRef::Class(_) => NodeKind::Class,
            NodeRef::EnumConstant(_) => NodeKind::EnumConstant,
            NodeRef::Method(_) => NodeKind::Method,
            NodeRef::VarDecls(_) => NodeKind::VarDecls,
            NodeRef::NamedVar(_) => NodeKind::NamedVar,
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Case(_) => NodeKind::Case,
            NodeRef::Catch(_) => NodeKind::Catch,
            NodeRef::LambdaParam(_) => NodeKind::LambdaParam,
            NodeRef::Stmt(stmt) => match stmt {
                Stmt::Block(_) => NodeKind::Block,
                Stmt::LocalClass(_) => NodeKind::Class,
                Stmt::LocalVar(_) => NodeKind::VarDecls,
                Stmt::If(_) => NodeKind::If,
                Stmt::For(_) => NodeKind::For,
                Stmt::ForEach(_) => NodeKind::ForEach,
                Stmt::While(_) => NodeKind::While,
                Stmt::DoWhile(_) => NodeKind::DoWhile,
                Stmt::Switch(_) => NodeKind::Switch,
                Stmt::Try(_) => NodeKind::Try,
                Stmt::Synchronized(_) => NodeKind::Synchronized,
                Stmt::Labeled(_) => NodeKind::Labeled,
                _ => NodeKind::Statement,
            },
            NodeRef::Expr(expr) => match expr {
                Expr::Lambda(_) => NodeKind::Lambda,
                Expr::NewClass(_) => NodeKind::NewClass,
                _ => NodeKind::Expression,
            },
        }
    }

    pub fn as_class(&self) -> Option<&'a ClassDecl> {
        match *self {
            NodeRef::Class(c) | NodeRef::Stmt(Stmt::LocalClass(c)) => Some(c),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&'a MethodDecl> {
        match *self {
            NodeRef::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&'a Block> {
        match *self {
            NodeRef::Block(b) | NodeRef::Stmt(Stmt::Block(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_stmt(&self) -> Option<&'a Stmt> {
        match *self {
            NodeRef::Stmt(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_expr(&self) -> Option<&'a Expr> {
        match *self {
            NodeRef::Expr(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_case(&self) -> Option<&'a Case> {
        match *self {
            NodeRef::Case(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_var_decls(&self) -> Option<&'a VarDecls> {
        match *self {
            NodeRef::VarDecls(v) | NodeRef::Stmt(Stmt::LocalVar(v)) => Some(v),
            _ => None,
        }
    }
}

/// One frame of the traversal path.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    parent: Option<&'a Cursor<'a>>,
    node: NodeRef<'a>,
}

impl<'a> Cursor<'a> {
    pub fn root(unit: &'a CompilationUnit) -> Self {
        Self {
            parent: None,
            node: NodeRef::CompilationUnit(unit),
        }
    }

    /// A child frame for `node`.
    pub fn push<'b>(&'b self, node: NodeRef<'b>) -> Cursor<'b>
    where
        'a: 'b,
    {
        Cursor {
            parent: Some(self),
            node,
        }
    }

    pub fn node(&self) -> NodeRef<'a> {
        self.node
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    /// The enclosing frame, or `NoEnclosingScope` at the root.
    pub fn parent(&self) -> Result<&'a Cursor<'a>, EngineError> {
        self.parent.ok_or(EngineError::NoEnclosingScope)
    }

    /// Frames from this one up to the root, this one first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Cursor<'a>> {
        std::iter::successors(Some(self), |c| c.parent)
    }

    /// The closest strict ancestor of the given kind.
    pub fn nearest_enclosing(&self, kind: NodeKind) -> Result<&Cursor<'a>, EngineError> {
        self.ancestors()
            .skip(1)
            .find(|c| c.kind() == kind)
            .ok_or(EngineError::NoEnclosingScope)
    }

    /// The closest enclosing class declaration, local classes included.
    pub fn enclosing_class(&self) -> Option<&'a ClassDecl> {
        self.ancestors().skip(1).find_map(|c| c.node.as_class())
    }

    /// Whether `id` is this node or one of its ancestors.
    pub fn is_same_or_descendant_of(&self, id: NodeId) -> bool {
        self.ancestors().any(|c| c.id() == id)
    }

    /// Number of frames between this one and the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_compilation_unit;

    #[test]
    fn test_parent_at_root_fails() {
        let unit = parse_compilation_unit("class A {}").unwrap();
        let cursor = Cursor::root(&unit);
        assert!(matches!(cursor.parent(), Err(EngineError::NoEnclosingScope)));
        assert_eq!(cursor.depth(), 0);
    }

    #[test]
    fn test_nearest_enclosing_and_containment() {
        let unit = parse_compilation_unit("class A { void f() { int x; } }").unwrap();
        let class = &unit.types[0];
        let method = class.body.methods().next().unwrap();
        let body = method.body.as_ref().unwrap();

        let root = Cursor::root(&unit);
        let class_cursor = root.push(NodeRef::Class(class));
        let method_cursor = class_cursor.push(NodeRef::Method(method));
        let block_cursor = method_cursor.push(NodeRef::Block(body));
        let stmt_cursor = block_cursor.push(NodeRef::Stmt(&body.stmts[0]));

        assert_eq!(stmt_cursor.kind(), NodeKind::VarDecls);
        let found = stmt_cursor.nearest_enclosing(NodeKind::Method).unwrap();
        assert_eq!(found.id(), method.id);
        assert!(stmt_cursor.nearest_enclosing(NodeKind::Switch).is_err());
        assert!(stmt_cursor.is_same_or_descendant_of(class.id));
        assert!(!class_cursor.is_same_or_descendant_of(method.id));
        assert_eq!(stmt_cursor.enclosing_class().unwrap().name.name, "A");
        assert_eq!(stmt_cursor.parent().unwrap().id(), body.id);
    }
}
