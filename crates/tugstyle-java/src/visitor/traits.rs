// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait, rule trait and the transformation primitive.

use std::fmt;

use super::cursor::Cursor;
use super::dispatch::*;
use crate::error::EngineError;
use crate::nodes::{
    Block, Case, Catch, ClassBody, ClassDecl, CompilationUnit, EnumConstant, Expr, LambdaParam,
    Member, MethodDecl, NamedVar, NodeId, Stmt, TypeTree, VarDecls,
};

/// Generic transform result for list contexts.
///
/// Statements in a block or case and members of a class body can be removed
/// or replaced by several nodes.
#[derive(Debug, Clone)]
pub enum Transform<T> {
    /// Keep the transformed node.
    Keep(T),
    /// Remove the node from the list.
    Remove,
    /// Replace the node with multiple nodes.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    /// Append the result to a list being rebuilt.
    pub fn extend_into(self, out: &mut Vec<T>) {
        match self {
            Transform::Keep(t) => out.push(t),
            Transform::Remove => {}
            Transform::Flatten(v) => out.extend(v),
        }
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

// ============================================================================
// Effects
// ============================================================================

/// What a visitor reported during one run over the tree.
#[derive(Default)]
pub struct Effects {
    pub(crate) changes: Vec<NodeId>,
    pub(crate) deferred: Vec<(NodeId, Box<dyn Rule>)>,
    pub(crate) failure: Option<EngineError>,
}

impl fmt::Debug for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effects")
            .field("changes", &self.changes)
            .field(
                "deferred",
                &self
                    .deferred
                    .iter()
                    .map(|(target, v)| (target, v.name()))
                    .collect::<Vec<_>>(),
            )
            .field("failure", &self.failure)
            .finish()
    }
}

impl Effects {
    /// Record that the node with `id` was replaced.
    pub fn record_change(&mut self, id: NodeId) {
        self.changes.push(id);
    }

    /// Queue `visitor` for the next pass, targeted at `target`.
    pub fn and_then(&mut self, target: NodeId, visitor: impl Rule + 'static) {
        self.deferred.push((target, Box::new(visitor)));
    }

    /// Record a failure. Only the first one is kept.
    pub fn fail(&mut self, error: EngineError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    /// Unwrap a result, recording the error when there is one.
    pub fn check<T>(&mut self, result: Result<T, EngineError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }
}

// ============================================================================
// Visitor
// ============================================================================

/// Generates `visit_*` methods that default to the matching `walk_*`.
macro_rules! visit_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node and return its replacement.")]
                #[doc = ""]
                #[doc = concat!("Defaults to [`walk_", stringify!($base_name), "`], which rebuilds the node from its visited children.")]
                fn [<visit_ $base_name>]<'a>(&mut self, node: &'a $node_type, cursor: &Cursor<'a>) -> $node_type {
                    [<walk_ $base_name>](self, node, cursor)
                }
            )*
        }
    };
}

/// Generates `visit_*_in_list` methods for nodes that live in lists.
macro_rules! visit_list_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] in a list context.")]
                #[doc = ""]
                #[doc = "Returns `Transform::Keep` of the plain visit by default. Can also return `Remove` or `Flatten`."]
                fn [<visit_ $base_name _in_list>]<'a>(
                    &mut self,
                    node: &'a $node_type,
                    cursor: &Cursor<'a>,
                ) -> Transform<$node_type> {
                    Transform::Keep(self.[<visit_ $base_name>](node, cursor))
                }
            )*
        }
    };
}

/// A rebuilding visitor over the Java tree.
///
/// Every `visit_*` method borrows a node of the current tree and returns
/// the node that replaces it in the next one. The default implementations
/// recurse and rebuild, so a visitor overrides only the kinds it rewrites.
///
/// The `cursor` passed with a node has that node as its current frame when
/// the node kind gets a frame (see [`NodeRef`](super::NodeRef)). Class
/// bodies, members and types are visited with the frame of their owner.
pub trait JavaVisitor {
    fn effects(&mut self) -> &mut Effects;

    /// Abort the current file with `error`.
    fn fail(&mut self, error: EngineError) {
        self.effects().fail(error);
    }

    // Declarations
    visit_methods! {
        compilation_unit: CompilationUnit,
        class_decl: ClassDecl,
        class_body: ClassBody,
        member: Member,
        enum_constant: EnumConstant,
        method: MethodDecl,
        var_decls: VarDecls,
        named_var: NamedVar,
        type_tree: TypeTree,
    }

    // Statements
    visit_methods! {
        stmt: Stmt,
        block: Block,
        case: Case,
        catch: Catch,
    }

    // Expressions
    visit_methods! {
        expr: Expr,
        lambda_param: LambdaParam,
    }

    visit_list_methods! {
        stmt: Stmt,
        member: Member,
    }
}

/// A named visitor run by the scheduler.
pub trait Rule: JavaVisitor + Send {
    fn name(&self) -> &str;

    /// Rules whose rewrite is not safe to reapply run in the first pass only.
    fn is_single_run(&self) -> bool {
        false
    }
}

/// Recurse, then rewrite when `condition` held for the original node.
///
/// `recurse` rebuilds the node with transformed children. When `condition`
/// is true, `rewrite` receives the recursed node and may return its
/// replacement; a replacement is recorded as a change of `id`. Returning
/// `None` means the rewrite no longer applies and leaves the recursed node
/// in place.
pub fn maybe_transform<'a, V, R>(
    visitor: &mut V,
    id: NodeId,
    condition: bool,
    cursor: &Cursor<'a>,
    recurse: impl FnOnce(&mut V) -> R,
    rewrite: impl FnOnce(&mut V, &R, &Cursor<'a>) -> Option<R>,
) -> R
where
    V: JavaVisitor + ?Sized,
{
    let recursed = recurse(visitor);
    if !condition {
        return recursed;
    }
    match rewrite(visitor, &recursed, cursor) {
        Some(replacement) => {
            visitor.effects().record_change(id);
            replacement
        }
        None => recursed,
    }
}
