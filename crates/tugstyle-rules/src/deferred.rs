// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Small follow-up visitors queued by rules.

use tugstyle_java::{Cursor, Effects, JavaVisitor, NodeId, Rule, Stmt, Transform};

/// Remove the statement with the given id from whatever list holds it.
///
/// Comments on the statement go with it. A rule that keeps them moves them
/// before queueing the removal.
#[derive(Debug)]
pub struct DeleteStatement {
    effects: Effects,
    target: NodeId,
}

impl DeleteStatement {
    pub const NAME: &'static str = "DeleteStatement";

    pub fn new(target: NodeId) -> Self {
        Self {
            effects: Effects::default(),
            target,
        }
    }
}

impl JavaVisitor for DeleteStatement {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_stmt_in_list<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Transform<Stmt> {
        if stmt.id() == self.target {
            self.effects.record_change(self.target);
            return Transform::Remove;
        }
        Transform::Keep(self.visit_stmt(stmt, cursor))
    }
}

impl Rule for DeleteStatement {
    fn name(&self) -> &str {
        Self::NAME
    }
}
