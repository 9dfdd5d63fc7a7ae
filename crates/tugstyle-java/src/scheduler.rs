// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Fixpoint loop over a set of rules.
//!
//! Pass 0 runs every rule in order. Each later pass runs the iterative
//! rules again and then the deferred visitors queued during the previous
//! pass, against the tree those rules produced. A deferred visitor whose
//! target is no longer in the tree is dropped. The loop stops when a pass
//! changes nothing and queues nothing, or when the pass ceiling is reached.

use std::collections::BTreeSet;

use tracing::{debug, debug_span, warn};

use crate::error::EngineError;
use crate::nodes::{
    Block, Case, Catch, ClassDecl, CompilationUnit, EnumConstant, Expr, LambdaParam, MethodDecl,
    NamedVar, NodeId, Stmt, VarDecls,
};
use crate::visitor::{
    walk_block, walk_case, walk_catch, walk_class_decl, walk_compilation_unit, walk_enum_constant,
    walk_expr, walk_lambda_param, walk_method, walk_named_var, walk_stmt, walk_var_decls, Cursor,
    Effects, JavaVisitor, Rule,
};

pub const DEFAULT_MAX_PASSES: usize = 10;

/// How the fixpoint loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The last pass changed nothing.
    Converged { passes: usize },
    /// The pass ceiling was reached with changes still pending.
    NotConverged { passes: usize },
}

impl Outcome {
    pub fn passes(&self) -> usize {
        match self {
            Outcome::Converged { passes } | Outcome::NotConverged { passes } => *passes,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Outcome::Converged { .. })
    }
}

/// A visitor queued for the next pass.
pub struct Deferred {
    /// Name of the rule that queued it; its changes count for that rule.
    pub owner: String,
    /// The node the visitor rewrites. The visitor runs only while a node
    /// with this id is in the tree.
    pub target: NodeId,
    pub visitor: Box<dyn Rule>,
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("owner", &self.owner)
            .field("target", &self.target)
            .field("visitor", &self.visitor.name())
            .finish()
    }
}

#[derive(Debug)]
pub struct SchedulerResult {
    pub unit: CompilationUnit,
    /// Rules that changed something, by name.
    pub changed_rules: BTreeSet<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    max_passes: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

impl Scheduler {
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes: max_passes.max(1),
        }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Run `rules` over `unit` until nothing changes.
    ///
    /// Fails with the first error a visitor reports; the file is then left
    /// untouched by the caller.
    pub fn run(
        &self,
        unit: CompilationUnit,
        rules: &mut [Box<dyn Rule>],
    ) -> Result<SchedulerResult, EngineError> {
        let mut tree = unit;
        let mut queue: Vec<Deferred> = Vec::new();
        let mut changed_rules = BTreeSet::new();

        for pass in 0..self.max_passes {
            let span = debug_span!("pass", pass);
            let _guard = span.enter();

            let mut changed = false;
            let mut next_queue = Vec::new();

            for rule in rules.iter_mut() {
                if pass > 0 && rule.is_single_run() {
                    continue;
                }
                let owner = rule.name().to_string();
                let effects = apply(rule.as_mut(), &mut tree);
                changed |= absorb(effects, &owner, &mut changed_rules, &mut next_queue)?;
            }

            for deferred in std::mem::take(&mut queue) {
                let Deferred {
                    owner,
                    target,
                    mut visitor,
                } = deferred;
                if !contains(&tree, target) {
                    debug!(rule = %owner, visitor = visitor.name(), %target, "deferred target is gone");
                    continue;
                }
                debug!(rule = %owner, visitor = visitor.name(), %target, "running deferred visitor");
                let effects = apply(visitor.as_mut(), &mut tree);
                changed |= absorb(effects, &owner, &mut changed_rules, &mut next_queue)?;
            }

            queue = next_queue;
            debug!(changed, queued = queue.len(), "pass finished");
            if !changed && queue.is_empty() {
                return Ok(SchedulerResult {
                    unit: tree,
                    changed_rules,
                    outcome: Outcome::Converged { passes: pass + 1 },
                });
            }
        }

        warn!(passes = self.max_passes, "rewrite did not converge");
        Ok(SchedulerResult {
            unit: tree,
            changed_rules,
            outcome: Outcome::NotConverged {
                passes: self.max_passes,
            },
        })
    }
}

/// Run one visitor over the whole tree, replacing it with the result.
fn apply(visitor: &mut dyn Rule, tree: &mut CompilationUnit) -> Effects {
    let next = {
        let cursor = Cursor::root(tree);
        visitor.visit_compilation_unit(tree, &cursor)
    };
    *tree = next;
    std::mem::take(visitor.effects())
}

/// Looks for a node by id among the nodes that get a cursor frame.
struct Finder {
    effects: Effects,
    target: NodeId,
    found: bool,
}

macro_rules! find_in {
    ($($visit:ident => $walk:ident : $node:ty),* $(,)?) => {
        $(
            fn $visit<'a>(&mut self, node: &'a $node, cursor: &Cursor<'a>) -> $node {
                self.found |= cursor.id() == self.target;
                if self.found {
                    return node.clone();
                }
                $walk(self, node, cursor)
            }
        )*
    };
}

impl JavaVisitor for Finder {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    find_in! {
        visit_compilation_unit => walk_compilation_unit: CompilationUnit,
        visit_class_decl => walk_class_decl: ClassDecl,
        visit_enum_constant => walk_enum_constant: EnumConstant,
        visit_method => walk_method: MethodDecl,
        visit_var_decls => walk_var_decls: VarDecls,
        visit_named_var => walk_named_var: NamedVar,
        visit_stmt => walk_stmt: Stmt,
        visit_block => walk_block: Block,
        visit_case => walk_case: Case,
        visit_catch => walk_catch: Catch,
        visit_expr => walk_expr: Expr,
        visit_lambda_param => walk_lambda_param: LambdaParam,
    }
}

/// Whether a node with `id` is in `tree`.
fn contains(tree: &CompilationUnit, id: NodeId) -> bool {
    let mut finder = Finder {
        effects: Effects::default(),
        target: id,
        found: false,
    };
    finder.visit_compilation_unit(tree, &Cursor::root(tree));
    finder.found
}

/// Fold one visitor's effects into the pass state. Returns whether it
/// changed anything.
fn absorb(
    effects: Effects,
    owner: &str,
    changed_rules: &mut BTreeSet<String>,
    queue: &mut Vec<Deferred>,
) -> Result<bool, EngineError> {
    let Effects {
        changes,
        deferred,
        failure,
    } = effects;
    if let Some(error) = failure {
        return Err(error);
    }
    let changed = !changes.is_empty();
    if changed {
        debug!(rule = owner, changes = changes.len(), "rule changed tree");
        changed_rules.insert(owner.to_string());
    }
    queue.extend(deferred.into_iter().map(|(target, visitor)| Deferred {
        owner: owner.to_string(),
        target,
        visitor,
    }));
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Codegen;
    use crate::nodes::*;
    use crate::parser::parse_compilation_unit;
    use crate::visitor::{maybe_transform, walk_expr, JavaVisitor};

    /// Increments integer literals below a limit, one step per pass.
    struct CountUp {
        effects: Effects,
        limit: u32,
        single_run: bool,
    }

    impl CountUp {
        fn new(limit: u32) -> Self {
            Self {
                effects: Effects::default(),
                limit,
                single_run: false,
            }
        }
    }

    impl JavaVisitor for CountUp {
        fn effects(&mut self) -> &mut Effects {
            &mut self.effects
        }

        fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
            let value = match expr {
                Expr::Literal(lit) if lit.kind == LiteralKind::Int => lit.text.parse::<u32>().ok(),
                _ => None,
            };
            let limit = self.limit;
            maybe_transform(
                self,
                expr.id(),
                value.is_some_and(|v| v < limit),
                cursor,
                |v| walk_expr(v, expr, cursor),
                |_, recursed, _| match (recursed, value) {
                    (Expr::Literal(lit), Some(v)) => Some(Expr::Literal(Literal {
                        text: (v + 1).to_string(),
                        ..lit.clone()
                    })),
                    _ => None,
                },
            )
        }
    }

    impl Rule for CountUp {
        fn name(&self) -> &str {
            "CountUp"
        }

        fn is_single_run(&self) -> bool {
            self.single_run
        }
    }

    /// Queues a [`CountUp`] on its first run.
    struct Enqueue {
        effects: Effects,
        done: bool,
    }

    impl JavaVisitor for Enqueue {
        fn effects(&mut self) -> &mut Effects {
            &mut self.effects
        }

        fn visit_compilation_unit<'a>(
            &mut self,
            unit: &'a CompilationUnit,
            _cursor: &Cursor<'a>,
        ) -> CompilationUnit {
            if !self.done {
                self.done = true;
                self.effects.and_then(unit.id, CountUp::new(1));
            }
            unit.clone()
        }
    }

    impl Rule for Enqueue {
        fn name(&self) -> &str {
            "Enqueue"
        }
    }

    fn source_of(result: &SchedulerResult) -> String {
        result.unit.to_source()
    }

    #[test]
    fn test_runs_to_fixpoint() {
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(CountUp::new(3))];
        let result = Scheduler::default().run(unit, &mut rules).unwrap();
        assert_eq!(source_of(&result), "class A { int x = 3; }");
        assert_eq!(result.outcome, Outcome::Converged { passes: 4 });
        assert!(result.changed_rules.contains("CountUp"));
    }

    #[test]
    fn test_pass_ceiling() {
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(CountUp::new(100))];
        let result = Scheduler::new(2).run(unit, &mut rules).unwrap();
        assert_eq!(source_of(&result), "class A { int x = 2; }");
        assert_eq!(result.outcome, Outcome::NotConverged { passes: 2 });
    }

    #[test]
    fn test_single_run_rule_applies_once() {
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let mut rule = CountUp::new(3);
        rule.single_run = true;
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(rule)];
        let result = Scheduler::default().run(unit, &mut rules).unwrap();
        assert_eq!(source_of(&result), "class A { int x = 1; }");
    }

    #[test]
    fn test_deferred_changes_belong_to_owner() {
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(Enqueue {
            effects: Effects::default(),
            done: false,
        })];
        let result = Scheduler::default().run(unit, &mut rules).unwrap();
        assert_eq!(source_of(&result), "class A { int x = 1; }");
        assert_eq!(
            result.changed_rules.into_iter().collect::<Vec<_>>(),
            vec!["Enqueue"]
        );
        assert_eq!(result.outcome, Outcome::Converged { passes: 3 });
    }

    /// Queues a [`CountUp`] at a fixed target on its first run.
    struct EnqueueAt {
        effects: Effects,
        target: Option<NodeId>,
    }

    impl JavaVisitor for EnqueueAt {
        fn effects(&mut self) -> &mut Effects {
            &mut self.effects
        }

        fn visit_compilation_unit<'a>(
            &mut self,
            unit: &'a CompilationUnit,
            _cursor: &Cursor<'a>,
        ) -> CompilationUnit {
            if let Some(target) = self.target.take() {
                self.effects.and_then(target, CountUp::new(1));
            }
            unit.clone()
        }
    }

    impl Rule for EnqueueAt {
        fn name(&self) -> &str {
            "EnqueueAt"
        }
    }

    fn initializer_id(unit: &CompilationUnit) -> NodeId {
        let Member::Field(field) = &unit.types[0].body.members[0] else {
            panic!("expected field");
        };
        field.vars[0].init.as_ref().unwrap().expr.id()
    }

    #[test]
    fn test_deferred_visitor_runs_while_target_exists() {
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let target = initializer_id(&unit);
        assert!(contains(&unit, target));
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(EnqueueAt {
            effects: Effects::default(),
            target: Some(target),
        })];
        let result = Scheduler::default().run(unit, &mut rules).unwrap();
        assert_eq!(source_of(&result), "class A { int x = 1; }");
    }

    #[test]
    fn test_deferred_visitor_with_missing_target_is_dropped() {
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let missing = NodeId::fresh();
        assert!(!contains(&unit, missing));
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(EnqueueAt {
            effects: Effects::default(),
            target: Some(missing),
        })];
        let result = Scheduler::default().run(unit, &mut rules).unwrap();
        assert_eq!(source_of(&result), "class A { int x = 0; }");
        assert!(result.changed_rules.is_empty());
        assert_eq!(result.outcome, Outcome::Converged { passes: 2 });
    }

    #[test]
    fn test_failure_aborts() {
        struct Failing(Effects);
        impl JavaVisitor for Failing {
            fn effects(&mut self) -> &mut Effects {
                &mut self.0
            }
            fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
                self.fail(EngineError::InvalidTree("boom".to_string()));
                walk_expr(self, expr, cursor)
            }
        }
        impl Rule for Failing {
            fn name(&self) -> &str {
                "Failing"
            }
        }
        let unit = parse_compilation_unit("class A { int x = 0; }").unwrap();
        let mut rules: Vec<Box<dyn Rule>> = vec![Box::new(Failing(Effects::default()))];
        let err = Scheduler::default().run(unit, &mut rules).unwrap_err();
        assert_eq!(err, EngineError::InvalidTree("boom".to_string()));
    }
}
