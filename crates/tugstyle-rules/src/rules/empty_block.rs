// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Remove or fill empty blocks.
//!
//! What happens to an empty block depends on its owner:
//!
//! | Owner | Token | Fix |
//! |---|---|---|
//! | `if` without `else` | `LITERAL_IF` | replaced by the side effects of its condition |
//! | `if` with `else` | `LITERAL_IF` | condition inverted, else body moved into the then-part |
//! | `else` | `LITERAL_ELSE` | `else` dropped |
//! | `while`, `do`, `for` | `LITERAL_WHILE`, `LITERAL_DO`, `LITERAL_FOR` | `continue;` inserted |
//! | `try` | `LITERAL_TRY` | whole statement removed |
//! | `finally` | `LITERAL_FINALLY` | `finally` dropped |
//! | `catch` | `LITERAL_CATCH` | rethrown as an unchecked exception |
//! | `synchronized`, `switch` | `LITERAL_SYNCHRONIZED`, `LITERAL_SWITCH` | replaced by the side effects of the lock or selector |
//! | initializer | `STATIC_INIT`, `INSTANCE_INIT` | removed |
//!
//! Under the `statement` policy a block is empty when it has no statements.
//! Under `text` a comment inside it also keeps it.

use std::collections::BTreeSet;

use tracing::debug;
use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{walk_catch, walk_compilation_unit, walk_stmt};
use tugstyle_java::{
    Binary, BinaryOp, Block, Catch, CompilationUnit, Container, Continue, Cursor, Effects, Else,
    EngineError, Expr, Formatting, Ident, If, JavaVisitor, Member, NewClass, NodeId, Rule, Stmt,
    Throw, Transform, TypeTree,
};

use super::simplify_boolean_expression::negate;
use crate::format::{block_stmt_prefix, fill_block, is_blank, same_line_start, shift_right};
use crate::imports::add_import;
use crate::policy::BlockPolicy;
use crate::token::Token;

const UNCHECKED_IO: &str = "java.io.UncheckedIOException";

#[derive(Debug)]
pub struct EmptyBlock {
    effects: Effects,
    policy: BlockPolicy,
    tokens: BTreeSet<Token>,
    /// Set when a rethrow refers to `UncheckedIOException` by simple name.
    needs_unchecked_io_import: bool,
}

impl EmptyBlock {
    pub const NAME: &'static str = "EmptyBlock";

    pub const DEFAULT_TOKENS: [Token; 11] = [
        Token::LiteralWhile,
        Token::LiteralTry,
        Token::LiteralFinally,
        Token::LiteralDo,
        Token::LiteralIf,
        Token::LiteralElse,
        Token::LiteralFor,
        Token::InstanceInit,
        Token::StaticInit,
        Token::LiteralSwitch,
        Token::LiteralSynchronized,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            policy: options.option(BlockPolicy::Statement),
            tokens: options.tokens(Self::DEFAULT_TOKENS),
            needs_unchecked_io_import: false,
        }
    }

    fn is_empty(&self, block: &Block) -> bool {
        block.stmts.is_empty()
            && match self.policy {
                BlockPolicy::Statement => true,
                BlockPolicy::Text => is_blank(&block.end),
            }
    }

    fn is_empty_stmt(&self, stmt: &Stmt) -> bool {
        stmt.as_block().is_some_and(|block| self.is_empty(block))
    }

    fn applies(&self, token: Token) -> bool {
        self.tokens.contains(&token)
    }

    /// The statements an emptied statement is replaced with, or `None` when
    /// it is not empty (or not safe to remove).
    fn replacement(&self, stmt: &Stmt) -> Option<Vec<Stmt>> {
        let condition = match stmt {
            Stmt::If(iff)
                if self.applies(Token::LiteralIf)
                    && iff.else_part.is_none()
                    && self.is_empty_stmt(&iff.then_stmt) =>
            {
                &iff.condition.inner
            }
            Stmt::Synchronized(sync)
                if self.applies(Token::LiteralSynchronized) && self.is_empty(&sync.body) =>
            {
                &sync.lock.inner
            }
            Stmt::Switch(switch)
                if self.applies(Token::LiteralSwitch)
                    && switch.cases.is_empty()
                    && (self.policy == BlockPolicy::Statement || is_blank(&switch.end)) =>
            {
                &switch.selector.inner
            }
            Stmt::Try(tri) if self.applies(Token::LiteralTry) && self.is_empty(&tri.body) => {
                return Some(Vec::new());
            }
            _ => return None,
        };
        let effects = side_effects(condition)?;
        let prefix = &stmt.fmt().prefix;
        let line = same_line_start(prefix);
        Some(
            effects
                .into_iter()
                .enumerate()
                .map(|(i, expr)| {
                    let lead = if i == 0 { prefix.clone() } else { line.clone() };
                    Stmt::Expr(expr.with_fmt(Formatting::prefixed(lead)))
                })
                .collect(),
        )
    }

    fn fix_if(&self, iff: &If) -> Option<Result<If, EngineError>> {
        let mut out = iff.clone();
        let mut changed = false;
        if self.applies(Token::LiteralElse)
            && out
                .else_part
                .as_ref()
                .is_some_and(|e| self.is_empty_stmt(&e.body))
        {
            out.else_part = None;
            changed = true;
        }
        if self.applies(Token::LiteralIf) && self.is_empty_stmt(&out.then_stmt) {
            if let Some(else_part) = out.else_part.take() {
                return Some(invert(out, else_part));
            }
        }
        changed.then_some(Ok(out))
    }

    fn fill_loop_body(&self, body: &Stmt) -> Option<Stmt> {
        let Stmt::Block(block) = body else {
            return None;
        };
        if !self.is_empty(block) {
            return None;
        }
        let mut filled = block.clone();
        let stmt = Stmt::Continue(Continue {
            id: NodeId::fresh(),
            fmt: Formatting::default(),
            label: None,
        });
        fill_block(&mut filled, vec![stmt]);
        Some(Stmt::Block(filled))
    }

    fn fix_stmt(&self, stmt: &Stmt) -> Option<Result<Stmt, EngineError>> {
        let fixed = match stmt {
            Stmt::If(iff) => return self.fix_if(iff).map(|r| r.map(Stmt::If)),
            Stmt::While(w) if self.applies(Token::LiteralWhile) => {
                let mut out = w.clone();
                out.body = Box::new(self.fill_loop_body(&w.body)?);
                Stmt::While(out)
            }
            Stmt::DoWhile(d) if self.applies(Token::LiteralDo) => {
                let mut out = d.clone();
                out.body = Box::new(self.fill_loop_body(&d.body)?);
                Stmt::DoWhile(out)
            }
            Stmt::For(f) if self.applies(Token::LiteralFor) => {
                let mut out = f.clone();
                out.body = Box::new(self.fill_loop_body(&f.body)?);
                Stmt::For(out)
            }
            Stmt::ForEach(f) if self.applies(Token::LiteralFor) => {
                let mut out = f.clone();
                out.body = Box::new(self.fill_loop_body(&f.body)?);
                Stmt::ForEach(out)
            }
            Stmt::Try(t)
                if self.applies(Token::LiteralFinally)
                    && (!t.catches.is_empty() || t.resources.is_some())
                    && t.finally.as_ref().is_some_and(|f| self.is_empty(&f.body)) =>
            {
                let mut out = t.clone();
                out.finally = None;
                Stmt::Try(out)
            }
            _ => return None,
        };
        Some(Ok(fixed))
    }

    /// `throw new RuntimeException(e);`, or `UncheckedIOException` for an
    /// `IOException`.
    fn rethrow(&mut self, catch: &Catch) -> Option<Stmt> {
        let name = catch.param.vars.first()?.name.name.clone();
        let ty = &catch.param.ty;
        let exception = match ty.name.as_str() {
            "java.io.IOException" => UNCHECKED_IO,
            "IOException" => {
                self.needs_unchecked_io_import = true;
                "UncheckedIOException"
            }
            _ => "RuntimeException",
        };
        let new_class = NewClass {
            id: NodeId::fresh(),
            fmt: Formatting::space(),
            ty: TypeTree::named(exception, Formatting::space()),
            args: Container::new(vec![Expr::Ident(Ident::new(name, Formatting::default()))]),
            body: None,
        };
        Some(Stmt::Throw(Throw {
            id: NodeId::fresh(),
            fmt: Formatting::default(),
            expr: Expr::NewClass(new_class),
        }))
    }
}

impl Default for EmptyBlock {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

/// The operator testing the opposite of a comparison.
fn inverted_comparison(op: BinaryOp) -> Option<BinaryOp> {
    Some(match op {
        BinaryOp::Eq => BinaryOp::Ne,
        BinaryOp::Ne => BinaryOp::Eq,
        BinaryOp::Lt => BinaryOp::Ge,
        BinaryOp::Le => BinaryOp::Gt,
        BinaryOp::Gt => BinaryOp::Le,
        BinaryOp::Ge => BinaryOp::Lt,
        _ => return None,
    })
}

fn invert_condition(condition: &Expr) -> Expr {
    if let Expr::Binary(binary) = condition {
        if let Some(op) = inverted_comparison(binary.op) {
            return Expr::Binary(Binary {
                op,
                ..binary.clone()
            });
        }
    }
    negate(condition.clone(), condition.fmt().clone())
}

/// `if (c) {} else S` becomes `if (!c) { S }`.
fn invert(mut iff: If, else_part: Else) -> Result<If, EngineError> {
    let Stmt::Block(mut then_block) = *iff.then_stmt else {
        return Err(EngineError::InvalidTree(
            "empty then-part is not a block".into(),
        ));
    };
    iff.condition.inner = Box::new(invert_condition(&iff.condition.inner));
    match *else_part.body {
        Stmt::Block(else_block) => {
            then_block.stmts = else_block.stmts;
            if !then_block.stmts.is_empty() && !then_block.end.contains('\n') {
                then_block.end = else_block.end;
            }
        }
        other => {
            let prefix = block_stmt_prefix(&mut then_block);
            then_block.stmts = vec![shift_right(&other, &prefix)?];
        }
    }
    iff.then_stmt = Box::new(Stmt::Block(then_block));
    Ok(iff)
}

/// The parts of `expr` that must still be evaluated when its value is
/// discarded, as standalone expression statements.
///
/// Returns `None` when an effect is conditional (the right side of `&&` or a
/// ternary branch), so the expression cannot be dropped.
pub(crate) fn side_effects(expr: &Expr) -> Option<Vec<Expr>> {
    let mut out = Vec::new();
    match expr {
        Expr::MethodCall(_) | Expr::Assign(_) | Expr::NewClass(_) => out.push(expr.clone()),
        Expr::Unary(unary) if unary.op.is_mutation() => out.push(expr.clone()),
        Expr::Unary(unary) => nested(&unary.expr, &mut out)?,
        Expr::Binary(binary) => {
            nested(&binary.left, &mut out)?;
            if matches!(binary.op, BinaryOp::And | BinaryOp::Or) && binary.right.has_side_effects() {
                return None;
            }
            nested(&binary.right, &mut out)?;
        }
        Expr::Ternary(ternary) => {
            if ternary.then_expr.has_side_effects() || ternary.else_expr.has_side_effects() {
                return None;
            }
            nested(&ternary.condition, &mut out)?;
        }
        Expr::Parens(parens) => nested(&parens.inner, &mut out)?,
        Expr::InstanceOf(instance_of) => nested(&instance_of.expr, &mut out)?,
        Expr::Cast(cast) => nested(&cast.expr, &mut out)?,
        Expr::FieldAccess(access) => nested(&access.target, &mut out)?,
        Expr::ArrayAccess(access) => {
            nested(&access.array, &mut out)?;
            nested(&access.index, &mut out)?;
        }
        Expr::NewArray(array) => {
            for size in array.dims.iter().filter_map(|d| d.size.as_deref()) {
                nested(size, &mut out)?;
            }
            for elem in array.init.iter().flat_map(|init| &init.elems) {
                nested(elem, &mut out)?;
            }
        }
        Expr::ArrayInit(init) => {
            for elem in &init.elems {
                nested(elem, &mut out)?;
            }
        }
        Expr::Ident(_)
        | Expr::Literal(_)
        | Expr::Lambda(_)
        | Expr::MemberRef(_)
        | Expr::Empty(_) => {}
    }
    Some(out)
}

fn nested(child: &Expr, out: &mut Vec<Expr>) -> Option<()> {
    out.extend(side_effects(child)?);
    Some(())
}

impl JavaVisitor for EmptyBlock {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_compilation_unit<'a>(
        &mut self,
        unit: &'a CompilationUnit,
        cursor: &Cursor<'a>,
    ) -> CompilationUnit {
        let mut out = walk_compilation_unit(self, unit, cursor);
        if std::mem::take(&mut self.needs_unchecked_io_import) {
            add_import(&mut out, UNCHECKED_IO);
        }
        out
    }

    fn visit_member_in_list<'a>(
        &mut self,
        member: &'a Member,
        cursor: &Cursor<'a>,
    ) -> Transform<Member> {
        if let Member::Initializer(block) = member {
            let token = match block.static_init {
                Some(_) => Token::StaticInit,
                None => Token::InstanceInit,
            };
            if self.applies(token) && self.is_empty(block) {
                debug!(rule = Self::NAME, "removing empty initializer");
                self.effects.record_change(block.id);
                return Transform::Remove;
            }
        }
        Transform::Keep(self.visit_member(member, cursor))
    }

    fn visit_stmt_in_list<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Transform<Stmt> {
        let visited = self.visit_stmt(stmt, cursor);
        match self.replacement(&visited) {
            Some(stmts) => {
                self.effects.record_change(stmt.id());
                if stmts.is_empty() {
                    Transform::Remove
                } else {
                    Transform::Flatten(stmts)
                }
            }
            None => Transform::Keep(visited),
        }
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let recursed = walk_stmt(self, stmt, cursor);
        let Some(fixed) = self.fix_stmt(&recursed) else {
            return recursed;
        };
        match self.effects.check(fixed) {
            Some(fixed) => {
                self.effects.record_change(stmt.id());
                fixed
            }
            None => recursed,
        }
    }

    fn visit_catch<'a>(&mut self, catch: &'a Catch, cursor: &Cursor<'a>) -> Catch {
        let mut out = walk_catch(self, catch, cursor);
        if !self.applies(Token::LiteralCatch) || !self.is_empty(&out.body) {
            return out;
        }
        if let Some(rethrow) = self.rethrow(&out) {
            fill_block(&mut out.body, vec![rethrow]);
            self.effects.record_change(catch.id);
        }
        out
    }
}

impl Rule for EmptyBlock {
    fn name(&self) -> &str {
        Self::NAME
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    fn with_tokens(tokens: &'static str) -> impl Fn() -> EmptyBlock {
        move || EmptyBlock::new(&RuleOptions::new().with("tokens", tokens))
    }

    #[test]
    fn test_empty_switch() {
        assert_fix(
            with_tokens("LITERAL_SWITCH"),
            "public class A {
    {
        int i = 0;
        switch(i) {
        }
    }
}
",
            "public class A {
    {
        int i = 0;
    }
}
",
        );
    }

    #[test]
    fn test_empty_synchronized() {
        assert_fix(
            with_tokens("LITERAL_SYNCHRONIZED"),
            "public class A {
    {
        final Object o = new Object();
        synchronized(o) {
        }
    }
}
",
            "public class A {
    {
        final Object o = new Object();
    }
}
",
        );
    }

    #[test]
    fn test_empty_try() {
        assert_fix(
            with_tokens("LITERAL_TRY"),
            "public class A {
    {
        try(FileInputStream fis = new FileInputStream(\"\")) {

        } catch (IOException e) {
        }
    }
}
",
            "public class A {
    {
    }
}
",
        );
    }

    #[test]
    fn test_empty_catch_with_io_exception() {
        assert_fix(
            with_tokens("LITERAL_CATCH"),
            "import java.io.IOException;
import java.nio.file.*;

public class A {
    public void foo() {
        try {
            Files.readString(Path.of(\"somewhere\"));
        } catch (IOException e) {
        }
    }
}
",
            "import java.io.IOException;
import java.io.UncheckedIOException;
import java.nio.file.*;

public class A {
    public void foo() {
        try {
            Files.readString(Path.of(\"somewhere\"));
        } catch (IOException e) {
            throw new UncheckedIOException(e);
        }
    }
}
",
        );
    }

    #[test]
    fn test_empty_catch_and_empty_finally() {
        assert_fix(
            with_tokens("LITERAL_CATCH, LITERAL_FINALLY"),
            "public class A {
    public void foo() {
        try {
            Files.readString(Path.of(\"somewhere\"));
        } catch (Throwable t) {
        } finally {
        }
    }
}
",
            "public class A {
    public void foo() {
        try {
            Files.readString(Path.of(\"somewhere\"));
        } catch (Throwable t) {
            throw new RuntimeException(t);
        }
    }
}
",
        );
    }

    #[test]
    fn test_empty_loops() {
        assert_fix(
            with_tokens("LITERAL_WHILE,LITERAL_DO,LITERAL_FOR"),
            "public class A {
    public void foo() {
        while(true) {
        }
        do {
        } while(true);
        for (;;) {}
    }
}
",
            "public class A {
    public void foo() {
        while(true) {
            continue;
        }
        do {
            continue;
        } while(true);
        for (;;) { continue; }
    }
}
",
        );
    }

    #[test]
    fn test_empty_initializers() {
        let source = "public class A {
    static {}
    {}
}
";
        assert_fix(
            with_tokens("STATIC_INIT"),
            source,
            "public class A {
    {}
}
",
        );
        assert_fix(
            with_tokens("INSTANCE_INIT"),
            source,
            "public class A {
    static {}
}
",
        );
    }

    #[test]
    fn test_side_effects_of_empty_ifs_are_kept() {
        let before = "public class A {
    int n = sideEffect();

    int sideEffect() {
        return new java.util.Random().nextInt();
    }

    boolean boolSideEffect() {
        return sideEffect() == 0;
    }

    public void lotsOfIfs() {
        if(sideEffect() == 1) {}
        if(sideEffect() == sideEffect()) {}
        int n;
        if((n = sideEffect()) == 1) {}
        if((n /= sideEffect()) == 1) {}
        if(new A().n == 1) {}
        if(!boolSideEffect()) {}
        if(1 == 2) {}
    }
}
";
        let after = "public class A {
    int n = sideEffect();

    int sideEffect() {
        return new java.util.Random().nextInt();
    }

    boolean boolSideEffect() {
        return sideEffect() == 0;
    }

    public void lotsOfIfs() {
        sideEffect();
        sideEffect();
        sideEffect();
        int n;
        n = sideEffect();
        n /= sideEffect();
        new A();
        boolSideEffect();
    }
}
";
        assert_fix(with_tokens("LITERAL_IF"), before, after);
    }

    #[test]
    fn test_conditional_side_effects_keep_the_if() {
        assert_unchanged(
            with_tokens("LITERAL_IF")(),
            "class A { void f() { if (ready() && go()) {} } }",
        );
    }

    #[test]
    fn test_invert_if_with_only_else() {
        assert_fix(
            with_tokens("LITERAL_IF"),
            "public class A {
    {
        if(\"foo\".length() > 3)   {
        } else {
            System.out.println(\"this\");
        }
    }
}
",
            "public class A {
    {
        if(\"foo\".length() <= 3)   {
            System.out.println(\"this\");
        }
    }
}
",
        );
    }

    #[test]
    fn test_invert_if_with_else_if() {
        assert_fix(
            with_tokens("LITERAL_IF"),
            "public class A {
    {
        if(\"foo\".length() > 3) {
        } else if(\"foo\".length() > 4) {
            System.out.println(\"longer\");
        }
        else {
            System.out.println(\"this\");
        }
    }
}
",
            "public class A {
    {
        if(\"foo\".length() <= 3) {
            if(\"foo\".length() > 4) {
                System.out.println(\"longer\");
            }
            else {
                System.out.println(\"this\");
            }
        }
    }
}
",
        );
    }

    #[test]
    fn test_invert_negates_other_conditions() {
        assert_fix(
            with_tokens("LITERAL_IF"),
            "class A { void f() { if (ready()) {} else { go(); } } }",
            "class A { void f() { if (!ready()) { go(); } } }",
        );
    }

    #[test]
    fn test_empty_else_is_dropped() {
        assert_fix(
            EmptyBlock::default,
            "class A { void f() { if (ready()) { go(); } else {} } }",
            "class A { void f() { if (ready()) { go(); } } }",
        );
    }

    #[test]
    fn test_text_policy_keeps_commented_blocks() {
        let rule = EmptyBlock::new(
            &RuleOptions::new()
                .with("option", "text")
                .with("tokens", "LITERAL_WHILE"),
        );
        assert_unchanged(rule, "class A { void f() { while (x()) { /* wait */ } } }");
    }
}
