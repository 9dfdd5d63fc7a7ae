// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Placement of the `{` that opens class, method and statement blocks.
//!
//! Under EOL a `{` alone on its line is pulled up to the end of the previous
//! one. Under NL a `{` at the end of a line moves to its own line, indented
//! like the matching `}`. NLOW picks NL when the header before the brace
//! wraps and EOL otherwise. Gaps holding comments are never rewritten, and a
//! block closed on its opening line is left alone under NL.
//!
//! Blocks that are statements of their own, such as a `{` right after a
//! `case` label or an instance initializer, have no header and are skipped.

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{
    walk_catch, walk_class_decl, walk_expr, walk_member, walk_method, walk_stmt,
};
use tugstyle_java::{
    has_newline, last_line_indent, Block, Catch, ClassBody, ClassDecl, ClassKind, Codegen, Cursor,
    Effects, Expr, Formatting, JavaVisitor, LambdaBody, Member, MethodDecl, Rule, Stmt,
};

use crate::format::is_blank;
use crate::policy::LeftCurlyPolicy;

#[derive(Debug)]
pub struct LeftCurly {
    effects: Effects,
    option: LeftCurlyPolicy,
    ignore_enums: bool,
}

impl LeftCurly {
    pub const NAME: &'static str = "LeftCurly";

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            option: options.option(LeftCurlyPolicy::Eol),
            ignore_enums: options.bool("ignoreEnums", true),
        }
    }

    /// Rewrite the whitespace before a `{` whose block closes after `end`.
    fn fix_gap(&self, gap: &mut String, end: &str, wraps: bool) -> bool {
        let policy = match self.option {
            LeftCurlyPolicy::Nlow if wraps => LeftCurlyPolicy::Nl,
            LeftCurlyPolicy::Nlow => LeftCurlyPolicy::Eol,
            policy => policy,
        };
        match policy {
            LeftCurlyPolicy::Nl if !has_newline(gap) && has_newline(end) && is_blank(gap) => {
                *gap = format!("\n{}", last_line_indent(end));
                true
            }
            LeftCurlyPolicy::Eol if has_newline(gap) && is_blank(gap) => {
                *gap = " ".to_string();
                true
            }
            _ => false,
        }
    }

    fn fix_block(&mut self, block: &mut Block, wraps: bool) {
        if self.fix_gap(&mut block.fmt.prefix, &block.end, wraps) {
            self.effects.record_change(block.id);
        }
    }

    /// Fix a statement body when it is a block.
    fn fix_body(&mut self, body: &mut Stmt, wraps: bool) {
        if let Stmt::Block(block) = body {
            self.fix_block(block, wraps);
        }
    }
}

impl Default for LeftCurly {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

fn wraps<T: Codegen>(node: &T) -> bool {
    has_newline(&node.to_source())
}

/// Whether the part of a method declaration after its modifiers spans lines.
fn method_header_wraps(method: &MethodDecl) -> bool {
    let mut header = method.clone();
    header.modifiers.clear();
    header.fmt = Formatting::default();
    *header.after_modifiers_prefix_mut() = String::new();
    header.body = None;
    wraps(&header)
}

fn class_header_wraps(class: &ClassDecl) -> bool {
    class.type_params.as_ref().is_some_and(|tp| tp.elems.iter().any(wraps))
        || [&class.extends, &class.implements]
            .into_iter()
            .flatten()
            .any(|list| has_newline(&list.before) || list.types.iter().any(wraps))
}

impl JavaVisitor for LeftCurly {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        if class.kind == ClassKind::Enum && self.ignore_enums {
            return out;
        }
        let body: &mut ClassBody = &mut out.body;
        if self.fix_gap(&mut body.fmt.prefix, &body.end, class_header_wraps(class)) {
            self.effects.record_change(body.id);
        }
        out
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        let header_wraps = method_header_wraps(method);
        if let Some(body) = out.body.as_mut() {
            self.fix_block(body, header_wraps);
        }
        out
    }

    fn visit_member<'a>(&mut self, member: &'a Member, cursor: &Cursor<'a>) -> Member {
        let mut out = walk_member(self, member, cursor);
        if let Member::Initializer(block) = &mut out {
            if let Some(gap) = block.static_init.as_mut() {
                if self.fix_gap(gap, &block.end, false) {
                    self.effects.record_change(block.id);
                }
            }
        }
        out
    }

    fn visit_stmt<'a>(&mut self, stmt: &'a Stmt, cursor: &Cursor<'a>) -> Stmt {
        let mut out = walk_stmt(self, stmt, cursor);
        match &mut out {
            Stmt::If(iff) => {
                let header_wraps = wraps(&iff.condition);
                self.fix_body(&mut iff.then_stmt, header_wraps);
                if let Some(else_part) = iff.else_part.as_mut() {
                    self.fix_body(&mut else_part.body, false);
                }
            }
            Stmt::For(for_loop) => {
                let control = &for_loop.control;
                let header_wraps = control.init.iter().any(wraps)
                    || wraps(control.condition.as_ref())
                    || control.update.iter().any(wraps);
                self.fix_body(&mut for_loop.body, header_wraps);
            }
            Stmt::ForEach(for_each) => {
                let header_wraps =
                    wraps(&for_each.control.var) || wraps(for_each.control.iterable.as_ref());
                self.fix_body(&mut for_each.body, header_wraps);
            }
            Stmt::While(while_loop) => {
                let header_wraps = wraps(&while_loop.condition);
                self.fix_body(&mut while_loop.body, header_wraps);
            }
            Stmt::DoWhile(do_while) => self.fix_body(&mut do_while.body, false),
            Stmt::Switch(switch) => {
                let header_wraps = wraps(&switch.selector);
                if self.fix_gap(&mut switch.block_prefix, &switch.end, header_wraps) {
                    self.effects.record_change(switch.id);
                }
            }
            Stmt::Try(try_stmt) => {
                let header_wraps = try_stmt
                    .resources
                    .as_ref()
                    .is_some_and(|resources| resources.decls.iter().any(wraps));
                self.fix_block(&mut try_stmt.body, header_wraps);
                if let Some(finally) = try_stmt.finally.as_mut() {
                    self.fix_block(&mut finally.body, false);
                }
            }
            Stmt::Synchronized(sync) => {
                let header_wraps = wraps(&sync.lock);
                self.fix_block(&mut sync.body, header_wraps);
            }
            _ => {}
        }
        out
    }

    fn visit_catch<'a>(&mut self, catch: &'a Catch, cursor: &Cursor<'a>) -> Catch {
        let mut out = walk_catch(self, catch, cursor);
        let header_wraps = wraps(&catch.param);
        self.fix_block(&mut out.body, header_wraps);
        out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let mut out = walk_expr(self, expr, cursor);
        if let Expr::Lambda(lambda) = &mut out {
            if let LambdaBody::Block(body) = &mut lambda.body {
                self.fix_block(body, false);
            }
        }
        out
    }
}

impl Rule for LeftCurly {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    fn with_option(option: &'static str) -> impl Fn() -> LeftCurly {
        move || LeftCurly::new(&RuleOptions::new().with("option", option))
    }

    #[test]
    fn test_eol() {
        let before = "class A
{
    {
        if(1 == 2)
        {
        }
    }
}
";
        let after = "class A {
    {
        if(1 == 2) {
        }
    }
}
";
        assert_fix(LeftCurly::default, before, after);
    }

    #[test]
    fn test_nl() {
        let before = "class A {
    {
        if(1 == 2) {
        }
    }
}
";
        let after = "class A
{
    {
        if(1 == 2)
        {
        }
    }
}
";
        assert_fix(with_option("nl"), before, after);
    }

    #[test]
    fn test_nlow() {
        let before = "class A {
    {
        if(1 == 2)
        {
        }
        if(1 == 2 &&
            3 == 4) {
        }
    }
}
";
        let after = "class A {
    {
        if(1 == 2) {
        }
        if(1 == 2 &&
            3 == 4)
        {
        }
    }
}
";
        assert_fix(with_option("NLOW"), before, after);
    }

    #[test]
    fn test_case_blocks_are_left_alone() {
        assert_unchanged(
            LeftCurly::default(),
            "class A {
    {
        switch(1) {
        case 1:
        {
        }
        case 2: {
        }
        }
    }
}
",
        );
    }

    #[test]
    fn test_methods_try_and_lambdas() {
        let before = "class A {
    @Override
    public void run()
    {
        try
        {
            Runnable r = () ->
            {
            };
        }
        catch (Exception e)
        {
        }
        finally
        {
        }
    }
}
";
        let after = "class A {
    @Override
    public void run() {
        try {
            Runnable r = () -> {
            };
        }
        catch (Exception e) {
        }
        finally {
        }
    }
}
";
        assert_fix(LeftCurly::default, before, after);
    }

    #[test]
    fn test_comments_before_brace_stay() {
        assert_unchanged(
            LeftCurly::default(),
            "class A {
    void f() // no-op
    {
    }
}
",
        );
    }
}
