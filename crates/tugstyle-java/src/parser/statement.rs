// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{Parser, Result};
use crate::nodes::*;
use crate::tokenizer::TokType;

impl Parser<'_> {
    /// A statement and, where required, its terminating `;`. The trivia in
    /// front of the `;` becomes the statement's suffix.
    pub(crate) fn statement(&mut self) -> Result<Stmt> {
        let mut stmt = self.statement_body()?;
        if stmt.needs_semicolon() {
            stmt.fmt_mut().suffix = self.expect(";")?;
        }
        Ok(stmt)
    }

    fn statement_body(&mut self) -> Result<Stmt> {
        let tok = self.peek();
        if tok.kind == TokType::Punct {
            match tok.text {
                "{" => return Ok(Stmt::Block(self.block()?)),
                ";" => return Ok(Stmt::Empty(self.empty_node())),
                "@" => return self.declaration_statement(),
                _ => {}
            }
        }
        if tok.kind == TokType::Word {
            match tok.text {
                "if" => return self.if_stmt(),
                "for" => return self.for_stmt(),
                "while" => return self.while_stmt(),
                "do" => return self.do_while_stmt(),
                "switch" => return self.switch_stmt(),
                "try" => return self.try_stmt(),
                "return" => return self.return_stmt(),
                "break" => return self.break_stmt(),
                "continue" => return self.continue_stmt(),
                "throw" => return self.throw_stmt(),
                "synchronized" if self.peek_at(1).is("(") => return self.synchronized_stmt(),
                _ => {}
            }
            if self.at_class_keyword() || self.at_modifier() {
                return self.declaration_statement();
            }
            if self.at_identifier_at(0) && self.peek_at(1).is(":") {
                return self.labeled_stmt();
            }
            if self.at_local_var_decl() {
                let prefix = self.take_prefix();
                return Ok(Stmt::LocalVar(self.var_decls_after(prefix, Vec::new(), false)?));
            }
        }
        Ok(Stmt::Expr(self.expression()?))
    }

    fn declaration_statement(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        let modifiers = self.modifiers()?;
        if self.at_class_keyword() {
            Ok(Stmt::LocalClass(self.class_decl_after(prefix, modifiers)?))
        } else {
            Ok(Stmt::LocalVar(self.var_decls_after(prefix, modifiers, false)?))
        }
    }

    pub(crate) fn block(&mut self) -> Result<Block> {
        let prefix = self.take_prefix();
        self.expect("{")?;
        self.block_rest(prefix, None)
    }

    /// Statements through the closing `}`; the `{` is already consumed.
    pub(crate) fn block_rest(&mut self, prefix: String, static_init: Option<String>) -> Result<Block> {
        let mut stmts = Vec::new();
        loop {
            if let Some(end) = self.eat("}") {
                let mut block = Block::new(stmts, Formatting::prefixed(prefix), end);
                block.static_init = static_init;
                return Ok(block);
            }
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            stmts.push(self.statement()?);
        }
    }

    fn if_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("if")?;
        let condition = self.parens()?;
        let then_stmt = self.statement()?;
        let else_part = if self.at("else") {
            let else_prefix = self.take_prefix();
            self.bump();
            Some(Else {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(else_prefix),
                body: Box::new(self.statement()?),
            })
        } else {
            None
        };
        Ok(Stmt::If(If {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            condition,
            then_stmt: Box::new(then_stmt),
            else_part,
        }))
    }

    fn at_for_each(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let found = self.modifiers().is_ok()
            && self.type_tree().is_ok()
            && self.at_identifier_at(0)
            && self.peek_at(1).is(":");
        self.restore(checkpoint);
        found
    }

    fn for_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("for")?;
        let before = self.expect("(")?;

        if self.at_for_each() {
            let var_prefix = self.take_prefix();
            let modifiers = self.modifiers()?;
            let mut var = self.var_decls_after(var_prefix, modifiers, true)?;
            var.fmt.suffix = self.expect(":")?;
            let mut iterable = self.expression()?;
            iterable.fmt_mut().suffix = self.expect(")")?;
            let body = self.statement()?;
            return Ok(Stmt::ForEach(ForEach {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(prefix),
                control: ForEachControl {
                    before,
                    var,
                    iterable: Box::new(iterable),
                },
                body: Box::new(body),
            }));
        }

        let init = self.for_init()?;
        let mut condition = if self.at(";") {
            Expr::Empty(self.empty_node())
        } else {
            self.expression()?
        };
        condition.fmt_mut().suffix = self.expect(";")?;

        let update = if self.at(")") {
            let empty = Expr::Empty(self.empty_node());
            self.expect(")")?;
            vec![empty]
        } else {
            let mut update = Vec::new();
            loop {
                let mut expr = self.expression()?;
                if let Some(gap) = self.eat(",") {
                    expr.fmt_mut().suffix = gap;
                    update.push(expr);
                } else {
                    expr.fmt_mut().suffix = self.expect(")")?;
                    update.push(expr);
                    break;
                }
            }
            update
        };
        let body = self.statement()?;
        Ok(Stmt::For(For {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            control: ForControl {
                before,
                init,
                condition: Box::new(condition),
                update,
            },
            body: Box::new(body),
        }))
    }

    /// Init statements through the first `;`.
    fn for_init(&mut self) -> Result<Vec<Stmt>> {
        if self.at(";") {
            let empty = Stmt::Empty(self.empty_node());
            self.expect(";")?;
            return Ok(vec![empty]);
        }
        if self.at_modifier() || self.at_local_var_decl() {
            let prefix = self.take_prefix();
            let modifiers = self.modifiers()?;
            let mut decls = self.var_decls_after(prefix, modifiers, false)?;
            decls.fmt.suffix = self.expect(";")?;
            return Ok(vec![Stmt::LocalVar(decls)]);
        }
        let mut init = Vec::new();
        loop {
            let mut expr = self.expression()?;
            if let Some(gap) = self.eat(",") {
                expr.fmt_mut().suffix = gap;
                init.push(Stmt::Expr(expr));
            } else {
                expr.fmt_mut().suffix = self.expect(";")?;
                init.push(Stmt::Expr(expr));
                return Ok(init);
            }
        }
    }

    fn while_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("while")?;
        let condition = self.parens()?;
        let body = self.statement()?;
        Ok(Stmt::While(While {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            condition,
            body: Box::new(body),
        }))
    }

    fn do_while_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("do")?;
        let body = self.statement()?;
        let while_prefix = self.expect("while")?;
        let condition = self.parens()?;
        Ok(Stmt::DoWhile(DoWhile {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            body: Box::new(body),
            while_prefix,
            condition,
        }))
    }

    fn switch_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("switch")?;
        let selector = self.parens()?;
        let block_prefix = self.expect("{")?;
        let mut cases = Vec::new();
        let end = loop {
            if let Some(end) = self.eat("}") {
                break end;
            }
            cases.push(self.case()?);
        };
        Ok(Stmt::Switch(Switch {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            selector,
            block_prefix,
            cases,
            end,
        }))
    }

    fn case(&mut self) -> Result<Case> {
        let prefix = self.take_prefix();
        let pattern = if self.eat("case").is_some() {
            Some(self.expression()?)
        } else {
            self.expect("default")?;
            None
        };
        let colon_prefix = self.expect(":")?;
        let mut stmts = Vec::new();
        while !self.at("case") && !self.at("default") && !self.at("}") {
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            stmts.push(self.statement()?);
        }
        Ok(Case {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            pattern,
            colon_prefix,
            stmts,
        })
    }

    fn try_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("try")?;
        let resources = if self.at("(") {
            Some(self.resources()?)
        } else {
            None
        };
        let body = self.block()?;
        let mut catches = Vec::new();
        while self.at("catch") {
            let catch_prefix = self.take_prefix();
            self.bump();
            let paren_prefix = self.expect("(")?;
            let mut param = self.catch_param()?;
            param.fmt.suffix = self.expect(")")?;
            let body = self.block()?;
            catches.push(Catch {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(catch_prefix),
                paren_prefix,
                param,
                body,
            });
        }
        let finally = if self.at("finally") {
            let finally_prefix = self.take_prefix();
            self.bump();
            Some(Finally {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(finally_prefix),
                body: self.block()?,
            })
        } else {
            None
        };
        Ok(Stmt::Try(Try {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            resources,
            body,
            catches,
            finally,
        }))
    }

    fn resources(&mut self) -> Result<Resources> {
        let before = self.expect("(")?;
        let mut decls = Vec::new();
        let mut trailing_semicolon = None;
        loop {
            let prefix = self.take_prefix();
            let modifiers = self.modifiers()?;
            let mut decl = self.var_decls_after(prefix, modifiers, true)?;
            if let Some(gap) = self.eat(";") {
                decl.fmt.suffix = gap;
                decls.push(decl);
                if let Some(end) = self.eat(")") {
                    trailing_semicolon = Some(end);
                    break;
                }
            } else {
                decl.fmt.suffix = self.expect(")")?;
                decls.push(decl);
                break;
            }
        }
        Ok(Resources {
            before,
            decls,
            trailing_semicolon,
        })
    }

    /// `final A | B e`; the alternatives are kept as one type name.
    fn catch_param(&mut self) -> Result<VarDecls> {
        let prefix = self.take_prefix();
        let modifiers = self.modifiers()?;
        let start = self.position();
        let mut ty = self.type_tree()?;
        if self.at("|") {
            while self.eat("|").is_some() {
                self.type_tree()?;
            }
            let ty_prefix = std::mem::take(&mut ty.fmt.prefix);
            ty = TypeTree::named(self.text_since(start), Formatting::prefixed(ty_prefix));
        }
        let var = self.named_var()?;
        Ok(VarDecls {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            modifiers,
            ty,
            varargs: None,
            vars: vec![var],
        })
    }

    fn synchronized_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("synchronized")?;
        let lock = self.parens()?;
        let body = self.block()?;
        Ok(Stmt::Synchronized(Synchronized {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            lock,
            body,
        }))
    }

    fn return_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("return")?;
        let expr = if self.at(";") {
            None
        } else {
            Some(self.expression()?)
        };
        Ok(Stmt::Return(Return::new(expr, Formatting::prefixed(prefix))))
    }

    fn jump_label(&mut self) -> Result<Option<Ident>> {
        if self.at_identifier_at(0) {
            Ok(Some(self.ident()?))
        } else {
            Ok(None)
        }
    }

    fn break_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("break")?;
        let mut stmt = Break::new(Formatting::prefixed(prefix));
        stmt.label = self.jump_label()?;
        Ok(Stmt::Break(stmt))
    }

    fn continue_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("continue")?;
        Ok(Stmt::Continue(Continue {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            label: self.jump_label()?,
        }))
    }

    fn throw_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        self.expect("throw")?;
        Ok(Stmt::Throw(Throw {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            expr: self.expression()?,
        }))
    }

    fn labeled_stmt(&mut self) -> Result<Stmt> {
        let prefix = self.take_prefix();
        let mut label = self.ident()?;
        label.fmt.suffix = self.expect(":")?;
        Ok(Stmt::Labeled(Labeled {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            label,
            stmt: Box::new(self.statement()?),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::{codegen_statement, CodegenState};
    use crate::nodes::*;
    use crate::parser::parse_statement;

    fn parse(source: &str) -> Stmt {
        let stmt = parse_statement(source).unwrap();
        let mut state = CodegenState::default();
        codegen_statement(&stmt, &mut state);
        assert_eq!(state.to_string(), source);
        stmt
    }

    #[test]
    fn test_local_variable_versus_expression() {
        assert!(matches!(parse("int x = 1;"), Stmt::LocalVar(_)));
        assert!(matches!(parse("List<String> xs;"), Stmt::LocalVar(_)));
        assert!(matches!(parse("x = 1;"), Stmt::Expr(_)));
        assert!(matches!(parse("foo.bar();"), Stmt::Expr(_)));
        assert!(matches!(parse("final var y = z;"), Stmt::LocalVar(_)));
    }

    #[test]
    fn test_for_with_empty_parts() {
        let Stmt::For(f) = parse("for ( ; ; ) { }") else {
            panic!("expected for");
        };
        assert_eq!(f.control.init[0].fmt().prefix, " ");
        assert!(matches!(*f.control.condition, Expr::Empty(_)));
        assert_eq!(f.control.update[0].fmt().prefix, " ");
    }

    #[test]
    fn test_for_loops() {
        parse("for (int i = 0, j = 1; i < n; i++, j--) sum += i;");
        parse("for (final String s : list) { use(s); }");
        parse("for (i = 0; i < 3; ++i) ;");
    }

    #[test]
    fn test_switch_cases() {
        let Stmt::Switch(s) = parse(
            "switch (x) {\n  case 1:\n  case 2:\n    a();\n    break;\n  default:\n    b();\n}",
        ) else {
            panic!("expected switch");
        };
        assert_eq!(s.cases.len(), 3);
        assert!(s.cases[0].stmts.is_empty());
        assert_eq!(s.cases[1].stmts.len(), 2);
        assert!(s.cases[2].is_default());
    }

    #[test]
    fn test_try_forms() {
        parse("try (InputStream in = open(); Reader r = wrap(in);) { } catch (IOException | RuntimeException e) { } finally { }");
        parse("try { f(); } catch (final Exception e) { throw e; }");
    }

    #[test]
    fn test_misc_statements() {
        parse("outer: while (true) { continue outer; }");
        parse("do x++; while (x < 10);");
        parse("synchronized (lock) { n++; }");
        parse("if (a) b(); else if (c) d(); else { }");
        parse("return;");
        parse("class Local { }");
        parse("Runnable r = () -> { };");
    }
}
