// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Keep wrapped operators on one side of the line break.
//!
//! With `NL` an operator that ends a line moves to the start of the next
//! one; with `EOL` an operator that starts a line moves to the end of the
//! previous one. The line break and indentation travel with the operator,
//! and a single space fills the gap it left. Gaps holding comments are not
//! moved.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{walk_class_decl, walk_expr, walk_method, walk_named_var};
use tugstyle_java::{
    has_newline, ClassDecl, Container, Cursor, Effects, Expr, JavaVisitor, MethodDecl, NamedVar,
    Rule, TypeParam,
};

use crate::format::is_blank;
use crate::policy::WrapPolicy;
use crate::token::Token;

#[derive(Debug)]
pub struct OperatorWrap {
    effects: Effects,
    option: WrapPolicy,
    tokens: BTreeSet<Token>,
}

impl OperatorWrap {
    pub const NAME: &'static str = "OperatorWrap";

    const DEFAULT_TOKENS: [Token; 23] = [
        Token::Question,
        Token::Colon,
        Token::Equal,
        Token::NotEqual,
        Token::Div,
        Token::Plus,
        Token::Minus,
        Token::Star,
        Token::Mod,
        Token::Sr,
        Token::Bsr,
        Token::Ge,
        Token::Gt,
        Token::Sl,
        Token::Le,
        Token::Lt,
        Token::Bxor,
        Token::Bor,
        Token::Lor,
        Token::Band,
        Token::Land,
        Token::TypeExtensionAnd,
        Token::LiteralInstanceof,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            option: options.option(WrapPolicy::Nl),
            tokens: options.tokens(Self::DEFAULT_TOKENS),
        }
    }

    /// Move the line break around an operator of kind `token`. `before` and
    /// `after` are the gaps on either side of it; `pad` is what the emptied
    /// gap becomes.
    fn wrap(&self, token: Token, before: &mut String, after: &mut String, pad: &str) -> bool {
        if !self.tokens.contains(&token) {
            return false;
        }
        let (from, to) = match self.option {
            WrapPolicy::Nl => (after, before),
            WrapPolicy::Eol => (before, after),
        };
        if !has_newline(from) || has_newline(to) || !is_blank(to) {
            return false;
        }
        *to = std::mem::replace(from, pad.to_string());
        true
    }

    fn wrap_type_params(&self, params: &mut Container<TypeParam>) -> bool {
        let mut changed = false;
        for param in &mut params.elems {
            let Some((_, bounds)) = param.bounds.as_mut() else {
                continue;
            };
            for i in 1..bounds.len() {
                let (head, tail) = bounds.split_at_mut(i);
                changed |= self.wrap(
                    Token::TypeExtensionAnd,
                    &mut head[i - 1].fmt.suffix,
                    &mut tail[0].fmt.prefix,
                    " ",
                );
            }
        }
        changed
    }
}

impl Default for OperatorWrap {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

impl JavaVisitor for OperatorWrap {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_class_decl<'a>(&mut self, class: &'a ClassDecl, cursor: &Cursor<'a>) -> ClassDecl {
        let mut out = walk_class_decl(self, class, cursor);
        if let Some(params) = out.type_params.as_mut() {
            if self.wrap_type_params(params) {
                self.effects.record_change(class.id);
            }
        }
        out
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        if let Some(params) = out.type_params.as_mut() {
            if self.wrap_type_params(params) {
                self.effects.record_change(method.id);
            }
        }
        out
    }

    fn visit_named_var<'a>(&mut self, var: &'a NamedVar, cursor: &Cursor<'a>) -> NamedVar {
        let mut out = walk_named_var(self, var, cursor);
        if let Some(init) = out.init.as_mut() {
            if self.wrap(
                Token::Assign,
                &mut init.eq_prefix,
                &mut init.expr.fmt_mut().prefix,
                " ",
            ) {
                self.effects.record_change(var.id);
            }
        }
        out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let mut out = walk_expr(self, expr, cursor);
        let changed = match &mut out {
            Expr::Binary(binary) => self.wrap(
                Token::of_binary(binary.op),
                &mut binary.op_prefix,
                &mut binary.right.fmt_mut().prefix,
                " ",
            ),
            Expr::Assign(assign) => self.wrap(
                Token::of_assign(assign.op),
                &mut assign.op_prefix,
                &mut assign.value.fmt_mut().prefix,
                " ",
            ),
            Expr::InstanceOf(instance_of) => self.wrap(
                Token::LiteralInstanceof,
                &mut instance_of.op_prefix,
                &mut instance_of.ty.fmt.prefix,
                " ",
            ),
            Expr::Ternary(ternary) => {
                let question = self.wrap(
                    Token::Question,
                    &mut ternary.question_prefix,
                    &mut ternary.then_expr.fmt_mut().prefix,
                    " ",
                );
                let colon = self.wrap(
                    Token::Colon,
                    &mut ternary.colon_prefix,
                    &mut ternary.else_expr.fmt_mut().prefix,
                    " ",
                );
                question || colon
            }
            Expr::MemberRef(member_ref) => self.wrap(
                Token::MethodRef,
                &mut member_ref.target.fmt_mut().suffix,
                &mut member_ref.name.fmt.prefix,
                "",
            ),
            _ => false,
        };
        if changed {
            self.effects.record_change(expr.id());
        }
        out
    }
}

impl Rule for OperatorWrap {
    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_fix, assert_unchanged};

    const END_OF_LINE: &str = "import java.io.*;
class A {
    {
        String s = \"aaa\" +
            \"b\" + \"c\";
        if(s instanceof
            String);
        boolean b = s.contains(\"a\") ?
            false :
            true;
        s +=
            \"b\";
        Runnable r = this::
            run;
        int n =
            1;
        int m[] =
            new int[0];
        n =
            2;
    }

    <T extends Serializable &
            Comparable> T foo() {
        return null;
    }
}
";

    const NEW_LINE: &str = "import java.io.*;
class A {
    {
        String s = \"aaa\"
            + \"b\" + \"c\";
        if(s
            instanceof String);
        boolean b = s.contains(\"a\")
            ? false
            : true;
        s
            += \"b\";
        Runnable r = this
            ::run;
        int n
            = 1;
        int m[]
            = new int[0];
        n
            = 2;
    }

    <T extends Serializable
            & Comparable> T foo() {
        return null;
    }
}
";

    const ALL_TOKENS: &str = "QUESTION, COLON, EQUAL, NOT_EQUAL, DIV, PLUS, MINUS, STAR, MOD, \
        SR, BSR, GE, GT, SL, LE, LT, BXOR, BOR, LOR, BAND, LAND, TYPE_EXTENSION_AND, \
        LITERAL_INSTANCEOF, ASSIGN, PLUS_ASSIGN, METHOD_REF";

    #[test]
    fn test_operator_on_new_line() {
        assert_fix(
            || OperatorWrap::new(&RuleOptions::new().with("tokens", ALL_TOKENS)),
            END_OF_LINE,
            NEW_LINE,
        );
    }

    #[test]
    fn test_operator_at_end_of_line() {
        assert_fix(
            || {
                OperatorWrap::new(
                    &RuleOptions::new()
                        .with("tokens", ALL_TOKENS)
                        .with("option", "eol"),
                )
            },
            NEW_LINE,
            END_OF_LINE,
        );
    }

    #[test]
    fn test_default_tokens_leave_assignments() {
        assert_unchanged(
            OperatorWrap::default(),
            "class A {\n    void f() {\n        int n =\n            1;\n    }\n}\n",
        );
    }
}
