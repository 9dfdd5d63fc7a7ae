// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace between an identifier and the `(` of its parameter or
//! argument list.

use std::collections::BTreeSet;

use tugstyle_core::RuleOptions;
use tugstyle_java::visitor::{walk_enum_constant, walk_expr, walk_method};
use tugstyle_java::{
    has_newline, Cursor, Effects, EnumConstant, Expr, JavaVisitor, MethodDecl, NodeId, Rule,
};

use crate::format::is_blank;
use crate::policy::PadPolicy;
use crate::token::Token;

#[derive(Debug)]
pub struct MethodParamPad {
    effects: Effects,
    option: PadPolicy,
    allow_line_breaks: bool,
    tokens: BTreeSet<Token>,
}

impl MethodParamPad {
    pub const NAME: &'static str = "MethodParamPad";

    const DEFAULT_TOKENS: [Token; 6] = [
        Token::CtorDef,
        Token::LiteralNew,
        Token::MethodCall,
        Token::MethodDef,
        Token::SuperCtorCall,
        Token::EnumConstantDef,
    ];

    pub fn new(options: &RuleOptions) -> Self {
        Self {
            effects: Effects::default(),
            option: options.option(PadPolicy::NoSpace),
            allow_line_breaks: options.bool("allowLineBreaks", false),
            tokens: options.tokens(Self::DEFAULT_TOKENS),
        }
    }

    /// Fix the gap before `(` for a construct of kind `token`.
    fn pad(&mut self, token: Token, gap: &mut String, id: NodeId) {
        if !self.tokens.contains(&token) {
            return;
        }
        let fixed = match self.option {
            PadPolicy::NoSpace if gap.is_empty() || !is_blank(gap) => None,
            PadPolicy::NoSpace if has_newline(gap) && self.allow_line_breaks => None,
            PadPolicy::NoSpace => Some(""),
            PadPolicy::Space => self.option.fix(gap),
        };
        if let Some(fixed) = fixed {
            *gap = fixed.to_string();
            self.effects.record_change(id);
        }
    }
}

impl Default for MethodParamPad {
    fn default() -> Self {
        Self::new(&RuleOptions::default())
    }
}

impl JavaVisitor for MethodParamPad {
    fn effects(&mut self) -> &mut Effects {
        &mut self.effects
    }

    fn visit_method<'a>(&mut self, method: &'a MethodDecl, cursor: &Cursor<'a>) -> MethodDecl {
        let mut out = walk_method(self, method, cursor);
        let token = if method.is_constructor() {
            Token::CtorDef
        } else {
            Token::MethodDef
        };
        self.pad(token, &mut out.params.before, method.id);
        out
    }

    fn visit_enum_constant<'a>(
        &mut self,
        constant: &'a EnumConstant,
        cursor: &Cursor<'a>,
    ) -> EnumConstant {
        let mut out = walk_enum_constant(self, constant, cursor);
        if let Some(args) = out.args.as_mut() {
            self.pad(Token::EnumConstantDef, &mut args.before, constant.id);
        }
        out
    }

    fn visit_expr<'a>(&mut self, expr: &'a Expr, cursor: &Cursor<'a>) -> Expr {
        let mut out = walk_expr(self, expr, cursor);
        match &mut out {
            Expr::MethodCall(call) => {
                let is_ctor_call =
                    call.select.is_none() && matches!(call.name.name.as_str(), "super" | "this");
                let token = if is_ctor_call {
                    Token::SuperCtorCall
                } else {
                    Token::MethodCall
                };
                self.pad(token, &mut call.args.before, call.id);
            }
            Expr::NewClass(new_class) => {
                self.pad(Token::LiteralNew, &mut new_class.args.before, new_class.id);
            }
            _ => {}
        }
        out
    }
}

impl Rule for MethodParamPad {
    fn name(&self) -> &str {
        Self::NAME
    }
}
