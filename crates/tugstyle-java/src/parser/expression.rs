// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expressions, by precedence climbing over [`BinaryOp::precedence`].

use std::mem::take;

use super::declaration::is_primitive_name;
use super::{Parser, Result};
use crate::nodes::*;
use crate::tokenizer::TokType;

impl Parser<'_> {
    pub(crate) fn expression(&mut self) -> Result<Expr> {
        if self.at_lambda() {
            return self.lambda();
        }
        let mut target = self.ternary()?;
        if let Some((op, count)) = self.peek_assign_op() {
            let prefix = take(&mut target.fmt_mut().prefix);
            let op_prefix = self.bump_joined(count);
            let value = self.expression()?;
            return Ok(Expr::Assign(Assign {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(prefix),
                target: Box::new(target),
                op_prefix,
                op,
                value: Box::new(value),
            }));
        }
        Ok(target)
    }

    /// An expression or an array initializer, as allowed after `=`.
    pub(crate) fn variable_initializer(&mut self) -> Result<Expr> {
        if self.at("{") {
            Ok(Expr::ArrayInit(self.array_init()?))
        } else {
            self.expression()
        }
    }

    /// Consume `count` adjacent tokens forming one operator.
    fn bump_joined(&mut self, count: usize) -> String {
        let (_, prefix) = self.bump();
        for _ in 1..count {
            self.bump();
        }
        prefix
    }

    fn peek_assign_op(&self) -> Option<(AssignOp, usize)> {
        let tok = self.peek();
        if tok.kind != TokType::Punct {
            return None;
        }
        if tok.text == ">" {
            if self.joined_at(1, ">") && self.joined_at(2, ">") && self.joined_at(3, "=") {
                return Some((AssignOp::UShr, 4));
            }
            if self.joined_at(1, ">") && self.joined_at(2, "=") {
                return Some((AssignOp::Shr, 3));
            }
            return None;
        }
        AssignOp::from_token(tok.text).map(|op| (op, 1))
    }

    fn peek_binary_op(&self) -> Option<(BinaryOp, usize)> {
        let tok = self.peek();
        if tok.kind != TokType::Punct {
            return None;
        }
        if tok.text == ">" {
            if self.joined_at(1, ">") {
                if self.joined_at(2, ">") {
                    if self.joined_at(3, "=") {
                        return None;
                    }
                    return Some((BinaryOp::UShr, 3));
                }
                if self.joined_at(2, "=") {
                    return None;
                }
                return Some((BinaryOp::Shr, 2));
            }
            if self.joined_at(1, "=") {
                return Some((BinaryOp::Ge, 2));
            }
            return Some((BinaryOp::Gt, 1));
        }
        BinaryOp::from_token(tok.text).map(|op| (op, 1))
    }

    fn ternary(&mut self) -> Result<Expr> {
        let mut condition = self.binary(BinaryOp::Or.precedence())?;
        if !self.at("?") {
            return Ok(condition);
        }
        let prefix = take(&mut condition.fmt_mut().prefix);
        let question_prefix = self.expect("?")?;
        let then_expr = self.expression()?;
        let colon_prefix = self.expect(":")?;
        let else_expr = if self.at_lambda() {
            self.lambda()?
        } else {
            self.ternary()?
        };
        Ok(Expr::Ternary(Ternary {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            condition: Box::new(condition),
            question_prefix,
            then_expr: Box::new(then_expr),
            colon_prefix,
            else_expr: Box::new(else_expr),
        }))
    }

    fn binary(&mut self, max_precedence: u8) -> Result<Expr> {
        let mut left = self.unary()?;
        loop {
            if self.at("instanceof") {
                if INSTANCEOF_PRECEDENCE > max_precedence {
                    break;
                }
                let prefix = take(&mut left.fmt_mut().prefix);
                let op_prefix = self.expect("instanceof")?;
                let ty = self.type_tree()?;
                left = Expr::InstanceOf(InstanceOf {
                    id: NodeId::fresh(),
                    fmt: Formatting::prefixed(prefix),
                    expr: Box::new(left),
                    op_prefix,
                    ty,
                });
                continue;
            }
            let Some((op, count)) = self.peek_binary_op() else {
                break;
            };
            if op.precedence() > max_precedence {
                break;
            }
            let prefix = take(&mut left.fmt_mut().prefix);
            let op_prefix = self.bump_joined(count);
            let right = self.binary(op.precedence() - 1)?;
            left = Expr::Binary(Binary {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(prefix),
                left: Box::new(left),
                op_prefix,
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        let tok = self.peek();
        let prefix_op = if tok.kind == TokType::Punct {
            match tok.text {
                "!" => Some(UnaryOp::Not),
                "~" => Some(UnaryOp::Complement),
                "+" => Some(UnaryOp::Pos),
                "-" => Some(UnaryOp::Neg),
                "++" => Some(UnaryOp::PreInc),
                "--" => Some(UnaryOp::PreDec),
                _ => None,
            }
        } else {
            None
        };
        if let Some(op) = prefix_op {
            let prefix = self.take_prefix();
            self.bump();
            let expr = self.unary()?;
            return Ok(Expr::Unary(Unary {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(prefix),
                op,
                op_prefix: String::new(),
                expr: Box::new(expr),
            }));
        }
        if self.at("(") && self.at_cast() {
            return self.cast();
        }

        let mut expr = self.postfix_primary()?;
        loop {
            let op = if self.at("++") {
                UnaryOp::PostInc
            } else if self.at("--") {
                UnaryOp::PostDec
            } else {
                break;
            };
            let prefix = take(&mut expr.fmt_mut().prefix);
            let (_, op_prefix) = self.bump();
            expr = Expr::Unary(Unary {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(prefix),
                op,
                op_prefix,
                expr: Box::new(expr),
            });
        }
        Ok(expr)
    }

    /// `(` starts a cast rather than a parenthesized expression.
    fn at_cast(&mut self) -> bool {
        let Some(close) = self.matching_close(0) else {
            return false;
        };
        if self.peek_at(close + 1).is("->") {
            return false;
        }
        let checkpoint = self.checkpoint();
        self.bump();
        let ty = self.type_tree();
        let spans_parens = self.position() == checkpoint.pos + close;
        self.restore(checkpoint);
        let Ok(ty) = ty else {
            return false;
        };
        if !spans_parens {
            return false;
        }
        if is_primitive_name(&ty.name) && ty.type_args.is_none() {
            return true;
        }
        let next = self.peek_at(close + 1);
        match next.kind {
            TokType::Word => next.text != "instanceof",
            TokType::Number(_) | TokType::Char | TokType::String => true,
            TokType::Punct => matches!(next.text, "(" | "!" | "~"),
            TokType::Eof => false,
        }
    }

    fn cast(&mut self) -> Result<Expr> {
        let prefix = self.take_prefix();
        self.expect("(")?;
        let mut ty = self.type_tree()?;
        ty.fmt.suffix = self.expect(")")?;
        let expr = if self.at_lambda() {
            self.lambda()?
        } else {
            self.unary()?
        };
        Ok(Expr::Cast(Cast {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            ty,
            expr: Box::new(expr),
        }))
    }

    fn postfix_primary(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.at(".") {
                let prefix = take(&mut expr.fmt_mut().prefix);
                expr.fmt_mut().suffix = self.expect(".")?;
                let type_args = if self.at("<") {
                    Some(self.type_args()?)
                } else {
                    None
                };
                let name = self.ident()?;
                if self.at("(") {
                    let args = self.arguments()?;
                    expr = Expr::MethodCall(MethodCall {
                        id: NodeId::fresh(),
                        fmt: Formatting::prefixed(prefix),
                        select: Some(Box::new(expr)),
                        type_args,
                        name,
                        args,
                    });
                } else {
                    expr = Expr::FieldAccess(FieldAccess {
                        id: NodeId::fresh(),
                        fmt: Formatting::prefixed(prefix),
                        target: Box::new(expr),
                        name,
                    });
                }
            } else if self.at("[") {
                let prefix = take(&mut expr.fmt_mut().prefix);
                expr.fmt_mut().suffix = self.expect("[")?;
                let mut index = self.expression()?;
                index.fmt_mut().suffix = self.expect("]")?;
                expr = Expr::ArrayAccess(ArrayAccess {
                    id: NodeId::fresh(),
                    fmt: Formatting::prefixed(prefix),
                    array: Box::new(expr),
                    index: Box::new(index),
                });
            } else if self.at("::") {
                let prefix = take(&mut expr.fmt_mut().prefix);
                expr.fmt_mut().suffix = self.expect("::")?;
                let name = self.ident()?;
                expr = Expr::MemberRef(MemberRef {
                    id: NodeId::fresh(),
                    fmt: Formatting::prefixed(prefix),
                    target: Box::new(expr),
                    name,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        let tok = self.peek();
        match tok.kind {
            TokType::Number(kind) => self.literal(kind),
            TokType::String => self.literal(LiteralKind::String),
            TokType::Char => self.literal(LiteralKind::Char),
            TokType::Word => match tok.text {
                "true" => self.literal(LiteralKind::True),
                "false" => self.literal(LiteralKind::False),
                "null" => self.literal(LiteralKind::Null),
                "new" => self.new_expr(),
                _ => {
                    let mut name = self.ident()?;
                    if self.at("(") {
                        let prefix = take(&mut name.fmt.prefix);
                        let args = self.arguments()?;
                        Ok(Expr::MethodCall(MethodCall {
                            id: NodeId::fresh(),
                            fmt: Formatting::prefixed(prefix),
                            select: None,
                            type_args: None,
                            name,
                            args,
                        }))
                    } else {
                        Ok(Expr::Ident(name))
                    }
                }
            },
            TokType::Punct => match tok.text {
                "(" => Ok(Expr::Parens(self.parens()?)),
                "{" => Ok(Expr::ArrayInit(self.array_init()?)),
                _ => Err(self.error("expression")),
            },
            TokType::Eof => Err(self.error("expression")),
        }
    }

    fn literal(&mut self, kind: LiteralKind) -> Result<Expr> {
        let prefix = self.take_prefix();
        let (tok, _) = self.bump();
        Ok(Expr::Literal(Literal {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            kind,
            text: tok.text.to_string(),
        }))
    }

    pub(crate) fn ident(&mut self) -> Result<Ident> {
        if !self.at_word() {
            return Err(self.error("identifier"));
        }
        let prefix = self.take_prefix();
        let (tok, _) = self.bump();
        Ok(Ident::new(tok.text, Formatting::prefixed(prefix)))
    }

    pub(crate) fn parens(&mut self) -> Result<Parens> {
        let prefix = self.take_prefix();
        self.expect("(")?;
        let mut inner = self.expression()?;
        inner.fmt_mut().suffix = self.expect(")")?;
        Ok(Parens::new(inner, Formatting::prefixed(prefix)))
    }

    pub(crate) fn arguments(&mut self) -> Result<Container<Expr>> {
        self.container("(", ")", |p| p.expression(), |e| &mut e.fmt_mut().suffix)
    }

    fn array_init(&mut self) -> Result<ArrayInit> {
        let prefix = self.take_prefix();
        self.expect("{")?;
        let mut elems = Vec::new();
        let mut trailing_comma = false;
        let end = loop {
            if let Some(end) = self.eat("}") {
                break end;
            }
            let mut elem = self.variable_initializer()?;
            if let Some(gap) = self.eat(",") {
                elem.fmt_mut().suffix = gap;
                elems.push(elem);
                trailing_comma = true;
            } else {
                elem.fmt_mut().suffix = self.expect("}")?;
                elems.push(elem);
                trailing_comma = false;
                break String::new();
            }
        };
        Ok(ArrayInit {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            elems,
            trailing_comma,
            end,
        })
    }

    fn new_expr(&mut self) -> Result<Expr> {
        let prefix = self.take_prefix();
        self.expect("new")?;
        let ty = self.type_tree_no_dims()?;
        if self.at("[") {
            let mut dims = Vec::new();
            while self.at("[") {
                let before = self.expect("[")?;
                if let Some(empty) = self.eat("]") {
                    dims.push(ArrayDimension {
                        before,
                        size: None,
                        empty,
                    });
                } else {
                    let mut size = self.expression()?;
                    size.fmt_mut().suffix = self.expect("]")?;
                    dims.push(ArrayDimension {
                        before,
                        size: Some(Box::new(size)),
                        empty: String::new(),
                    });
                }
            }
            let init = if self.at("{") {
                Some(self.array_init()?)
            } else {
                None
            };
            return Ok(Expr::NewArray(NewArray {
                id: NodeId::fresh(),
                fmt: Formatting::prefixed(prefix),
                elem: ty,
                dims,
                init,
            }));
        }
        let args = self.arguments()?;
        let body = if self.at("{") {
            Some(self.class_body(false)?)
        } else {
            None
        };
        Ok(Expr::NewClass(NewClass {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            ty,
            args,
            body,
        }))
    }

    // ------------------------------------------------------------------------
    // Lambdas
    // ------------------------------------------------------------------------

    fn at_lambda(&self) -> bool {
        if self.at_identifier_at(0) {
            return self.peek_at(1).is("->");
        }
        if self.at("(") {
            if let Some(close) = self.matching_close(0) {
                return self.peek_at(close + 1).is("->");
            }
        }
        false
    }

    fn lambda(&mut self) -> Result<Expr> {
        let prefix = self.take_prefix();
        let params = if self.at("(") {
            LambdaParams {
                parenthesized: true,
                params: self.container("(", ")", |p| p.lambda_param(), |lp| &mut lp.fmt.suffix)?,
            }
        } else {
            let name = self.ident()?;
            LambdaParams {
                parenthesized: false,
                params: Container::new(vec![LambdaParam {
                    id: NodeId::fresh(),
                    fmt: Formatting::default(),
                    ty: None,
                    name,
                }]),
            }
        };
        let arrow_prefix = self.expect("->")?;
        let body = if self.at("{") {
            LambdaBody::Block(self.block()?)
        } else {
            LambdaBody::Expr(Box::new(self.expression()?))
        };
        Ok(Expr::Lambda(Lambda {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            params,
            arrow_prefix,
            body,
        }))
    }

    fn lambda_param(&mut self) -> Result<LambdaParam> {
        let prefix = self.take_prefix();
        let untyped = self.at_identifier_at(0)
            && (self.peek_at(1).is(",") || self.peek_at(1).is(")"));
        let ty = if untyped {
            None
        } else {
            Some(self.type_tree()?)
        };
        let name = self.ident()?;
        Ok(LambdaParam {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            ty,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::Codegen;
    use crate::nodes::*;
    use crate::parser::parse_expression;

    fn parse(source: &str) -> Expr {
        let expr = parse_expression(source).unwrap();
        assert_eq!(expr.to_source(), source);
        expr
    }

    #[test]
    fn test_precedence_nests_tighter_operator_deeper() {
        let Expr::Binary(outer) = parse("a + b * c") else {
            panic!("expected binary");
        };
        assert_eq!(outer.op, BinaryOp::Add);
        assert!(matches!(*outer.right, Expr::Binary(ref b) if b.op == BinaryOp::Mul));
    }

    #[test]
    fn test_left_associativity() {
        let Expr::Binary(outer) = parse("a - b - c") else {
            panic!("expected binary");
        };
        assert!(matches!(*outer.left, Expr::Binary(_)));
        assert!(matches!(*outer.right, Expr::Ident(_)));
    }

    #[test]
    fn test_shift_operators_from_split_angles() {
        let Expr::Binary(b) = parse("x >>> 8") else {
            panic!("expected binary");
        };
        assert_eq!(b.op, BinaryOp::UShr);
        let Expr::Assign(a) = parse("x >>= 2") else {
            panic!("expected assignment");
        };
        assert_eq!(a.op, AssignOp::Shr);
        let Expr::Binary(b) = parse("x >= 2") else {
            panic!("expected binary");
        };
        assert_eq!(b.op, BinaryOp::Ge);
    }

    #[test]
    fn test_prefix_hoisted_to_outermost() {
        let expr = parse("  a  ==  b");
        assert_eq!(expr.fmt().prefix, "  ");
        let Expr::Binary(b) = expr else {
            panic!("expected binary");
        };
        assert_eq!(b.left.fmt().prefix, "");
        assert_eq!(b.op_prefix, "  ");
        assert_eq!(b.right.fmt().prefix, "  ");
    }

    #[test]
    fn test_cast_versus_parens() {
        assert!(matches!(parse("(int) x"), Expr::Cast(_)));
        assert!(matches!(parse("(String) o"), Expr::Cast(_)));
        assert!(matches!(parse("(a) + b"), Expr::Binary(_)));
        assert!(matches!(parse("(a < b)"), Expr::Parens(_)));
    }

    #[test]
    fn test_lambdas() {
        assert!(matches!(parse("x -> x + 1"), Expr::Lambda(_)));
        assert!(matches!(parse("(a, b) -> { return a; }"), Expr::Lambda(_)));
        assert!(matches!(parse("(String s) -> s.length()"), Expr::Lambda(_)));
    }

    #[test]
    fn test_selectors() {
        parse("a.b(c).d[e]++");
        parse("Collections.<String>emptyList()");
        parse("String::valueOf");
        parse("new int[] { 1, 2, }");
        parse("new java.util.ArrayList<>(10)");
        parse("new Runnable() { public void run() { } }");
        parse("c ? a : b");
        parse("o instanceof java.util.List<?>");
        parse("-x + ~y - !z");
    }
}
