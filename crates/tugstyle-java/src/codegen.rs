// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Printing trees back to source text.
//!
//! Printing is exact: for any source the parser accepts,
//! `parse_compilation_unit(src)?.to_source() == src`.

use std::fmt;

use crate::nodes::*;

/// Accumulates printed text.
#[derive(Debug, Default)]
pub struct CodegenState {
    tokens: String,
}

impl CodegenState {
    pub fn add_token(&mut self, token: &str) {
        self.tokens.push_str(token);
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);

    /// Print this node, formatting included.
    fn to_source(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.tokens
    }
}

/// Printed text with all whitespace removed; two expressions with the same
/// normalized source are treated as the same expression.
pub fn normalized_source<T: Codegen>(node: &T) -> String {
    node.to_source()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn codegen_list<T: Codegen>(elems: &[T], state: &mut CodegenState) {
    for (i, elem) in elems.iter().enumerate() {
        if i > 0 {
            state.add_token(",");
        }
        elem.codegen(state);
    }
}

fn codegen_container<T: Codegen>(
    container: &Container<T>,
    open: &str,
    close: &str,
    state: &mut CodegenState,
) {
    state.add_token(&container.before);
    state.add_token(open);
    if container.elems.is_empty() {
        state.add_token(&container.empty);
    } else {
        codegen_list(&container.elems, state);
    }
    state.add_token(close);
}

/// Print a statement followed by its `;` where one is required.
pub fn codegen_statement(stmt: &Stmt, state: &mut CodegenState) {
    stmt.codegen(state);
    if stmt.needs_semicolon() {
        state.add_token(";");
    }
}

fn codegen_modifiers(modifiers: &[Modifier], state: &mut CodegenState) {
    for m in modifiers {
        m.codegen(state);
    }
}

fn codegen_dims(dims: &[Dimension], state: &mut CodegenState) {
    for d in dims {
        state.add_token(&d.before);
        state.add_token("[");
        state.add_token(&d.inner);
        state.add_token("]");
    }
}

fn codegen_type_list(list: &TypeList, keyword: &str, separator: &str, state: &mut CodegenState) {
    state.add_token(&list.before);
    state.add_token(keyword);
    for (i, ty) in list.types.iter().enumerate() {
        if i > 0 {
            state.add_token(separator);
        }
        ty.codegen(state);
    }
}

// ============================================================================
// Declarations
// ============================================================================

impl Codegen for CompilationUnit {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        if let Some(package) = &self.package {
            package.codegen(state);
        }
        for import in &self.imports {
            import.codegen(state);
        }
        for class in &self.types {
            class.codegen(state);
        }
        state.add_token(&self.eof);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Package {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        codegen_modifiers(&self.annotations, state);
        state.add_token("package");
        self.name.codegen(state);
        state.add_token(&self.fmt.suffix);
        state.add_token(";");
    }
}

impl Codegen for Import {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("import");
        if let Some(prefix) = &self.static_prefix {
            state.add_token(prefix);
            state.add_token("static");
        }
        self.name.codegen(state);
        state.add_token(&self.fmt.suffix);
        state.add_token(";");
    }
}

impl Codegen for Modifier {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token(self.kind.as_str());
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for TypeTree {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token(&self.name);
        if let Some(bound) = &self.bound {
            state.add_token(&bound.before);
            state.add_token(bound.kind.as_str());
            bound.ty.codegen(state);
        }
        if let Some(args) = &self.type_args {
            codegen_container(args, "<", ">", state);
        }
        codegen_dims(&self.dims, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for TypeParam {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.name.codegen(state);
        if let Some((before, bounds)) = &self.bounds {
            state.add_token(before);
            state.add_token("extends");
            for (i, ty) in bounds.iter().enumerate() {
                if i > 0 {
                    state.add_token("&");
                }
                ty.codegen(state);
            }
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for ClassDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        codegen_modifiers(&self.modifiers, state);
        state.add_token(&self.kind_prefix);
        state.add_token(self.kind.as_str());
        self.name.codegen(state);
        if let Some(tp) = &self.type_params {
            codegen_container(tp, "<", ">", state);
        }
        if let Some(extends) = &self.extends {
            codegen_type_list(extends, "extends", ",", state);
        }
        if let Some(implements) = &self.implements {
            codegen_type_list(implements, "implements", ",", state);
        }
        self.body.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for ClassBody {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("{");
        if let Some(constants) = &self.enum_constants {
            codegen_list(&constants.constants, state);
            if constants.trailing_comma {
                state.add_token(",");
            }
            if let Some(semi) = &constants.semicolon {
                state.add_token(semi);
                state.add_token(";");
            }
        }
        for member in &self.members {
            member.codegen(state);
        }
        state.add_token(&self.end);
        state.add_token("}");
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for EnumConstant {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        codegen_modifiers(&self.modifiers, state);
        self.name.codegen(state);
        if let Some(args) = &self.args {
            codegen_container(args, "(", ")", state);
        }
        if let Some(body) = &self.body {
            body.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Member {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Member::Field(f) => {
                f.codegen(state);
                state.add_token(";");
            }
            Member::Method(m) => m.codegen(state),
            Member::Class(c) => c.codegen(state),
            Member::Initializer(b) => b.codegen(state),
            Member::Empty(e) => {
                e.codegen(state);
                state.add_token(";");
            }
        }
    }
}

impl Codegen for MethodDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        codegen_modifiers(&self.modifiers, state);
        if let Some(tp) = &self.type_params {
            codegen_container(tp, "<", ">", state);
        }
        if let Some(ret) = &self.return_type {
            ret.codegen(state);
        }
        self.name.codegen(state);
        codegen_container(&self.params, "(", ")", state);
        if let Some(throws) = &self.throws {
            codegen_type_list(throws, "throws", ",", state);
        }
        if let Some((before, value)) = &self.default_value {
            state.add_token(before);
            state.add_token("default");
            value.codegen(state);
        }
        match &self.body {
            Some(body) => {
                body.codegen(state);
                state.add_token(&self.fmt.suffix);
            }
            None => {
                state.add_token(&self.fmt.suffix);
                state.add_token(";");
            }
        }
    }
}

impl Codegen for VarDecls {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        codegen_modifiers(&self.modifiers, state);
        self.ty.codegen(state);
        if let Some(before) = &self.varargs {
            state.add_token(before);
            state.add_token("...");
        }
        codegen_list(&self.vars, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for NamedVar {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.name.codegen(state);
        codegen_dims(&self.dims, state);
        if let Some(init) = &self.init {
            state.add_token(&init.eq_prefix);
            state.add_token("=");
            init.expr.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Codegen for Stmt {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Stmt::Block(s) => s.codegen(state),
            Stmt::LocalVar(s) => s.codegen(state),
            Stmt::LocalClass(s) => s.codegen(state),
            Stmt::Expr(s) => s.codegen(state),
            Stmt::If(s) => s.codegen(state),
            Stmt::For(s) => s.codegen(state),
            Stmt::ForEach(s) => s.codegen(state),
            Stmt::While(s) => s.codegen(state),
            Stmt::DoWhile(s) => s.codegen(state),
            Stmt::Switch(s) => s.codegen(state),
            Stmt::Try(s) => s.codegen(state),
            Stmt::Synchronized(s) => s.codegen(state),
            Stmt::Return(s) => s.codegen(state),
            Stmt::Break(s) => s.codegen(state),
            Stmt::Continue(s) => s.codegen(state),
            Stmt::Throw(s) => s.codegen(state),
            Stmt::Labeled(s) => s.codegen(state),
            Stmt::Empty(s) => s.codegen(state),
        }
    }
}

impl Codegen for Block {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        if let Some(before_brace) = &self.static_init {
            state.add_token("static");
            state.add_token(before_brace);
        }
        state.add_token("{");
        for stmt in &self.stmts {
            codegen_statement(stmt, state);
        }
        state.add_token(&self.end);
        state.add_token("}");
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for If {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("if");
        self.condition.codegen(state);
        codegen_statement(&self.then_stmt, state);
        if let Some(else_part) = &self.else_part {
            else_part.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Else {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("else");
        codegen_statement(&self.body, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for For {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("for");
        state.add_token(&self.control.before);
        state.add_token("(");
        codegen_list(&self.control.init, state);
        state.add_token(";");
        self.control.condition.codegen(state);
        state.add_token(";");
        codegen_list(&self.control.update, state);
        state.add_token(")");
        codegen_statement(&self.body, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for ForEach {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("for");
        state.add_token(&self.control.before);
        state.add_token("(");
        self.control.var.codegen(state);
        state.add_token(":");
        self.control.iterable.codegen(state);
        state.add_token(")");
        codegen_statement(&self.body, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for While {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("while");
        self.condition.codegen(state);
        codegen_statement(&self.body, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for DoWhile {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("do");
        codegen_statement(&self.body, state);
        state.add_token(&self.while_prefix);
        state.add_token("while");
        self.condition.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Switch {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("switch");
        self.selector.codegen(state);
        state.add_token(&self.block_prefix);
        state.add_token("{");
        for case in &self.cases {
            case.codegen(state);
        }
        state.add_token(&self.end);
        state.add_token("}");
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Case {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        match &self.pattern {
            Some(pattern) => {
                state.add_token("case");
                pattern.codegen(state);
            }
            None => state.add_token("default"),
        }
        state.add_token(&self.colon_prefix);
        state.add_token(":");
        for stmt in &self.stmts {
            codegen_statement(stmt, state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Try {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("try");
        if let Some(resources) = &self.resources {
            state.add_token(&resources.before);
            state.add_token("(");
            for (i, decl) in resources.decls.iter().enumerate() {
                if i > 0 {
                    state.add_token(";");
                }
                decl.codegen(state);
            }
            if let Some(trailing) = &resources.trailing_semicolon {
                state.add_token(";");
                state.add_token(trailing);
            }
            state.add_token(")");
        }
        self.body.codegen(state);
        for catch in &self.catches {
            catch.codegen(state);
        }
        if let Some(finally) = &self.finally {
            finally.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Catch {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("catch");
        state.add_token(&self.paren_prefix);
        state.add_token("(");
        self.param.codegen(state);
        state.add_token(")");
        self.body.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Finally {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("finally");
        self.body.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Synchronized {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("synchronized");
        self.lock.codegen(state);
        self.body.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Return {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("return");
        if let Some(expr) = &self.expr {
            expr.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Break {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("break");
        if let Some(label) = &self.label {
            label.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Continue {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("continue");
        if let Some(label) = &self.label {
            label.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Throw {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("throw");
        self.expr.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Labeled {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.label.codegen(state);
        state.add_token(":");
        codegen_statement(&self.stmt, state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Empty {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token(&self.fmt.suffix);
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Expr::Ident(e) => e.codegen(state),
            Expr::Literal(e) => e.codegen(state),
            Expr::Binary(e) => e.codegen(state),
            Expr::Unary(e) => e.codegen(state),
            Expr::Assign(e) => e.codegen(state),
            Expr::Parens(e) => e.codegen(state),
            Expr::Ternary(e) => e.codegen(state),
            Expr::InstanceOf(e) => e.codegen(state),
            Expr::Cast(e) => e.codegen(state),
            Expr::MethodCall(e) => e.codegen(state),
            Expr::FieldAccess(e) => e.codegen(state),
            Expr::ArrayAccess(e) => e.codegen(state),
            Expr::NewClass(e) => e.codegen(state),
            Expr::NewArray(e) => e.codegen(state),
            Expr::ArrayInit(e) => e.codegen(state),
            Expr::Lambda(e) => e.codegen(state),
            Expr::MemberRef(e) => e.codegen(state),
            Expr::Empty(e) => e.codegen(state),
        }
    }
}

impl Codegen for Ident {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token(&self.name);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Literal {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token(&self.text);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Binary {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.left.codegen(state);
        state.add_token(&self.op_prefix);
        state.add_token(self.op.as_str());
        self.right.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Unary {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        if self.op.is_postfix() {
            self.expr.codegen(state);
            state.add_token(&self.op_prefix);
            state.add_token(self.op.as_str());
        } else {
            state.add_token(self.op.as_str());
            self.expr.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Assign {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.target.codegen(state);
        state.add_token(&self.op_prefix);
        state.add_token(self.op.as_str());
        self.value.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Parens {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("(");
        self.inner.codegen(state);
        state.add_token(")");
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Ternary {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.condition.codegen(state);
        state.add_token(&self.question_prefix);
        state.add_token("?");
        self.then_expr.codegen(state);
        state.add_token(&self.colon_prefix);
        state.add_token(":");
        self.else_expr.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for InstanceOf {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.expr.codegen(state);
        state.add_token(&self.op_prefix);
        state.add_token("instanceof");
        self.ty.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Cast {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("(");
        self.ty.codegen(state);
        state.add_token(")");
        self.expr.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for MethodCall {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        if let Some(select) = &self.select {
            select.codegen(state);
            state.add_token(".");
        }
        if let Some(type_args) = &self.type_args {
            codegen_container(type_args, "<", ">", state);
        }
        self.name.codegen(state);
        codegen_container(&self.args, "(", ")", state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for FieldAccess {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.target.codegen(state);
        state.add_token(".");
        self.name.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for ArrayAccess {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.array.codegen(state);
        state.add_token("[");
        self.index.codegen(state);
        state.add_token("]");
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for NewClass {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("new");
        self.ty.codegen(state);
        codegen_container(&self.args, "(", ")", state);
        if let Some(body) = &self.body {
            body.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for NewArray {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("new");
        self.elem.codegen(state);
        for dim in &self.dims {
            state.add_token(&dim.before);
            state.add_token("[");
            match &dim.size {
                Some(size) => size.codegen(state),
                None => state.add_token(&dim.empty),
            }
            state.add_token("]");
        }
        if let Some(init) = &self.init {
            init.codegen(state);
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for ArrayInit {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        state.add_token("{");
        codegen_list(&self.elems, state);
        if self.trailing_comma {
            state.add_token(",");
        }
        state.add_token(&self.end);
        state.add_token("}");
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for LambdaParam {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        if let Some(ty) = &self.ty {
            ty.codegen(state);
        }
        self.name.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for Lambda {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        if self.params.parenthesized {
            codegen_container(&self.params.params, "(", ")", state);
        } else {
            codegen_list(&self.params.params.elems, state);
        }
        state.add_token(&self.arrow_prefix);
        state.add_token("->");
        match &self.body {
            LambdaBody::Expr(e) => e.codegen(state),
            LambdaBody::Block(b) => b.codegen(state),
        }
        state.add_token(&self.fmt.suffix);
    }
}

impl Codegen for MemberRef {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.fmt.prefix);
        self.target.codegen(state);
        state.add_token("::");
        self.name.codegen(state);
        state.add_token(&self.fmt.suffix);
    }
}
