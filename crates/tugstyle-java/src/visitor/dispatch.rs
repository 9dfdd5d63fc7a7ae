// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Default traversal for [`JavaVisitor`].
//!
//! Each `walk_*` function visits the children of a node in source order and
//! rebuilds the node from the results. Nodes with a cursor frame are pushed
//! before their `visit_*` method is called; formatting and identity of the
//! node itself are carried over unchanged.

use super::cursor::{Cursor, NodeRef};
use super::traits::JavaVisitor;
use crate::nodes::*;

// ============================================================================
// Helpers
// ============================================================================

fn child_expr<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    expr: &'a Expr,
    cursor: &Cursor<'a>,
) -> Expr {
    let child = cursor.push(NodeRef::Expr(expr));
    visitor.visit_expr(expr, &child)
}

fn child_boxed<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    expr: &'a Expr,
    cursor: &Cursor<'a>,
) -> Box<Expr> {
    Box::new(child_expr(visitor, expr, cursor))
}

fn child_stmt<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    stmt: &'a Stmt,
    cursor: &Cursor<'a>,
) -> Stmt {
    let child = cursor.push(NodeRef::Stmt(stmt));
    visitor.visit_stmt(stmt, &child)
}

fn child_block<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    block: &'a Block,
    cursor: &Cursor<'a>,
) -> Block {
    let child = cursor.push(NodeRef::Block(block));
    visitor.visit_block(block, &child)
}

fn child_var_decls<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    decls: &'a VarDecls,
    cursor: &Cursor<'a>,
) -> VarDecls {
    let child = cursor.push(NodeRef::VarDecls(decls));
    visitor.visit_var_decls(decls, &child)
}

/// Condition of `if`, `while`, `do`, `switch` and `synchronized`.
fn child_parens<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    parens: &'a Parens,
    cursor: &Cursor<'a>,
) -> Parens {
    Parens {
        id: parens.id,
        fmt: parens.fmt.clone(),
        inner: child_boxed(visitor, &parens.inner, cursor),
    }
}

fn visit_args<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    args: &'a Container<Expr>,
    cursor: &Cursor<'a>,
) -> Container<Expr> {
    args.map(|arg| child_expr(visitor, arg, cursor))
}

fn visit_types<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    types: &'a [TypeTree],
    cursor: &Cursor<'a>,
) -> Vec<TypeTree> {
    types
        .iter()
        .map(|ty| visitor.visit_type_tree(ty, cursor))
        .collect()
}

fn visit_type_list<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    list: &'a TypeList,
    cursor: &Cursor<'a>,
) -> TypeList {
    TypeList {
        before: list.before.clone(),
        types: visit_types(visitor, &list.types, cursor),
    }
}

fn visit_type_params<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    params: &'a Container<TypeParam>,
    cursor: &Cursor<'a>,
) -> Container<TypeParam> {
    params.map(|param| TypeParam {
        id: param.id,
        fmt: param.fmt.clone(),
        name: param.name.clone(),
        bounds: param
            .bounds
            .as_ref()
            .map(|(before, types)| (before.clone(), visit_types(visitor, types, cursor))),
    })
}

/// Visit a list of statements, applying removals and expansions.
pub fn walk_stmt_list<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    stmts: &'a [Stmt],
    cursor: &Cursor<'a>,
) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        let child = cursor.push(NodeRef::Stmt(stmt));
        visitor.visit_stmt_in_list(stmt, &child).extend_into(&mut out);
    }
    out
}

// ============================================================================
// Declarations
// ============================================================================

/// Walk a compilation unit. Only the type declarations are visited.
pub fn walk_compilation_unit<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    unit: &'a CompilationUnit,
    cursor: &Cursor<'a>,
) -> CompilationUnit {
    let types = unit
        .types
        .iter()
        .map(|class| {
            let child = cursor.push(NodeRef::Class(class));
            visitor.visit_class_decl(class, &child)
        })
        .collect();
    CompilationUnit {
        id: unit.id,
        fmt: unit.fmt.clone(),
        package: unit.package.clone(),
        imports: unit.imports.clone(),
        types,
        eof: unit.eof.clone(),
    }
}

/// Walk a class: type parameters, supertypes, body.
pub fn walk_class_decl<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    class: &'a ClassDecl,
    cursor: &Cursor<'a>,
) -> ClassDecl {
    ClassDecl {
        id: class.id,
        fmt: class.fmt.clone(),
        modifiers: class.modifiers.clone(),
        kind_prefix: class.kind_prefix.clone(),
        kind: class.kind,
        name: class.name.clone(),
        type_params: class
            .type_params
            .as_ref()
            .map(|tp| visit_type_params(visitor, tp, cursor)),
        extends: class
            .extends
            .as_ref()
            .map(|list| visit_type_list(visitor, list, cursor)),
        implements: class
            .implements
            .as_ref()
            .map(|list| visit_type_list(visitor, list, cursor)),
        body: visitor.visit_class_body(&class.body, cursor),
    }
}

/// Walk a class body: enum constants, then members through
/// [`JavaVisitor::visit_member_in_list`].
pub fn walk_class_body<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    body: &'a ClassBody,
    cursor: &Cursor<'a>,
) -> ClassBody {
    let enum_constants = body.enum_constants.as_ref().map(|ec| EnumConstants {
        constants: ec
            .constants
            .iter()
            .map(|constant| {
                let child = cursor.push(NodeRef::EnumConstant(constant));
                visitor.visit_enum_constant(constant, &child)
            })
            .collect(),
        trailing_comma: ec.trailing_comma,
        semicolon: ec.semicolon.clone(),
    });
    let mut members = Vec::with_capacity(body.members.len());
    for member in &body.members {
        visitor
            .visit_member_in_list(member, cursor)
            .extend_into(&mut members);
    }
    ClassBody {
        id: body.id,
        fmt: body.fmt.clone(),
        enum_constants,
        members,
        end: body.end.clone(),
    }
}

/// Walk a member, pushing the frame for the declaration it wraps.
pub fn walk_member<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    member: &'a Member,
    cursor: &Cursor<'a>,
) -> Member {
    match member {
        Member::Field(field) => Member::Field(child_var_decls(visitor, field, cursor)),
        Member::Method(method) => {
            let child = cursor.push(NodeRef::Method(method));
            Member::Method(visitor.visit_method(method, &child))
        }
        Member::Class(class) => {
            let child = cursor.push(NodeRef::Class(class));
            Member::Class(visitor.visit_class_decl(class, &child))
        }
        Member::Initializer(block) => Member::Initializer(child_block(visitor, block, cursor)),
        Member::Empty(empty) => Member::Empty(empty.clone()),
    }
}

pub fn walk_enum_constant<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    constant: &'a EnumConstant,
    cursor: &Cursor<'a>,
) -> EnumConstant {
    EnumConstant {
        id: constant.id,
        fmt: constant.fmt.clone(),
        modifiers: constant.modifiers.clone(),
        name: constant.name.clone(),
        args: constant
            .args
            .as_ref()
            .map(|args| visit_args(visitor, args, cursor)),
        body: constant
            .body
            .as_ref()
            .map(|body| visitor.visit_class_body(body, cursor)),
    }
}

/// Walk a method: type parameters, return type, parameters, throws,
/// default value, body.
pub fn walk_method<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    method: &'a MethodDecl,
    cursor: &Cursor<'a>,
) -> MethodDecl {
    MethodDecl {
        id: method.id,
        fmt: method.fmt.clone(),
        modifiers: method.modifiers.clone(),
        type_params: method
            .type_params
            .as_ref()
            .map(|tp| visit_type_params(visitor, tp, cursor)),
        return_type: method
            .return_type
            .as_ref()
            .map(|ty| visitor.visit_type_tree(ty, cursor)),
        name: method.name.clone(),
        params: method
            .params
            .map(|param| child_var_decls(visitor, param, cursor)),
        throws: method
            .throws
            .as_ref()
            .map(|list| visit_type_list(visitor, list, cursor)),
        default_value: method
            .default_value
            .as_ref()
            .map(|(before, value)| (before.clone(), child_expr(visitor, value, cursor))),
        body: method
            .body
            .as_ref()
            .map(|body| child_block(visitor, body, cursor)),
    }
}

pub fn walk_var_decls<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    decls: &'a VarDecls,
    cursor: &Cursor<'a>,
) -> VarDecls {
    VarDecls {
        id: decls.id,
        fmt: decls.fmt.clone(),
        modifiers: decls.modifiers.clone(),
        ty: visitor.visit_type_tree(&decls.ty, cursor),
        varargs: decls.varargs.clone(),
        vars: decls
            .vars
            .iter()
            .map(|var| {
                let child = cursor.push(NodeRef::NamedVar(var));
                visitor.visit_named_var(var, &child)
            })
            .collect(),
    }
}

pub fn walk_named_var<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    var: &'a NamedVar,
    cursor: &Cursor<'a>,
) -> NamedVar {
    NamedVar {
        id: var.id,
        fmt: var.fmt.clone(),
        name: var.name.clone(),
        dims: var.dims.clone(),
        init: var.init.as_ref().map(|init| VarInit {
            eq_prefix: init.eq_prefix.clone(),
            expr: child_expr(visitor, &init.expr, cursor),
        }),
    }
}

/// Walk a type: type arguments and wildcard bound.
pub fn walk_type_tree<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    ty: &'a TypeTree,
    cursor: &Cursor<'a>,
) -> TypeTree {
    TypeTree {
        id: ty.id,
        fmt: ty.fmt.clone(),
        name: ty.name.clone(),
        type_args: ty
            .type_args
            .as_ref()
            .map(|args| args.map(|arg| visitor.visit_type_tree(arg, cursor))),
        bound: ty.bound.as_ref().map(|bound| WildcardBound {
            before: bound.before.clone(),
            kind: bound.kind,
            ty: Box::new(visitor.visit_type_tree(&bound.ty, cursor)),
        }),
        dims: ty.dims.clone(),
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Walk a statement whose frame is already on `cursor`.
///
/// Blocks, local variables and local classes are handed to their own
/// `visit_*` method with the same frame.
pub fn walk_stmt<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    stmt: &'a Stmt,
    cursor: &Cursor<'a>,
) -> Stmt {
    match stmt {
        Stmt::Block(block) => Stmt::Block(visitor.visit_block(block, cursor)),
        Stmt::LocalVar(decls) => Stmt::LocalVar(visitor.visit_var_decls(decls, cursor)),
        Stmt::LocalClass(class) => Stmt::LocalClass(visitor.visit_class_decl(class, cursor)),
        Stmt::Expr(expr) => Stmt::Expr(child_expr(visitor, expr, cursor)),
        Stmt::If(s) => Stmt::If(If {
            id: s.id,
            fmt: s.fmt.clone(),
            condition: child_parens(visitor, &s.condition, cursor),
            then_stmt: Box::new(child_stmt(visitor, &s.then_stmt, cursor)),
            else_part: s.else_part.as_ref().map(|e| Else {
                id: e.id,
                fmt: e.fmt.clone(),
                body: Box::new(child_stmt(visitor, &e.body, cursor)),
            }),
        }),
        Stmt::For(s) => Stmt::For(For {
            id: s.id,
            fmt: s.fmt.clone(),
            control: ForControl {
                before: s.control.before.clone(),
                init: s
                    .control
                    .init
                    .iter()
                    .map(|init| child_stmt(visitor, init, cursor))
                    .collect(),
                condition: child_boxed(visitor, &s.control.condition, cursor),
                update: s
                    .control
                    .update
                    .iter()
                    .map(|update| child_expr(visitor, update, cursor))
                    .collect(),
            },
            body: Box::new(child_stmt(visitor, &s.body, cursor)),
        }),
        Stmt::ForEach(s) => Stmt::ForEach(ForEach {
            id: s.id,
            fmt: s.fmt.clone(),
            control: ForEachControl {
                before: s.control.before.clone(),
                var: child_var_decls(visitor, &s.control.var, cursor),
                iterable: child_boxed(visitor, &s.control.iterable, cursor),
            },
            body: Box::new(child_stmt(visitor, &s.body, cursor)),
        }),
        Stmt::While(s) => Stmt::While(While {
            id: s.id,
            fmt: s.fmt.clone(),
            condition: child_parens(visitor, &s.condition, cursor),
            body: Box::new(child_stmt(visitor, &s.body, cursor)),
        }),
        Stmt::DoWhile(s) => Stmt::DoWhile(DoWhile {
            id: s.id,
            fmt: s.fmt.clone(),
            body: Box::new(child_stmt(visitor, &s.body, cursor)),
            while_prefix: s.while_prefix.clone(),
            condition: child_parens(visitor, &s.condition, cursor),
        }),
        Stmt::Switch(s) => Stmt::Switch(Switch {
            id: s.id,
            fmt: s.fmt.clone(),
            selector: child_parens(visitor, &s.selector, cursor),
            block_prefix: s.block_prefix.clone(),
            cases: s
                .cases
                .iter()
                .map(|case| {
                    let child = cursor.push(NodeRef::Case(case));
                    visitor.visit_case(case, &child)
                })
                .collect(),
            end: s.end.clone(),
        }),
        Stmt::Try(s) => Stmt::Try(Try {
            id: s.id,
            fmt: s.fmt.clone(),
            resources: s.resources.as_ref().map(|r| Resources {
                before: r.before.clone(),
                decls: r
                    .decls
                    .iter()
                    .map(|decl| child_var_decls(visitor, decl, cursor))
                    .collect(),
                trailing_semicolon: r.trailing_semicolon.clone(),
            }),
            body: child_block(visitor, &s.body, cursor),
            catches: s
                .catches
                .iter()
                .map(|catch| {
                    let child = cursor.push(NodeRef::Catch(catch));
                    visitor.visit_catch(catch, &child)
                })
                .collect(),
            finally: s.finally.as_ref().map(|f| Finally {
                id: f.id,
                fmt: f.fmt.clone(),
                body: child_block(visitor, &f.body, cursor),
            }),
        }),
        Stmt::Synchronized(s) => Stmt::Synchronized(Synchronized {
            id: s.id,
            fmt: s.fmt.clone(),
            lock: child_parens(visitor, &s.lock, cursor),
            body: child_block(visitor, &s.body, cursor),
        }),
        Stmt::Return(s) => Stmt::Return(Return {
            id: s.id,
            fmt: s.fmt.clone(),
            expr: s.expr.as_ref().map(|e| child_expr(visitor, e, cursor)),
        }),
        Stmt::Throw(s) => Stmt::Throw(Throw {
            id: s.id,
            fmt: s.fmt.clone(),
            expr: child_expr(visitor, &s.expr, cursor),
        }),
        Stmt::Labeled(s) => Stmt::Labeled(Labeled {
            id: s.id,
            fmt: s.fmt.clone(),
            label: s.label.clone(),
            stmt: Box::new(child_stmt(visitor, &s.stmt, cursor)),
        }),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) => stmt.clone(),
    }
}

/// Walk a block's statements through [`JavaVisitor::visit_stmt_in_list`].
pub fn walk_block<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    block: &'a Block,
    cursor: &Cursor<'a>,
) -> Block {
    Block {
        id: block.id,
        fmt: block.fmt.clone(),
        static_init: block.static_init.clone(),
        stmts: walk_stmt_list(visitor, &block.stmts, cursor),
        end: block.end.clone(),
    }
}

/// Walk a case label and its statements.
pub fn walk_case<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    case: &'a Case,
    cursor: &Cursor<'a>,
) -> Case {
    Case {
        id: case.id,
        fmt: case.fmt.clone(),
        pattern: case.pattern.as_ref().map(|p| child_expr(visitor, p, cursor)),
        colon_prefix: case.colon_prefix.clone(),
        stmts: walk_stmt_list(visitor, &case.stmts, cursor),
    }
}

pub fn walk_catch<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    catch: &'a Catch,
    cursor: &Cursor<'a>,
) -> Catch {
    Catch {
        id: catch.id,
        fmt: catch.fmt.clone(),
        paren_prefix: catch.paren_prefix.clone(),
        param: child_var_decls(visitor, &catch.param, cursor),
        body: child_block(visitor, &catch.body, cursor),
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Walk an expression whose frame is already on `cursor`.
pub fn walk_expr<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    expr: &'a Expr,
    cursor: &Cursor<'a>,
) -> Expr {
    match expr {
        Expr::Ident(_) | Expr::Literal(_) | Expr::Empty(_) => expr.clone(),
        Expr::Binary(e) => Expr::Binary(Binary {
            id: e.id,
            fmt: e.fmt.clone(),
            left: child_boxed(visitor, &e.left, cursor),
            op_prefix: e.op_prefix.clone(),
            op: e.op,
            right: child_boxed(visitor, &e.right, cursor),
        }),
        Expr::Unary(e) => Expr::Unary(Unary {
            id: e.id,
            fmt: e.fmt.clone(),
            op: e.op,
            op_prefix: e.op_prefix.clone(),
            expr: child_boxed(visitor, &e.expr, cursor),
        }),
        Expr::Assign(e) => Expr::Assign(Assign {
            id: e.id,
            fmt: e.fmt.clone(),
            target: child_boxed(visitor, &e.target, cursor),
            op_prefix: e.op_prefix.clone(),
            op: e.op,
            value: child_boxed(visitor, &e.value, cursor),
        }),
        Expr::Parens(e) => Expr::Parens(Parens {
            id: e.id,
            fmt: e.fmt.clone(),
            inner: child_boxed(visitor, &e.inner, cursor),
        }),
        Expr::Ternary(e) => Expr::Ternary(Ternary {
            id: e.id,
            fmt: e.fmt.clone(),
            condition: child_boxed(visitor, &e.condition, cursor),
            question_prefix: e.question_prefix.clone(),
            then_expr: child_boxed(visitor, &e.then_expr, cursor),
            colon_prefix: e.colon_prefix.clone(),
            else_expr: child_boxed(visitor, &e.else_expr, cursor),
        }),
        Expr::InstanceOf(e) => Expr::InstanceOf(InstanceOf {
            id: e.id,
            fmt: e.fmt.clone(),
            expr: child_boxed(visitor, &e.expr, cursor),
            op_prefix: e.op_prefix.clone(),
            ty: visitor.visit_type_tree(&e.ty, cursor),
        }),
        Expr::Cast(e) => Expr::Cast(Cast {
            id: e.id,
            fmt: e.fmt.clone(),
            ty: visitor.visit_type_tree(&e.ty, cursor),
            expr: child_boxed(visitor, &e.expr, cursor),
        }),
        Expr::MethodCall(e) => Expr::MethodCall(MethodCall {
            id: e.id,
            fmt: e.fmt.clone(),
            select: e.select.as_ref().map(|s| child_boxed(visitor, s, cursor)),
            type_args: e
                .type_args
                .as_ref()
                .map(|args| args.map(|arg| visitor.visit_type_tree(arg, cursor))),
            name: e.name.clone(),
            args: visit_args(visitor, &e.args, cursor),
        }),
        Expr::FieldAccess(e) => Expr::FieldAccess(FieldAccess {
            id: e.id,
            fmt: e.fmt.clone(),
            target: child_boxed(visitor, &e.target, cursor),
            name: e.name.clone(),
        }),
        Expr::ArrayAccess(e) => Expr::ArrayAccess(ArrayAccess {
            id: e.id,
            fmt: e.fmt.clone(),
            array: child_boxed(visitor, &e.array, cursor),
            index: child_boxed(visitor, &e.index, cursor),
        }),
        Expr::NewClass(e) => Expr::NewClass(NewClass {
            id: e.id,
            fmt: e.fmt.clone(),
            ty: visitor.visit_type_tree(&e.ty, cursor),
            args: visit_args(visitor, &e.args, cursor),
            body: e
                .body
                .as_ref()
                .map(|body| visitor.visit_class_body(body, cursor)),
        }),
        Expr::NewArray(e) => Expr::NewArray(NewArray {
            id: e.id,
            fmt: e.fmt.clone(),
            elem: visitor.visit_type_tree(&e.elem, cursor),
            dims: e
                .dims
                .iter()
                .map(|dim| ArrayDimension {
                    before: dim.before.clone(),
                    size: dim.size.as_ref().map(|s| child_boxed(visitor, s, cursor)),
                    empty: dim.empty.clone(),
                })
                .collect(),
            init: e.init.as_ref().map(|init| walk_array_init(visitor, init, cursor)),
        }),
        Expr::ArrayInit(e) => Expr::ArrayInit(walk_array_init(visitor, e, cursor)),
        Expr::Lambda(e) => Expr::Lambda(Lambda {
            id: e.id,
            fmt: e.fmt.clone(),
            params: LambdaParams {
                parenthesized: e.params.parenthesized,
                params: e.params.params.map(|param| {
                    let child = cursor.push(NodeRef::LambdaParam(param));
                    visitor.visit_lambda_param(param, &child)
                }),
            },
            arrow_prefix: e.arrow_prefix.clone(),
            body: match &e.body {
                LambdaBody::Expr(body) => LambdaBody::Expr(child_boxed(visitor, body, cursor)),
                LambdaBody::Block(body) => LambdaBody::Block(child_block(visitor, body, cursor)),
            },
        }),
        Expr::MemberRef(e) => Expr::MemberRef(MemberRef {
            id: e.id,
            fmt: e.fmt.clone(),
            target: child_boxed(visitor, &e.target, cursor),
            name: e.name.clone(),
        }),
    }
}

fn walk_array_init<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    init: &'a ArrayInit,
    cursor: &Cursor<'a>,
) -> ArrayInit {
    ArrayInit {
        id: init.id,
        fmt: init.fmt.clone(),
        elems: init
            .elems
            .iter()
            .map(|elem| child_expr(visitor, elem, cursor))
            .collect(),
        trailing_comma: init.trailing_comma,
        end: init.end.clone(),
    }
}

pub fn walk_lambda_param<'a, V: JavaVisitor + ?Sized>(
    visitor: &mut V,
    param: &'a LambdaParam,
    cursor: &Cursor<'a>,
) -> LambdaParam {
    LambdaParam {
        id: param.id,
        fmt: param.fmt.clone(),
        ty: param.ty.as_ref().map(|ty| visitor.visit_type_tree(ty, cursor)),
        name: param.name.clone(),
    }
}
