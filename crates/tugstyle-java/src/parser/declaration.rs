// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compilation units, type declarations, members, variables and types.

use super::{is_keyword, Parser, Result};
use crate::nodes::*;
use crate::tokenizer::TokType;

pub(crate) fn is_primitive_name(name: &str) -> bool {
    matches!(
        name,
        "boolean" | "byte" | "char" | "short" | "int" | "long" | "float" | "double" | "void"
    )
}

impl Parser<'_> {
    pub(crate) fn compilation_unit(&mut self) -> Result<CompilationUnit> {
        let prefix = self.take_prefix();
        let package = if self.at_package() {
            Some(self.package()?)
        } else {
            None
        };
        let mut imports = Vec::new();
        while self.at("import") {
            imports.push(self.import()?);
        }
        let mut types = Vec::new();
        while !self.at_eof() {
            types.push(self.class_decl()?);
        }
        let eof = self.take_prefix();
        Ok(CompilationUnit {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            package,
            imports,
            types,
            eof,
        })
    }

    fn at_package(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let found = self.modifiers().is_ok() && self.at("package");
        self.restore(checkpoint);
        found
    }

    fn package(&mut self) -> Result<Package> {
        let prefix = self.take_prefix();
        let mut annotations = self.modifiers()?;
        let keyword_gap = self.expect("package")?;
        if let Some(last) = annotations.last_mut() {
            last.fmt.suffix = keyword_gap;
        }
        let name = self.qualified_name()?;
        let suffix = self.expect(";")?;
        Ok(Package {
            id: NodeId::fresh(),
            fmt: Formatting::new(prefix, suffix),
            annotations,
            name,
        })
    }

    fn import(&mut self) -> Result<Import> {
        let prefix = self.take_prefix();
        self.expect("import")?;
        let static_prefix = self.eat("static");
        let name = self.qualified_name()?;
        let suffix = self.expect(";")?;
        Ok(Import {
            id: NodeId::fresh(),
            fmt: Formatting::new(prefix, suffix),
            static_prefix,
            name,
        })
    }

    /// `a.b.c` or `a.b.*`, kept as one identifier.
    fn qualified_name(&mut self) -> Result<Ident> {
        if !self.at_word() {
            return Err(self.error("name"));
        }
        let prefix = self.take_prefix();
        let start = self.position();
        self.bump();
        while self.at(".") && (self.peek_at(1).kind == TokType::Word || self.peek_at(1).is("*")) {
            self.bump();
            self.bump();
        }
        Ok(Ident::new(self.text_since(start), Formatting::prefixed(prefix)))
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    pub(crate) fn type_tree(&mut self) -> Result<TypeTree> {
        let mut ty = self.type_tree_no_dims()?;
        ty.dims = self.dimensions();
        Ok(ty)
    }

    pub(crate) fn type_tree_no_dims(&mut self) -> Result<TypeTree> {
        if self.at("?") {
            let prefix = self.take_prefix();
            self.bump();
            let bound = if self.at("extends") || self.at("super") {
                let (tok, before) = self.bump();
                let kind = if tok.text == "extends" {
                    BoundKind::Extends
                } else {
                    BoundKind::Super
                };
                Some(WildcardBound {
                    before,
                    kind,
                    ty: Box::new(self.type_tree()?),
                })
            } else {
                None
            };
            let mut ty = TypeTree::named("?", Formatting::prefixed(prefix));
            ty.bound = bound;
            return Ok(ty);
        }
        if !self.at_word() || (is_keyword(self.peek().text) && !is_primitive_name(self.peek().text)) {
            return Err(self.error("type"));
        }
        let prefix = self.take_prefix();
        let start = self.position();
        self.bump();
        while self.at(".") && self.at_identifier_at(1) {
            self.bump();
            self.bump();
        }
        let mut ty = TypeTree::named(self.text_since(start), Formatting::prefixed(prefix));
        if self.at("<") {
            ty.type_args = Some(self.type_args()?);
        }
        Ok(ty)
    }

    pub(crate) fn type_args(&mut self) -> Result<Container<TypeTree>> {
        self.container("<", ">", |p| p.type_tree(), |t| &mut t.fmt.suffix)
    }

    pub(crate) fn dimensions(&mut self) -> Vec<Dimension> {
        let mut dims = Vec::new();
        while self.at("[") && self.peek_at(1).is("]") {
            let (_, before) = self.bump();
            let (_, inner) = self.bump();
            dims.push(Dimension { before, inner });
        }
        dims
    }

    fn type_params(&mut self) -> Result<Container<TypeParam>> {
        self.container("<", ">", |p| p.type_param(), |t| &mut t.fmt.suffix)
    }

    fn type_param(&mut self) -> Result<TypeParam> {
        let prefix = self.take_prefix();
        let name = self.ident()?;
        let bounds = match self.eat("extends") {
            Some(before) => Some((before, self.type_sequence("&")?)),
            None => None,
        };
        Ok(TypeParam {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            name,
            bounds,
        })
    }

    /// Types separated by `separator`; each type's suffix holds the trivia
    /// before the separator that follows it.
    fn type_sequence(&mut self, separator: &str) -> Result<Vec<TypeTree>> {
        let mut types = Vec::new();
        loop {
            let mut ty = self.type_tree()?;
            match self.eat(separator) {
                Some(gap) => {
                    ty.fmt.suffix = gap;
                    types.push(ty);
                }
                None => {
                    types.push(ty);
                    return Ok(types);
                }
            }
        }
    }

    fn type_list(&mut self, keyword: &str) -> Result<TypeList> {
        let before = self.expect(keyword)?;
        Ok(TypeList {
            before,
            types: self.type_sequence(",")?,
        })
    }

    // ------------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------------

    fn peek_modifier(&self) -> Option<ModifierKind> {
        let tok = self.peek();
        if tok.kind != TokType::Word {
            return None;
        }
        let next = self.peek_at(1);
        match tok.text {
            "synchronized" if next.is("(") => None,
            "default" if next.is(":") => None,
            "static" if next.is("{") => None,
            text => ModifierKind::from_keyword(text),
        }
    }

    pub(crate) fn at_modifier(&self) -> bool {
        (self.at("@") && !self.peek_at(1).is("interface")) || self.peek_modifier().is_some()
    }

    pub(crate) fn modifiers(&mut self) -> Result<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            if self.at("@") && !self.peek_at(1).is("interface") {
                modifiers.push(self.annotation()?);
            } else if let Some(kind) = self.peek_modifier() {
                let (_, prefix) = self.bump();
                modifiers.push(Modifier::new(kind, Formatting::prefixed(prefix)));
            } else {
                return Ok(modifiers);
            }
        }
    }

    /// An annotation, kept verbatim through its argument list.
    fn annotation(&mut self) -> Result<Modifier> {
        let start = self.position();
        let (_, prefix) = self.bump();
        if !self.at_word() {
            return Err(self.error("annotation name"));
        }
        self.bump();
        while self.at(".") && self.peek_at(1).kind == TokType::Word {
            self.bump();
            self.bump();
        }
        if self.at("(") {
            let close = self.matching_close(0).ok_or_else(|| self.error("')'"))?;
            for _ in 0..=close {
                self.bump();
            }
        }
        Ok(Modifier::new(
            ModifierKind::Annotation(self.text_since(start)),
            Formatting::prefixed(prefix),
        ))
    }

    // ------------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------------

    pub(crate) fn at_class_keyword(&self) -> bool {
        self.at("class")
            || self.at("interface")
            || self.at("enum")
            || (self.at("@") && self.peek_at(1).is("interface"))
    }

    fn class_decl(&mut self) -> Result<ClassDecl> {
        let prefix = self.take_prefix();
        let modifiers = self.modifiers()?;
        self.class_decl_after(prefix, modifiers)
    }

    pub(crate) fn class_decl_after(
        &mut self,
        prefix: String,
        modifiers: Vec<Modifier>,
    ) -> Result<ClassDecl> {
        let (kind, kind_prefix) = if self.at("@") && self.peek_at(1).is("interface") {
            let (_, kind_prefix) = self.bump();
            self.bump();
            (ClassKind::Annotation, kind_prefix)
        } else {
            let kind = match self.peek().text {
                "class" => ClassKind::Class,
                "interface" => ClassKind::Interface,
                "enum" => ClassKind::Enum,
                _ => return Err(self.error("class, interface or enum")),
            };
            (kind, self.bump().1)
        };
        let name = self.ident()?;
        let type_params = if self.at("<") {
            Some(self.type_params()?)
        } else {
            None
        };
        let extends = if self.at("extends") {
            Some(self.type_list("extends")?)
        } else {
            None
        };
        let implements = if self.at("implements") {
            Some(self.type_list("implements")?)
        } else {
            None
        };
        let body = self.class_body(kind == ClassKind::Enum)?;
        Ok(ClassDecl {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            modifiers,
            kind_prefix,
            kind,
            name,
            type_params,
            extends,
            implements,
            body,
        })
    }

    pub(crate) fn class_body(&mut self, is_enum: bool) -> Result<ClassBody> {
        let prefix = self.take_prefix();
        self.expect("{")?;
        let enum_constants = if is_enum {
            Some(self.enum_constants()?)
        } else {
            None
        };
        let mut members = Vec::new();
        loop {
            if let Some(end) = self.eat("}") {
                return Ok(ClassBody {
                    id: NodeId::fresh(),
                    fmt: Formatting::prefixed(prefix),
                    enum_constants,
                    members,
                    end,
                });
            }
            if self.at_eof() {
                return Err(self.error("'}'"));
            }
            members.push(self.member()?);
        }
    }

    fn enum_constants(&mut self) -> Result<EnumConstants> {
        let mut constants = Vec::new();
        let mut trailing_comma = false;
        let mut semicolon = None;
        loop {
            if let Some(gap) = self.eat(";") {
                semicolon = Some(gap);
                break;
            }
            if self.at("}") {
                break;
            }
            let mut constant = self.enum_constant()?;
            if let Some(gap) = self.eat(",") {
                constant.fmt.suffix = gap;
                constants.push(constant);
                trailing_comma = true;
            } else {
                constants.push(constant);
                trailing_comma = false;
                semicolon = self.eat(";");
                break;
            }
        }
        Ok(EnumConstants {
            constants,
            trailing_comma,
            semicolon,
        })
    }

    fn enum_constant(&mut self) -> Result<EnumConstant> {
        let prefix = self.take_prefix();
        let modifiers = self.modifiers()?;
        let name = self.ident()?;
        let args = if self.at("(") {
            Some(self.arguments()?)
        } else {
            None
        };
        let body = if self.at("{") {
            Some(self.class_body(false)?)
        } else {
            None
        };
        Ok(EnumConstant {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            modifiers,
            name,
            args,
            body,
        })
    }

    fn member(&mut self) -> Result<Member> {
        if self.at(";") {
            let empty = self.empty_node();
            self.bump();
            return Ok(Member::Empty(empty));
        }
        if self.at("{") {
            return Ok(Member::Initializer(self.block()?));
        }
        if self.at("static") && self.peek_at(1).is("{") {
            let prefix = self.take_prefix();
            self.bump();
            let brace = self.expect("{")?;
            return Ok(Member::Initializer(self.block_rest(prefix, Some(brace))?));
        }

        let prefix = self.take_prefix();
        let modifiers = self.modifiers()?;
        if self.at_class_keyword() {
            return Ok(Member::Class(self.class_decl_after(prefix, modifiers)?));
        }
        let type_params = if self.at("<") {
            Some(self.type_params()?)
        } else {
            None
        };
        if self.at_word() && self.peek_at(1).is("(") {
            return Ok(Member::Method(self.method_rest(prefix, modifiers, type_params, None)?));
        }
        let ty = self.type_tree()?;
        if self.at_word() && self.peek_at(1).is("(") {
            return Ok(Member::Method(self.method_rest(
                prefix,
                modifiers,
                type_params,
                Some(ty),
            )?));
        }
        let mut field = self.var_decls_with_type(prefix, modifiers, ty, false)?;
        field.fmt.suffix = self.expect(";")?;
        Ok(Member::Field(field))
    }

    fn method_rest(
        &mut self,
        prefix: String,
        modifiers: Vec<Modifier>,
        type_params: Option<Container<TypeParam>>,
        return_type: Option<TypeTree>,
    ) -> Result<MethodDecl> {
        let name = self.ident()?;
        let params = self.container("(", ")", |p| p.parameter(), |d| &mut d.fmt.suffix)?;
        let throws = if self.at("throws") {
            Some(self.type_list("throws")?)
        } else {
            None
        };
        let default_value = match self.eat("default") {
            Some(before) => Some((before, self.variable_initializer()?)),
            None => None,
        };
        let (body, suffix) = if self.at("{") {
            (Some(self.block()?), String::new())
        } else {
            (None, self.expect(";")?)
        };
        Ok(MethodDecl {
            id: NodeId::fresh(),
            fmt: Formatting::new(prefix, suffix),
            modifiers,
            type_params,
            return_type,
            name,
            params,
            throws,
            default_value,
            body,
        })
    }

    fn parameter(&mut self) -> Result<VarDecls> {
        let prefix = self.take_prefix();
        let modifiers = self.modifiers()?;
        self.var_decls_after(prefix, modifiers, true)
    }

    // ------------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------------

    /// Type and declarators; `prefix` and `modifiers` were parsed by the caller.
    pub(crate) fn var_decls_after(
        &mut self,
        prefix: String,
        modifiers: Vec<Modifier>,
        single: bool,
    ) -> Result<VarDecls> {
        let ty = self.type_tree()?;
        self.var_decls_with_type(prefix, modifiers, ty, single)
    }

    pub(crate) fn var_decls_with_type(
        &mut self,
        prefix: String,
        modifiers: Vec<Modifier>,
        ty: TypeTree,
        single: bool,
    ) -> Result<VarDecls> {
        let varargs = self.eat("...");
        let mut vars = Vec::new();
        loop {
            let mut var = self.named_var()?;
            if !single && self.at(",") {
                var.fmt.suffix = self.expect(",")?;
                vars.push(var);
            } else {
                vars.push(var);
                break;
            }
        }
        Ok(VarDecls {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            modifiers,
            ty,
            varargs,
            vars,
        })
    }

    pub(crate) fn named_var(&mut self) -> Result<NamedVar> {
        if !self.at_word() {
            return Err(self.error("variable name"));
        }
        let prefix = self.take_prefix();
        let (tok, _) = self.bump();
        let name = Ident::new(tok.text, Formatting::default());
        let dims = self.dimensions();
        let init = match self.eat("=") {
            Some(eq_prefix) => Some(VarInit {
                eq_prefix,
                expr: self.variable_initializer()?,
            }),
            None => None,
        };
        Ok(NamedVar {
            id: NodeId::fresh(),
            fmt: Formatting::prefixed(prefix),
            name,
            dims,
            init,
        })
    }

    /// The current position starts `Type name` followed by a declarator tail.
    pub(crate) fn at_local_var_decl(&mut self) -> bool {
        if !self.at_word() {
            return false;
        }
        let checkpoint = self.checkpoint();
        let found = self.type_tree().is_ok() && self.at_identifier_at(0) && {
            let next = self.peek_at(1);
            next.is("=") || next.is(";") || next.is(",") || next.is("[") || next.is(":")
        };
        self.restore(checkpoint);
        found
    }
}
