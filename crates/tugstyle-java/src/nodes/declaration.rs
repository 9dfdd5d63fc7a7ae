// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Compilation units, type declarations, members, variables and types.

use super::expression::{Expr, Ident};
use super::statement::Block;
use super::traits::{Container, Formatting, NodeId};

// ============================================================================
// Types
// ============================================================================

/// `[]` after a type or a variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Whitespace before `[`.
    pub before: String,
    /// Whitespace between `[` and `]`.
    pub inner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

impl BoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundKind::Extends => "extends",
            BoundKind::Super => "super",
        }
    }
}

/// `extends T` / `super T` on a `?` wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardBound {
    pub before: String,
    pub kind: BoundKind,
    pub ty: Box<TypeTree>,
}

/// A type reference such as `int`, `java.util.List<String>[]` or `? extends T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTree {
    pub id: NodeId,
    pub fmt: Formatting,
    /// Source text of the (possibly qualified) name, or `?` for a wildcard.
    pub name: String,
    pub type_args: Option<Container<TypeTree>>,
    pub bound: Option<WildcardBound>,
    pub dims: Vec<Dimension>,
}

impl TypeTree {
    pub fn named(name: impl Into<String>, fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            name: name.into(),
            type_args: None,
            bound: None,
            dims: Vec::new(),
        }
    }

    /// The last segment of the name, without generics or dimensions.
    pub fn simple_name(&self) -> &str {
        let name = self.name.trim();
        match name.rfind('.') {
            Some(pos) => name[pos + 1..].trim(),
            None => name,
        }
    }

    pub fn is_array(&self) -> bool {
        !self.dims.is_empty()
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_array()
            && matches!(
                self.name.as_str(),
                "boolean" | "byte" | "char" | "short" | "int" | "long" | "float" | "double"
            )
    }

    pub fn is_void(&self) -> bool {
        self.name == "void"
    }
}

// ============================================================================
// Modifiers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    /// An annotation, kept verbatim from `@` through its arguments.
    Annotation(String),
}

impl ModifierKind {
    pub fn from_keyword(text: &str) -> Option<Self> {
        Some(match text {
            "public" => ModifierKind::Public,
            "protected" => ModifierKind::Protected,
            "private" => ModifierKind::Private,
            "static" => ModifierKind::Static,
            "final" => ModifierKind::Final,
            "abstract" => ModifierKind::Abstract,
            "native" => ModifierKind::Native,
            "synchronized" => ModifierKind::Synchronized,
            "transient" => ModifierKind::Transient,
            "volatile" => ModifierKind::Volatile,
            "strictfp" => ModifierKind::Strictfp,
            "default" => ModifierKind::Default,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            ModifierKind::Public => "public",
            ModifierKind::Protected => "protected",
            ModifierKind::Private => "private",
            ModifierKind::Static => "static",
            ModifierKind::Final => "final",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Native => "native",
            ModifierKind::Synchronized => "synchronized",
            ModifierKind::Transient => "transient",
            ModifierKind::Volatile => "volatile",
            ModifierKind::Strictfp => "strictfp",
            ModifierKind::Default => "default",
            ModifierKind::Annotation(text) => text,
        }
    }

    pub fn is_access(&self) -> bool {
        matches!(
            self,
            ModifierKind::Public | ModifierKind::Protected | ModifierKind::Private
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub id: NodeId,
    pub fmt: Formatting,
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn new(kind: ModifierKind, fmt: Formatting) -> Self {
        Self {
            id: NodeId::fresh(),
            fmt,
            kind,
        }
    }
}

/// Declared visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

/// Queries over a modifier list.
pub trait Modifiers {
    fn modifiers(&self) -> &[Modifier];

    fn has_modifier(&self, kind: &ModifierKind) -> bool {
        self.modifiers().iter().any(|m| &m.kind == kind)
    }

    fn is_static(&self) -> bool {
        self.has_modifier(&ModifierKind::Static)
    }

    fn is_final(&self) -> bool {
        self.has_modifier(&ModifierKind::Final)
    }

    fn is_abstract(&self) -> bool {
        self.has_modifier(&ModifierKind::Abstract)
    }

    fn visibility(&self) -> Visibility {
        for m in self.modifiers() {
            match m.kind {
                ModifierKind::Public => return Visibility::Public,
                ModifierKind::Protected => return Visibility::Protected,
                ModifierKind::Private => return Visibility::Private,
                _ => {}
            }
        }
        Visibility::Package
    }
}

/// Insert a keyword modifier after the leading annotations and access,
/// `static` or `abstract` keywords.
///
/// `next_prefix` is the prefix of the token that follows the modifier list.
/// When the list is empty that prefix is empty, because the declaration owns
/// the leading whitespace.
pub fn insert_modifier(modifiers: &mut Vec<Modifier>, kind: ModifierKind, next_prefix: &mut String) {
    let position = modifiers
        .iter()
        .position(|m| {
            !matches!(
                m.kind,
                ModifierKind::Annotation(_)
                    | ModifierKind::Public
                    | ModifierKind::Protected
                    | ModifierKind::Private
                    | ModifierKind::Static
                    | ModifierKind::Abstract
            )
        })
        .unwrap_or(modifiers.len());

    if position < modifiers.len() {
        let displaced = std::mem::replace(&mut modifiers[position].fmt.prefix, " ".to_string());
        modifiers.insert(position, Modifier::new(kind, Formatting::prefixed(displaced)));
    } else {
        let gap = std::mem::replace(next_prefix, " ".to_string());
        modifiers.push(Modifier::new(kind, Formatting::prefixed(gap)));
    }
}

// ============================================================================
// Variables
// ============================================================================

/// `= expr` after a variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarInit {
    /// Whitespace before `=`.
    pub eq_prefix: String,
    pub expr: Expr,
}

/// One declarator: `name[] = init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedVar {
    pub id: NodeId,
    pub fmt: Formatting,
    pub name: Ident,
    pub dims: Vec<Dimension>,
    pub init: Option<VarInit>,
}

/// A field, local variable, parameter, for-each variable, catch parameter or
/// resource declaration: modifiers, one type, one or more declarators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecls {
    pub id: NodeId,
    pub fmt: Formatting,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeTree,
    /// Whitespace before `...` on a varargs parameter.
    pub varargs: Option<String>,
    pub vars: Vec<NamedVar>,
}

impl Modifiers for VarDecls {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

impl VarDecls {
    /// Names of all declarators.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|v| v.name.name.as_str())
    }

    /// Add `final` (or another keyword), keeping the declaration's layout.
    pub fn add_modifier(&mut self, kind: ModifierKind) {
        insert_modifier(&mut self.modifiers, kind, &mut self.ty.fmt.prefix);
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub id: NodeId,
    pub fmt: Formatting,
    pub name: Ident,
    /// Whitespace before `extends` and the `&`-separated bounds.
    pub bounds: Option<(String, Vec<TypeTree>)>,
}

/// `throws A, B` or `extends A, B` / `implements A, B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeList {
    /// Whitespace before the keyword.
    pub before: String,
    pub types: Vec<TypeTree>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub id: NodeId,
    pub fmt: Formatting,
    pub modifiers: Vec<Modifier>,
    pub type_params: Option<Container<TypeParam>>,
    /// `None` for constructors.
    pub return_type: Option<TypeTree>,
    pub name: Ident,
    pub params: Container<VarDecls>,
    pub throws: Option<TypeList>,
    /// `default value` on annotation members: whitespace before `default`.
    pub default_value: Option<(String, Expr)>,
    /// `None` for abstract and native methods, which end in `;`.
    pub body: Option<Block>,
}

impl Modifiers for MethodDecl {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.elems.iter().flat_map(|p| p.names())
    }

    /// The prefix of the first token after the modifiers.
    pub fn after_modifiers_prefix_mut(&mut self) -> &mut String {
        if let Some(tp) = self.type_params.as_mut() {
            return &mut tp.before;
        }
        match self.return_type.as_mut() {
            Some(ty) => &mut ty.fmt.prefix,
            None => &mut self.name.fmt.prefix,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub id: NodeId,
    pub fmt: Formatting,
    pub modifiers: Vec<Modifier>,
    pub name: Ident,
    pub args: Option<Container<Expr>>,
    pub body: Option<ClassBody>,
}

/// The constant list at the top of an enum body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstants {
    pub constants: Vec<EnumConstant>,
    pub trailing_comma: bool,
    /// Whitespace before the `;` that ends the constant list, if present.
    pub semicolon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(VarDecls),
    Method(MethodDecl),
    Class(ClassDecl),
    Initializer(Block),
    /// A stray `;` between members.
    Empty(super::expression::Empty),
}

impl Member {
    pub fn id(&self) -> NodeId {
        match self {
            Member::Field(f) => f.id,
            Member::Method(m) => m.id,
            Member::Class(c) => c.id,
            Member::Initializer(b) => b.id,
            Member::Empty(e) => e.id,
        }
    }

    pub fn fmt(&self) -> &Formatting {
        match self {
            Member::Field(f) => &f.fmt,
            Member::Method(m) => &m.fmt,
            Member::Class(c) => &c.fmt,
            Member::Initializer(b) => &b.fmt,
            Member::Empty(e) => &e.fmt,
        }
    }

    pub fn fmt_mut(&mut self) -> &mut Formatting {
        match self {
            Member::Field(f) => &mut f.fmt,
            Member::Method(m) => &mut m.fmt,
            Member::Class(c) => &mut c.fmt,
            Member::Initializer(b) => &mut b.fmt,
            Member::Empty(e) => &mut e.fmt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBody {
    pub id: NodeId,
    /// Prefix is the whitespace before `{`.
    pub fmt: Formatting,
    pub enum_constants: Option<EnumConstants>,
    pub members: Vec<Member>,
    /// Whitespace before `}`.
    pub end: String,
}

impl ClassBody {
    pub fn fields(&self) -> impl Iterator<Item = &VarDecls> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods().filter(|m| m.is_constructor())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub id: NodeId,
    pub fmt: Formatting,
    pub modifiers: Vec<Modifier>,
    /// Whitespace before the `class`/`interface`/`enum` keyword.
    pub kind_prefix: String,
    pub kind: ClassKind,
    pub name: Ident,
    pub type_params: Option<Container<TypeParam>>,
    pub extends: Option<TypeList>,
    pub implements: Option<TypeList>,
    pub body: ClassBody,
}

impl Modifiers for ClassDecl {
    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

impl ClassDecl {
    /// Add a keyword modifier, keeping the declaration's layout.
    pub fn add_modifier(&mut self, kind: ModifierKind) {
        insert_modifier(&mut self.modifiers, kind, &mut self.kind_prefix);
    }
}

// ============================================================================
// Compilation unit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub id: NodeId,
    pub fmt: Formatting,
    pub annotations: Vec<Modifier>,
    /// Qualified name; its prefix is the whitespace after `package`.
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub id: NodeId,
    pub fmt: Formatting,
    /// Whitespace before `static` in a static import.
    pub static_prefix: Option<String>,
    /// Qualified name, possibly ending in `.*`.
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub fmt: Formatting,
    pub package: Option<Package>,
    pub imports: Vec<Import>,
    pub types: Vec<ClassDecl>,
    /// Whitespace and comments after the last declaration.
    pub eof: String,
}

impl CompilationUnit {
    /// All type declarations, including nested and local ones, in source order.
    pub fn all_classes(&self) -> Vec<&ClassDecl> {
        fn collect<'a>(class: &'a ClassDecl, out: &mut Vec<&'a ClassDecl>) {
            out.push(class);
            for member in &class.body.members {
                if let Member::Class(inner) = member {
                    collect(inner, out);
                }
            }
        }
        let mut out = Vec::new();
        for class in &self.types {
            collect(class, &mut out);
        }
        out
    }
}
