//! Type declaration nodes.
//!
//! Handed to the class compiler, either as written by the user or as
//! synthesized by closure synthesis.

use crate::{Modifiers, Name, Span, Ty, TypeId};

use super::{Expr, Stmt};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeclKind {
    Class,
    Interface,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TypeDecl {
    /// Simple name.
    pub name: Name,
    pub kind: DeclKind,
    pub modifiers: Modifiers,
    /// Lexically enclosing type, for member and local types.
    pub outer: Option<TypeId>,
    pub superclass: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    pub members: Vec<MemberDecl>,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemberDecl {
    Field(FieldDecl),
    Method(MethodDecl),
    Ctor(CtorDecl),
    Type(TypeDecl),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: Ty,
    pub modifiers: Modifiers,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Param {
    pub name: Name,
    pub ty: Ty,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodDecl {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: Ty,
    pub modifiers: Modifiers,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CtorDecl {
    pub params: Vec<Param>,
    pub modifiers: Modifiers,
    pub body: Vec<Stmt>,
}

impl TypeDecl {
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn ctors(&self) -> impl Iterator<Item = &CtorDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Ctor(c) => Some(c),
            _ => None,
        })
    }
}
