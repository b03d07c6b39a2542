//! Jive IR - shared vocabulary of the Jive interpreter crates.
//!
//! - Interned names (`Name`, `StringInterner`, `SharedInterner`)
//! - Source spans
//! - Type handles (`TypeId`) and static types (`Ty`, `Prim`)
//! - Member handles and modifiers
//! - Expression, statement and declaration nodes
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and qualified type names become `Name(u32)`
//! - **Handles, not pointers**: types and members are referenced by id; the
//!   type universe owns their descriptions

pub mod ast;
mod interner;
mod member;
mod name;
mod span;
mod type_id;

pub use ast::{
    Allocation, CtorDecl, DeclKind, Dispatch, Expr, ExprKind, FieldDecl, FunctionId, Literal,
    MemberDecl, MethodDecl, Param, Stmt, TypeDecl,
};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use member::{Access, CtorRef, FieldRef, MemberRef, MethodRef, Modifiers};
pub use name::Name;
pub use span::Span;
pub use type_id::{Prim, Ty, TypeId};
