//! Tree nodes annotated and rewritten by name resolution.

mod decl;
mod expr;

pub use decl::{CtorDecl, DeclKind, FieldDecl, MemberDecl, MethodDecl, Param, TypeDecl};
pub use expr::{Allocation, Dispatch, Expr, ExprKind, FunctionId, Literal, Stmt};
