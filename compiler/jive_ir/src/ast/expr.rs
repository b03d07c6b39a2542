//! Expression and statement nodes.
//!
//! The front end produces the unresolved forms (`Ident`, `Call`,
//! `AnonymousNew`); name resolution rewrites them into the resolved forms the
//! tree walker evaluates directly.

use crate::{CtorRef, FieldRef, MethodRef, Name, Span, Ty, TypeId};

use super::MemberDecl;

/// Identifies a free function in the global function table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FunctionId(pub u32);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// A node for engine-generated code.
    #[inline]
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::DUMMY,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Str(Name),
}

/// How a resolved method call reaches its target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Dispatch {
    /// Ordinary virtual dispatch on the receiver.
    Virtual,
    /// Static method; the receiver is a `TypeName`.
    Static,
    /// Method promoted from an enclosing type; the receiver is an explicit
    /// outer-instance (or outer-type) chain and must not be re-dispatched
    /// through the inner receiver.
    Outer,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExprKind {
    Literal(Literal),

    /// Unresolved simple name.
    Ident(Name),

    /// Reference to a binding of the lexical scope chain.
    Local(Name),

    /// The current instance of the given type.
    This(TypeId),

    /// The enclosing instance of `inner`, whose type is `outer`.
    ///
    /// One node per enclosing-type hop; chains nest.
    OuterThis { inner: Box<Expr>, outer: TypeId },

    /// A type used as a qualifier.
    TypeName(TypeId),

    /// Static field, qualified by the type where lookup found it.
    StaticField { qualifier: TypeId, field: FieldRef },

    InstanceField { receiver: Box<Expr>, field: FieldRef },

    Assign { target: Box<Expr>, value: Box<Expr> },

    /// Unresolved call. `receiver` is `None` for an unqualified call.
    Call {
        receiver: Option<Box<Expr>>,
        name: Name,
        args: Vec<Expr>,
    },

    MethodCall {
        receiver: Box<Expr>,
        method: MethodRef,
        dispatch: Dispatch,
        args: Vec<Expr>,
    },

    /// Call of a user-declared free function.
    FunctionCall { function: FunctionId, args: Vec<Expr> },

    /// Allocation of a declared type. `ctor` is filled in by resolution.
    New {
        ty: TypeId,
        ctor: Option<CtorRef>,
        args: Vec<Expr>,
    },

    /// Allocation of a local or anonymous type, before synthesis.
    AnonymousNew(Box<Allocation>),

    /// Snapshot of the named captured bindings, taken at the allocation.
    CapturedLocals(Vec<Name>),

    ArrayLiteral { elem: Ty, items: Vec<Expr> },
}

/// A local/anonymous allocation: `new Target(args) { members }`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Allocation {
    /// Class to extend or interface to implement.
    pub target: TypeId,
    pub args: Vec<Expr>,
    /// Static types of `args`, in order.
    pub arg_types: Vec<Ty>,
    pub members: Vec<MemberDecl>,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Stmt {
    Expr(Expr),
    /// Explicit superclass constructor invocation.
    SuperCall { args: Vec<Expr> },
    Return(Option<Expr>),
}
