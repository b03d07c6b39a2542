//! Errors reported by the resolution engine.
//!
//! Every variant except [`EnvError::Fatal`] is a user-level error: it is
//! reported, and the enclosing submission is reverted. `Fatal` means the
//! engine or its collaborators broke an invariant; it must propagate.

use std::fmt;

use jive_ir::TypeId;
use jive_types::{TypeInfo, TypeUniverse};

/// Result of an engine operation.
pub type EnvResult<T> = Result<T, EnvError>;

/// What an undefined name was expected to denote.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UndefinedKind {
    Identifier,
    Variable,
    Field,
    Method,
    Constructor,
    Class,
    Function,
}

impl fmt::Display for UndefinedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Identifier => "identifier",
            Self::Variable => "variable",
            Self::Field => "field",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Class => "class",
            Self::Function => "function",
        };
        f.write_str(word)
    }
}

/// Failure reported by the class compiler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        CompileError {
            message: message.into(),
        }
    }
}

/// Broken engine invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FatalError {
    #[error("scope stack imbalance: {0}")]
    StackImbalance(String),
    #[error("type universe misconfigured: {0}")]
    CorruptUniverse(String),
}

/// Description of `ty`, or a fatal error when the universe does not know it.
pub(crate) fn registered(universe: &TypeUniverse, ty: TypeId) -> Result<&TypeInfo, FatalError> {
    universe
        .try_get(ty)
        .ok_or_else(|| FatalError::CorruptUniverse(format!("unknown type handle {ty:?}")))
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    #[error("undefined {kind}: {name}")]
    Undefined { kind: UndefinedKind, name: String },

    #[error("`{name}` is already defined in this scope")]
    AlreadyDefined { name: String },

    #[error("reference to `{name}` is ambiguous in `{owner}`")]
    AmbiguousMember { name: String, owner: String },

    #[error("`{member}` is not accessible from {from}")]
    Inaccessible { member: String, from: String },

    #[error("`{name}` is declared but not initialized")]
    Uninitialized { name: String },

    #[error("non-static `{name}` cannot be referenced from a static context")]
    StaticContext { name: String },

    #[error("no enclosing instance of `{ty}` is in scope")]
    NoEnclosingInstance { ty: String },

    #[error("type `{name}` is still being declared")]
    PendingType { name: String },

    #[error("{operation} is not supported in a {flavor} context")]
    Unsupported {
        operation: &'static str,
        flavor: &'static str,
    },

    #[error("cannot synthesize `{ty}`: {source}")]
    SynthesisFailure {
        ty: String,
        #[source]
        source: CompileError,
    },

    #[error("internal error: {0}")]
    Fatal(#[from] FatalError),
}

impl EnvError {
    pub fn undefined(kind: UndefinedKind, name: impl Into<String>) -> Self {
        EnvError::Undefined {
            kind,
            name: name.into(),
        }
    }

    /// Whether this error indicates an engine bug rather than a user error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EnvError::Fatal(_))
    }
}
