//! Outcomes of type and member lookup.

use jive_ir::TypeId;

/// Member lookup failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("member not found")]
    NotFound,
    /// More than one member matches and none is more specific.
    #[error("ambiguous member: {candidates} candidates")]
    Ambiguous { candidates: usize },
}

/// Type-name resolution failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("type not found")]
    NotFound,
    /// The name belongs to a declaration still being defined in this batch.
    #[error("type is still being declared")]
    Pending(TypeId),
    /// The universe itself is inconsistent (a type failed to load).
    #[error("corrupt type universe: {0}")]
    Corrupt(String),
}
