//! Session configuration.

/// How member accessibility is decided.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Enforce the source language's access modifiers.
    #[default]
    Emulate,
    /// Every member is reachable (the interpreter's "accessible" mode).
    Unrestricted,
}

/// Options fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub access: AccessPolicy,
    /// Stem of synthesized type names; a counter is appended.
    pub synthetic_prefix: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            access: AccessPolicy::default(),
            synthetic_prefix: "Closure".to_owned(),
        }
    }
}
