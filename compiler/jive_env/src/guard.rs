//! RAII scope guards for environment contexts.
//!
//! A [`ScopedContext`] pushes a frame when created and pops it when dropped,
//! including during unwinding, so every `enter_scope` is matched by a
//! `leave_scope` on every exit path. A submission boundary relies on this:
//! no inner frame is still open when it reverts.
//!
//! ```text
//! context.with_scope(|scoped| {
//!     scoped.define(name, value)?;
//!     scoped.resolve_identifier(other, span)
//! })
//! ```

use std::ops::{Deref, DerefMut};

use jive_ir::Name;

use crate::EnvironmentContext;

/// Guard giving access to a context with one extra frame pushed.
pub struct ScopedContext<'guard, V> {
    context: &'guard mut EnvironmentContext<V>,
}

impl<V> Drop for ScopedContext<'_, V> {
    fn drop(&mut self) {
        if let Err(err) = self.context.leave_scope() {
            tracing::error!(%err, "scope guard could not pop its frame");
        }
    }
}

impl<V> Deref for ScopedContext<'_, V> {
    type Target = EnvironmentContext<V>;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl<V> DerefMut for ScopedContext<'_, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl<V> EnvironmentContext<V> {
    /// Push a frame that is popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedContext<'_, V> {
        self.enter_scope();
        ScopedContext { context: self }
    }

    /// Like [`Self::scoped`], with `names` forward-declared in the new frame.
    pub fn scoped_with(&mut self, names: impl IntoIterator<Item = Name>) -> ScopedContext<'_, V> {
        self.enter_scope_with(names);
        ScopedContext { context: self }
    }

    /// Run `f` inside a fresh frame.
    pub fn with_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedContext<'_, V>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }
}
