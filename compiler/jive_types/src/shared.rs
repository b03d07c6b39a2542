//! Shared handle to a session's type universe.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::TypeUniverse;

/// Shared, mutable type universe.
///
/// Every context of a session reads through the same handle; the class
/// compiler writes newly loaded types through it. Guards must not be held
/// across a call into the compiler.
pub struct SharedUniverse(Arc<RwLock<TypeUniverse>>);

impl SharedUniverse {
    pub fn new(universe: TypeUniverse) -> Self {
        SharedUniverse(Arc::new(RwLock::new(universe)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TypeUniverse> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TypeUniverse> {
        self.0.write()
    }
}

impl Clone for SharedUniverse {
    fn clone(&self) -> Self {
        SharedUniverse(Arc::clone(&self.0))
    }
}

impl fmt::Debug for SharedUniverse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedUniverse({} types)", self.0.read().len())
    }
}
