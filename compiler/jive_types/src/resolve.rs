//! Type-name resolution.

use jive_ir::{Name, TypeId};

use crate::reflect::Reflection;
use crate::universe::DeclState;
use crate::{ResolveError, TypeUniverse};

/// Context-free or context-sensitive lookup of a type by name.
pub trait TypeResolver {
    /// Resolve `name` (simple, dotted, or fully qualified), optionally from
    /// inside the declaring type `context`.
    ///
    /// A pending declaration resolves to `ResolveError::Pending`; callers
    /// decide whether that counts as existing.
    fn resolve(&self, name: Name, context: Option<TypeId>) -> Result<TypeId, ResolveError>;
}

impl TypeResolver for TypeUniverse {
    fn resolve(&self, name: Name, context: Option<TypeId>) -> Result<TypeId, ResolveError> {
        let found = self.find(name, context).ok_or(ResolveError::NotFound)?;
        match &self.get(found).state {
            DeclState::Finalized => Ok(found),
            DeclState::Pending => Err(ResolveError::Pending(found)),
            DeclState::Failed(reason) => Err(ResolveError::Corrupt(format!(
                "type `{}` failed to load: {reason}",
                self.display(found)
            ))),
        }
    }
}

impl TypeUniverse {
    fn find(&self, name: Name, context: Option<TypeId>) -> Option<TypeId> {
        let text = self.interner().lookup(name);

        if let Some((head, rest)) = text.split_once('.') {
            if let Some(id) = self.by_qualified(name) {
                return Some(id);
            }
            // `Outer.Inner` where `Outer` itself resolves from here. A segment
            // that was never interned names no type.
            let head = self.interner().get(head)?;
            let mut current = self.find(head, context)?;
            for segment in rest.split('.') {
                let segment = self.interner().get(segment)?;
                current = self.member_type(current, segment).ok()?;
            }
            return Some(current);
        }

        if let Some(context) = context {
            let hops = std::iter::once(context).chain(self.enclosing(context));
            for hop in hops {
                if let Ok(id) = self.member_type(hop, name) {
                    return Some(id);
                }
            }
            let package = self.get(context).package;
            if let Some(id) = self.in_package(package, text) {
                return Some(id);
            }
        }

        if let Some(id) = self.by_qualified(name) {
            return Some(id);
        }

        self.imports()
            .iter()
            .find_map(|&package| self.in_package(package, text))
    }

    fn in_package(&self, package: Name, simple: &str) -> Option<TypeId> {
        if package.is_empty() {
            return None;
        }
        let package = self.interner().lookup(package);
        let qualified = self.interner().get(&format!("{package}.{simple}"))?;
        self.by_qualified(qualified)
    }
}
