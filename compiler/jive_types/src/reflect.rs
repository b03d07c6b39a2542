//! Member lookup over the type universe.
//!
//! Lookup is purely structural: it finds the member a name (and argument
//! types) denotes, searching supertypes, but it never decides accessibility.
//! Private members are not inherited: a subtype never sees them, and a
//! private declaration hides same-named members of its own supertypes.

use jive_ir::{Access, CtorRef, FieldRef, MethodRef, Modifiers, Name, Ty, TypeId};
use rustc_hash::FxHashSet;

use crate::subtype::{is_assignable, most_specific};
use crate::{LookupError, TypeUniverse};

/// Narrow reflective view of compiled types.
pub trait Reflection {
    /// Field named `name` declared in `ty` or inherited by it.
    fn field(&self, ty: TypeId, name: Name) -> Result<FieldRef, LookupError>;

    /// Most specific method applicable to arguments of types `args`.
    fn method(&self, ty: TypeId, name: Name, args: &[Ty]) -> Result<MethodRef, LookupError>;

    /// Most specific constructor of `ty` applicable to `args`.
    fn ctor(&self, ty: TypeId, args: &[Ty]) -> Result<CtorRef, LookupError>;

    /// Member type named `name` declared in `ty` or inherited by it.
    fn member_type(&self, ty: TypeId, name: Name) -> Result<TypeId, LookupError>;
}

/// Merge results found through several supertypes.
///
/// The same member reached twice (diamond through interfaces) is one hit.
fn merge<T: Copy + Eq + std::hash::Hash>(
    results: impl Iterator<Item = Result<T, LookupError>>,
) -> Result<T, LookupError> {
    let mut hits = FxHashSet::default();
    let mut ordered = Vec::new();
    for result in results {
        match result {
            Ok(hit) => {
                if hits.insert(hit) {
                    ordered.push(hit);
                }
            }
            Err(LookupError::NotFound) => {}
            Err(err @ LookupError::Ambiguous { .. }) => return Err(err),
        }
    }
    match ordered.as_slice() {
        [] => Err(LookupError::NotFound),
        [single] => Ok(*single),
        many => Err(LookupError::Ambiguous {
            candidates: many.len(),
        }),
    }
}

impl Reflection for TypeUniverse {
    fn field(&self, ty: TypeId, name: Name) -> Result<FieldRef, LookupError> {
        self.find_field(ty, name, false)
    }

    fn method(&self, ty: TypeId, name: Name, args: &[Ty]) -> Result<MethodRef, LookupError> {
        let candidates = self.method_candidates(ty, name, args.len());
        let applicable: Vec<(MethodRef, &[Ty])> = candidates
            .into_iter()
            .map(|m| (m, self.method_info(m).params.as_slice()))
            .filter(|(_, params)| applies(self, params, args))
            .collect();
        most_specific(self, &applicable)
    }

    fn ctor(&self, ty: TypeId, args: &[Ty]) -> Result<CtorRef, LookupError> {
        let applicable: Vec<(CtorRef, &[Ty])> = self
            .get(ty)
            .ctors
            .iter()
            .enumerate()
            .filter(|(_, c)| applies(self, &c.params, args))
            .map(|(index, c)| {
                let ctor = CtorRef {
                    owner: ty,
                    index: u32::try_from(index).unwrap_or(u32::MAX),
                };
                (ctor, c.params.as_slice())
            })
            .collect();
        most_specific(self, &applicable)
    }

    fn member_type(&self, ty: TypeId, name: Name) -> Result<TypeId, LookupError> {
        self.find_member_type(ty, name, false)
    }
}

fn is_private(modifiers: Modifiers) -> bool {
    modifiers.access() == Access::Private
}

fn applies(universe: &TypeUniverse, params: &[Ty], args: &[Ty]) -> bool {
    params.len() == args.len()
        && args
            .iter()
            .zip(params)
            .all(|(arg, param)| is_assignable(universe, arg, param))
}

impl TypeUniverse {
    /// Field `name` of `ty`. When `inherited`, `ty` is a proper supertype of
    /// the type asking, and a private declaration ends the search.
    fn find_field(&self, ty: TypeId, name: Name, inherited: bool) -> Result<FieldRef, LookupError> {
        let info = self.get(ty);
        if let Some(index) = info.fields.iter().position(|f| f.name == name) {
            if inherited && is_private(info.fields[index].modifiers) {
                return Err(LookupError::NotFound);
            }
            return Ok(FieldRef {
                owner: ty,
                index: u32::try_from(index).unwrap_or(u32::MAX),
            });
        }
        merge(self.supertypes(ty).map(|sup| self.find_field(sup, name, true)))
    }

    fn find_member_type(
        &self,
        ty: TypeId,
        name: Name,
        inherited: bool,
    ) -> Result<TypeId, LookupError> {
        let info = self.get(ty);
        if let Some(&found) = info
            .member_types
            .iter()
            .find(|&&t| self.get(t).name == name)
        {
            if inherited && is_private(self.get(found).modifiers) {
                return Err(LookupError::NotFound);
            }
            return Ok(found);
        }
        merge(self.supertypes(ty).map(|sup| self.find_member_type(sup, name, true)))
    }

    /// Methods named `name` with `arity` parameters visible in `ty`, most
    /// derived first. A method overridden by an earlier one is dropped.
    fn method_candidates(&self, ty: TypeId, name: Name, arity: usize) -> Vec<MethodRef> {
        let mut found: Vec<MethodRef> = Vec::new();
        let mut visited = FxHashSet::default();
        let mut queue = std::collections::VecDeque::from([ty]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            for (index, method) in self.get(current).methods.iter().enumerate() {
                if method.name != name || method.params.len() != arity {
                    continue;
                }
                if current != ty && is_private(method.modifiers) {
                    continue;
                }
                let overridden = found
                    .iter()
                    .any(|&m| self.method_info(m).params == method.params);
                if !overridden {
                    found.push(MethodRef {
                        owner: current,
                        index: u32::try_from(index).unwrap_or(u32::MAX),
                    });
                }
            }
            queue.extend(self.supertypes(current));
        }
        found
    }
}

#[cfg(test)]
mod tests;
