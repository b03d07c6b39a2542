//! Subtyping, assignability and overload specificity.

use jive_ir::{Ty, TypeId};

use crate::{LookupError, TypeUniverse};

/// Whether `sub` is `sup` or inherits from it (every type inherits `Object`).
pub fn is_subtype(universe: &TypeUniverse, sub: TypeId, sup: TypeId) -> bool {
    if sub == sup || sup == universe.core().object {
        return true;
    }
    universe
        .supertypes(sub)
        .any(|parent| is_subtype(universe, parent, sup))
}

/// Whether a value of static type `from` may be passed where `to` is expected.
pub fn is_assignable(universe: &TypeUniverse, from: &Ty, to: &Ty) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (Ty::Prim(a), Ty::Prim(b)) => a.widens_to(*b),
        (Ty::Null, to) => to.is_reference(),
        (Ty::Ref(a), Ty::Ref(b)) => is_subtype(universe, *a, *b),
        (Ty::Array(_), Ty::Ref(b)) => *b == universe.core().object,
        (Ty::Array(a), Ty::Array(b)) => {
            a.is_reference() && b.is_reference() && is_assignable(universe, a, b)
        }
        _ => false,
    }
}

/// Pick the most specific of the applicable candidates.
///
/// A candidate is most specific when its parameters are assignable to the
/// parameters of every other candidate. No candidate is `NotFound`; several
/// equally specific candidates are `Ambiguous`.
pub fn most_specific<T: Copy>(
    universe: &TypeUniverse,
    applicable: &[(T, &[Ty])],
) -> Result<T, LookupError> {
    if applicable.is_empty() {
        return Err(LookupError::NotFound);
    }
    let mut winners = applicable.iter().filter(|(_, params)| {
        applicable.iter().all(|(_, other)| {
            params
                .iter()
                .zip(other.iter())
                .all(|(p, o)| is_assignable(universe, p, o))
        })
    });
    match (winners.next(), winners.next()) {
        (Some((winner, _)), None) => Ok(*winner),
        _ => Err(LookupError::Ambiguous {
            candidates: applicable.len(),
        }),
    }
}

#[cfg(test)]
mod tests;
