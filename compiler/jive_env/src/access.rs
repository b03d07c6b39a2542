//! Emulated source-level access control.
//!
//! [`reachable`] is a pure query over the type universe. Callers that act on
//! its answer do so through an [`AccessToken`], an explicit capability for
//! one `(member, requesting type)` pair, instead of flipping shared
//! accessibility state.

use jive_ir::{Access, MemberRef, Modifiers, Name, TypeId};
use jive_types::{is_subtype, TypeUniverse};

use crate::error::registered;
use crate::{AccessPolicy, FatalError};

/// Proof that `member` may be used from `from`.
///
/// `from == None` stands for top-level code, which lives in the default
/// package and is nested in no type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccessToken {
    member: MemberRef,
    from: Option<TypeId>,
}

impl AccessToken {
    pub fn member(self) -> MemberRef {
        self.member
    }

    /// Requesting type; `None` for top-level code.
    pub fn requester(self) -> Option<TypeId> {
        self.from
    }
}

/// Type that declares `member`, and the member's modifiers.
///
/// A top-level type is treated as declared by itself. A handle the universe
/// does not know is fatal.
pub fn declaring_site(
    universe: &TypeUniverse,
    member: MemberRef,
) -> Result<(TypeId, Modifiers), FatalError> {
    let owner = match member {
        MemberRef::Field(field) => field.owner,
        MemberRef::Method(method) => method.owner,
        MemberRef::Ctor(ctor) => ctor.owner,
        MemberRef::Type(ty) => ty,
    };
    let info = registered(universe, owner)?;
    let modifiers = match member {
        MemberRef::Field(field) => info.fields.get(field.index as usize).map(|f| f.modifiers),
        MemberRef::Method(method) => info.methods.get(method.index as usize).map(|m| m.modifiers),
        MemberRef::Ctor(ctor) => info.ctors.get(ctor.index as usize).map(|c| c.modifiers),
        MemberRef::Type(ty) => return Ok((info.outer.unwrap_or(ty), info.modifiers)),
    };
    modifiers
        .map(|modifiers| (owner, modifiers))
        .ok_or_else(|| FatalError::CorruptUniverse(format!("unknown member handle {member:?}")))
}

/// Whether `member` is reachable from code declared in `from`.
///
/// - public: always
/// - package: same package
/// - protected: same package, or `from` (or a type enclosing it) is a subtype
///   of the declaring type
/// - private: `from` is the declaring type or lexically nested inside it
pub fn reachable(
    universe: &TypeUniverse,
    member: MemberRef,
    from: Option<TypeId>,
) -> Result<bool, FatalError> {
    let (declaring, modifiers) = declaring_site(universe, member)?;
    let from_package = match from {
        Some(ty) => registered(universe, ty)?.package,
        None => Name::EMPTY,
    };
    let same_package = registered(universe, declaring)?.package == from_package;

    Ok(match modifiers.access() {
        Access::Public => true,
        Access::Package => same_package,
        Access::Protected => {
            same_package
                || from.is_some_and(|ty| {
                    std::iter::once(ty)
                        .chain(universe.enclosing(ty))
                        .any(|t| is_subtype(universe, t, declaring))
                })
        }
        Access::Private => from.is_some_and(|ty| universe.is_nested_within(ty, declaring)),
    })
}

/// Issue a capability for `member` if `policy` allows its use from `from`.
pub fn grant(
    universe: &TypeUniverse,
    policy: AccessPolicy,
    member: MemberRef,
    from: Option<TypeId>,
) -> Result<Option<AccessToken>, FatalError> {
    let allowed = match policy {
        AccessPolicy::Unrestricted => true,
        AccessPolicy::Emulate => reachable(universe, member, from)?,
    };
    Ok(allowed.then_some(AccessToken { member, from }))
}
