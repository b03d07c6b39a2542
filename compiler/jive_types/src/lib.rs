//! Jive Types - the compiled type universe.
//!
//! Name resolution consults compiled types through narrow contracts:
//!
//! - [`TypeResolver`]: type lookup by (simple, dotted or qualified) name
//! - [`Reflection`]: field, method, constructor and member-type lookup
//!
//! [`TypeUniverse`] is the in-memory registry implementing both. The class
//! compiler registers newly loaded types into it through a [`SharedUniverse`].

mod error;
mod reflect;
mod resolve;
mod shared;
mod subtype;
mod universe;

pub use error::{LookupError, ResolveError};
pub use reflect::Reflection;
pub use resolve::TypeResolver;
pub use shared::SharedUniverse;
pub use subtype::{is_assignable, is_subtype, most_specific};
pub use universe::{
    CoreTypes, CtorInfo, DeclState, FieldInfo, MethodInfo, Params, TypeBuilder, TypeInfo,
    TypeUniverse,
};
