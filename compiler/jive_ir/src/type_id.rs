//! Type handles and static types.
//!
//! `TypeId` indexes a declared type in the compiled type universe. `Ty` is the
//! static type of an expression, a parameter or a binding.

use std::fmt;

/// Handle to a declared (class or interface) type in the type universe.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Primitive value types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Prim {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Prim {
    /// Source keyword for this primitive.
    pub const fn keyword(self) -> &'static str {
        match self {
            Prim::Boolean => "boolean",
            Prim::Byte => "byte",
            Prim::Short => "short",
            Prim::Char => "char",
            Prim::Int => "int",
            Prim::Long => "long",
            Prim::Float => "float",
            Prim::Double => "double",
        }
    }

    /// Whether a value of `self` converts to `to` by primitive widening
    /// (identity included).
    pub fn widens_to(self, to: Prim) -> bool {
        use Prim::{Boolean, Byte, Char, Double, Float, Int, Long, Short};
        if self == to {
            return true;
        }
        match self {
            Byte => matches!(to, Short | Int | Long | Float | Double),
            Short | Char => matches!(to, Int | Long | Float | Double),
            Int => matches!(to, Long | Float | Double),
            Long => matches!(to, Float | Double),
            Float => matches!(to, Double),
            Double | Boolean => false,
        }
    }
}

/// Static type of a value.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Ty {
    Void,
    /// Type of the `null` literal; assignable to every reference type.
    Null,
    Prim(Prim),
    Ref(TypeId),
    Array(Box<Ty>),
}

impl Ty {
    #[inline]
    pub fn array_of(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }

    /// Whether values of this type are references.
    pub fn is_reference(&self) -> bool {
        matches!(self, Ty::Null | Ty::Ref(_) | Ty::Array(_))
    }

    /// The declared type, if this is a class or interface reference.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Ty::Ref(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<Prim> for Ty {
    fn from(prim: Prim) -> Self {
        Ty::Prim(prim)
    }
}

impl From<TypeId> for Ty {
    fn from(id: TypeId) -> Self {
        Ty::Ref(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prim_widening() {
        assert!(Prim::Int.widens_to(Prim::Long));
        assert!(Prim::Char.widens_to(Prim::Int));
        assert!(!Prim::Char.widens_to(Prim::Short));
        assert!(!Prim::Long.widens_to(Prim::Int));
        assert!(!Prim::Boolean.widens_to(Prim::Int));
        assert!(Prim::Boolean.widens_to(Prim::Boolean));
    }

    #[test]
    fn test_reference_types() {
        assert!(Ty::Null.is_reference());
        assert!(Ty::array_of(Ty::Prim(Prim::Int)).is_reference());
        assert!(!Ty::Prim(Prim::Int).is_reference());
        assert_eq!(Ty::Ref(TypeId::from_raw(3)).type_id(), Some(TypeId::from_raw(3)));
    }
}
