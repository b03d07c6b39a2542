//! Member handles and modifiers.
//!
//! A handle names a member by its declaring type and its position in that
//! type's member table. Handles are plain data; all information about the
//! member lives in the type universe.

use bitflags::bitflags;

use crate::TypeId;

bitflags! {
    /// Declaration modifiers of a type or member.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        /// Generated by the engine rather than written by the user.
        const SYNTHETIC = 1 << 6;
    }
}

/// Access level derived from modifiers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Access {
    Public,
    Protected,
    /// No access modifier: visible within the declaring package.
    Package,
    Private,
}

impl Modifiers {
    pub fn access(self) -> Access {
        if self.contains(Modifiers::PUBLIC) {
            Access::Public
        } else if self.contains(Modifiers::PROTECTED) {
            Access::Protected
        } else if self.contains(Modifiers::PRIVATE) {
            Access::Private
        } else {
            Access::Package
        }
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }
}

/// Handle to a field of a declared type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldRef {
    pub owner: TypeId,
    pub index: u32,
}

/// Handle to a method of a declared type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodRef {
    pub owner: TypeId,
    pub index: u32,
}

/// Handle to a constructor of a declared type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CtorRef {
    pub owner: TypeId,
    pub index: u32,
}

/// Any member, including a member type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemberRef {
    Field(FieldRef),
    Method(MethodRef),
    Ctor(CtorRef),
    Type(TypeId),
}

impl From<FieldRef> for MemberRef {
    fn from(r: FieldRef) -> Self {
        MemberRef::Field(r)
    }
}

impl From<MethodRef> for MemberRef {
    fn from(r: MethodRef) -> Self {
        MemberRef::Method(r)
    }
}

impl From<CtorRef> for MemberRef {
    fn from(r: CtorRef) -> Self {
        MemberRef::Ctor(r)
    }
}
