use super::*;
use crate::TypeBuilder;
use jive_ir::{Prim, SharedInterner};

#[test]
fn test_subtype_through_interfaces() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let shape = u.insert(TypeBuilder::interface(i.intern("Shape")));
    let square = u.insert(TypeBuilder::class(i.intern("Square")).interface_impl(shape));
    let tile = u.insert(TypeBuilder::class(i.intern("Tile")).superclass(square));

    assert!(is_subtype(&u, tile, shape));
    assert!(is_subtype(&u, shape, u.core().object));
    assert!(!is_subtype(&u, shape, tile));
}

#[test]
fn test_assignability() {
    let u = TypeUniverse::new(SharedInterner::new());
    let object = Ty::Ref(u.core().object);
    let string = Ty::Ref(u.core().string);
    let strings = Ty::array_of(string.clone());
    let ints = Ty::array_of(Ty::Prim(Prim::Int));

    assert!(is_assignable(&u, &Ty::Null, &string));
    assert!(!is_assignable(&u, &Ty::Null, &Ty::Prim(Prim::Int)));
    assert!(is_assignable(&u, &string, &object));
    assert!(!is_assignable(&u, &object, &string));
    assert!(is_assignable(&u, &strings, &Ty::array_of(object.clone())));
    assert!(is_assignable(&u, &ints, &object));
    assert!(!is_assignable(&u, &ints, &Ty::array_of(Ty::Prim(Prim::Long))));
    assert!(is_assignable(&u, &Ty::Prim(Prim::Byte), &Ty::Prim(Prim::Double)));
}
