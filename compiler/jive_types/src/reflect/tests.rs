use super::*;
use crate::TypeBuilder;
use jive_ir::{Modifiers, Prim, SharedInterner};
use pretty_assertions::assert_eq;

const INT: Ty = Ty::Prim(Prim::Int);
const LONG: Ty = Ty::Prim(Prim::Long);

#[test]
fn test_inherited_field() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let count = i.intern("count");
    let base = u.insert(TypeBuilder::class(i.intern("Base")).field(count, INT, Modifiers::PROTECTED));
    let derived = u.insert(TypeBuilder::class(i.intern("Derived")).superclass(base));

    assert_eq!(
        u.field(derived, count),
        Ok(FieldRef {
            owner: base,
            index: 0
        })
    );
    assert_eq!(u.field(derived, i.intern("missing")), Err(LookupError::NotFound));
}

#[test]
fn test_field_from_two_interfaces_is_ambiguous() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let k = i.intern("K");
    let static_final = Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL;
    let a = u.insert(TypeBuilder::interface(i.intern("A")).field(k, INT, static_final));
    let b = u.insert(TypeBuilder::interface(i.intern("B")).field(k, INT, static_final));
    let both = u.insert(
        TypeBuilder::class(i.intern("Both"))
            .interface_impl(a)
            .interface_impl(b),
    );

    assert_eq!(u.field(both, k), Err(LookupError::Ambiguous { candidates: 2 }));
}

#[test]
fn test_most_specific_overload() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let f = i.intern("f");
    let t = u.insert(
        TypeBuilder::class(i.intern("T"))
            .method(f, &[LONG], Ty::Void, Modifiers::PUBLIC)
            .method(f, &[INT], Ty::Void, Modifiers::PUBLIC),
    );

    assert_eq!(u.method(t, f, &[INT]), Ok(MethodRef { owner: t, index: 1 }));
    assert_eq!(u.method(t, f, &[LONG]), Ok(MethodRef { owner: t, index: 0 }));
    assert_eq!(u.method(t, f, &[Ty::Prim(Prim::Double)]), Err(LookupError::NotFound));
}

#[test]
fn test_overridden_method_resolves_to_most_derived() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let run = i.intern("run");
    let base = u.insert(TypeBuilder::class(i.intern("Base")).method(run, &[], Ty::Void, Modifiers::PUBLIC));
    let derived = u.insert(
        TypeBuilder::class(i.intern("Derived"))
            .superclass(base)
            .method(run, &[], Ty::Void, Modifiers::PUBLIC),
    );

    assert_eq!(u.method(derived, run, &[]), Ok(MethodRef { owner: derived, index: 0 }));
}

#[test]
fn test_ctor_with_null_argument_ambiguity() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let string = Ty::Ref(u.core().string);
    let map = Ty::Ref(u.core().map);
    let t = u.insert(
        TypeBuilder::class(i.intern("T"))
            .ctor(&[string.clone()], Modifiers::PUBLIC)
            .ctor(&[map], Modifiers::PUBLIC),
    );

    assert_eq!(u.ctor(t, &[string]), Ok(CtorRef { owner: t, index: 0 }));
    assert_eq!(u.ctor(t, &[Ty::Null]), Err(LookupError::Ambiguous { candidates: 2 }));
}

#[test]
fn test_inherited_member_type() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let base = u.insert(TypeBuilder::class(i.intern("Base")));
    let node = u.insert(TypeBuilder::class(i.intern("Node")).outer(base));
    let derived = u.insert(TypeBuilder::class(i.intern("Derived")).superclass(base));

    assert_eq!(u.member_type(derived, i.intern("Node")), Ok(node));
}

#[test]
fn test_private_members_are_not_inherited() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let secret = i.intern("secret");
    let hidden = i.intern("hidden");
    let base = u.insert(
        TypeBuilder::class(i.intern("Base"))
            .field(secret, INT, Modifiers::PRIVATE)
            .method(hidden, &[], Ty::Void, Modifiers::PRIVATE),
    );
    let helper = u.insert(
        TypeBuilder::class(i.intern("Helper"))
            .outer(base)
            .modifiers(Modifiers::PRIVATE | Modifiers::STATIC),
    );
    let derived = u.insert(TypeBuilder::class(i.intern("Derived")).superclass(base));

    assert_eq!(u.field(base, secret), Ok(FieldRef { owner: base, index: 0 }));
    assert_eq!(u.field(derived, secret), Err(LookupError::NotFound));
    assert_eq!(u.method(base, hidden, &[]), Ok(MethodRef { owner: base, index: 0 }));
    assert_eq!(u.method(derived, hidden, &[]), Err(LookupError::NotFound));
    assert_eq!(u.member_type(base, i.intern("Helper")), Ok(helper));
    assert_eq!(u.member_type(derived, i.intern("Helper")), Err(LookupError::NotFound));
}

#[test]
fn test_private_field_hides_grandparent_field() {
    let mut u = TypeUniverse::new(SharedInterner::new());
    let i = u.interner().clone();
    let count = i.intern("count");
    let root = u.insert(TypeBuilder::class(i.intern("Root")).field(count, INT, Modifiers::PUBLIC));
    let middle = u.insert(
        TypeBuilder::class(i.intern("Middle"))
            .superclass(root)
            .field(count, LONG, Modifiers::PRIVATE),
    );
    let leaf = u.insert(TypeBuilder::class(i.intern("Leaf")).superclass(middle));

    assert_eq!(u.field(middle, count), Ok(FieldRef { owner: middle, index: 0 }));
    assert_eq!(u.field(leaf, count), Err(LookupError::NotFound));
}
