use super::*;
use jive_ir::{Modifiers, Param, Prim, SharedInterner};
use pretty_assertions::assert_eq;

fn function(name: Name, params: &[Ty]) -> MethodDecl {
    MethodDecl {
        name,
        params: params
            .iter()
            .map(|ty| Param {
                name: Name::EMPTY,
                ty: ty.clone(),
            })
            .collect(),
        ret: Ty::Void,
        modifiers: Modifiers::STATIC,
        body: Vec::new(),
    }
}

#[test]
fn test_resolve_by_arity_and_type() {
    let universe = TypeUniverse::new(SharedInterner::default());
    let f = universe.interner().intern("f");
    let int = Ty::Prim(Prim::Int);
    let string = Ty::Ref(universe.core().string);

    let mut table = FunctionTable::new();
    let by_int = table.define(function(f, &[int.clone()]));
    let by_string = table.define(function(f, std::slice::from_ref(&string)));
    let nullary = table.define(function(f, &[]));

    assert_eq!(table.resolve(&universe, f, &[int]), Ok(by_int));
    assert_eq!(table.resolve(&universe, f, &[string]), Ok(by_string));
    assert_eq!(table.resolve(&universe, f, &[]), Ok(nullary));
    assert_eq!(
        table.resolve(&universe, f, &[Ty::Prim(Prim::Boolean)]),
        Err(LookupError::NotFound)
    );
}

#[test]
fn test_most_specific_wins() {
    let universe = TypeUniverse::new(SharedInterner::default());
    let f = universe.interner().intern("f");
    let object = Ty::Ref(universe.core().object);
    let string = Ty::Ref(universe.core().string);

    let mut table = FunctionTable::new();
    table.define(function(f, &[object]));
    let specific = table.define(function(f, std::slice::from_ref(&string)));

    assert_eq!(table.resolve(&universe, f, &[string]), Ok(specific));
    assert_eq!(
        table.resolve(&universe, f, &[Ty::Null]),
        Ok(specific),
        "null picks the most specific reference overload"
    );
}

#[test]
fn test_newest_definition_shadows_same_signature() {
    let universe = TypeUniverse::new(SharedInterner::default());
    let f = universe.interner().intern("f");
    let int = Ty::Prim(Prim::Int);

    let mut table = FunctionTable::new();
    let old = table.define(function(f, &[int.clone()]));
    let new = table.define(function(f, &[int.clone()]));

    assert_ne!(old, new);
    assert_eq!(table.len(), 2);
    assert_eq!(table.resolve(&universe, f, &[int]), Ok(new));
}

#[test]
fn test_revert_drops_functions_after_mark() {
    let universe = TypeUniverse::new(SharedInterner::default());
    let kept = universe.interner().intern("kept");
    let dropped = universe.interner().intern("dropped");

    let mut table = FunctionTable::new();
    let kept_id = table.define(function(kept, &[]));
    table.set_revert_point();
    let dropped_id = table.define(function(dropped, &[]));

    assert_eq!(table.revert(), 1);
    assert!(table.get(dropped_id).is_none());
    assert_eq!(table.get(kept_id).map(|decl| decl.name), Some(kept));
    assert_eq!(
        table.resolve(&universe, dropped, &[]),
        Err(LookupError::NotFound)
    );

    // Ids are not reused after a revert.
    let again = table.define(function(dropped, &[]));
    assert_ne!(again, dropped_id);
    assert!(!table.is_empty());
}
