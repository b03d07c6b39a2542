use super::*;
use crate::test_helpers::{Fixture, RecordingCompiler};
use jive_ir::{CtorRef, MethodDecl, Prim};
use pretty_assertions::assert_eq;

const HERE: Span = Span::new(10, 20);
const THERE: Span = Span::new(30, 40);

fn allocation(target: TypeId, args: Vec<Expr>, arg_types: Vec<Ty>) -> Allocation {
    Allocation {
        target,
        args,
        arg_types,
        members: Vec::new(),
    }
}

fn allocated_type(expr: &EnvResult<Expr>) -> TypeId {
    match expr {
        Ok(Expr {
            kind: ExprKind::New { ty, .. },
            ..
        }) => *ty,
        other => panic!("expected an allocation, got {other:?}"),
    }
}

#[test]
fn test_same_program_point_reuses_synthesized_type() {
    let fx = Fixture::new();
    let mut ctx = fx.global();
    let k = fx.name("k");
    assert_eq!(ctx.define_constant(k, Ty::Prim(Prim::Int)), Ok(()));
    let mut compiler = RecordingCompiler::default();
    let task = allocation(fx.task, Vec::new(), Vec::new());

    let first = ctx.synthesize_allocation(&task, HERE, &mut compiler);
    let second = ctx.synthesize_allocation(&task, HERE, &mut compiler);

    let ty = allocated_type(&first);
    assert_eq!(first, second);
    assert_eq!(compiler.compiled.len(), 1);
    assert_eq!(fx.session.synthesized_count(), 1);
    assert_eq!(
        first,
        Ok(Expr::new(
            ExprKind::New {
                ty,
                ctor: Some(CtorRef { owner: ty, index: 0 }),
                args: vec![Expr::synthetic(ExprKind::CapturedLocals(vec![k]))],
            },
            HERE
        ))
    );

    let universe = fx.session.universe().read();
    assert_eq!(universe.display(ty), "Closure0");
    assert_eq!(universe.get(ty).interfaces.as_slice(), &[fx.task]);
}

#[test]
fn test_new_point_or_shape_synthesizes_again() {
    let fx = Fixture::new();
    let mut ctx = fx.global();
    let mut compiler = RecordingCompiler::default();
    let task = allocation(fx.task, Vec::new(), Vec::new());

    let here = allocated_type(&ctx.synthesize_allocation(&task, HERE, &mut compiler));
    let there = allocated_type(&ctx.synthesize_allocation(&task, THERE, &mut compiler));
    assert_ne!(here, there);

    assert_eq!(ctx.define_constant(fx.name("late"), Ty::Null), Ok(()));
    let reshaped = allocated_type(&ctx.synthesize_allocation(&task, HERE, &mut compiler));
    assert_ne!(here, reshaped);
    assert_eq!(compiler.compiled.len(), 3);
}

fn run_method(name: Name) -> MemberDecl {
    MemberDecl::Method(MethodDecl {
        name,
        params: Vec::new(),
        ret: Ty::Void,
        modifiers: Modifiers::PUBLIC,
        body: Vec::new(),
    })
}

#[test]
fn test_different_bodies_at_same_point_get_distinct_types() {
    let fx = Fixture::new();
    let mut ctx = fx.global();
    let mut compiler = RecordingCompiler::default();
    let body = |method: &str| Allocation {
        members: vec![run_method(fx.name(method))],
        ..allocation(fx.task, Vec::new(), Vec::new())
    };
    let (first_body, second_body) = (body("runA"), body("runB"));

    let first = ctx.submit(|ctx| ctx.synthesize_allocation(&first_body, HERE, &mut compiler));
    let second = ctx.submit(|ctx| ctx.synthesize_allocation(&second_body, HERE, &mut compiler));
    let again = ctx.submit(|ctx| ctx.synthesize_allocation(&second_body, HERE, &mut compiler));

    assert_ne!(allocated_type(&first), allocated_type(&second));
    assert_eq!(allocated_type(&second), allocated_type(&again));
    assert_eq!(compiler.compiled.len(), 2);
    let methods = |ty: TypeId| -> Vec<Name> {
        let universe = fx.session.universe().read();
        universe.get(ty).methods.iter().map(|m| m.name).collect()
    };
    assert_eq!(methods(allocated_type(&first)), vec![fx.name("runA")]);
    assert_eq!(methods(allocated_type(&second)), vec![fx.name("runB")]);
}

#[test]
fn test_only_constants_are_captured() {
    let fx = Fixture::new();
    let mut ctx = fx.global();
    let constant = fx.name("constant");
    let variable = fx.name("variable");
    assert_eq!(ctx.define_constant(constant, Ty::Prim(Prim::Int)), Ok(()));
    assert_eq!(ctx.define(variable, Ty::Prim(Prim::Int)), Ok(()));
    let mut compiler = RecordingCompiler::default();

    let result =
        ctx.synthesize_allocation(&allocation(fx.task, Vec::new(), Vec::new()), HERE, &mut compiler);
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(compiler.visible, vec![vec![constant]]);

    // name, type pairs for diagnostics.
    let string = Ty::Ref(fx.session.universe().read().core().string);
    let signature = compiler.compiled[0].fields().find_map(|f| f.init.clone());
    assert_eq!(
        signature.map(|e| e.kind),
        Some(ExprKind::ArrayLiteral {
            elem: string,
            items: vec![
                Expr::synthetic(ExprKind::Literal(Literal::Str(constant))),
                Expr::synthetic(ExprKind::Literal(Literal::Str(fx.name("int")))),
            ],
        })
    );
}

#[test]
fn test_instance_context_passes_outer_instance_first() {
    let fx = Fixture::new();
    let ctx = fx.instance(fx.outer);
    let mut compiler = RecordingCompiler::default();
    let one = Expr::synthetic(ExprKind::Literal(Literal::Int(1)));
    let int = Ty::Prim(Prim::Int);

    // Base(int) is protected; the synthesized subclass may call it.
    let result = ctx.synthesize_allocation(
        &allocation(fx.base, vec![one.clone()], vec![int.clone()]),
        HERE,
        &mut compiler,
    );
    let ty = allocated_type(&result);
    let map = Ty::Ref(fx.session.universe().read().core().map);

    assert_eq!(
        result,
        Ok(Expr::new(
            ExprKind::New {
                ty,
                ctor: Some(CtorRef { owner: ty, index: 0 }),
                args: vec![
                    Expr::synthetic(ExprKind::This(fx.outer)),
                    Expr::synthetic(ExprKind::CapturedLocals(Vec::new())),
                    one,
                ],
            },
            HERE
        ))
    );

    let decl = &compiler.compiled[0];
    assert_eq!(decl.outer, Some(fx.outer));
    assert_eq!(decl.superclass, Some(fx.base));
    assert_eq!(decl.modifiers, Modifiers::FINAL | Modifiers::SYNTHETIC);
    let ctor = decl.ctors().next().map(|c| {
        (
            c.params.iter().map(|p| p.ty.clone()).collect::<Vec<_>>(),
            c.body.len(),
        )
    });
    assert_eq!(ctor, Some((vec![Ty::Ref(fx.outer), map, int], 3)));
    assert_eq!(
        fx.session.universe().read().display(ty),
        "app.Outer$Closure0"
    );
}

#[test]
fn test_static_context_has_no_outer_instance() {
    let fx = Fixture::new();
    let ctx = fx.statics(fx.outer);
    let mut compiler = RecordingCompiler::default();

    let result =
        ctx.synthesize_allocation(&allocation(fx.base, Vec::new(), Vec::new()), HERE, &mut compiler);
    assert!(result.is_ok(), "{result:?}");

    let decl = &compiler.compiled[0];
    assert!(decl.modifiers.is_static());
    assert_eq!(decl.fields().count(), 2);
    assert_eq!(decl.ctors().next().map(|c| c.params.len()), Some(1));
}

#[test]
fn test_compile_failure_is_reported_and_not_cached() {
    let fx = Fixture::new();
    let ctx = fx.global();
    let task = allocation(fx.task, Vec::new(), Vec::new());
    let mut rejecting = RecordingCompiler {
        reject: true,
        ..RecordingCompiler::default()
    };

    let failed = ctx.synthesize_allocation(&task, HERE, &mut rejecting);
    assert!(
        matches!(failed, Err(EnvError::SynthesisFailure { .. })),
        "{failed:?}"
    );
    assert_eq!(fx.session.synthesized_count(), 0);

    let mut compiler = RecordingCompiler::default();
    assert!(ctx.synthesize_allocation(&task, HERE, &mut compiler).is_ok());
    assert_eq!(compiler.compiled.len(), 1);
}

#[test]
fn test_invalid_targets() {
    let fx = Fixture::new();
    let ctx = fx.global();
    let mut compiler = RecordingCompiler::default();
    let one = Expr::synthetic(ExprKind::Literal(Literal::Int(1)));

    let sealed = ctx.synthesize_allocation(
        &allocation(fx.sealed, Vec::new(), Vec::new()),
        HERE,
        &mut compiler,
    );
    assert!(matches!(sealed, Err(EnvError::SynthesisFailure { .. })), "{sealed:?}");

    assert_eq!(
        ctx.synthesize_allocation(
            &allocation(fx.task, vec![one], vec![Ty::Prim(Prim::Int)]),
            HERE,
            &mut compiler,
        ),
        Err(EnvError::undefined(UndefinedKind::Constructor, "lib.Task"))
    );
    assert!(compiler.compiled.is_empty());
}
