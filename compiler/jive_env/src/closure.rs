//! Synthesis of types for local and anonymous allocations.
//!
//! `new Target(args) { members }` evaluated inside the interpreter has no
//! compiled class behind it. The synthesizer builds one: a final class
//! extending `Target` (or implementing it, for an interface) whose
//! constructor receives the enclosing instance, a map of the captured
//! constants, then the original arguments, and forwards the latter to the
//! super constructor. The class is compiled once per program point and
//! capture shape; later allocations of the same body reuse it.

use jive_ir::{
    Access, Allocation, CtorDecl, DeclKind, Expr, ExprKind, FieldDecl, Literal, MemberDecl,
    MemberRef, Modifiers, Name, Param, Span, Stmt, Ty, TypeDecl, TypeId,
};
use jive_types::{LookupError, Reflection, TypeUniverse};

use crate::error::registered;
use crate::session::{CaptureShape, SynthesisKey};
use crate::{
    CompileError, EnvError, EnvResult, EnvironmentContext, FatalError, Flavor, UndefinedKind,
};

/// Static type of a scope value, recorded for captured bindings.
pub trait DeclaredType {
    fn declared_type(&self) -> Ty;
}

impl DeclaredType for Ty {
    fn declared_type(&self) -> Ty {
        self.clone()
    }
}

/// The class compiler: turns a type declaration into a loaded type.
///
/// Implementations register the new type in the session's universe. They
/// receive a context resolving names as the allocating code does, with the
/// captured constants in scope.
pub trait Compiler<V> {
    fn compile(
        &mut self,
        context: &mut EnvironmentContext<V>,
        decl: &TypeDecl,
    ) -> Result<TypeId, CompileError>;
}

/// Synthetic member names.
struct Names {
    outer_field: Name,
    locals_field: Name,
    signature_field: Name,
    outer_param: Name,
    locals_param: Name,
}

impl Names {
    fn new(universe: &TypeUniverse) -> Self {
        let interner = universe.interner();
        Names {
            outer_field: interner.intern("outer$this"),
            locals_field: interner.intern("captured$locals"),
            signature_field: interner.intern("captured$signature"),
            outer_param: interner.intern("outer$"),
            locals_param: interner.intern("locals$"),
        }
    }
}

/// How the synthesized type extends its target.
struct Plan {
    superclass: TypeId,
    interfaces: Vec<TypeId>,
    /// Parameter types of the super constructor the arguments are passed to.
    super_params: Vec<Ty>,
}

/// Builds, compiles and caches synthesized types.
pub struct ClosureSynthesizer<'c, V> {
    compiler: &'c mut dyn Compiler<V>,
}

impl<'c, V: Clone + DeclaredType> ClosureSynthesizer<'c, V> {
    pub fn new(compiler: &'c mut dyn Compiler<V>) -> Self {
        ClosureSynthesizer { compiler }
    }

    /// Rewrite `allocation` into a `New` of its synthesized type.
    #[tracing::instrument(level = "debug", skip_all, fields(target = ?allocation.target))]
    pub fn synthesize(
        &mut self,
        context: &EnvironmentContext<V>,
        allocation: &Allocation,
        span: Span,
    ) -> EnvResult<Expr> {
        let session = context.session();
        let captured: Vec<(Name, V)> = context
            .scopes()
            .constants()
            .into_iter()
            .map(|(name, value)| (name, value.clone()))
            .collect();
        let shape: CaptureShape = captured
            .iter()
            .map(|(name, value)| (*name, value.declared_type()))
            .collect();
        let outer_instance = context.flavor().receiver().cloned();
        let enclosing = context.declaring();

        let universe = session.universe().read();
        let plan = plan(context, &universe, allocation)?;
        let key = SynthesisKey {
            target: allocation.target,
            span,
            arg_types: allocation.arg_types.clone(),
            members: allocation.members.clone(),
            enclosing,
            instance: outer_instance.is_some(),
            shape,
        };

        let ty = if let Some(ty) = session.cached_synthesis(&key) {
            tracing::trace!(synthesized = universe.display(ty), "reusing synthesized type");
            drop(universe);
            ty
        } else {
            let decl = build_decl(context, &universe, allocation, &plan, &key, span);
            // The compiler writes to the universe.
            drop(universe);

            let mut child = context.child(&captured)?;
            let ty = self
                .compiler
                .compile(&mut child, &decl)
                .map_err(|source| EnvError::SynthesisFailure {
                    ty: session.interner().lookup(decl.name).to_owned(),
                    source,
                })?;
            tracing::debug!(
                synthesized = session.universe().read().display(ty),
                captured = key.shape.len(),
                "compiled synthesized type"
            );
            session.record_synthesis(key.clone(), ty);
            ty
        };

        let universe = session.universe().read();
        let core = universe.core();
        let mut params: Vec<Ty> = Vec::with_capacity(plan.super_params.len() + 2);
        let mut args: Vec<Expr> = Vec::with_capacity(allocation.args.len() + 2);
        if let (Some(outer), Some(instance)) = (enclosing, outer_instance) {
            params.push(Ty::Ref(outer));
            args.push(instance);
        }
        params.push(Ty::Ref(core.map));
        args.push(Expr::synthetic(ExprKind::CapturedLocals(
            key.shape.iter().map(|(name, _)| *name).collect(),
        )));
        params.extend(plan.super_params.iter().cloned());
        args.extend(allocation.args.iter().cloned());

        let ctor = universe.ctor(ty, &params).map_err(|_| {
            tracing::error!(synthesized = universe.display(ty), "synthesized constructor missing");
            EnvError::from(FatalError::CorruptUniverse(format!(
                "`{}` lacks its synthesized constructor",
                universe.display(ty)
            )))
        })?;
        Ok(Expr::new(
            ExprKind::New {
                ty,
                ctor: Some(ctor),
                args,
            },
            span,
        ))
    }
}

/// Check the target can be extended with these arguments.
fn plan<V>(
    context: &EnvironmentContext<V>,
    universe: &TypeUniverse,
    allocation: &Allocation,
) -> EnvResult<Plan> {
    let target = allocation.target;
    let info = registered(universe, target)?;
    let display = universe.display(target);

    if info.is_interface() {
        if !allocation.args.is_empty() {
            return Err(EnvError::undefined(UndefinedKind::Constructor, display));
        }
        return Ok(Plan {
            superclass: universe.core().object,
            interfaces: vec![target],
            super_params: Vec::new(),
        });
    }

    if info.modifiers.contains(Modifiers::FINAL) {
        return Err(EnvError::SynthesisFailure {
            ty: display.to_owned(),
            source: CompileError::new(format!("cannot extend final class `{display}`")),
        });
    }
    let ctor = match universe.ctor(target, &allocation.arg_types) {
        Ok(ctor) => ctor,
        Err(LookupError::NotFound) => {
            return Err(EnvError::undefined(UndefinedKind::Constructor, display));
        }
        Err(LookupError::Ambiguous { .. }) => {
            return Err(EnvError::AmbiguousMember {
                name: "<init>".to_owned(),
                owner: display.to_owned(),
            });
        }
    };
    // The synthesized type is a subclass of the target.
    let info = universe.ctor_info(ctor);
    let subclass_access = info.modifiers.access() == Access::Protected;
    if !subclass_access
        && context
            .session()
            .grant(universe, MemberRef::Ctor(ctor), context.declaring())?
            .is_none()
    {
        return Err(EnvError::Inaccessible {
            member: format!("{display}.<init>"),
            from: context
                .declaring()
                .map_or("top-level code", |t| universe.display(t))
                .to_owned(),
        });
    }
    Ok(Plan {
        superclass: target,
        interfaces: Vec::new(),
        super_params: info.params.to_vec(),
    })
}

fn synthetic_field(name: Name, ty: Ty, modifiers: Modifiers, init: Option<Expr>) -> MemberDecl {
    MemberDecl::Field(FieldDecl {
        name,
        ty,
        modifiers: modifiers | Modifiers::PRIVATE | Modifiers::FINAL | Modifiers::SYNTHETIC,
        init,
    })
}

/// Store constructor parameter `param` into field `field`.
fn store(field: Name, param: Name) -> Stmt {
    Stmt::Expr(Expr::synthetic(ExprKind::Assign {
        target: Box::new(Expr::synthetic(ExprKind::Ident(field))),
        value: Box::new(Expr::synthetic(ExprKind::Local(param))),
    }))
}

fn build_decl<V>(
    context: &EnvironmentContext<V>,
    universe: &TypeUniverse,
    allocation: &Allocation,
    plan: &Plan,
    key: &SynthesisKey,
    span: Span,
) -> TypeDecl {
    let session = context.session();
    let interner = universe.interner();
    let core = universe.core();
    let names = Names::new(universe);

    let mut members = Vec::with_capacity(allocation.members.len() + 4);
    let mut params = Vec::with_capacity(plan.super_params.len() + 2);
    let mut body = Vec::new();

    let outer = key.enclosing.filter(|_| key.instance);
    if let Some(outer) = outer {
        members.push(synthetic_field(
            names.outer_field,
            Ty::Ref(outer),
            Modifiers::empty(),
            None,
        ));
        params.push(Param {
            name: names.outer_param,
            ty: Ty::Ref(outer),
        });
    }

    members.push(synthetic_field(
        names.locals_field,
        Ty::Ref(core.map),
        Modifiers::empty(),
        None,
    ));
    params.push(Param {
        name: names.locals_param,
        ty: Ty::Ref(core.map),
    });

    // name, type, name, type, ... for diagnostics.
    let string = Ty::Ref(core.string);
    let signature = key
        .shape
        .iter()
        .flat_map(|(name, ty)| {
            let rendered = interner.intern(&universe.display_ty(ty));
            [*name, rendered]
        })
        .map(|text| Expr::synthetic(ExprKind::Literal(Literal::Str(text))))
        .collect();
    members.push(synthetic_field(
        names.signature_field,
        Ty::array_of(string.clone()),
        Modifiers::STATIC,
        Some(Expr::synthetic(ExprKind::ArrayLiteral {
            elem: string,
            items: signature,
        })),
    ));

    let mut forwarded = Vec::with_capacity(plan.super_params.len());
    for (i, ty) in plan.super_params.iter().enumerate() {
        let name = interner.intern(&format!("arg${i}"));
        params.push(Param {
            name,
            ty: ty.clone(),
        });
        forwarded.push(Expr::synthetic(ExprKind::Local(name)));
    }
    body.push(Stmt::SuperCall { args: forwarded });
    if outer.is_some() {
        body.push(store(names.outer_field, names.outer_param));
    }
    body.push(store(names.locals_field, names.locals_param));

    members.push(MemberDecl::Ctor(CtorDecl {
        params,
        modifiers: Modifiers::SYNTHETIC,
        body,
    }));
    members.extend(allocation.members.iter().cloned());

    let mut modifiers = Modifiers::FINAL | Modifiers::SYNTHETIC;
    if matches!(context.flavor(), Flavor::Static { .. }) {
        modifiers |= Modifiers::STATIC;
    }

    TypeDecl {
        name: session.next_synthetic_name(),
        kind: DeclKind::Class,
        modifiers,
        outer: key.enclosing,
        superclass: Some(plan.superclass),
        interfaces: plan.interfaces.clone(),
        members,
        span,
    }
}

impl<V: Clone + DeclaredType> EnvironmentContext<V> {
    /// Resolve a local or anonymous allocation through a synthesized type.
    pub fn synthesize_allocation(
        &self,
        allocation: &Allocation,
        span: Span,
        compiler: &mut dyn Compiler<V>,
    ) -> EnvResult<Expr> {
        ClosureSynthesizer::new(compiler).synthesize(self, allocation, span)
    }
}

#[cfg(test)]
mod tests;
