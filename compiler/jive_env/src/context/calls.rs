//! Method, function and constructor resolution.

use jive_ir::{Dispatch, Expr, ExprKind, MethodRef, Name, Span, Ty, TypeId};
use jive_types::{is_subtype, DeclState, LookupError, Reflection, TypeUniverse};

use super::EnvironmentContext;
use crate::error::registered;
use crate::{EnvError, EnvResult, FatalError, UndefinedKind};

impl<V> EnvironmentContext<V> {
    #[expect(
        clippy::too_many_arguments,
        reason = "receiver, qualifier and dispatch kind all come from the hop"
    )]
    fn method_call(
        &self,
        universe: &TypeUniverse,
        method: MethodRef,
        receiver: Option<Expr>,
        qualifier: TypeId,
        promoted: bool,
        args: Vec<Expr>,
        span: Span,
    ) -> EnvResult<Expr> {
        let info = universe.method_info(method);
        self.check_access(universe, method.into(), || self.render(info.name))?;
        let (receiver, dispatch) = if info.modifiers.is_static() {
            (Expr::synthetic(ExprKind::TypeName(qualifier)), Dispatch::Static)
        } else {
            let Some(receiver) = receiver else {
                return Err(EnvError::StaticContext {
                    name: self.render(info.name),
                });
            };
            let dispatch = if promoted {
                Dispatch::Outer
            } else {
                Dispatch::Virtual
            };
            (receiver, dispatch)
        };
        Ok(Expr::new(
            ExprKind::MethodCall {
                receiver: Box::new(receiver),
                method,
                dispatch,
                args,
            },
            span,
        ))
    }

    /// Resolve an unqualified method call on the implicit receiver.
    ///
    /// When the declaring type has no applicable method, each enclosing type
    /// is tried in turn; a hit there is called through an explicit outer
    /// receiver with [`Dispatch::Outer`].
    #[tracing::instrument(level = "trace", skip_all, fields(?name, arity = arg_types.len()))]
    pub fn resolve_method(
        &self,
        name: Name,
        args: Vec<Expr>,
        arg_types: &[Ty],
        span: Span,
    ) -> EnvResult<Expr> {
        if self.declaring().is_none() {
            return Err(self.unsupported("method resolution"));
        }
        let universe = self.session.universe().read();
        for (depth, hop) in self.hops(&universe)?.into_iter().enumerate() {
            match universe.method(hop.ty, name, arg_types) {
                Ok(method) => {
                    if depth > 0 {
                        tracing::trace!(outer = universe.display(hop.ty), "promoted to outer type");
                    }
                    return self.method_call(
                        &universe,
                        method,
                        hop.instance,
                        hop.ty,
                        depth > 0,
                        args,
                        span,
                    );
                }
                Err(LookupError::Ambiguous { .. }) => {
                    return Err(self.ambiguous(&universe, name, hop.ty));
                }
                Err(LookupError::NotFound) => {}
            }
        }
        Err(EnvError::undefined(UndefinedKind::Method, self.render(name)))
    }

    /// Resolve `receiver.name(args)`. Qualified calls are never promoted.
    pub fn lookup_method(
        &self,
        receiver: Expr,
        receiver_ty: TypeId,
        name: Name,
        args: Vec<Expr>,
        arg_types: &[Ty],
        span: Span,
    ) -> EnvResult<Expr> {
        let universe = self.session.universe().read();
        registered(&universe, receiver_ty)?;
        let method = match universe.method(receiver_ty, name, arg_types) {
            Ok(method) => method,
            Err(LookupError::NotFound) => {
                return Err(EnvError::undefined(UndefinedKind::Method, self.render(name)));
            }
            Err(LookupError::Ambiguous { .. }) => {
                return Err(self.ambiguous(&universe, name, receiver_ty));
            }
        };
        let instance = if matches!(receiver.kind, ExprKind::TypeName(_)) {
            None
        } else {
            Some(receiver)
        };
        self.method_call(&universe, method, instance, receiver_ty, false, args, span)
    }

    /// Resolve an unqualified call: a free function at top level, a method
    /// of the declaring type (or an enclosing type) elsewhere.
    pub fn resolve_call(
        &self,
        name: Name,
        args: Vec<Expr>,
        arg_types: &[Ty],
        span: Span,
    ) -> EnvResult<Expr> {
        if self.functions.is_some() {
            let function = self.resolve_function(name, arg_types)?;
            return Ok(Expr::new(ExprKind::FunctionCall { function, args }, span));
        }
        self.resolve_method(name, args, arg_types, span)
    }

    /// Resolve `new ty(args)`.
    ///
    /// Allocating a non-static member class passes the enclosing instance as
    /// the first argument.
    #[tracing::instrument(level = "trace", skip_all, fields(?ty, arity = arg_types.len()))]
    pub fn resolve_constructor(
        &self,
        ty: TypeId,
        args: Vec<Expr>,
        arg_types: &[Ty],
        span: Span,
    ) -> EnvResult<Expr> {
        let universe = self.session.universe().read();
        let info = registered(&universe, ty)?;
        match &info.state {
            DeclState::Finalized => {}
            DeclState::Pending => {
                return Err(EnvError::PendingType {
                    name: universe.display(ty).to_owned(),
                });
            }
            DeclState::Failed(reason) => {
                return Err(FatalError::CorruptUniverse(reason.clone()).into());
            }
        }
        if info.is_interface() {
            return Err(EnvError::undefined(
                UndefinedKind::Constructor,
                universe.display(ty),
            ));
        }

        let ctor = match universe.ctor(ty, arg_types) {
            Ok(ctor) => ctor,
            Err(LookupError::NotFound) => {
                return Err(EnvError::undefined(
                    UndefinedKind::Constructor,
                    universe.display(ty),
                ));
            }
            Err(LookupError::Ambiguous { .. }) => {
                return Err(EnvError::AmbiguousMember {
                    name: "<init>".to_owned(),
                    owner: universe.display(ty).to_owned(),
                });
            }
        };
        self.check_access(&universe, ctor.into(), || {
            format!("{}.<init>", universe.display(ty))
        })?;

        let args = match info.outer {
            Some(outer) if info.needs_outer_instance() => {
                let mut with_outer = Vec::with_capacity(args.len() + 1);
                with_outer.push(self.enclosing_instance(&universe, outer)?);
                with_outer.extend(args);
                with_outer
            }
            _ => args,
        };
        Ok(Expr::new(
            ExprKind::New {
                ty,
                ctor: Some(ctor),
                args,
            },
            span,
        ))
    }

    /// Expression reaching an instance of `outer` from this context.
    fn enclosing_instance(
        &self,
        universe: &TypeUniverse,
        outer: TypeId,
    ) -> EnvResult<Expr> {
        self.hops(universe)?
            .into_iter()
            .find(|hop| is_subtype(universe, hop.ty, outer))
            .and_then(|hop| hop.instance)
            .ok_or_else(|| EnvError::NoEnclosingInstance {
                ty: universe.display(outer).to_owned(),
            })
    }
}
