//! Identifier, field and class resolution.

use jive_ir::{Expr, ExprKind, FieldRef, MemberRef, Name, Span, TypeId};
use jive_types::{LookupError, Reflection, ResolveError, TypeUniverse};

use super::EnvironmentContext;
use crate::error::registered;
use crate::{EnvError, EnvResult, FatalError, UndefinedKind};

/// One step of the walk from the declaring type to its outermost enclosing
/// type.
#[derive(Clone, Debug)]
pub(super) struct Hop {
    pub ty: TypeId,
    /// Expression reaching the instance of `ty`, while the chain of
    /// enclosing instances is unbroken.
    pub instance: Option<Expr>,
}

impl<V> EnvironmentContext<V> {
    /// Declaring type, then each enclosing type outward.
    ///
    /// The instance chain grows by one outer-instance accessor per hop and
    /// breaks at the first type without an enclosing instance (a static
    /// nested type, an interface, or a top-level type).
    pub(super) fn hops(&self, universe: &TypeUniverse) -> EnvResult<Vec<Hop>> {
        let Some(declaring) = self.declaring() else {
            return Ok(Vec::new());
        };
        registered(universe, declaring)?;
        let mut hops = vec![Hop {
            ty: declaring,
            instance: self.flavor.receiver().cloned(),
        }];
        let mut current = declaring;
        while let Some(outer) = universe.get(current).outer {
            let instance = match hops.last() {
                Some(Hop {
                    instance: Some(inner),
                    ..
                }) if universe.get(current).has_enclosing_instance() => {
                    Some(Expr::synthetic(ExprKind::OuterThis {
                        inner: Box::new(inner.clone()),
                        outer,
                    }))
                }
                _ => None,
            };
            hops.push(Hop {
                ty: outer,
                instance,
            });
            current = outer;
        }
        Ok(hops)
    }

    /// Fail unless `member` may be used from the declaring type.
    pub(super) fn check_access(
        &self,
        universe: &TypeUniverse,
        member: MemberRef,
        describe: impl FnOnce() -> String,
    ) -> EnvResult<()> {
        let from = self.declaring();
        match self.session.grant(universe, member, from)? {
            Some(_) => Ok(()),
            None => Err(EnvError::Inaccessible {
                member: describe(),
                from: from.map_or_else(|| "top-level code".to_owned(), |t| {
                    universe.display(t).to_owned()
                }),
            }),
        }
    }

    fn field_access(
        &self,
        universe: &TypeUniverse,
        field: FieldRef,
        qualifier: TypeId,
        instance: Option<Expr>,
        span: Span,
    ) -> EnvResult<Expr> {
        let info = universe.field_info(field);
        self.check_access(universe, field.into(), || self.render(info.name))?;
        if info.modifiers.is_static() {
            return Ok(Expr::new(ExprKind::StaticField { qualifier, field }, span));
        }
        match instance {
            Some(receiver) => Ok(Expr::new(
                ExprKind::InstanceField {
                    receiver: Box::new(receiver),
                    field,
                },
                span,
            )),
            None => Err(EnvError::StaticContext {
                name: self.render(info.name),
            }),
        }
    }

    /// Search the declaring type and its enclosing types for a field (and,
    /// when `with_types`, a member type) named `name`.
    fn find_member(
        &self,
        universe: &TypeUniverse,
        name: Name,
        span: Span,
        with_types: bool,
    ) -> EnvResult<Option<Expr>> {
        for hop in self.hops(universe)? {
            match universe.field(hop.ty, name) {
                Ok(field) => {
                    return self
                        .field_access(universe, field, hop.ty, hop.instance, span)
                        .map(Some);
                }
                Err(LookupError::Ambiguous { .. }) => {
                    return Err(self.ambiguous(universe, name, hop.ty));
                }
                Err(LookupError::NotFound) => {}
            }
            if !with_types {
                continue;
            }
            match universe.member_type(hop.ty, name) {
                Ok(ty) => {
                    self.check_access(universe, MemberRef::Type(ty), || {
                        universe.display(ty).to_owned()
                    })?;
                    return Ok(Some(Expr::new(ExprKind::TypeName(ty), span)));
                }
                Err(LookupError::Ambiguous { .. }) => {
                    return Err(self.ambiguous(universe, name, hop.ty));
                }
                Err(LookupError::NotFound) => {}
            }
        }
        Ok(None)
    }

    pub(super) fn ambiguous(&self, universe: &TypeUniverse, name: Name, owner: TypeId) -> EnvError {
        EnvError::AmbiguousMember {
            name: self.render(name),
            owner: universe.display(owner).to_owned(),
        }
    }

    /// Whether `name` is a binding of the scope chain or a field reachable
    /// from this context.
    pub fn is_defined(&self, name: Name) -> bool {
        if self.scopes.is_defined(name) {
            return true;
        }
        let universe = self.session.universe().read();
        matches!(
            self.find_member(&universe, name, Span::DUMMY, false),
            Ok(Some(_)) | Err(EnvError::AmbiguousMember { .. })
        )
    }

    /// Resolve a simple name: lexical binding first, then fields and member
    /// types of the declaring type and each enclosing type in turn.
    #[tracing::instrument(level = "trace", skip_all, fields(?name))]
    pub fn resolve_identifier(&self, name: Name, span: Span) -> EnvResult<Expr> {
        if self.scopes.is_defined(name) {
            return Ok(Expr::new(ExprKind::Local(name), span));
        }
        let universe = self.session.universe().read();
        self.find_member(&universe, name, span, true)?
            .ok_or_else(|| EnvError::undefined(UndefinedKind::Identifier, self.render(name)))
    }

    /// Resolve an unqualified field reference.
    pub fn resolve_field(&self, name: Name, span: Span) -> EnvResult<Expr> {
        if self.declaring().is_none() {
            return Err(self.unsupported("field resolution"));
        }
        let universe = self.session.universe().read();
        self.find_member(&universe, name, span, false)?
            .ok_or_else(|| EnvError::undefined(UndefinedKind::Field, self.render(name)))
    }

    /// Resolve `receiver.name` where `receiver` has static type `receiver_ty`.
    ///
    /// A `TypeName` receiver only reaches static fields.
    pub fn lookup_field(
        &self,
        receiver: Expr,
        receiver_ty: TypeId,
        name: Name,
        span: Span,
    ) -> EnvResult<Expr> {
        let universe = self.session.universe().read();
        registered(&universe, receiver_ty)?;
        let field = match universe.field(receiver_ty, name) {
            Ok(field) => field,
            Err(LookupError::NotFound) => {
                return Err(EnvError::undefined(UndefinedKind::Field, self.render(name)));
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
        self.field_access(&universe, field, receiver_ty, instance, span)
    }

    /// Resolve a type name relative to the declaring type.
    #[tracing::instrument(level = "trace", skip_all, fields(?name))]
    pub fn resolve_class(&self, name: Name) -> EnvResult<TypeId> {
        let universe = self.session.universe().read();
        match self.resolve_type(&universe, name) {
            Ok(ty) => {
                self.check_access(&universe, MemberRef::Type(ty), || {
                    universe.display(ty).to_owned()
                })?;
                Ok(ty)
            }
            Err(ResolveError::NotFound) => {
                Err(EnvError::undefined(UndefinedKind::Class, self.render(name)))
            }
            Err(ResolveError::Pending(_)) => Err(EnvError::PendingType {
                name: self.render(name),
            }),
            Err(ResolveError::Corrupt(reason)) => {
                tracing::error!(%reason, "type resolution hit a corrupt universe");
                Err(FatalError::CorruptUniverse(reason).into())
            }
        }
    }
}
