//! Name-resolution contexts.
//!
//! An [`EnvironmentContext`] joins a [`ScopeStack`] with declaration-based
//! lookup against the session's type universe. Its [`Flavor`] decides what
//! lies beyond the lexical scopes:
//!
//! - `Global`: top-level code; scopes and the function table only
//! - `Static`: class-level code of a declaring type; static members of the
//!   declaring type and of its enclosing types
//! - `Instance`: a method body with a receiver; instance members too, reached
//!   through a chain of outer-instance accessors
//!
//! Resolution entry points live in `members` (identifiers, fields, classes)
//! and `calls` (methods, functions, constructors).

mod calls;
mod members;

use jive_ir::{Expr, ExprKind, FunctionId, MethodDecl, Name, Ty, TypeId};
use jive_types::{LookupError, ResolveError, TypeResolver, TypeUniverse};

use crate::scope::{Binding, Lookup, ScopeError, ScopeStack};
use crate::{EnvError, EnvResult, FatalError, FunctionTable, Session, UndefinedKind};

/// What kind of code a context resolves names for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flavor {
    Global,
    Static {
        declaring: TypeId,
    },
    Instance {
        declaring: TypeId,
        /// How to reach the current instance from this lexical point.
        receiver: Expr,
    },
}

impl Flavor {
    pub fn declaring(&self) -> Option<TypeId> {
        match self {
            Flavor::Global => None,
            Flavor::Static { declaring } | Flavor::Instance { declaring, .. } => Some(*declaring),
        }
    }

    pub fn receiver(&self) -> Option<&Expr> {
        match self {
            Flavor::Instance { receiver, .. } => Some(receiver),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Flavor::Global => "global",
            Flavor::Static { .. } => "static",
            Flavor::Instance { .. } => "instance",
        }
    }
}

/// One name-resolution unit.
#[derive(Debug)]
pub struct EnvironmentContext<V> {
    session: Session,
    scopes: ScopeStack<V>,
    flavor: Flavor,
    /// Present only in global contexts.
    functions: Option<FunctionTable>,
}

impl<V> EnvironmentContext<V> {
    /// The process-lifetime top-level context.
    pub fn global(session: Session) -> Self {
        EnvironmentContext {
            session,
            scopes: ScopeStack::new(),
            flavor: Flavor::Global,
            functions: Some(FunctionTable::new()),
        }
    }

    /// Context for static code of `declaring`.
    pub fn static_member(session: Session, declaring: TypeId) -> Self {
        Self::with_flavor(session, Flavor::Static { declaring })
    }

    /// Context for a method body of `declaring` whose receiver is the
    /// current instance.
    pub fn instance(session: Session, declaring: TypeId) -> Self {
        let receiver = Expr::synthetic(ExprKind::This(declaring));
        Self::instance_with_receiver(session, declaring, receiver)
    }

    /// Context for instance code reaching its receiver through `receiver`.
    pub fn instance_with_receiver(session: Session, declaring: TypeId, receiver: Expr) -> Self {
        Self::with_flavor(session, Flavor::Instance { declaring, receiver })
    }

    pub(crate) fn with_flavor(session: Session, flavor: Flavor) -> Self {
        let functions = matches!(flavor, Flavor::Global).then(FunctionTable::new);
        EnvironmentContext {
            session,
            scopes: ScopeStack::new(),
            flavor,
            functions,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn flavor(&self) -> &Flavor {
        &self.flavor
    }

    pub fn declaring(&self) -> Option<TypeId> {
        self.flavor.declaring()
    }

    pub fn scopes(&self) -> &ScopeStack<V> {
        &self.scopes
    }

    pub fn functions(&self) -> Option<&FunctionTable> {
        self.functions.as_ref()
    }

    fn render(&self, name: Name) -> String {
        self.session.interner().lookup(name).to_owned()
    }

    fn scope_error(&self, err: ScopeError) -> EnvError {
        match err {
            ScopeError::AlreadyDefined(name) => EnvError::AlreadyDefined {
                name: self.render(name),
            },
            ScopeError::Undefined(name) => {
                EnvError::undefined(UndefinedKind::Variable, self.render(name))
            }
            ScopeError::Uninitialized(name) => EnvError::Uninitialized {
                name: self.render(name),
            },
            ScopeError::OutermostFrame => {
                tracing::error!("attempt to leave the outermost frame");
                FatalError::StackImbalance("leave_scope on the outermost frame".to_owned()).into()
            }
        }
    }

    fn unsupported(&self, operation: &'static str) -> EnvError {
        EnvError::Unsupported {
            operation,
            flavor: self.flavor.name(),
        }
    }

    // Scope chain

    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.enter_scope();
    }

    pub fn enter_scope_with(&mut self, names: impl IntoIterator<Item = Name>) {
        self.scopes.enter_scope_with(names);
    }

    pub fn leave_scope(&mut self) -> EnvResult<Vec<Binding<V>>> {
        self.scopes.leave_scope().map_err(|e| self.scope_error(e))
    }

    pub fn define(&mut self, name: Name, value: V) -> EnvResult<()> {
        self.scopes.define(name, value).map_err(|e| self.scope_error(e))
    }

    pub fn define_constant(&mut self, name: Name, value: V) -> EnvResult<()> {
        self.scopes
            .define_constant(name, value)
            .map_err(|e| self.scope_error(e))
    }

    pub fn lookup(&self, name: Name) -> Lookup<'_, V> {
        self.scopes.lookup(name)
    }

    pub fn get(&self, name: Name) -> EnvResult<&V> {
        self.scopes.get(name).map_err(|e| self.scope_error(e))
    }

    /// Assign the nearest variable. Check [`Self::is_final`] first to report
    /// assignments to constants.
    pub fn set(&mut self, name: Name, value: V) -> EnvResult<()> {
        self.scopes.set(name, value).map_err(|e| self.scope_error(e))
    }

    pub fn is_final(&self, name: Name) -> bool {
        self.scopes.is_final(name)
    }

    /// Checkpoint the current frame (and, in a global context, the function
    /// table).
    pub fn set_revert_point(&mut self) {
        self.scopes.set_revert_point();
        if let Some(functions) = &mut self.functions {
            functions.set_revert_point();
        }
    }

    /// Roll the current frame back to its last revert point.
    pub fn revert(&mut self) -> Vec<Name> {
        let removed = self.scopes.revert();
        let dropped = self
            .functions
            .as_mut()
            .map_or(0, FunctionTable::revert);
        tracing::debug!(bindings = removed.len(), functions = dropped, "reverted");
        removed
    }

    /// Run one interactive submission.
    ///
    /// On success the submission's definitions are committed; on failure the
    /// context is left exactly as before it started. Frames the submission
    /// left open are an engine bug: they are unwound and reported as fatal.
    pub fn submit<T>(&mut self, work: impl FnOnce(&mut Self) -> EnvResult<T>) -> EnvResult<T> {
        let depth = self.depth();
        self.set_revert_point();
        let result = work(self);

        if self.depth() != depth {
            let found = self.depth();
            tracing::error!(expected = depth, found, "unbalanced scopes after submission");
            while self.depth() > depth && self.scopes.leave_scope().is_ok() {}
            self.revert();
            return Err(FatalError::StackImbalance(format!(
                "submission started at depth {depth} and ended at depth {found}"
            ))
            .into());
        }

        match result {
            Ok(value) => {
                self.set_revert_point();
                Ok(value)
            }
            Err(err) => {
                self.revert();
                Err(err)
            }
        }
    }

    // Types

    fn resolve_type(&self, universe: &TypeUniverse, name: Name) -> Result<TypeId, ResolveError> {
        universe.resolve(name, self.declaring())
    }

    /// Whether `name` denotes a type, without forcing pending declarations.
    pub fn class_exists(&self, name: Name) -> EnvResult<bool> {
        let universe = self.session.universe().read();
        match self.resolve_type(&universe, name) {
            Ok(_) | Err(ResolveError::Pending(_)) => Ok(true),
            Err(ResolveError::NotFound) => Ok(false),
            Err(ResolveError::Corrupt(reason)) => {
                tracing::error!(%reason, "type probe hit a corrupt universe");
                Err(FatalError::CorruptUniverse(reason).into())
            }
        }
    }

    /// Expression that qualifies an unqualified member reference.
    pub fn default_qualifier(&self) -> Option<Expr> {
        match &self.flavor {
            Flavor::Global => None,
            Flavor::Static { declaring } => {
                Some(Expr::synthetic(ExprKind::TypeName(*declaring)))
            }
            Flavor::Instance { receiver, .. } => Some(receiver.clone()),
        }
    }

    // Functions

    pub fn define_function(&mut self, decl: MethodDecl) -> EnvResult<FunctionId> {
        let name = decl.name;
        let Some(functions) = &mut self.functions else {
            return Err(self.unsupported("function definition"));
        };
        let id = functions.define(decl);
        tracing::debug!(name = self.session.interner().lookup(name), ?id, "defined function");
        Ok(id)
    }

    pub fn resolve_function(&self, name: Name, arg_types: &[Ty]) -> EnvResult<FunctionId> {
        let Some(functions) = &self.functions else {
            return Err(self.unsupported("function lookup"));
        };
        let universe = self.session.universe().read();
        functions
            .resolve(&universe, name, arg_types)
            .map_err(|err| match err {
                LookupError::NotFound => {
                    EnvError::undefined(UndefinedKind::Function, self.render(name))
                }
                LookupError::Ambiguous { .. } => EnvError::AmbiguousMember {
                    name: self.render(name),
                    owner: "top level".to_owned(),
                },
            })
    }
}

impl<V: Clone> EnvironmentContext<V> {
    /// A context with the same flavor, whose outermost frame re-exports the
    /// given constants. Used to compile synthesized types.
    pub(crate) fn child(&self, constants: &[(Name, V)]) -> EnvResult<Self> {
        let mut child = Self::with_flavor(self.session.clone(), self.flavor.clone());
        for (name, value) in constants {
            child.define_constant(*name, value.clone())?;
        }
        Ok(child)
    }
}
