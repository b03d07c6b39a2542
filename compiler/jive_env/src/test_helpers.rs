//! Shared fixtures for unit tests.

use jive_ir::{Modifiers, Name, Prim, Ty, TypeDecl, TypeId};
use jive_types::{TypeBuilder, TypeUniverse};

use crate::{CompileError, Compiler, EnvironmentContext, Session, SessionOptions};

/// A small type universe.
///
/// ```text
/// package app
///   public class Outer {
///     private int f; public static int s; int shared;
///     public void m(); public static void sm();
///     public class Inner { int g; void own();
///       public class Deep {}
///     }
///     static class Nested {}
///   }
///   class Other {}
///
/// package lib
///   public class Base {
///     public Base(); protected Base(int);
///     protected int prot; private int secret;
///     public void run();
///   }
///   public interface Task { void run(); }
///   public final class Sealed {}
/// ```
pub(crate) struct Fixture {
    pub session: Session,
    pub outer: TypeId,
    pub inner: TypeId,
    pub deep: TypeId,
    pub nested: TypeId,
    pub other: TypeId,
    pub base: TypeId,
    pub task: TypeId,
    pub sealed: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        let mut u = TypeUniverse::new(jive_ir::SharedInterner::default());
        let i = u.interner().clone();
        let app = i.intern("app");
        let lib = i.intern("lib");
        let int = Ty::Prim(Prim::Int);

        let outer = u.insert(
            TypeBuilder::class(i.intern("Outer"))
                .package(app)
                .field(i.intern("f"), int.clone(), Modifiers::PRIVATE)
                .field(
                    i.intern("s"),
                    int.clone(),
                    Modifiers::PUBLIC | Modifiers::STATIC,
                )
                .field(i.intern("shared"), int.clone(), Modifiers::empty())
                .method(i.intern("m"), &[], Ty::Void, Modifiers::PUBLIC)
                .method(
                    i.intern("sm"),
                    &[],
                    Ty::Void,
                    Modifiers::PUBLIC | Modifiers::STATIC,
                ),
        );
        let inner = u.insert(
            TypeBuilder::class(i.intern("Inner"))
                .outer(outer)
                .field(i.intern("g"), int.clone(), Modifiers::empty())
                .method(i.intern("own"), &[], Ty::Void, Modifiers::empty()),
        );
        let deep = u.insert(TypeBuilder::class(i.intern("Deep")).outer(inner));
        let nested = u.insert(
            TypeBuilder::class(i.intern("Nested"))
                .outer(outer)
                .modifiers(Modifiers::STATIC),
        );
        let other = u.insert(
            TypeBuilder::class(i.intern("Other"))
                .package(app)
                .modifiers(Modifiers::empty()),
        );

        let base = u.insert(
            TypeBuilder::class(i.intern("Base"))
                .package(lib)
                .ctor(&[], Modifiers::PUBLIC)
                .ctor(&[int.clone()], Modifiers::PROTECTED)
                .field(i.intern("prot"), int.clone(), Modifiers::PROTECTED)
                .field(i.intern("secret"), int, Modifiers::PRIVATE)
                .method(i.intern("run"), &[], Ty::Void, Modifiers::PUBLIC),
        );
        let task = u.insert(
            TypeBuilder::interface(i.intern("Task"))
                .package(lib)
                .method(
                    i.intern("run"),
                    &[],
                    Ty::Void,
                    Modifiers::PUBLIC | Modifiers::ABSTRACT,
                ),
        );
        let sealed = u.insert(
            TypeBuilder::class(i.intern("Sealed"))
                .package(lib)
                .modifiers(Modifiers::PUBLIC | Modifiers::FINAL),
        );

        let session = Session::builder().universe(u).options(options).build();
        Fixture {
            session,
            outer,
            inner,
            deep,
            nested,
            other,
            base,
            task,
            sealed,
        }
    }

    pub fn name(&self, text: &str) -> Name {
        self.session.interner().intern(text)
    }

    pub fn global(&self) -> EnvironmentContext<Ty> {
        EnvironmentContext::global(self.session.clone())
    }

    pub fn statics(&self, declaring: TypeId) -> EnvironmentContext<Ty> {
        EnvironmentContext::static_member(self.session.clone(), declaring)
    }

    pub fn instance(&self, declaring: TypeId) -> EnvironmentContext<Ty> {
        EnvironmentContext::instance(self.session.clone(), declaring)
    }
}

/// Compiler double registering declarations into the session universe.
#[derive(Default)]
pub(crate) struct RecordingCompiler {
    pub compiled: Vec<TypeDecl>,
    /// Names of the constants visible to each compilation.
    pub visible: Vec<Vec<Name>>,
    pub reject: bool,
}

impl Compiler<Ty> for RecordingCompiler {
    fn compile(
        &mut self,
        context: &mut EnvironmentContext<Ty>,
        decl: &TypeDecl,
    ) -> Result<TypeId, CompileError> {
        if self.reject {
            return Err(CompileError::new("rejected by test compiler"));
        }
        self.visible.push(
            context
                .scopes()
                .constants()
                .into_iter()
                .map(|(name, _)| name)
                .collect(),
        );
        self.compiled.push(decl.clone());
        let ty = context
            .session()
            .universe()
            .write()
            .insert_decl(decl, Name::EMPTY);
        Ok(ty)
    }
}
