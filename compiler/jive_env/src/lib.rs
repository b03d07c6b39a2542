//! Jive Env - execution contexts and name resolution for the Jive interpreter.
//!
//! The tree walker asks an [`EnvironmentContext`] to resolve every
//! identifier, call and allocation it visits. The context consults its
//! lexical [`ScopeStack`] first, then falls back to declaration-based lookup
//! in the session's type universe, emulating the language's access rules.
//! Local and anonymous allocations are routed through the
//! [`ClosureSynthesizer`], which hands a synthesized type declaration to the
//! external [`Compiler`].
//!
//! # Components
//!
//! - [`ScopeStack`]: frames of variables and constants with revert points
//! - [`EnvironmentContext`]: `Global`, `Static` or `Instance` resolution
//! - [`ClosureSynthesizer`]: synthesized types for captured allocations
//! - [`access`]: the pure access predicate and capability tokens
//! - [`Session`]: state shared by every context of one interpreter session

pub mod access;
mod closure;
mod context;
mod error;
mod functions;
mod guard;
mod options;
pub mod scope;
mod session;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use access::AccessToken;
pub use closure::{ClosureSynthesizer, Compiler, DeclaredType};
pub use context::{EnvironmentContext, Flavor};
pub use error::{CompileError, EnvError, EnvResult, FatalError, UndefinedKind};
pub use functions::FunctionTable;
pub use guard::ScopedContext;
pub use options::{AccessPolicy, SessionOptions};
pub use scope::{Binding, BindingKind, Lookup, ScopeError, ScopeStack};
pub use session::{CaptureShape, Session, SessionBuilder, SynthesisKey};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
