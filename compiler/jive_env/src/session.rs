//! Process-lifetime state shared by every context of one interpreter session.
//!
//! A `Session` is a cheap `Arc` handle. It owns the type universe, the
//! interner, the options, the access-grant cache and the closure-synthesis
//! cache. Contexts created for one submission, one method body or one
//! synthesized type all hold clones of the same session.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use jive_ir::{MemberDecl, MemberRef, Name, SharedInterner, Span, Ty, TypeId};
use jive_types::{SharedUniverse, TypeUniverse};

use crate::access::{self, AccessToken};
use crate::{FatalError, SessionOptions};

/// Names and declared types of the bindings captured by one allocation.
pub type CaptureShape = SmallVec<[(Name, Ty); 4]>;

/// Identity of a synthesized type: one allocation body at one program
/// point, with one capture shape.
///
/// Spans carry no submission identity; different bodies at the same offsets
/// get different types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SynthesisKey {
    pub target: TypeId,
    pub span: Span,
    /// Static types of the constructor arguments; they pick the super
    /// constructor.
    pub arg_types: Vec<Ty>,
    pub members: Vec<MemberDecl>,
    /// Declaring type of the allocating context.
    pub enclosing: Option<TypeId>,
    /// Whether the allocation captures an outer instance.
    pub instance: bool,
    pub shape: CaptureShape,
}

struct SessionState {
    universe: SharedUniverse,
    interner: SharedInterner,
    options: SessionOptions,
    grants: Mutex<FxHashMap<(MemberRef, Option<TypeId>), AccessToken>>,
    synthesized: Mutex<FxHashMap<SynthesisKey, TypeId>>,
    next_synthetic: AtomicU32,
}

/// Shared session handle.
#[derive(Clone)]
pub struct Session {
    state: Arc<SessionState>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn universe(&self) -> &SharedUniverse {
        &self.state.universe
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.state.interner
    }

    pub fn options(&self) -> &SessionOptions {
        &self.state.options
    }

    /// Capability to use `member` from `from`, consulting the grant cache.
    ///
    /// Only grants are cached: a refusal is recomputed, so a pending type
    /// that is later completed is judged on its final modifiers.
    pub fn grant(
        &self,
        universe: &TypeUniverse,
        member: MemberRef,
        from: Option<TypeId>,
    ) -> Result<Option<AccessToken>, FatalError> {
        let mut grants = self.state.grants.lock();
        if let Some(token) = grants.get(&(member, from)) {
            return Ok(Some(*token));
        }
        let token = access::grant(universe, self.state.options.access, member, from)?;
        if let Some(token) = token {
            grants.insert((member, from), token);
        }
        Ok(token)
    }

    pub(crate) fn cached_synthesis(&self, key: &SynthesisKey) -> Option<TypeId> {
        self.state.synthesized.lock().get(key).copied()
    }

    pub(crate) fn record_synthesis(&self, key: SynthesisKey, ty: TypeId) {
        self.state.synthesized.lock().insert(key, ty);
    }

    /// Number of distinct synthesized types.
    pub fn synthesized_count(&self) -> usize {
        self.state.synthesized.lock().len()
    }

    /// Fresh simple name for a synthesized type.
    pub(crate) fn next_synthetic_name(&self) -> Name {
        let n = self.state.next_synthetic.fetch_add(1, Ordering::Relaxed);
        let prefix = &self.state.options.synthetic_prefix;
        self.state.interner.intern(&format!("{prefix}{n}"))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("universe", &self.state.universe)
            .field("options", &self.state.options)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Session`].
///
/// Without an explicit universe the session starts from the core types only.
#[derive(Default)]
pub struct SessionBuilder {
    universe: Option<TypeUniverse>,
    options: SessionOptions,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-populated universe. Its interner becomes the
    /// session's interner.
    #[must_use]
    pub fn universe(mut self, universe: TypeUniverse) -> Self {
        self.universe = Some(universe);
        self
    }

    #[must_use]
    pub fn options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Session {
        let universe = self
            .universe
            .unwrap_or_else(|| TypeUniverse::new(SharedInterner::default()));
        let interner = universe.interner().clone();
        Session {
            state: Arc::new(SessionState {
                universe: SharedUniverse::new(universe),
                interner,
                options: self.options,
                grants: Mutex::new(FxHashMap::default()),
                synthesized: Mutex::new(FxHashMap::default()),
                next_synthetic: AtomicU32::new(0),
            }),
        }
    }
}
