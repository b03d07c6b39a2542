//! Lexical scope chain with per-frame revert points.
//!
//! Frames live in a `Vec` owned by the stack, innermost last. Each frame
//! journals the names defined in it since its last revert point, so a failed
//! interactive submission can be rolled back without touching outer frames.

use rustc_hash::FxHashMap;

use jive_ir::Name;

/// Whether a binding can be reassigned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Variable,
    Constant,
}

/// A named slot owned by exactly one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding<V> {
    pub name: Name,
    pub kind: BindingKind,
    /// `None` while the name is only forward-declared.
    pub value: Option<V>,
}

/// Outcome of a scope-chain lookup.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a, V> {
    Found(&'a V),
    /// The nearest binding is a forward declaration without a value yet.
    Placeholder,
    NotFound,
}

/// Error returned by `ScopeStack` operations.
///
/// Carries the offending name; the context renders it for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// Name already bound in the current frame.
    AlreadyDefined(Name),
    /// No (variable) binding with this name in any frame.
    Undefined(Name),
    /// Bound, but only forward-declared.
    Uninitialized(Name),
    /// Attempt to leave the outermost frame.
    OutermostFrame,
}

#[derive(Clone, Debug)]
struct Frame<V> {
    bindings: FxHashMap<Name, Binding<V>>,
    /// Names added since the last revert point.
    journal: Vec<Name>,
}

impl<V> Frame<V> {
    fn new() -> Self {
        Frame {
            bindings: FxHashMap::default(),
            journal: Vec::new(),
        }
    }
}

/// Stack of lexical frames holding variables and constants.
#[derive(Clone, Debug)]
pub struct ScopeStack<V> {
    /// Never empty; the first frame is never popped.
    frames: Vec<Frame<V>>,
}

impl<V> ScopeStack<V> {
    /// Create a stack with a single, outermost frame.
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![Frame::new()],
        }
    }

    /// Number of live frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn current(&mut self) -> &mut Frame<V> {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Push a new empty frame.
    pub fn enter_scope(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Push a new frame with `names` forward-declared as variables.
    pub fn enter_scope_with(&mut self, names: impl IntoIterator<Item = Name>) {
        let mut frame = Frame::new();
        for name in names {
            frame.bindings.insert(
                name,
                Binding {
                    name,
                    kind: BindingKind::Variable,
                    value: None,
                },
            );
        }
        self.frames.push(frame);
    }

    /// Pop the current frame, returning the bindings it owned.
    pub fn leave_scope(&mut self) -> Result<Vec<Binding<V>>, ScopeError> {
        if self.frames.len() == 1 {
            return Err(ScopeError::OutermostFrame);
        }
        let frame = self.frames.pop().ok_or(ScopeError::OutermostFrame)?;
        Ok(frame.bindings.into_values().collect())
    }

    /// Declare a variable in the current frame.
    pub fn define(&mut self, name: Name, value: V) -> Result<(), ScopeError> {
        self.bind(name, value, BindingKind::Variable)
    }

    /// Declare a constant in the current frame.
    pub fn define_constant(&mut self, name: Name, value: V) -> Result<(), ScopeError> {
        self.bind(name, value, BindingKind::Constant)
    }

    fn bind(&mut self, name: Name, value: V, kind: BindingKind) -> Result<(), ScopeError> {
        let frame = self.current();
        match frame.bindings.get_mut(&name) {
            // Completing a forward declaration.
            Some(binding) if binding.value.is_none() => {
                binding.kind = kind;
                binding.value = Some(value);
                Ok(())
            }
            Some(_) => Err(ScopeError::AlreadyDefined(name)),
            None => {
                frame.bindings.insert(
                    name,
                    Binding {
                        name,
                        kind,
                        value: Some(value),
                    },
                );
                frame.journal.push(name);
                Ok(())
            }
        }
    }

    fn nearest(&self, name: Name) -> Option<&Binding<V>> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(&name))
    }

    /// Search innermost to outermost for `name`.
    pub fn lookup(&self, name: Name) -> Lookup<'_, V> {
        match self.nearest(name) {
            Some(Binding {
                value: Some(value), ..
            }) => Lookup::Found(value),
            Some(_) => Lookup::Placeholder,
            None => Lookup::NotFound,
        }
    }

    /// Value of the nearest binding of `name`.
    pub fn get(&self, name: Name) -> Result<&V, ScopeError> {
        match self.lookup(name) {
            Lookup::Found(value) => Ok(value),
            Lookup::Placeholder => Err(ScopeError::Uninitialized(name)),
            Lookup::NotFound => Err(ScopeError::Undefined(name)),
        }
    }

    /// Assign the nearest *variable* binding of `name`.
    ///
    /// Constants are skipped, not rejected: callers check [`Self::is_final`]
    /// first and report the assignment themselves.
    pub fn set(&mut self, name: Name, value: V) -> Result<(), ScopeError> {
        let binding = self
            .frames
            .iter_mut()
            .rev()
            .filter_map(|frame| frame.bindings.get_mut(&name))
            .find(|binding| binding.kind == BindingKind::Variable)
            .ok_or(ScopeError::Undefined(name))?;
        binding.value = Some(value);
        Ok(())
    }

    /// Whether any frame binds `name`.
    pub fn is_defined(&self, name: Name) -> bool {
        self.nearest(name).is_some()
    }

    /// Whether the nearest binding of `name` is a constant.
    pub fn is_final(&self, name: Name) -> bool {
        self.nearest(name)
            .is_some_and(|binding| binding.kind == BindingKind::Constant)
    }

    /// Clear the current frame's journal.
    pub fn set_revert_point(&mut self) {
        self.current().journal.clear();
    }

    /// Remove every binding added to the current frame since its last revert
    /// point, returning the removed names.
    ///
    /// Outer frames are untouched, and values assigned to bindings that
    /// predate the revert point are not restored.
    pub fn revert(&mut self) -> Vec<Name> {
        let frame = self.current();
        let removed = std::mem::take(&mut frame.journal);
        for name in &removed {
            frame.bindings.remove(name);
        }
        removed
    }

    /// Every reachable constant with a value, innermost binding winning,
    /// ordered by name.
    pub fn constants(&self) -> Vec<(Name, &V)> {
        let mut seen = FxHashMap::default();
        for frame in self.frames.iter().rev() {
            for (name, binding) in &frame.bindings {
                seen.entry(*name).or_insert(binding);
            }
        }
        let mut constants: Vec<(Name, &V)> = seen
            .into_iter()
            .filter(|(_, binding)| binding.kind == BindingKind::Constant)
            .filter_map(|(name, binding)| binding.value.as_ref().map(|value| (name, value)))
            .collect();
        constants.sort_by_key(|(name, _)| *name);
        constants
    }
}

impl<V> Default for ScopeStack<V> {
    fn default() -> Self {
        Self::new()
    }
}
