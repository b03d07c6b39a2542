//! Free functions declared at top level.
//!
//! Entries are kept in definition order and searched newest first, so a
//! redefinition with the same signature shadows the older one without
//! removing it. The table shares the global scope's revert discipline.

use jive_ir::{FunctionId, MethodDecl, Name, Ty};
use jive_types::{is_assignable, most_specific, LookupError, TypeUniverse};

#[derive(Clone, Debug)]
struct FunctionEntry {
    id: FunctionId,
    decl: MethodDecl,
    params: Vec<Ty>,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionTable {
    entries: Vec<FunctionEntry>,
    /// Ids are never reused, even after a revert.
    next_id: u32,
    /// Length of `entries` at the last revert point.
    mark: usize,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn define(&mut self, decl: MethodDecl) -> FunctionId {
        let id = FunctionId(self.next_id);
        self.next_id += 1;
        let params = decl.params.iter().map(|p| p.ty.clone()).collect();
        self.entries.push(FunctionEntry { id, decl, params });
        id
    }

    pub fn get(&self, id: FunctionId) -> Option<&MethodDecl> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.decl)
    }

    /// Most specific visible function named `name` applicable to `args`.
    pub fn resolve(
        &self,
        universe: &TypeUniverse,
        name: Name,
        args: &[Ty],
    ) -> Result<FunctionId, LookupError> {
        let mut visible: Vec<&FunctionEntry> = Vec::new();
        for entry in self.entries.iter().rev() {
            if entry.decl.name != name || entry.params.len() != args.len() {
                continue;
            }
            // Shadowed by a newer definition with the same signature.
            if visible.iter().any(|newer| newer.params == entry.params) {
                continue;
            }
            visible.push(entry);
        }

        let applicable: Vec<(FunctionId, &[Ty])> = visible
            .into_iter()
            .filter(|entry| {
                args.iter()
                    .zip(&entry.params)
                    .all(|(arg, param)| is_assignable(universe, arg, param))
            })
            .map(|entry| (entry.id, entry.params.as_slice()))
            .collect();
        most_specific(universe, &applicable)
    }

    pub fn set_revert_point(&mut self) {
        self.mark = self.entries.len();
    }

    /// Drop every function defined since the last revert point.
    pub fn revert(&mut self) -> usize {
        let removed = self.entries.len().saturating_sub(self.mark);
        self.entries.truncate(self.mark);
        removed
    }
}

#[cfg(test)]
mod tests;
