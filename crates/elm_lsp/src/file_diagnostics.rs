use rustc_hash::{FxHashMap, FxHashSet};

use crate::diagnostic::{Diagnostic, DiagnosticKind};

/// Latest diagnostic list of every producer for one file.
#[derive(Debug, Clone, Default)]
pub struct FileDiagnostics {
    slots: [Vec<Diagnostic>; 4],
}

impl FileDiagnostics {
    /// Replaces the slot of `kind` and reports whether the merged output changed.
    ///
    /// Only the replaced slot can change, so comparing its old and new contents as multisets
    /// is the same as comparing the flattened lists.
    pub fn update(&mut self, kind: DiagnosticKind, diagnostics: Vec<Diagnostic>) -> bool {
        let slot = &mut self.slots[kind.index()];
        let changed = !same_multiset(slot, &diagnostics);
        *slot = diagnostics;
        changed
    }

    pub fn for_kind(&self, kind: DiagnosticKind) -> &[Diagnostic] {
        &self.slots[kind.index()]
    }

    /// Merged list in kind order, producer order preserved, exact duplicates dropped.
    pub fn get(&self) -> Vec<Diagnostic> {
        let mut seen: FxHashSet<&Diagnostic> = FxHashSet::default();
        DiagnosticKind::ALL
            .iter()
            .flat_map(|kind| self.slots[kind.index()].iter())
            .filter(|diagnostic| seen.insert(*diagnostic))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }
}

fn same_multiset(old: &[Diagnostic], new: &[Diagnostic]) -> bool {
    if old.len() != new.len() {
        return false;
    }
    let mut counts: FxHashMap<&Diagnostic, isize> = FxHashMap::default();
    for diagnostic in old {
        *counts.entry(diagnostic).or_default() += 1;
    }
    for diagnostic in new {
        match counts.get_mut(diagnostic) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    true
}
