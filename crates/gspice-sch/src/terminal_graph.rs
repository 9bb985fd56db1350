//! Disjoint-set partition over terminal identifiers.
//!
//! Terminals joined by wires collapse into equivalence classes via
//! union-by-rank with path compression. Identifiers are interned to dense
//! slots internally; first-registration order is preserved because node
//! numbering downstream depends on it.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::TerminalId;

/// Union-find over [`TerminalId`]s, scoped to one netlist generation.
#[derive(Debug, Default)]
pub struct TerminalGraph {
    index: HashMap<TerminalId, usize>,
    /// Interned identifiers in first-registration order.
    terminals: Vec<TerminalId>,
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl TerminalGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered terminals.
    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }

    /// Whether `id` has been registered.
    pub fn contains(&self, id: &TerminalId) -> bool {
        self.index.contains_key(id)
    }

    /// Registered terminals in first-registration order.
    pub fn terminals(&self) -> impl Iterator<Item = &TerminalId> {
        self.terminals.iter()
    }

    /// Register `id` as a singleton class if unseen; no-op otherwise.
    /// Returns the terminal's slot.
    pub fn register(&mut self, id: &TerminalId) -> usize {
        if let Some(&slot) = self.index.get(id) {
            return slot;
        }
        let slot = self.terminals.len();
        self.index.insert(id.clone(), slot);
        self.terminals.push(id.clone());
        self.parent.push(slot);
        self.rank.push(0);
        slot
    }

    /// Resolve the class representative for `id`, auto-registering it if
    /// unseen.
    pub fn find(&mut self, id: &TerminalId) -> &TerminalId {
        let slot = self.register(id);
        let root = self.find_slot(slot);
        &self.terminals[root]
    }

    /// Follow parent links to the root, remembering the path taken.
    ///
    /// A repeated slot on the walk means the parent chain is cyclic — state
    /// that correct `union` usage can never produce, but that must not hang
    /// the traversal. The revisited slot is treated as the root and the
    /// stale link dropped. Either way, every slot on the walk is compressed
    /// onto the root.
    fn find_slot(&mut self, mut slot: usize) -> usize {
        let mut visited = Vec::new();
        while self.parent[slot] != slot {
            if visited.contains(&slot) {
                break;
            }
            visited.push(slot);
            slot = self.parent[slot];
        }
        let root = slot;
        for v in visited {
            self.parent[v] = root;
        }
        root
    }

    /// Merge the classes of `a` and `b` (registering either if unseen).
    pub fn union(&mut self, a: &TerminalId, b: &TerminalId) {
        let slot_a = self.register(a);
        let slot_b = self.register(b);
        let root_a = self.find_slot(slot_a);
        let root_b = self.find_slot(slot_b);

        if root_a == root_b {
            return;
        }

        // Union by rank keeps the trees shallow (and acyclic).
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            Ordering::Less => self.parent[root_a] = root_b,
            Ordering::Greater => self.parent[root_b] = root_a,
            Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
    }

    /// Repoint the ground class so that every later `find` on it resolves to
    /// the literal [`TerminalId::Ground`]. No-op when ground was never
    /// registered.
    pub fn canonicalize_ground(&mut self) {
        let Some(&ground) = self.index.get(&TerminalId::Ground) else {
            return;
        };
        let root = self.find_slot(ground);
        let members: Vec<usize> = (0..self.parent.len())
            .filter(|&slot| self.find_slot(slot) == root)
            .collect();
        for slot in members {
            self.parent[slot] = ground;
        }
        self.parent[ground] = ground;
    }

    /// Test-only: overwrite a parent link to fabricate corrupted state.
    #[cfg(test)]
    fn set_parent_for_test(&mut self, child: &TerminalId, parent: &TerminalId) {
        let child = self.index[child];
        let parent = self.index[parent];
        self.parent[child] = parent;
    }
}
