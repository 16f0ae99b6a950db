//! The presence roster.

use std::collections::BTreeSet;

/// The set of labels currently present in the room.
///
/// Labels, not connections: two tabs open as "ana" are one entry, and
/// every guest shares the guest label. The first of them to leave
/// removes the entry even while the others stay connected. The roster is
/// informational, so this is accepted.
///
/// Kept sorted so every presence snapshot lists members in the same
/// order.
///
/// Not thread-safe by itself; the hub keeps it behind a lock.
#[derive(Debug, Default, Clone)]
pub struct RoomRegistry {
    members: BTreeSet<String>,
}

impl RoomRegistry {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `label`. Returns `false` if it was already present.
    pub fn join(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        let added = self.members.insert(label.clone());
        tracing::debug!(%label, added, "joined roster");
        added
    }

    /// Removes `label`. Returns `false` if it was not present, which is
    /// not an error.
    pub fn leave(&mut self, label: &str) -> bool {
        let removed = self.members.remove(label);
        tracing::debug!(%label, removed, "left roster");
        removed
    }

    /// Snapshot of present labels, sorted.
    pub fn members(&self) -> Vec<String> {
        self.members.iter().cloned().collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.members.contains(label)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
