//! Local cache of the user's favorited repository ids.

use crate::id::RepoId;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: HashSet<RepoId>,
}

/// Membership captured before an optimistic mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    ids: HashSet<RepoId>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contents to exactly `ids`.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = RepoId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Returns `true` if the id was not present before.
    pub fn add(&mut self, id: RepoId) -> bool {
        self.ids.insert(id)
    }

    /// Returns `true` if the id was present before.
    pub fn remove(&mut self, id: RepoId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: RepoId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = RepoId> + '_ {
        self.ids.iter().copied()
    }

    /// Ids in ascending order, for stable output.
    pub fn sorted(&self) -> Vec<RepoId> {
        let mut ids: Vec<_> = self.iter().collect();
        ids.sort();
        ids
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ids: self.ids.clone(),
        }
    }

    /// Put everything back the way `snapshot` saw it.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.ids = snapshot.ids;
    }

    /// Put only `id` back the way `snapshot` saw it. Other ids keep whatever
    /// changed since, so concurrent actions on different repositories don't
    /// undo each other.
    pub fn revert(&mut self, id: RepoId, snapshot: &Snapshot) {
        if snapshot.contains(id) {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }
}

impl Snapshot {
    pub fn contains(&self, id: RepoId) -> bool {
        self.ids.contains(&id)
    }
}

impl FromIterator<RepoId> for FavoritesSet {
    fn from_iter<T: IntoIterator<Item = RepoId>>(iter: T) -> Self {
        FavoritesSet {
            ids: iter.into_iter().collect(),
        }
    }
}
