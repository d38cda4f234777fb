use crate::error::{Error, Result};
use crate::favorites::FavoritesSet;
use crate::id::RepoId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Save,
    Unsave,
}

impl PendingAction {
    pub(crate) fn apply(self, id: RepoId, favorites: &mut FavoritesSet) {
        match self {
            PendingAction::Save => {
                favorites.add(id);
            }
            PendingAction::Unsave => {
                favorites.remove(id);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    action: PendingAction,
    session: u64,
}

/// At most one unresolved save/unsave per repository.
#[derive(Debug, Default)]
pub(crate) struct PendingActions {
    entries: HashMap<RepoId, Entry>,
}

impl PendingActions {
    /// Claim `id` for this session. An entry left over from an older session
    /// doesn't block; it is replaced, and its late `finish` is ignored.
    pub(crate) fn begin(&mut self, id: RepoId, action: PendingAction, session: u64) -> Result<()> {
        if self.entries.get(&id).is_some_and(|e| e.session == session) {
            return Err(Error::ActionPending(id));
        }
        self.entries.insert(id, Entry { action, session });
        Ok(())
    }

    pub(crate) fn finish(&mut self, id: RepoId, session: u64) {
        if self.entries.get(&id).is_some_and(|e| e.session == session) {
            self.entries.remove(&id);
        }
    }

    pub(crate) fn contains(&self, id: RepoId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Re-apply this session's unresolved optimistic changes on top of a freshly
    /// fetched set.
    pub(crate) fn overlay(&self, favorites: &mut FavoritesSet, session: u64) {
        for (id, entry) in &self.entries {
            if entry.session == session {
                entry.action.apply(*id, favorites);
            }
        }
    }
}
