//! Reconciling the displayed repositories with the remote favorites.

mod controller;
mod gate;
mod pending;

pub use controller::{RefreshOutcome, RefreshTrigger, SearchOutcome, SyncController};
pub use pending::PendingAction;
