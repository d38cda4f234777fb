pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod favorites;
pub mod id;
pub mod logging;
pub mod reconcile;
pub mod sync;
pub mod types;

pub use backend::{FavoritesBackend, HttpBackend};
pub use error::{Error, Result};
pub use favorites::{FavoritesSet, Snapshot};
pub use id::{RawId, RepoId};
pub use reconcile::reconcile;
pub use sync::{RefreshOutcome, RefreshTrigger, SearchOutcome, SyncController};
pub use types::{Credential, Repository, RepositoryRecord};
