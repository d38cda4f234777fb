use super::gate::SequenceGate;
use super::pending::{PendingAction, PendingActions};
use crate::backend::FavoritesBackend;
use crate::error::{Error, Result};
use crate::favorites::{FavoritesSet, Snapshot};
use crate::id::{RawId, RepoId};
use crate::reconcile::reconcile;
use crate::types::{Credential, Repository};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Why a refresh was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    CredentialAcquired,
    ViewEntered,
    SearchCompleted,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched set replaced the local one.
    Applied { favorites: usize },
    /// A newer response was already applied; this one was dropped.
    Stale,
    /// Joined a refresh that was already in flight.
    Coalesced,
}

#[derive(Debug)]
pub enum SearchOutcome {
    Loaded {
        repositories: Arc<[Repository]>,
        /// The search applied but the follow-up favorites refresh failed.
        refresh_error: Option<String>,
    },
    /// A later search already replaced the collection.
    Stale,
}

/// How a refresh ended, as seen by callers that joined it.
#[derive(Debug, Clone)]
enum Settlement {
    Done,
    Failed(String),
    /// The refresh future was dropped before its response arrived.
    Abandoned,
}

#[derive(Debug)]
struct InFlight {
    seq: u64,
    epoch: u64,
    settled: watch::Receiver<Option<Settlement>>,
}

#[derive(Debug)]
struct State {
    credential: Option<Credential>,
    /// Bumped on every credential change.
    session: u64,
    /// Bumped whenever remote favorites may have changed since the last fetch
    /// was issued. In-flight refreshes from an older epoch can't be joined.
    epoch: u64,
    favorites: FavoritesSet,
    collection: Arc<[Repository]>,
    pending: PendingActions,
    refreshes: SequenceGate,
    searches: SequenceGate,
    in_flight: Option<InFlight>,
}

/// Keeps the displayed repositories consistent with the remote favorites.
///
/// The favorites set and the collection are owned here and nowhere else.
/// Every change goes through [`reconcile`] and is published as a fresh
/// `Arc<[Repository]>`, so a reader holding an older collection never sees it
/// change underneath. The state mutex is never held across an await.
pub struct SyncController {
    backend: Arc<dyn FavoritesBackend>,
    state: Mutex<State>,
    published: watch::Sender<Arc<[Repository]>>,
}

/// Holds a repository's slot in the pending registry until the action resolves
/// or its future is dropped.
struct PendingGuard<'a> {
    controller: &'a SyncController,
    id: RepoId,
    action: PendingAction,
    session: u64,
    armed: bool,
}

impl PendingGuard<'_> {
    fn release(mut self, state: &mut State) {
        state.pending.finish(self.id, self.session);
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(id = %self.id, action = ?self.action, "favorites action abandoned before resolving");
            let mut state = self.controller.lock();
            state.pending.finish(self.id, self.session);
            state.epoch += 1;
        }
    }
}

/// Announces how a refresh ended to everyone who joined it. Dropping it
/// unsettled frees the in-flight slot so the next trigger fetches again.
struct RefreshGuard<'a> {
    controller: &'a SyncController,
    seq: u64,
    settled: watch::Sender<Option<Settlement>>,
    armed: bool,
}

impl RefreshGuard<'_> {
    fn settle(mut self, settlement: Settlement) {
        self.armed = false;
        self.settled.send_replace(Some(settlement));
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(seq = self.seq, "favorites refresh abandoned before resolving");
            {
                let mut state = self.controller.lock();
                if state.in_flight.as_ref().is_some_and(|f| f.seq == self.seq) {
                    state.in_flight = None;
                }
            }
            self.settled.send_replace(Some(Settlement::Abandoned));
        }
    }
}

impl SyncController {
    pub fn new(backend: Arc<dyn FavoritesBackend>) -> Self {
        let empty: Arc<[Repository]> = Arc::from(Vec::new());
        let (published, _) = watch::channel(Arc::clone(&empty));
        SyncController {
            backend,
            state: Mutex::new(State {
                credential: None,
                session: 0,
                epoch: 0,
                favorites: FavoritesSet::new(),
                collection: empty,
                pending: PendingActions::default(),
                refreshes: SequenceGate::default(),
                searches: SequenceGate::default(),
                in_flight: None,
            }),
            published,
        }
    }

    /// Start already authenticated, without fetching anything yet.
    pub fn with_credential(backend: Arc<dyn FavoritesBackend>, credential: Credential) -> Self {
        let controller = SyncController::new(backend);
        {
            let mut state = controller.lock();
            state.credential = Some(credential);
            state.session = 1;
        }
        controller
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &mut State) {
        let reconciled: Arc<[Repository]> = reconcile(&state.collection, &state.favorites).into();
        state.collection = Arc::clone(&reconciled);
        self.published.send_replace(reconciled);
    }

    /// Receives every newly published collection.
    pub fn subscribe(&self) -> watch::Receiver<Arc<[Repository]>> {
        self.published.subscribe()
    }

    pub fn repositories(&self) -> Arc<[Repository]> {
        Arc::clone(&self.lock().collection)
    }

    /// Displayed repositories that are currently saved.
    pub fn favorite_repositories(&self) -> Vec<Repository> {
        self.lock()
            .collection
            .iter()
            .filter(|r| r.is_favorited())
            .cloned()
            .collect()
    }

    pub fn favorites(&self) -> FavoritesSet {
        self.lock().favorites.clone()
    }

    pub fn find(&self, id: RepoId) -> Option<Repository> {
        self.lock().collection.iter().find(|r| r.id == id).cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().credential.is_some()
    }

    pub fn is_pending(&self, id: RepoId) -> bool {
        self.lock().pending.contains(id)
    }

    /// Install or clear the credential.
    ///
    /// A new credential starts a new session: favorites are cleared, every
    /// in-flight refresh and search becomes stale, and a refresh is requested.
    /// Clearing it leaves the collection displayed but unflagged.
    pub async fn set_credential(
        &self,
        credential: Option<Credential>,
    ) -> Result<Option<RefreshOutcome>> {
        {
            let mut state = self.lock();
            if state.credential == credential {
                return Ok(None);
            }
            state.credential = credential.clone();
            state.session += 1;
            state.epoch += 1;
            state.favorites.clear();
            state.refreshes.fence();
            state.searches.fence();
            state.in_flight = None;
            self.publish(&mut state);
        }

        if credential.is_none() {
            info!("credential cleared");
            return Ok(None);
        }
        info!("credential acquired");
        self.request_refresh(RefreshTrigger::CredentialAcquired)
            .await
            .map(Some)
    }

    /// The user came back to the browsing view.
    pub async fn enter_view(&self) -> Result<RefreshOutcome> {
        self.request_refresh(RefreshTrigger::ViewEntered).await
    }

    /// Refresh unless one that would return the same answer is already in flight.
    ///
    /// A joined refresh that fails fails here too, with its message. One that
    /// is abandoned before answering sends this caller round again.
    pub async fn request_refresh(&self, trigger: RefreshTrigger) -> Result<RefreshOutcome> {
        loop {
            let joinable = {
                let state = self.lock();
                if state.credential.is_none() {
                    return Err(Error::Unauthenticated);
                }
                state
                    .in_flight
                    .as_ref()
                    .filter(|f| f.epoch == state.epoch)
                    .map(|f| (f.seq, f.settled.clone()))
            };

            let Some((seq, mut settled)) = joinable else {
                debug!(?trigger, "favorites refresh requested");
                return self.refresh().await;
            };

            debug!(?trigger, seq, "joining in-flight favorites refresh");
            let settlement = settled
                .wait_for(Option::is_some)
                .await
                .ok()
                .and_then(|settlement| (*settlement).clone());
            match settlement {
                Some(Settlement::Done) => return Ok(RefreshOutcome::Coalesced),
                Some(Settlement::Failed(message)) => return Err(Error::RefreshFailed(message)),
                Some(Settlement::Abandoned) | None => {
                    debug!(?trigger, seq, "joined favorites refresh was abandoned");
                }
            }
        }
    }

    /// Fetch the authoritative favorites and re-flag the collection.
    ///
    /// Always issues a new request. If a response issued later has already been
    /// applied when this one arrives, this one is dropped.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let (seq, credential, guard) = {
            let mut state = self.lock();
            let credential = state.credential.clone().ok_or(Error::Unauthenticated)?;
            let seq = state.refreshes.issue();
            let (settled, joiners) = watch::channel(None);
            state.in_flight = Some(InFlight {
                seq,
                epoch: state.epoch,
                settled: joiners,
            });
            let guard = RefreshGuard {
                controller: self,
                seq,
                settled,
                armed: true,
            };
            (seq, credential, guard)
        };

        debug!(seq, "fetching favorites");
        let fetched = self.backend.fetch_favorites(&credential).await;
        let outcome = self.apply_refresh(seq, fetched);
        guard.settle(match &outcome {
            Ok(_) => Settlement::Done,
            Err(err) => Settlement::Failed(err.user_message()),
        });
        outcome
    }

    fn apply_refresh(&self, seq: u64, fetched: Result<Vec<RawId>>) -> Result<RefreshOutcome> {
        let mut state = self.lock();
        if state.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
            state.in_flight = None;
        }

        if seq <= state.refreshes.applied() {
            debug!(seq, applied = state.refreshes.applied(), "dropping stale favorites response");
            self.publish(&mut state);
            return Ok(RefreshOutcome::Stale);
        }

        let ids = fetched.and_then(|raw| {
            raw.iter()
                .map(RepoId::normalize)
                .collect::<Result<Vec<_>>>()
        });
        let ids = match ids {
            Ok(ids) => ids,
            Err(err) => {
                warn!(seq, error = %err, "favorites refresh failed, keeping previous favorites");
                self.publish(&mut state);
                return Err(err);
            }
        };

        state.refreshes.try_apply(seq);
        let session = state.session;
        let State {
            favorites, pending, ..
        } = &mut *state;
        favorites.replace(ids);
        pending.overlay(favorites, session);
        self.publish(&mut state);

        let count = state.favorites.len();
        info!(seq, favorites = count, "favorites refreshed");
        Ok(RefreshOutcome::Applied { favorites: count })
    }

    /// Replace the collection with a search result, then refresh favorites.
    ///
    /// The new repositories are published unflagged and only get their flags
    /// from the refresh that follows.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let (seq, credential) = {
            let mut state = self.lock();
            let credential = state.credential.clone().ok_or(Error::Unauthenticated)?;
            (state.searches.issue(), credential)
        };

        info!(query, seq, "searching repositories");
        let records = match self.backend.search_repositories(query, &credential).await {
            Ok(records) => records,
            Err(err) => {
                warn!(query, error = %err, "repository search failed");
                return Err(err);
            }
        };
        let repositories = records
            .into_iter()
            .map(Repository::from_record)
            .collect::<Result<Vec<_>>>()?;

        {
            let mut state = self.lock();
            if !state.searches.try_apply(seq) {
                debug!(query, seq, "dropping stale search response");
                return Ok(SearchOutcome::Stale);
            }
            info!(query, count = repositories.len(), "search results loaded");
            state.collection = repositories.into();
            self.published.send_replace(Arc::clone(&state.collection));
        }

        let refresh_error = match self.request_refresh(RefreshTrigger::SearchCompleted).await {
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "favorites refresh after search failed");
                Some(err.user_message())
            }
        };

        Ok(SearchOutcome::Loaded {
            repositories: self.repositories(),
            refresh_error,
        })
    }

    /// Save optimistically: flag first, persist, roll back on failure.
    pub async fn save(&self, repository: &Repository) -> Result<()> {
        let (credential, snapshot, guard) = self.begin(repository.id, PendingAction::Save)?;
        let result = self.backend.save_favorite(repository, &credential).await;
        self.resolve(guard, snapshot, result)
    }

    /// Unsave optimistically: unflag first, delete, roll back on failure.
    pub async fn unsave(&self, id: RepoId) -> Result<()> {
        let (credential, snapshot, guard) = self.begin(id, PendingAction::Unsave)?;
        let result = self.backend.remove_favorite(id, &credential).await;
        self.resolve(guard, snapshot, result)
    }

    fn begin(
        &self,
        id: RepoId,
        action: PendingAction,
    ) -> Result<(Credential, Snapshot, PendingGuard<'_>)> {
        let mut state = self.lock();
        let credential = state.credential.clone().ok_or(Error::Unauthenticated)?;
        let session = state.session;
        state.pending.begin(id, action, session)?;

        let snapshot = state.favorites.snapshot();
        action.apply(id, &mut state.favorites);
        self.publish(&mut state);
        debug!(%id, ?action, "optimistic favorites update applied");

        let guard = PendingGuard {
            controller: self,
            id,
            action,
            session,
            armed: true,
        };
        Ok((credential, snapshot, guard))
    }

    fn resolve(&self, guard: PendingGuard<'_>, snapshot: Snapshot, result: Result<()>) -> Result<()> {
        let mut state = self.lock();
        let (id, action, session) = (guard.id, guard.action, guard.session);
        guard.release(&mut state);

        match result {
            Ok(()) => {
                state.epoch += 1;
                info!(%id, ?action, "favorites action confirmed");
                Ok(())
            }
            Err(err) => {
                if session == state.session {
                    state.favorites.revert(id, &snapshot);
                    self.publish(&mut state);
                }
                warn!(%id, ?action, error = %err, "favorites action failed, rolled back");
                Err(err)
            }
        }
    }
}
