//! Scripted in-memory backend for driving `SyncController` in tests.
//!
//! Each call pops the next scripted reply for its endpoint. A reply is either
//! ready immediately or deferred behind a oneshot the test resolves later,
//! which is how tests control the order responses arrive in.

#![allow(dead_code)]

use async_trait::async_trait;
use repofav::{
    Credential, Error, FavoritesBackend, RawId, RepoId, Repository, RepositoryRecord, Result,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub enum Reply<T> {
    Ready(Result<T>),
    Deferred(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Reply::Ready(result) => result,
            Reply::Deferred(rx) => rx
                .await
                .unwrap_or_else(|_| Err(Error::remote(599, "reply dropped by test"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchFavorites,
    Save(RepoId),
    Remove(RepoId),
    Search(String),
}

#[derive(Default)]
pub struct MockBackend {
    favorites: Mutex<VecDeque<Reply<Vec<RawId>>>>,
    saves: Mutex<VecDeque<Reply<()>>>,
    removals: Mutex<VecDeque<Reply<()>>>,
    searches: Mutex<VecDeque<Reply<Vec<RepositoryRecord>>>>,
    calls: Mutex<Vec<Call>>,
}

fn pop<T>(queue: &Mutex<VecDeque<Reply<T>>>, what: &str) -> Reply<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected {what} call"))
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn favorites_ok(&self, ids: Vec<RawId>) {
        self.favorites.lock().unwrap().push_back(Reply::Ready(Ok(ids)));
    }

    pub fn favorites_err(&self, message: &str) {
        self.favorites
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(Error::remote(500, message))));
    }

    pub fn favorites_deferred(&self) -> oneshot::Sender<Result<Vec<RawId>>> {
        let (tx, rx) = oneshot::channel();
        self.favorites.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn save_ok(&self) {
        self.saves.lock().unwrap().push_back(Reply::Ready(Ok(())));
    }

    pub fn save_err(&self, message: &str) {
        self.saves
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(Error::remote(500, message))));
    }

    pub fn save_deferred(&self) -> oneshot::Sender<Result<()>> {
        let (tx, rx) = oneshot::channel();
        self.saves.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn remove_ok(&self) {
        self.removals.lock().unwrap().push_back(Reply::Ready(Ok(())));
    }

    pub fn remove_err(&self, message: &str) {
        self.removals
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(Error::remote(500, message))));
    }

    pub fn search_ok(&self, records: Vec<RepositoryRecord>) {
        self.searches.lock().unwrap().push_back(Reply::Ready(Ok(records)));
    }

    pub fn search_err(&self, message: &str) {
        self.searches
            .lock()
            .unwrap()
            .push_back(Reply::Ready(Err(Error::remote(404, message))));
    }

    pub fn search_deferred(&self) -> oneshot::Sender<Result<Vec<RepositoryRecord>>> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl FavoritesBackend for MockBackend {
    async fn fetch_favorites(&self, _credential: &Credential) -> Result<Vec<RawId>> {
        self.record(Call::FetchFavorites);
        let reply = pop(&self.favorites, "fetch_favorites");
        reply.resolve().await
    }

    async fn save_favorite(&self, repository: &Repository, _credential: &Credential) -> Result<()> {
        self.record(Call::Save(repository.id));
        let reply = pop(&self.saves, "save_favorite");
        reply.resolve().await
    }

    async fn remove_favorite(&self, id: RepoId, _credential: &Credential) -> Result<()> {
        self.record(Call::Remove(id));
        let reply = pop(&self.removals, "remove_favorite");
        reply.resolve().await
    }

    async fn search_repositories(
        &self,
        query: &str,
        _credential: &Credential,
    ) -> Result<Vec<RepositoryRecord>> {
        self.record(Call::Search(query.to_string()));
        let reply = pop(&self.searches, "search_repositories");
        reply.resolve().await
    }
}

pub fn record(id: impl Into<RawId>, name: &str) -> RepositoryRecord {
    RepositoryRecord {
        repo_id: id.into(),
        repo_name: name.to_string(),
        description: None,
        stars: 5,
        html_url: format!("https://github.com/octo/{name}"),
        language: None,
    }
}

pub fn repo(id: u64, name: &str) -> Repository {
    Repository::from_record(record(id, name)).unwrap()
}

pub fn ids(raw: &[u64]) -> Vec<RawId> {
    raw.iter().map(|&n| RawId::from(n)).collect()
}

pub fn credential() -> Credential {
    Credential::new("test-token").unwrap()
}

/// Yield until the backend has seen `n` calls of `call`.
pub async fn wait_for_calls(backend: &MockBackend, call: &Call, n: usize) {
    tokio::time::timeout(TIMEOUT, async {
        while backend.count(call) < n {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("backend call never arrived");
}
