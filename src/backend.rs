//! Remote calls the sync controller depends on.

use crate::error::{Error, Result};
use crate::id::{RawId, RepoId};
use crate::types::{Credential, Repository, RepositoryRecord};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const USER_AGENT: &str = concat!("repofav/", env!("CARGO_PKG_VERSION"));

/// The favorites backend. Ids come back in wire form; normalizing them is the
/// caller's job.
#[async_trait]
pub trait FavoritesBackend: Send + Sync {
    async fn fetch_favorites(&self, credential: &Credential) -> Result<Vec<RawId>>;

    async fn save_favorite(&self, repository: &Repository, credential: &Credential) -> Result<()>;

    async fn remove_favorite(&self, id: RepoId, credential: &Credential) -> Result<()>;

    async fn search_repositories(
        &self,
        query: &str,
        credential: &Credential,
    ) -> Result<Vec<RepositoryRecord>>;
}

/// HTTP implementation against the repofav backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

/// Saved favorite as listed by the backend. Only the id is guaranteed.
#[derive(Deserialize, Debug, Clone)]
pub struct FavoriteEntry {
    pub repo_id: RawId,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: Option<u64>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.bearer_auth(credential.token())
    }

    /// Saved favorites with whatever details the backend stored.
    pub async fn list_favorites(&self, credential: &Credential) -> Result<Vec<FavoriteEntry>> {
        let url = self.url("/user/favorites");
        debug!(%url, "fetching favorites");
        let resp = self
            .authorized(self.client.get(&url), credential)
            .send()
            .await?;
        let body = expect_success(resp, "Failed to fetch favorites").await?;
        parse_favorites(&body)
    }
}

#[async_trait]
impl FavoritesBackend for HttpBackend {
    async fn fetch_favorites(&self, credential: &Credential) -> Result<Vec<RawId>> {
        let entries = self.list_favorites(credential).await?;
        Ok(entries.into_iter().map(|e| e.repo_id).collect())
    }

    async fn save_favorite(&self, repository: &Repository, credential: &Credential) -> Result<()> {
        let url = self.url("/user/favorites");
        debug!(%url, id = %repository.id, "saving favorite");
        let resp = self
            .authorized(self.client.post(&url), credential)
            .json(&repository.to_record())
            .send()
            .await?;
        expect_success(resp, "Failed to save favorite").await?;
        Ok(())
    }

    async fn remove_favorite(&self, id: RepoId, credential: &Credential) -> Result<()> {
        let url = self.url(&format!("/user/favorites/{}", id));
        debug!(%url, "removing favorite");
        let resp = self
            .authorized(self.client.delete(&url), credential)
            .send()
            .await?;
        expect_success(resp, "Failed to remove favorite").await?;
        Ok(())
    }

    async fn search_repositories(
        &self,
        query: &str,
        credential: &Credential,
    ) -> Result<Vec<RepositoryRecord>> {
        let url = self.url(&format!(
            "/user/searchRepo?username={}",
            urlencoding::encode(query.trim())
        ));
        debug!(%url, "searching repositories");
        let resp = self
            .authorized(self.client.get(&url), credential)
            .send()
            .await?;
        let body = expect_success(resp, "Failed to fetch GitHub repos").await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Read the body and turn a non-success status into [`Error::Remote`].
pub(crate) async fn expect_success(resp: Response, fallback: &str) -> Result<String> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::remote(status.as_u16(), error_message(&body, fallback)))
    }
}

fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// The favorites endpoint has answered both with a bare list and with a
/// `{ "favorites": [...] }` wrapper. Any other shape means "none", but a list
/// with an entry that doesn't parse is an error, never a shorter list.
fn parse_favorites(body: &str) -> Result<Vec<FavoriteEntry>> {
    let list = match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => items,
        Value::Object(mut wrapper) => match wrapper.remove("favorites") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };
    Ok(serde_json::from_value(Value::Array(list))?)
}
