pub mod auth;
pub mod favorites;
pub mod misc;
pub mod search;
pub mod shell;

pub use auth::{login, logout, register, status};
pub use favorites::{list_favorites, save_repo, unsave_repo};
pub use misc::generate_completions;
pub use search::search_repos;
pub use shell::run_shell;

use repofav::config::RepofavConfig;
use repofav::{Credential, Error, HttpBackend, SyncController};
use std::sync::Arc;

/// What every command needs: the stored config plus command-line overrides.
pub struct Context {
    pub config: RepofavConfig,
    pub backend_url: String,
    token_override: Option<String>,
}

impl Context {
    pub fn load(backend_url: Option<&str>, token: Option<&str>) -> repofav::Result<Self> {
        let config = RepofavConfig::load()?;
        let backend_url = config.backend_url(backend_url);
        Ok(Context {
            config,
            backend_url,
            token_override: token.map(str::to_string),
        })
    }

    pub fn backend(&self) -> repofav::Result<HttpBackend> {
        HttpBackend::new(&self.backend_url)
    }

    pub fn credential(&self) -> repofav::Result<Credential> {
        self.config
            .credential(self.token_override.as_deref())
            .ok_or(Error::Unauthenticated)
    }

    pub fn controller(&self) -> repofav::Result<SyncController> {
        let credential = self.credential()?;
        let backend = Arc::new(self.backend()?);
        Ok(SyncController::with_credential(backend, credential))
    }
}
