use crate::id::RepoId;
use thiserror::Error;

/// Everything that can go wrong talking to the backend or keeping favorites in sync.
#[derive(Error, Debug)]
pub enum Error {
    /// No credential is available for an action that needs one.
    #[error("not logged in - run 'repofav login' first")]
    Unauthenticated,

    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Remote { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A remote handed us an identifier that is not a non-negative integer.
    #[error("invalid repository identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A refresh this caller joined failed; carries that refresh's message.
    #[error("favorites refresh failed: {0}")]
    RefreshFailed(String),

    /// A save or unsave for this repository has not resolved yet.
    #[error("a favorites action on repository {0} is still in progress")]
    ActionPending(RepoId),

    #[error("HOME is not set, can't locate the config directory")]
    MissingHome,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Error::Remote {
            status,
            message: message.into(),
        }
    }

    /// The message to show the user, without transport decoration.
    pub fn user_message(&self) -> String {
        match self {
            Error::Remote { message, .. } | Error::RefreshFailed(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
