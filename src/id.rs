//! Repository identifiers.
//!
//! The backend and the search endpoint hand out repository ids either as JSON
//! numbers or as numeric strings. [`RawId`] is that wire form; [`RepoId`] is the
//! canonical form every comparison uses. The only way from one to the other is
//! [`RepoId::normalize`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical repository identifier.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RepoId(u64);

/// Identifier as it arrives from a remote: number or string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawId {
    Number(u64),
    Text(String),
}

impl RepoId {
    pub const fn new(id: u64) -> Self {
        RepoId(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Coerce a wire identifier into its canonical form.
    ///
    /// Non-numeric input is a contract violation by the remote and is reported
    /// as [`Error::InvalidIdentifier`]; callers abort the ingestion step rather
    /// than skip the entry.
    pub fn normalize(raw: &RawId) -> Result<Self> {
        match raw {
            RawId::Number(n) => Ok(RepoId(*n)),
            RawId::Text(s) => s.parse(),
        }
    }
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIdentifier(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(RepoId)
            .map_err(|_| Error::InvalidIdentifier(s.to_string()))
    }
}

impl TryFrom<RawId> for RepoId {
    type Error = Error;

    fn try_from(raw: RawId) -> Result<Self> {
        RepoId::normalize(&raw)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RepoId> for RawId {
    fn from(id: RepoId) -> Self {
        RawId::Number(id.0)
    }
}

impl From<u64> for RawId {
    fn from(n: u64) -> Self {
        RawId::Number(n)
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        RawId::Text(s.to_string())
    }
}

impl From<String> for RawId {
    fn from(s: String) -> Self {
        RawId::Text(s)
    }
}
