use crate::error::Result;
use crate::id::{RawId, RepoId};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_DESCRIPTION: &str = "No description";
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// A repository as displayed to the user.
///
/// `is_favorited` is derived from the favorites set by
/// [`reconcile`](crate::reconcile::reconcile) and is never authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: RepoId,
    pub name: String,
    pub description: String,
    pub stars: u64,
    pub url: String,
    pub language: String,
    is_favorited: bool,
}

/// Repository shape used on the wire by the search and favorites endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RepositoryRecord {
    pub repo_id: RawId,
    pub repo_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: u64,
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl Repository {
    pub fn new(id: RepoId, name: impl Into<String>, url: impl Into<String>) -> Self {
        Repository {
            id,
            name: name.into(),
            description: NO_DESCRIPTION.to_string(),
            stars: 0,
            url: url.into(),
            language: UNKNOWN_LANGUAGE.to_string(),
            is_favorited: false,
        }
    }

    /// Build a display repository from a wire record. The record arrives unflagged.
    pub fn from_record(record: RepositoryRecord) -> Result<Self> {
        Ok(Repository {
            id: RepoId::normalize(&record.repo_id)?,
            name: record.repo_name,
            description: record
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            stars: record.stars,
            url: record.html_url,
            language: record
                .language
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            is_favorited: false,
        })
    }

    pub fn is_favorited(&self) -> bool {
        self.is_favorited
    }

    pub(crate) fn with_favorited(mut self, favorited: bool) -> Self {
        self.is_favorited = favorited;
        self
    }

    pub fn to_record(&self) -> RepositoryRecord {
        RepositoryRecord {
            repo_id: self.id.into(),
            repo_name: self.name.clone(),
            description: Some(self.description.clone()),
            stars: self.stars,
            html_url: self.url.clone(),
            language: Some(self.language.clone()),
        }
    }
}

/// Bearer token for the backend. Never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for blank tokens; an empty credential counts as absent.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Credential(token))
        }
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_placeholders() {
        let record: RepositoryRecord = serde_json::from_str(
            r#"{"repo_id":"7","repo_name":"hello","description":null,"stars":3,"html_url":"https://github.com/octo/hello","language":null}"#,
        )
        .unwrap();
        let repo = Repository::from_record(record).unwrap();
        assert_eq!(repo.id, RepoId::new(7));
        assert_eq!(repo.description, NO_DESCRIPTION);
        assert_eq!(repo.language, UNKNOWN_LANGUAGE);
        assert!(!repo.is_favorited());
    }

    #[test]
    fn record_keeps_numeric_id() {
        let repo = Repository::new(RepoId::new(3), "x", "https://github.com/o/x");
        let json = serde_json::to_value(repo.to_record()).unwrap();
        assert_eq!(json["repo_id"], 3);
        assert_eq!(json["html_url"], "https://github.com/o/x");
    }

    #[test]
    fn blank_token_is_no_credential() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        assert_eq!(Credential::new("abc").unwrap().token(), "abc");
    }

    #[test]
    fn credential_debug_hides_token() {
        let cred = Credential::new("secret").unwrap();
        assert!(!format!("{cred:?}").contains("secret"));
    }
}
