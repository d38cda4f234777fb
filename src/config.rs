use crate::backend::DEFAULT_BACKEND_URL;
use crate::error::{Error, Result};
use crate::types::Credential;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct RepofavConfig {
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl RepofavConfig {
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(&Self::config_path()?))
    }

    /// A missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return RepofavConfig::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                RepofavConfig::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "can't read config");
                RepofavConfig::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| Error::MissingHome)?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("repofav")
            .join("config.json"))
    }

    /// `override_url` (flag or env) beats the stored URL, which beats the default.
    pub fn backend_url(&self, override_url: Option<&str>) -> String {
        override_url
            .filter(|u| !u.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// `override_token` (env) beats the stored token. Blank tokens count as none.
    pub fn credential(&self, override_token: Option<&str>) -> Option<Credential> {
        override_token
            .and_then(Credential::new)
            .or_else(|| self.token.clone().and_then(Credential::new))
    }

    pub fn set_login(&mut self, email: &str, credential: &Credential) {
        self.email = Some(email.to_string());
        self.token = Some(credential.token().to_string());
        self.logged_in_at = Some(Utc::now());
    }

    pub fn clear_login(&mut self) {
        self.token = None;
        self.logged_in_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RepofavConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, RepofavConfig::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(RepofavConfig::load_from(&path), RepofavConfig::default());
    }

    #[test]
    fn login_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = RepofavConfig::default();
        config.set_login("octo@example.com", &Credential::new("tok").unwrap());
        config.save_to(&path).unwrap();

        let loaded = RepofavConfig::load_from(&path);
        assert_eq!(loaded.email.as_deref(), Some("octo@example.com"));
        assert_eq!(loaded.credential(None).unwrap().token(), "tok");
        assert!(loaded.logged_in_at.is_some());

        let mut loaded = loaded;
        loaded.clear_login();
        assert!(loaded.credential(None).is_none());
        assert_eq!(loaded.email.as_deref(), Some("octo@example.com"));
    }

    #[test]
    fn overrides_win() {
        let config = RepofavConfig {
            backend_url: Some("http://stored".into()),
            token: Some("stored".into()),
            ..Default::default()
        };
        assert_eq!(config.backend_url(Some("http://flag")), "http://flag");
        assert_eq!(config.backend_url(Some(" ")), "http://stored");
        assert_eq!(config.backend_url(None), "http://stored");
        assert_eq!(RepofavConfig::default().backend_url(None), DEFAULT_BACKEND_URL);

        assert_eq!(config.credential(Some("env")).unwrap().token(), "env");
        assert_eq!(config.credential(Some("")).unwrap().token(), "stored");
    }
}
