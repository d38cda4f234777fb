//! Token acquisition. Credential checking itself is the backend's business.

use crate::backend::{expect_success, HttpBackend};
use crate::error::{Error, Result};
use crate::types::Credential;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
}

impl HttpBackend {
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        self.authenticate("/auth/login", email, password, "Login failed")
            .await
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Credential> {
        self.authenticate("/auth/register", email, password, "Registration failed")
            .await
    }

    async fn authenticate(
        &self,
        path: &str,
        email: &str,
        password: &str,
        fallback: &str,
    ) -> Result<Credential> {
        let url = self.url(path);
        debug!(%url, email, "authenticating");
        let resp = self
            .client()
            .post(&url)
            .json(&AuthRequest { email, password })
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = expect_success(resp, fallback).await?;
        token_from_body(&body).ok_or_else(|| Error::remote(status, "backend returned no token"))
    }
}

fn token_from_body(body: &str) -> Option<Credential> {
    serde_json::from_str::<AuthResponse>(body)
        .ok()
        .and_then(|r| r.token)
        .and_then(Credential::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token() {
        let cred = token_from_body(r#"{"token":"abc.def","user":{"id":1}}"#).unwrap();
        assert_eq!(cred.token(), "abc.def");
    }

    #[test]
    fn missing_or_blank_token() {
        assert!(token_from_body(r#"{"message":"ok"}"#).is_none());
        assert!(token_from_body(r#"{"token":""}"#).is_none());
        assert!(token_from_body("not json").is_none());
    }
}
