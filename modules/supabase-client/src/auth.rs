//! GoTrue identity endpoints: password and OAuth sign-in, sign-up, sign-out,
//! and the current-user accessor. The ingredient layer treats this as an
//! opaque identity provider.

use serde_json::json;
use url::Url;

use crate::error::Result;
use crate::types::{AuthUser, Session};
use crate::api_error;

const AUTH_PATH: &str = "auth/v1";

/// External OAuth providers the app offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Apple,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Apple => "apple",
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl AuthClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Email+password sign-in. Returns a full session on success.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let mut url = self.endpoint("token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "password");

        let resp = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let session: Session = resp.json().await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Create an account. `display_name` lands in user metadata when given.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session> {
        let mut payload = json!({ "email": email, "password": password });
        if let Some(name) = display_name {
            payload["data"] = json!({ "full_name": name });
        }

        let resp = self
            .http
            .post(self.endpoint("signup")?)
            .header("apikey", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let session: Session = resp.json().await?;
        tracing::info!(user_id = %session.user.id, "Signed up");
        Ok(session)
    }

    /// Revoke the session behind `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.endpoint("logout")?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }
        Ok(())
    }

    /// Current user for a session token.
    pub async fn user(&self, access_token: &str) -> Result<AuthUser> {
        let resp = self
            .http
            .get(self.endpoint("user")?)
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        Ok(resp.json().await?)
    }

    /// Browser redirect URL starting an OAuth sign-in.
    pub fn authorize_url(
        &self,
        provider: OAuthProvider,
        redirect_to: Option<&str>,
    ) -> Result<Url> {
        let mut url = self.endpoint("authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str());
        if let Some(redirect) = redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("{AUTH_PATH}/{path}"))?)
    }
}
