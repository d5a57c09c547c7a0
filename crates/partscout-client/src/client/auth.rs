//! Account endpoints: login, registration, email confirmation and password
//! recovery. None of these are retried.

use serde::Serialize;

use super::{check_status, PartsClient};
use crate::error::ClientError;
use crate::types::{AuthSession, Credentials};

impl PartsClient {
    /// `POST /auth`. The session token comes back in the `Authorization`
    /// response header.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] when the service rejects the
    /// credentials, or [`ClientError::Http`] on transport failure.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<AuthSession, ClientError> {
        self.post_json("/auth", &[], credentials).await
    }

    /// `POST /auth/create_user[?guard_hash=<hash>]`.
    ///
    /// # Errors
    ///
    /// See [`PartsClient::authorize`].
    pub async fn create_user(
        &self,
        credentials: &Credentials,
        guard_hash: Option<&str>,
    ) -> Result<AuthSession, ClientError> {
        let query: Vec<_> = guard_hash.map(|h| ("guard_hash", h)).into_iter().collect();
        self.post_json("/auth/create_user", &query, credentials)
            .await
    }

    /// `POST /auth/confirm_email[?code=<code>]`, with `recovery=true` when the
    /// code was issued by a password recovery request.
    ///
    /// # Errors
    ///
    /// See [`PartsClient::authorize`].
    pub async fn confirm_email(
        &self,
        credentials: &Credentials,
        code: Option<&str>,
        recovery: bool,
    ) -> Result<AuthSession, ClientError> {
        let mut query: Vec<_> = code.map(|c| ("code", c)).into_iter().collect();
        if recovery {
            query.push(("recovery", "true"));
        }
        self.post_json("/auth/confirm_email", &query, credentials)
            .await
    }

    /// `POST /auth/password_recovery[?guard_hash=<hash>]`.
    ///
    /// # Errors
    ///
    /// See [`PartsClient::authorize`].
    pub async fn password_recovery(
        &self,
        credentials: &Credentials,
        guard_hash: Option<&str>,
    ) -> Result<AuthSession, ClientError> {
        let query: Vec<_> = guard_hash.map(|h| ("guard_hash", h)).into_iter().collect();
        self.post_json("/auth/password_recovery", &query, credentials)
            .await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<AuthSession, ClientError> {
        let url = self.endpoint(path, query)?;
        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let response = check_status(response, &url).await?;

        let token = response
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;
        let data = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).map_err(|source| ClientError::Deserialize {
                context: format!("{path} response"),
                source,
            })?
        };

        tracing::debug!(path, authenticated = token.is_some(), "auth request succeeded");
        Ok(AuthSession { token, data })
    }
}
