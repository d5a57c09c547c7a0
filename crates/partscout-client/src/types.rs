//! Request and response types for the auth endpoints.

use serde::Serialize;

/// Login body accepted by every `/auth*` endpoint.
///
/// The service calls the identifier `login`; it is usually an email address.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: Some(password.into()),
        }
    }

    /// Credentials without a password, for confirmation and recovery steps.
    #[must_use]
    pub fn login_only(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Result of a login or registration call.
#[derive(Clone)]
pub struct AuthSession {
    /// Value of the `Authorization` response header, sent back verbatim on
    /// later requests.
    pub token: Option<String>,
    /// Response body as returned by the service.
    pub data: serde_json::Value,
}

impl AuthSession {
    /// Presentation gate: `true` when the service issued a token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .field("data", &self.data)
            .finish()
    }
}
