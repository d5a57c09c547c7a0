//! HTTP client for the parts API.

mod auth;
mod search;

use std::time::Duration;

use partscout_core::AppConfig;
use reqwest::{Client, Response};

use crate::error::ClientError;

pub use search::HttpSearchSource;

/// Body used when a failed response carries no text of its own.
const GENERIC_SERVER_ERROR: &str = "server error";

/// HTTP client for the parts API: the streaming search endpoint and the auth
/// endpoints, all under one base URL.
///
/// The underlying `reqwest::Client` has no overall timeout because search
/// responses stay open while suppliers answer; auth requests set
/// `request_timeout` individually.
#[derive(Clone)]
pub struct PartsClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
    request_timeout: Duration,
    /// Maximum number of retry attempts after the first failure when opening
    /// a stream.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl PartsClient {
    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if `api_base_url` does not parse.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let base_url = config.api_base_url.trim_end_matches('/').to_owned();
        reqwest::Url::parse(&base_url).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.stream_max_retries,
            backoff_base_secs: config.stream_retry_backoff_base_secs,
        })
    }

    /// Replaces the token sent with search requests.
    #[must_use]
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `{base_url}{path}` with the given query pairs, percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the joined URL does not
    /// parse.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let mut url = reqwest::Url::parse(&format!("{}{path}", self.base_url)).map_err(|e| {
            ClientError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.to_string())
    }
}

/// Maps 429 and other non-2xx responses to typed errors, passing successful
/// responses through untouched.
async fn check_status(response: Response, url: &str) -> Result<Response, ClientError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(ClientError::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            GENERIC_SERVER_ERROR.to_owned()
        } else {
            body.trim().to_owned()
        };
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
            message,
        });
    }

    Ok(response)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
